//! Types module
//!
//! Contains the data types shared by the map components.
//! This module organizes types into logical submodules:
//! - `value`: The dynamically-typed `Value` stored in maps
//! - `error`: Error types for map operations
//! - `time`: Timestamp format constants and helpers

pub mod error;
pub mod time;
pub mod value;

pub use error::MapError;
pub use time::{format_arg_time, parse_timestamp, ARG_TIME_FORMAT, TIMESTAMP_ENCODING};
pub use value::Value;
