//! Nested Event Map Library
//! # Overview
//!
//! This library provides a dynamically-typed nested key-value container for
//! semi-structured data such as decoded JSON events, with dotted-path lookups
//! and mutations into arbitrarily deep nesting.
//!
//! # Architecture
//!
//! The system is organized into two layers:
//!
//! - [`types`] - Core data types (`Value`, `MapError`, timestamp formats)
//! - [`core`](crate::core) - Container components:
//!   - [`nested_map`](crate::core::nested_map) - Path get/set traversal and typed accessors
//!   - [`concurrent_map`](crate::core::concurrent_map) - Reader/writer locked wrapper for shared use
//!   - [`traits`](crate::core::traits) - `Selector` / `Keyworder` capabilities for rule engines
//!
//! # Path Semantics
//!
//! - **set**: creates missing intermediate maps and replaces non-map
//!   intermediates with fresh maps
//! - **get**: returns a nested map when the path ends on one, and returns a
//!   leaf as soon as it is reached, ignoring any remaining segments
//! - **select**: splits a dotted key on `.` and behaves exactly like `get`
//!
//! # Example
//!
//! ```
//! use nested_event_map::{ConcurrentMap, Selector, Value};
//!
//! let event = ConcurrentMap::new(None);
//! event.set("sshd", &["process", "name"]);
//!
//! assert_eq!(event.get_string(&["process", "name"]), Some("sshd".to_string()));
//! assert_eq!(event.select("process.name"), Some(Value::from("sshd")));
//! ```

pub mod core;
pub mod types;

pub use self::core::{
    ConcurrentMap, Keyworder, NestedMap, Selector, NUMBER_NOT_FOUND, PATH_SEPARATOR,
};
pub use types::{format_arg_time, MapError, Value, ARG_TIME_FORMAT, TIMESTAMP_ENCODING};
