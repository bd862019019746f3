//! Core map logic
//!
//! This module contains the container components:
//! - `traits` - Capability traits expected by rule-matching engines
//! - `nested_map` - Unsynchronized nested map with path-based traversal
//! - `concurrent_map` - Nested map guarded by a single reader/writer lock

pub mod concurrent_map;
pub mod nested_map;
pub mod traits;

pub use concurrent_map::ConcurrentMap;
pub use nested_map::{NestedMap, NUMBER_NOT_FOUND};
pub use traits::{Keyworder, Selector, PATH_SEPARATOR};
