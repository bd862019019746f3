//! Error types for nested event maps
//!
//! Lookups signal "not found" and "wrong type" through `Option`/`bool`
//! results, never through this enum. The only genuine failure a map
//! operation can report is a value that exists but cannot be parsed as a
//! timestamp.

use super::time::TIMESTAMP_ENCODING;
use thiserror::Error;

/// Main error type for map operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// A string value was found at the requested path but is not a valid
    /// timestamp in the parse encoding
    #[error("Invalid {} timestamp '{value}' at '{key}': {source}", TIMESTAMP_ENCODING)]
    TimestampParse {
        /// Dotted rendering of the path that was looked up
        key: String,
        /// The raw string that failed to parse
        value: String,
        /// Underlying parser error
        #[source]
        source: chrono::ParseError,
    },
}

impl MapError {
    /// Create a TimestampParse error
    pub fn timestamp_parse(key: &str, value: &str, source: chrono::ParseError) -> Self {
        MapError::TimestampParse {
            key: key.to_string(),
            value: value.to_string(),
            source,
        }
    }
}
