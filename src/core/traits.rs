//! Capability traits consumed by rule-matching engines
//!
//! A rule engine evaluating detection rules against an event only needs two
//! things from it: a way to resolve a dotted field name to a value, and a way
//! to list free-text keywords. Any event container implementing both traits
//! can be plugged into such an engine.

use crate::types::Value;

/// Separator between segments in a dotted key such as `process.parent.name`
pub const PATH_SEPARATOR: &str = ".";

/// Look up a value by dotted key
pub trait Selector {
    /// Resolve `key` (e.g. `"a.b.c"`) to a value
    ///
    /// Must return the same result as a path lookup with the segments produced
    /// by splitting `key` on [`PATH_SEPARATOR`], including not-found cases.
    fn select(&self, key: &str) -> Option<Value>;
}

/// List keywords for free-text matching
pub trait Keyworder {
    /// Keywords attached to this event, or `None` when the event has none
    fn keywords(&self) -> Option<Vec<String>>;
}

/// Split a dotted key into path segments
///
/// An empty key yields a single empty segment, so it only matches an entry
/// stored under the empty string.
pub fn split_path(key: &str) -> Vec<&str> {
    key.split(PATH_SEPARATOR).collect()
}

/// Render path segments as a dotted key
pub fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}
