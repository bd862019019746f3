//! Unsynchronized nested map
//!
//! This module provides [`NestedMap`], a string-keyed map whose values may
//! themselves be nested maps, as produced by decoding a JSON event. It
//! implements the path traversal used for every lookup and mutation, plus
//! typed accessors layered on top of it.
//!
//! Traversal walks a cursor down the tree in a loop, so path depth is bounded
//! by memory rather than by the thread's stack.
//!
//! # Traversal Rules
//!
//! - `set` creates missing intermediate maps, and replaces any intermediate
//!   that is not a map with a fresh empty one. The old value is discarded.
//! - `get` returns a nested map itself when the path ends on it, and returns a
//!   leaf value as soon as it reaches one, ignoring any remaining segments.
//! - An empty path is a no-op for `set` and not-found for `get`.
//!
//! A `NestedMap` assumes exclusive access for the duration of each call. Share
//! it across threads through [`ConcurrentMap`](crate::core::ConcurrentMap).

use crate::core::traits::{join_path, split_path, Keyworder, Selector};
use crate::types::time::parse_timestamp;
use crate::types::{MapError, Value};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Number returned by [`NestedMap::get_number`] when no number was found
///
/// A stored `-1.0` is indistinguishable from a miss by value alone; check the
/// returned flag.
pub const NUMBER_NOT_FOUND: f64 = -1.0;

/// String-keyed map of dynamically-typed values with path-based access
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedMap {
    entries: HashMap<String, Value>,
}

impl NestedMap {
    /// Create a new empty map
    pub fn new() -> Self {
        NestedMap {
            entries: HashMap::new(),
        }
    }

    /// Number of entries at this level (nested entries are not counted)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries at this level in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Store `value` at `path`, creating intermediate maps as needed
    ///
    /// # Arguments
    ///
    /// * `value` - The value to store
    /// * `path` - Segments from the root to the target key
    ///
    /// With a single segment the key at this level is overwritten, whatever it
    /// held before. With more segments, an intermediate key that is missing or
    /// holds anything other than a map is replaced by a new empty map before
    /// descending. An empty path leaves the map untouched.
    pub fn set<S: AsRef<str>>(&mut self, value: impl Into<Value>, path: &[S]) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut cursor = self;
        for segment in parents {
            cursor = cursor.child_map_mut(segment.as_ref());
        }
        cursor.entries.insert(last.as_ref().to_string(), value.into());
    }

    /// Nested map stored under `key`, replacing or creating it as needed
    fn child_map_mut(&mut self, key: &str) -> &mut NestedMap {
        let slot = self
            .entries
            .entry(key.to_string())
            .and_modify(|existing| {
                if !existing.is_map() {
                    debug!(
                        key,
                        discarded = existing.kind(),
                        "Replacing non-map value with nested map"
                    );
                    *existing = Value::Map(NestedMap::new());
                }
            })
            .or_insert_with(|| {
                trace!(key, "Creating intermediate nested map");
                Value::Map(NestedMap::new())
            });

        match slot {
            Value::Map(child) => child,
            _ => unreachable!("intermediate entry '{}' holds a map after replacement", key),
        }
    }

    /// Look up the value at `path`
    ///
    /// # Returns
    ///
    /// * `Some(&Value::Map(..))` - If the path ends on a nested map
    /// * `Some(&value)` - If a leaf is reached, even with segments left over
    /// * `None` - If the path is empty or a segment is missing
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (head, rest) = path.split_first()?;
        let mut value = self.entries.get(head.as_ref())?;

        for segment in rest {
            match value {
                Value::Map(child) => value = child.entries.get(segment.as_ref())?,
                _ => break,
            }
        }
        Some(value)
    }

    /// Look up a string at `path`
    ///
    /// Returns `None` both when the path is missing and when the value there
    /// is not a string.
    pub fn get_string<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Look up a number at `path`
    ///
    /// # Returns
    ///
    /// * `(n, true)` - If a number is stored at `path`
    /// * `(NUMBER_NOT_FOUND, false)` - If the path is missing or not numeric
    pub fn get_number<S: AsRef<str>>(&self, path: &[S]) -> (f64, bool) {
        match self.get(path).and_then(Value::as_f64) {
            Some(n) => (n, true),
            None => (NUMBER_NOT_FOUND, false),
        }
    }

    /// Look up a string at `path` and parse it as an RFC 3339 timestamp
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ts))` - If a valid timestamp string is stored at `path`
    /// * `Ok(None)` - If the path is missing or the value is not a string
    /// * `Err(MapError::TimestampParse)` - If the string is not valid RFC 3339
    pub fn get_timestamp<S: AsRef<str>>(
        &self,
        path: &[S],
    ) -> Result<Option<DateTime<FixedOffset>>, MapError> {
        let Some(raw) = self.get_string(path) else {
            return Ok(None);
        };

        parse_timestamp(raw)
            .map(Some)
            .map_err(|e| MapError::timestamp_parse(&join_path(path), raw, e))
    }
}

impl Selector for NestedMap {
    fn select(&self, key: &str) -> Option<Value> {
        self.get(&split_path(key)).cloned()
    }
}

impl Keyworder for NestedMap {
    fn keywords(&self) -> Option<Vec<String>> {
        None
    }
}

impl From<HashMap<String, Value>> for NestedMap {
    fn from(entries: HashMap<String, Value>) -> Self {
        NestedMap { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for NestedMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        NestedMap {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Children are unlinked onto a heap stack so that dropping a deeply nested
// map does not recurse once per level.
impl Drop for NestedMap {
    fn drop(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let mut pending: Vec<Value> = self.entries.drain().map(|(_, v)| v).collect();
        while let Some(value) = pending.pop() {
            match value {
                Value::Map(mut map) => pending.extend(map.entries.drain().map(|(_, v)| v)),
                Value::List(items) => pending.extend(items),
                _ => {}
            }
        }
    }
}

impl<'a> IntoIterator for &'a NestedMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
