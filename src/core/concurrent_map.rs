//! Thread-safe nested map
//!
//! This module provides [`ConcurrentMap`], which owns a single [`NestedMap`]
//! behind one reader/writer lock and exposes the same operations with safe
//! concurrent access.
//!
//! # Design
//!
//! The whole tree is guarded as one unit: a `set` anywhere blocks every other
//! operation until it returns, while any number of lookups can run together.
//! The map is meant to be a small per-event context object, not a
//! high-contention shared store, so no per-subtree locking is done.
//!
//! # Thread Safety
//!
//! Every lookup takes the read lock and every `set` takes the write lock. The
//! guard is dropped on every exit path, including unwinding, and
//! `parking_lot` locks do not poison, so a panic inside [`ConcurrentMap::with_write`]
//! leaves the map usable.
//!
//! Separate calls are not atomic with respect to each other: a `get` followed
//! by a `set` can interleave with other writers. Use [`ConcurrentMap::with_write`]
//! to run a read-modify-write sequence under a single lock acquisition.

use crate::core::traits::{split_path, Keyworder, Selector};
use crate::core::NestedMap;
use crate::types::{MapError, Value};
use chrono::{DateTime, FixedOffset};
use parking_lot::RwLock;

/// Nested map guarded by a single reader/writer lock
///
/// Lookups return owned clones so no lock is held once a call returns.
#[derive(Debug, Default)]
pub struct ConcurrentMap {
    /// The one map owned for the lifetime of this wrapper
    data: RwLock<NestedMap>,
}

impl ConcurrentMap {
    /// Create a map wrapping `data`, or an empty map when `data` is `None`
    pub fn new(data: Option<NestedMap>) -> Self {
        Self {
            data: RwLock::new(data.unwrap_or_default()),
        }
    }

    /// Store `value` at `path` under the write lock
    ///
    /// See [`NestedMap::set`] for how intermediate segments are handled.
    pub fn set<S: AsRef<str>>(&self, value: impl Into<Value>, path: &[S]) {
        self.data.write().set(value, path);
    }

    /// Look up the value at `path` under the read lock
    ///
    /// Returns a clone of the value, so a path ending on a nested map copies
    /// that whole subtree.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        self.data.read().get(path).cloned()
    }

    /// Look up a string at `path` under the read lock
    pub fn get_string<S: AsRef<str>>(&self, path: &[S]) -> Option<String> {
        self.data.read().get_string(path).map(str::to_string)
    }

    /// Look up a number at `path` under the read lock
    ///
    /// Returns `(NUMBER_NOT_FOUND, false)` when absent or not numeric.
    pub fn get_number<S: AsRef<str>>(&self, path: &[S]) -> (f64, bool) {
        self.data.read().get_number(path)
    }

    /// Look up and parse an RFC 3339 timestamp at `path` under the read lock
    pub fn get_timestamp<S: AsRef<str>>(
        &self,
        path: &[S],
    ) -> Result<Option<DateTime<FixedOffset>>, MapError> {
        self.data.read().get_timestamp(path)
    }

    /// Run `f` with shared access to the map, holding the read lock throughout
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&NestedMap) -> R,
    {
        f(&*self.data.read())
    }

    /// Run `f` with exclusive access to the map, holding the write lock throughout
    ///
    /// No other reader or writer observes the map while `f` runs, which makes
    /// compound updates such as increment-if-present atomic.
    pub fn with_write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut NestedMap) -> R,
    {
        f(&mut *self.data.write())
    }

    /// Access the underlying map without acquiring the lock
    ///
    /// Meant for single-threaded phases such as post-processing after a map
    /// has been built. This is not unlocked access to a shared map: safe Rust
    /// cannot hand out an unsynchronized reference while other threads may
    /// still read or write. The `&mut self` receiver makes the borrow checker
    /// do the synchronizing, so a map shared behind an `Arc` must first be
    /// unwrapped back to unique ownership (e.g. `Arc::try_unwrap`). While
    /// shared, use [`ConcurrentMap::with_write`] instead.
    pub fn raw(&mut self) -> &mut NestedMap {
        self.data.get_mut()
    }

    /// Consume the wrapper and return the underlying map
    pub fn into_raw(self) -> NestedMap {
        self.data.into_inner()
    }
}

impl From<NestedMap> for ConcurrentMap {
    fn from(data: NestedMap) -> Self {
        Self::new(Some(data))
    }
}

impl Selector for ConcurrentMap {
    fn select(&self, key: &str) -> Option<Value> {
        self.get(&split_path(key))
    }
}

impl Keyworder for ConcurrentMap {
    fn keywords(&self) -> Option<Vec<String>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nested_map::NUMBER_NOT_FOUND;
    use rstest::rstest;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;

    fn sample() -> NestedMap {
        NestedMap::from_iter([
            ("foo", Value::from("bar")),
            ("baz", Value::from(NestedMap::from_iter([("a", 1)]))),
        ])
    }

    #[test]
    fn test_new_without_data_is_empty() {
        let map = ConcurrentMap::new(None);
        assert_eq!(map.get(&["foo"]), None);
        assert!(map.into_raw().is_empty());
    }

    #[test]
    fn test_new_with_data_keeps_it() {
        let map = ConcurrentMap::new(Some(sample()));
        assert_eq!(map.get_string(&["foo"]), Some("bar".to_string()));
        assert_eq!(map.into_raw(), sample());
    }

    #[test]
    fn test_set_and_get_sequence() {
        let map = ConcurrentMap::from(sample());

        map.set(13, &["baz", "b"]);
        assert_eq!(map.get(&["baz", "b"]), Some(Value::Number(13.0)));

        let ddd = NestedMap::from_iter([("zzz", NestedMap::new())]);
        map.set(ddd.clone(), &["ddd"]);
        assert_eq!(map.get(&["ddd"]), Some(Value::Map(ddd.clone())));

        map.set(ddd.clone(), &["ddd", "lll", "kkk"]);
        assert_eq!(map.get(&["ddd", "lll", "kkk"]), Some(Value::Map(ddd.clone())));

        map.set(ddd.clone(), &["foo"]);
        assert_eq!(map.get(&["foo"]), Some(Value::Map(ddd)));
    }

    #[rstest]
    #[case::present(&["baz", "a"], (1.0, true))]
    #[case::wrong_type(&["foo"], (NUMBER_NOT_FOUND, false))]
    #[case::absent(&["nope"], (NUMBER_NOT_FOUND, false))]
    fn test_get_number(#[case] path: &[&str], #[case] expected: (f64, bool)) {
        assert_eq!(ConcurrentMap::from(sample()).get_number(path), expected);
    }

    #[test]
    fn test_get_timestamp() {
        let map = ConcurrentMap::default();
        map.set("2024-03-15T10:30:00+01:00", &["good"]);
        map.set("15/03/2024", &["bad"]);

        assert!(map.get_timestamp(&["good"]).unwrap().is_some());
        assert_eq!(map.get_timestamp(&["missing"]), Ok(None));
        assert!(matches!(
            map.get_timestamp(&["bad"]),
            Err(MapError::TimestampParse { .. })
        ));
    }

    #[rstest]
    #[case::nested("baz.a")]
    #[case::container("baz")]
    #[case::scalar_with_extra("foo.bar")]
    #[case::missing("nope.nope")]
    fn test_select_matches_get(#[case] key: &str) {
        let map = ConcurrentMap::from(sample());
        let path: Vec<&str> = key.split('.').collect();
        assert_eq!(map.select(key), map.get(&path));
    }

    #[test]
    fn test_keywords_is_always_none() {
        assert_eq!(ConcurrentMap::from(sample()).keywords(), None);
    }

    #[test]
    fn test_raw_bypasses_lock() {
        let mut map = ConcurrentMap::from(sample());
        map.raw().set("direct", &["foo"]);
        assert_eq!(map.get_string(&["foo"]), Some("direct".to_string()));
    }

    #[test]
    fn test_with_write_is_atomic_increment() {
        let map = Arc::new(ConcurrentMap::default());
        map.set(0, &["counter"]);

        let mut handles = vec![];
        for _ in 0..8 {
            let map_clone = Arc::clone(&map);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    map_clone.with_write(|m| {
                        let (n, _) = m.get_number(&["counter"]);
                        m.set(n + 1.0, &["counter"]);
                    });
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.get_number(&["counter"]), (800.0, true));
    }

    #[test]
    fn test_with_read_sees_consistent_snapshot() {
        let map = ConcurrentMap::from(sample());
        let keys = map.with_read(|m| {
            let mut keys: Vec<String> = m.iter().map(|(k, _)| k.clone()).collect();
            keys.sort();
            keys
        });
        assert_eq!(keys, vec!["baz".to_string(), "foo".to_string()]);
    }

    #[test]
    fn test_lock_released_after_panic() {
        let map = ConcurrentMap::from(sample());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            map.with_write(|m| {
                m.set("partial", &["foo"]);
                panic!("writer failed");
            })
        }));
        assert!(result.is_err());

        // Lock is free and the write made before the panic is visible
        assert_eq!(map.get_string(&["foo"]), Some("partial".to_string()));
        map.set(1, &["after"]);
        assert_eq!(map.get_number(&["after"]), (1.0, true));
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let map = Arc::new(ConcurrentMap::default());

        let writer = {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..1000 {
                    map.set(i, &["event", "seq"]);
                    map.set(format!("host-{}", i % 7), &["event", "host", "name"]);
                }
            })
        };

        let mut readers = vec![];
        for _ in 0..4 {
            let map = Arc::clone(&map);
            readers.push(thread::spawn(move || {
                for _ in 0..1000 {
                    let (seq, found) = map.get_number(&["event", "seq"]);
                    if found {
                        assert!((0.0..1000.0).contains(&seq));
                    }
                    if let Some(name) = map.get_string(&["event", "host", "name"]) {
                        assert!(name.starts_with("host-"));
                    }
                }
            }));
        }

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(map.get_number(&["event", "seq"]), (999.0, true));
        assert_eq!(
            map.get_string(&["event", "host", "name"]),
            Some("host-5".to_string())
        );
    }
}
