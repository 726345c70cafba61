//! Ordered map type backing record data.
//!
//! [`RecordMap`] is a thin wrapper around [`IndexMap`] that keeps entries in
//! insertion order. Order matters here: validation visits entries in
//! insertion order and reports the *first* violation, and the list-vs-map
//! reclassification preserves the order values were inserted in.
//!
//! # Examples
//!
//! ```rust
//! use record_codec::{RecordMap, Value};
//!
//! let mut map = RecordMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to record [`Value`]s.
///
/// Keys are plain strings here; the key invariants (non-empty, no
/// whitespace, not purely numeric) are enforced by the [`normalize`]
/// module, not by the map itself.
///
/// [`Value`]: crate::Value
/// [`normalize`]: crate::normalize
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordMap(IndexMap<String, crate::Value>);

impl RecordMap {
    /// Creates an empty `RecordMap`.
    #[must_use]
    pub fn new() -> Self {
        RecordMap(IndexMap::new())
    }

    /// Creates an empty `RecordMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RecordMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, crate::Value>> for RecordMap {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        RecordMap(map.into_iter().collect())
    }
}

impl From<RecordMap> for HashMap<String, crate::Value> {
    fn from(map: RecordMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for RecordMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordMap {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for RecordMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        RecordMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut map = RecordMap::new();
        map.insert("zeta".to_string(), Value::from(1));
        map.insert("alpha".to_string(), Value::from(2));
        map.insert("mid".to_string(), Value::from(3));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = RecordMap::new();
        assert!(map.insert("key".to_string(), Value::from(1)).is_none());
        assert_eq!(
            map.insert("key".to_string(), Value::from(2)),
            Some(Value::from(1))
        );
        assert_eq!(map.len(), 1);
    }
}
