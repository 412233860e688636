//! Tables: insertion-ordered maps of string keys to values.
//!
//! Every table in a parsed document, the root included, is a
//! [`TomlMap`]. TOML asks two things of a table that a plain `HashMap`
//! cannot answer: each key is defined at most once, and reading a
//! document back should visit keys in the order the document defined
//! them. The first is the key registry's job; the second is this
//! module's, by wrapping [`IndexMap`], whose iteration order is
//! insertion order.
//!
//! The surface is deliberately small. The parser and the
//! [`DocumentTree`](crate::tree::DocumentTree) write through
//! [`insert`](TomlMap::insert) and [`or_insert`](TomlMap::or_insert)
//! (the latter materializes implicit parent tables while walking a
//! dotted path); everyone else reads.
//!
//! ```rust
//! let root = toml_scribe::parse("zebra = 1\napple = 2\nmango = 3")
//!     .unwrap()
//!     .unwrap();
//!
//! // Keys come back in definition order, not hash or sort order.
//! let keys: Vec<_> = root.keys().cloned().collect();
//! assert_eq!(keys, vec!["zebra", "apple", "mango"]);
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered TOML table.
///
/// Returned (as the root) by [`parse`](crate::parse) and nested inside
/// [`Value::Table`] for `[headers]`, inline tables, and array-of-tables
/// elements.
///
/// # Examples
///
/// ```rust
/// let root = toml_scribe::parse("[server]\nhost = \"::1\"").unwrap().unwrap();
///
/// let server = root.get("server").and_then(|v| v.as_table()).unwrap();
/// assert_eq!(server.get("host").and_then(|v| v.as_str()), Some("::1"));
/// assert_eq!(server.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TomlMap(IndexMap<String, Value>);

impl TomlMap {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        TomlMap(IndexMap::new())
    }

    /// Defines `key`, returning the previous value if the key already
    /// existed.
    ///
    /// During a parse this never actually replaces anything: the key
    /// registry rejects a duplicate definition before it reaches the
    /// tree. The replacement return is for callers assembling tables
    /// by hand.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns the value at `key`, first inserting `default` when the
    /// key is absent.
    ///
    /// This is how the document tree brings implicit parents into
    /// being: walking `[a.b.c]` materializes empty tables at `a` and
    /// `a.b` without disturbing either if a table (or an
    /// array-of-tables) is already there.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_scribe::{TomlMap, Value};
    ///
    /// let mut table = TomlMap::new();
    /// table.or_insert("a", Value::Table(TomlMap::new()));
    /// // A second walk through "a" finds the existing table.
    /// let slot = table.or_insert("a", Value::Integer(0));
    /// assert!(slot.is_table());
    /// ```
    pub fn or_insert(&mut self, key: &str, default: Value) -> &mut Value {
        self.0.entry(key.to_string()).or_insert(default)
    }

    /// Looks up a key defined directly in this table (not in any
    /// nested one).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The number of keys defined in this table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for a table with no keys, such as the one created by a
    /// bare `[header]` with no assignments under it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The table's keys, in definition order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// The table's entries, in definition order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

/// Consumes a parsed tree, yielding entries in definition order.
impl IntoIterator for TomlMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
