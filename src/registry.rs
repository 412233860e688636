//! The key registry: TOML's global uniqueness and hierarchy ledger.
//!
//! Both the parser and the [`Builder`](crate::Builder) own a
//! [`KeyRegistry`] and consult it before every definition, so the two
//! sides enforce identical rules:
//!
//! - a fully qualified key path may be defined once
//! - a `[table]` header may not be redefined, and may not redeclare an
//!   `[[array-of-tables]]`
//! - re-declaring `[[arr]]` appends a new element
//! - parents implicitly created by `[[a.b.c]]` may later be declared as
//!   plain `[a]` / `[a.b]` tables, but never as arrays of tables
//!
//! Key paths are composed against the current `[table]` and
//! `[[array-of-tables]]` context. The array element index is appended
//! to the array path *without* a dot separator, so keys inside distinct
//! elements of the same array compose to distinct paths.

use crate::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Uniqueness and hierarchy ledger for keys, tables, and
/// arrays-of-tables.
///
/// # Examples
///
/// ```rust
/// use toml_scribe::registry::KeyRegistry;
///
/// let mut registry = KeyRegistry::new();
/// registry.add_table_key("server").unwrap();
/// assert!(registry.is_valid_key("host"));
/// registry.add_key("host").unwrap();
/// // The composed path "server.host" is now taken.
/// assert!(!registry.is_valid_key("host"));
/// ```
#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: HashSet<String>,
    tables: HashSet<String>,
    arrays_of_tables: HashMap<String, usize>,
    implicit_from_array_table: HashSet<String>,
    current_table: String,
    current_array_of_table: String,
    inline_scopes: Vec<String>,
}

impl KeyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Composes the fully qualified path of `name` against the current
    /// context: `array-of-tables path + element index`, then the
    /// current table, then the name, dot-joined with empty segments
    /// trimmed.
    fn composed(&self, name: &str) -> String {
        let mut raw = String::new();
        if !self.current_array_of_table.is_empty() {
            raw.push_str(&self.current_array_of_table);
            let index = self
                .arrays_of_tables
                .get(&self.current_array_of_table)
                .copied()
                .unwrap_or(0);
            raw.push_str(&index.to_string());
        }
        raw.push('.');
        raw.push_str(&self.current_table);
        raw.push('.');
        raw.push_str(name);
        trim_dots(&raw)
    }

    /// True if the composed path of `name` has not been defined yet.
    #[must_use]
    pub fn is_valid_key(&self, name: &str) -> bool {
        !self.keys.contains(&self.composed(name))
    }

    /// Registers the composed path of `name`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if the path is already defined.
    pub fn add_key(&mut self, name: &str) -> Result<()> {
        let path = self.composed(name);
        if !self.keys.insert(path) {
            return Err(Error::DuplicateKey {
                key: name.to_string(),
            });
        }
        Ok(())
    }

    /// True if `[name]` would be accepted here.
    ///
    /// Performs the context moves of the table protocol (the current
    /// table is cleared and the enclosing array-of-tables is
    /// recomputed), matching the source behavior where validation and
    /// registration share state.
    pub fn is_valid_table_key(&mut self, name: &str) -> bool {
        self.current_table.clear();
        self.current_array_of_table = self.nearest_array_of_table_ancestor(name);
        if self.current_array_of_table == name {
            return false;
        }
        self.is_valid_key(name)
    }

    /// Registers `[name]` and makes it the current table.
    ///
    /// # Errors
    ///
    /// [`Error::TableAlreadyDefinedAsArray`] if `name` is an existing
    /// array-of-tables; [`Error::DuplicateTableKey`] if the path is
    /// already defined.
    pub fn add_table_key(&mut self, name: &str) -> Result<()> {
        self.current_table.clear();
        self.current_array_of_table = self.nearest_array_of_table_ancestor(name);
        if self.current_array_of_table == name {
            return Err(Error::TableAlreadyDefinedAsArray {
                key: name.to_string(),
            });
        }
        if !self.is_valid_key(name) {
            return Err(Error::DuplicateTableKey {
                key: name.to_string(),
            });
        }
        self.add_key(name)?;
        self.tables.insert(name.to_string());
        self.current_table = name.to_string();
        Ok(())
    }

    /// True if `[[name]]` would be accepted: the path is either brand
    /// new, or already registered as an array-of-tables (re-use appends
    /// an element).
    #[must_use]
    pub fn is_valid_array_table_key(&self, name: &str) -> bool {
        let known_array = self.arrays_of_tables.contains_key(name);
        let known_key = self.keys.contains(name);
        (known_array && known_key) || (!known_array && !known_key)
    }

    /// Registers `[[name]]`: appends an element to an existing array or
    /// creates the array, and records every strict prefix of the path
    /// as implicitly defined.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateArrayTableKey`] if the path collides with a
    /// plain key or table.
    pub fn add_array_table_key(&mut self, name: &str) -> Result<()> {
        if !self.is_valid_array_table_key(name) {
            return Err(Error::DuplicateArrayTableKey {
                key: name.to_string(),
            });
        }
        self.current_table.clear();
        self.current_array_of_table.clear();
        if let Some(index) = self.arrays_of_tables.get_mut(name) {
            *index += 1;
        } else {
            self.keys.insert(name.to_string());
            self.arrays_of_tables.insert(name.to_string(), 0);
        }
        self.current_array_of_table = name.to_string();

        let mut prefix = name;
        while let Some(dot) = prefix.rfind('.') {
            prefix = &prefix[..dot];
            self.implicit_from_array_table.insert(prefix.to_string());
        }
        Ok(())
    }

    /// True if a `name = {...}` inline table may be defined here.
    #[must_use]
    pub fn is_valid_inline_table(&self, name: &str) -> bool {
        self.is_valid_key(name)
    }

    /// Registers an inline table's own key.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if the path is already defined.
    pub fn add_inline_table_key(&mut self, name: &str) -> Result<()> {
        self.add_key(name)
    }

    /// Scopes the composition context onto an inline table's path so
    /// its members qualify under it. Paired with
    /// [`end_inline_table`](KeyRegistry::end_inline_table); nests.
    pub fn begin_inline_table(&mut self, name: &str) {
        self.inline_scopes.push(self.current_table.clone());
        self.current_table = trim_dots(&format!("{}.{}", self.current_table, name));
    }

    /// Restores the context saved by the matching
    /// [`begin_inline_table`](KeyRegistry::begin_inline_table).
    pub fn end_inline_table(&mut self) {
        if let Some(previous) = self.inline_scopes.pop() {
            self.current_table = previous;
        }
    }

    /// True if `name` was defined by a `[table]` header.
    #[must_use]
    pub fn is_registered_as_table_key(&self, name: &str) -> bool {
        self.tables.contains(name)
    }

    /// True if `name` was defined by a `[[array-of-tables]]` header.
    #[must_use]
    pub fn is_registered_as_array_table_key(&self, name: &str) -> bool {
        self.arrays_of_tables.contains_key(name)
    }

    /// True if `name` exists only as an implicit parent of some
    /// `[[a.b.c]]` declaration.
    #[must_use]
    pub fn is_table_implicit_from_array_table(&self, name: &str) -> bool {
        self.implicit_from_array_table.contains(name)
            && !self.arrays_of_tables.contains_key(name)
    }

    /// Walks the dotted path upwards (including `name` itself) and
    /// returns the first ancestor registered as an array-of-tables, or
    /// the empty string.
    fn nearest_array_of_table_ancestor(&self, name: &str) -> String {
        let mut path = name;
        loop {
            if self.arrays_of_tables.contains_key(path) {
                return path.to_string();
            }
            match path.rfind('.') {
                Some(dot) => path = &path[..dot],
                None => return String::new(),
            }
        }
    }
}

/// Dot-joins the non-empty segments of a dotted path.
fn trim_dots(path: &str) -> String {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_keys_compose_to_themselves() {
        let mut registry = KeyRegistry::new();
        registry.add_key("title").unwrap();
        assert!(!registry.is_valid_key("title"));
        assert!(registry.add_key("title").is_err());
    }

    #[test]
    fn keys_qualify_under_the_current_table() {
        let mut registry = KeyRegistry::new();
        registry.add_key("host").unwrap();
        registry.add_table_key("server").unwrap();
        // Same bare name, different composed path.
        assert!(registry.is_valid_key("host"));
        registry.add_key("host").unwrap();
        assert!(!registry.is_valid_key("host"));
    }

    #[test]
    fn tables_cannot_be_redefined() {
        let mut registry = KeyRegistry::new();
        registry.add_table_key("a").unwrap();
        assert!(!registry.is_valid_table_key("a"));
        assert!(matches!(
            registry.add_table_key("a"),
            Err(Error::DuplicateTableKey { .. })
        ));
    }

    #[test]
    fn parent_may_be_declared_after_child() {
        let mut registry = KeyRegistry::new();
        registry.add_table_key("a.b.c").unwrap();
        assert!(registry.is_valid_table_key("a"));
        registry.add_table_key("a").unwrap();
    }

    #[test]
    fn array_tables_reuse_increments_the_index() {
        let mut registry = KeyRegistry::new();
        registry.add_array_table_key("products").unwrap();
        registry.add_key("name").unwrap();
        registry.add_array_table_key("products").unwrap();
        // Second element: the same bare key composes to a fresh path.
        assert!(registry.is_valid_key("name"));
        registry.add_key("name").unwrap();
    }

    #[test]
    fn table_header_cannot_redeclare_an_array_of_tables() {
        let mut registry = KeyRegistry::new();
        registry.add_array_table_key("fruit").unwrap();
        assert!(!registry.is_valid_table_key("fruit"));
        assert!(matches!(
            registry.add_table_key("fruit"),
            Err(Error::TableAlreadyDefinedAsArray { .. })
        ));
    }

    #[test]
    fn sub_tables_nest_inside_the_current_array_element() {
        let mut registry = KeyRegistry::new();
        registry.add_array_table_key("fruit").unwrap();
        assert!(registry.is_valid_table_key("fruit.physical"));
        registry.add_table_key("fruit.physical").unwrap();
        registry.add_key("color").unwrap();

        // A new element resets the namespace.
        registry.add_array_table_key("fruit").unwrap();
        assert!(registry.is_valid_table_key("fruit.physical"));
    }

    #[test]
    fn implicit_parents_are_tracked() {
        let mut registry = KeyRegistry::new();
        registry.add_array_table_key("albums.songs").unwrap();
        assert!(registry.is_table_implicit_from_array_table("albums"));
        assert!(!registry.is_table_implicit_from_array_table("albums.songs"));

        // The implicit parent may become an explicit table.
        assert!(registry.is_valid_table_key("albums"));
        registry.add_table_key("albums").unwrap();
    }

    #[test]
    fn array_table_over_existing_key_is_rejected() {
        let mut registry = KeyRegistry::new();
        registry.add_key("x").unwrap();
        assert!(!registry.is_valid_array_table_key("x"));
        assert!(matches!(
            registry.add_array_table_key("x"),
            Err(Error::DuplicateArrayTableKey { .. })
        ));
    }

    #[test]
    fn inline_table_members_scope_under_the_inline_path() {
        let mut registry = KeyRegistry::new();
        registry.add_key("name").unwrap();
        registry.add_inline_table_key("point").unwrap();
        registry.begin_inline_table("point");
        // "name" composes to "point.name" here, so it stays valid.
        assert!(registry.is_valid_key("name"));
        registry.add_key("name").unwrap();
        registry.end_inline_table();
        assert!(!registry.is_valid_key("name"));
        assert!(!registry.is_valid_key("point"));
    }

    #[test]
    fn registered_kind_queries() {
        let mut registry = KeyRegistry::new();
        registry.add_table_key("t").unwrap();
        registry.add_array_table_key("arr").unwrap();
        assert!(registry.is_registered_as_table_key("t"));
        assert!(!registry.is_registered_as_table_key("arr"));
        assert!(registry.is_registered_as_array_table_key("arr"));
        assert!(!registry.is_registered_as_array_table_key("t"));
    }
}
