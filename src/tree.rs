//! The growing document: a nested-map builder with a movable cursor.
//!
//! [`DocumentTree`] owns the root table and a cursor designating the
//! sub-table the next key-value belongs to. The cursor is an owned path
//! of segments that is re-resolved against the root on every write, so
//! no mutable borrow into the tree is ever stored.
//!
//! Dotted paths arriving here have their segments pre-escaped with
//! [`DocumentTree::escape_key`], which maps literal dots inside quoted
//! keys to a placeholder so path traversal never splits them.

use crate::{Error, Result, TomlMap, Value};
use std::collections::HashSet;

/// Reserved stand-in for a literal `.` inside a quoted key segment.
const DOT_PLACEHOLDER: char = '\u{F8FF}';

/// A nested table structure under construction.
///
/// # Examples
///
/// ```rust
/// use toml_scribe::tree::DocumentTree;
/// use toml_scribe::Value;
///
/// let mut tree = DocumentTree::new();
/// tree.enter_table("server.database").unwrap();
/// tree.put_value("port", Value::from(5432)).unwrap();
///
/// let root = tree.into_root();
/// let server = root.get("server").and_then(|v| v.as_table()).unwrap();
/// let database = server.get("database").and_then(|v| v.as_table()).unwrap();
/// assert_eq!(database.get("port").and_then(|v| v.as_i64()), Some(5432));
/// ```
#[derive(Debug, Default)]
pub struct DocumentTree {
    root: TomlMap,
    cursor: Vec<String>,
    saved_cursors: Vec<Vec<String>>,
    array_paths: HashSet<String>,
}

impl DocumentTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces literal dots in a key with the reserved placeholder so
    /// the key survives dotted-path traversal.
    #[must_use]
    pub fn escape_key(name: &str) -> String {
        name.replace('.', &DOT_PLACEHOLDER.to_string())
    }

    /// Reverses [`escape_key`](DocumentTree::escape_key).
    #[must_use]
    pub fn unescape_key(name: &str) -> String {
        name.replace(DOT_PLACEHOLDER, ".")
    }

    /// Sets `name → value` in the table the cursor designates.
    ///
    /// # Errors
    ///
    /// Fails when the cursor path runs through a non-table value, which
    /// the key registry rules out for well-formed input.
    pub fn put_value(&mut self, name: &str, value: Value) -> Result<()> {
        let table = resolve_table(&mut self.root, &self.cursor, &self.array_paths)?;
        table.insert(name.to_string(), value);
        Ok(())
    }

    /// Moves the cursor to `path` (dotted, segments pre-escaped),
    /// creating empty sub-tables along the way. When a traversed prefix
    /// names an array-of-tables, traversal drops into its last element.
    ///
    /// # Errors
    ///
    /// Fails when the path runs through a non-table value.
    pub fn enter_table(&mut self, path: &str) -> Result<()> {
        self.cursor = path.split('.').map(String::from).collect();
        resolve_table(&mut self.root, &self.cursor, &self.array_paths)?;
        Ok(())
    }

    /// Saves the cursor and descends into `name` (creating it if
    /// absent). Paired with
    /// [`end_inline_table`](DocumentTree::end_inline_table); nests.
    ///
    /// # Errors
    ///
    /// Fails when `name` already holds a non-table value.
    pub fn begin_inline_table(&mut self, name: &str) -> Result<()> {
        self.saved_cursors.push(self.cursor.clone());
        self.cursor.push(Self::escape_key(name));
        resolve_table(&mut self.root, &self.cursor, &self.array_paths)?;
        Ok(())
    }

    /// Restores the cursor saved by the matching
    /// [`begin_inline_table`](DocumentTree::begin_inline_table).
    pub fn end_inline_table(&mut self) {
        if let Some(previous) = self.saved_cursors.pop() {
            self.cursor = previous;
        }
    }

    /// Appends a new empty table to the array-of-tables at `path`
    /// (creating the array if absent) and moves the cursor into the new
    /// element. Future traversals through `path` descend into the last
    /// element.
    ///
    /// # Errors
    ///
    /// Fails when the path runs through, or terminates in, a non-array
    /// value.
    pub fn append_array_element(&mut self, path: &str) -> Result<()> {
        let segments: Vec<String> = path.split('.').map(String::from).collect();
        let (last, parents) = segments
            .split_last()
            .expect("split always yields at least one segment");
        let parent = resolve_table(&mut self.root, parents, &self.array_paths)?;

        let key = Self::unescape_key(last);
        match parent.or_insert(&key, Value::Array(Vec::new())) {
            Value::Array(elements) => elements.push(Value::Table(TomlMap::new())),
            _ => {
                return Err(Error::invalid_key(
                    0,
                    Self::unescape_key(path),
                    "does not designate an array of tables",
                ))
            }
        }

        self.array_paths.insert(path.to_string());
        self.cursor = segments;
        Ok(())
    }

    /// Finishes construction and returns the root table.
    #[must_use]
    pub fn into_root(self) -> TomlMap {
        self.root
    }
}

/// Walks `segments` from the root, creating empty tables as needed.
/// A segment holding an array registered in `array_paths` resolves to
/// the array's last element.
fn resolve_table<'a>(
    root: &'a mut TomlMap,
    segments: &[String],
    array_paths: &HashSet<String>,
) -> Result<&'a mut TomlMap> {
    let mut node = root;
    let mut accumulated = String::new();
    for segment in segments {
        if !accumulated.is_empty() {
            accumulated.push('.');
        }
        accumulated.push_str(segment);

        let key = DocumentTree::unescape_key(segment);
        node = match node.or_insert(&key, Value::Table(TomlMap::new())) {
            Value::Table(table) => table,
            Value::Array(elements) if array_paths.contains(&accumulated) => {
                match elements.last_mut() {
                    Some(Value::Table(table)) => table,
                    _ => {
                        return Err(Error::invalid_key(
                            0,
                            DocumentTree::unescape_key(&accumulated),
                            "array of tables has no open element",
                        ))
                    }
                }
            }
            _ => {
                return Err(Error::invalid_key(
                    0,
                    DocumentTree::unescape_key(&accumulated),
                    "does not designate a table",
                ))
            }
        };
    }
    Ok(node)
}
