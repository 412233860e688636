//! # toml-scribe
//!
//! A strict parser and document builder for the TOML v0.4.0
//! configuration format.
//!
//! ## What it does
//!
//! `toml-scribe` turns TOML text into an in-memory tree of typed
//! [`Value`]s, and turns values back into TOML text, with the same
//! validation rules on both sides:
//!
//! - **Strict parsing**: duplicate keys, redefined tables, mixed-type
//!   arrays, malformed numbers, and misplaced constructs are rejected
//!   with the offending line
//! - **Shared rule book**: the parser and the [`Builder`] consult the
//!   same key registry, so everything the builder emits parses back
//! - **Ordered tables**: parsed tables preserve definition order via
//!   [`TomlMap`]
//! - **Typed date-times**: offset, local, and date-only literals keep
//!   their shape through [`Datetime`]
//!
//! ## Quick Start
//!
//! ```rust
//! use toml_scribe::parse;
//!
//! let document = r#"
//! title = "TOML Example"
//!
//! [owner]
//! name = "Tom Preston-Werner"
//! dob = 1979-05-27T07:32:00Z
//! "#;
//!
//! let root = parse(document).unwrap().unwrap();
//! assert_eq!(root.get("title").and_then(|v| v.as_str()), Some("TOML Example"));
//!
//! let owner = root.get("owner").and_then(|v| v.as_table()).unwrap();
//! assert_eq!(
//!     owner.get("name").and_then(|v| v.as_str()),
//!     Some("Tom Preston-Werner")
//! );
//! ```
//!
//! ## Building documents
//!
//! ```rust
//! use toml_scribe::{parse, Builder};
//!
//! let mut builder = Builder::new();
//! builder
//!     .add_value("title", "Example")?
//!     .add_table("database")?
//!     .add_value("ports", vec![8001.into(), 8001.into(), 8002.into()])?
//!     .add_value("enabled", true)?;
//!
//! let text = builder.build();
//! let root = parse(&text)?.unwrap();
//! let database = root.get("database").and_then(|v| v.as_table()).unwrap();
//! assert_eq!(database.get("enabled").and_then(|v| v.as_bool()), Some(true));
//! # Ok::<(), toml_scribe::Error>(())
//! ```
//!
//! ## Dynamic values with the toml! macro
//!
//! ```rust
//! use toml_scribe::{toml, Value};
//!
//! let data = toml!({
//!     "name": "Alice",
//!     "tags": ["rust", "toml"]
//! });
//!
//! if let Value::Table(table) = data {
//!     assert_eq!(table.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! }
//! ```
//!
//! ## Error handling
//!
//! Every failure is a typed [`Error`]; parse errors carry the 1-based
//! line of the offending token, and [`parse_file`] additionally wraps
//! errors with the file path. No partial tree is ever returned.
//!
//! ## Scope
//!
//! The crate targets TOML v0.4.0: later additions (hex/octal/binary
//! integer literals, dotted keys in assignments) are rejected rather
//! than half-supported. Formatting, comments, and key order are not
//! preserved across a parse/build round-trip; value identity is.

pub mod builder;
pub mod cursor;
pub mod datetime;
pub mod error;
pub mod macros;
pub mod map;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod token;
pub mod tree;
pub mod value;

pub use builder::Builder;
pub use datetime::Datetime;
pub use error::{Error, Result};
pub use map::TomlMap;
pub use token::{Token, TokenKind};
pub use value::Value;

use parser::Parser;
use std::fs;
use std::path::Path;

/// Parses a TOML document into its root table.
///
/// Input that is empty after trimming yields `Ok(None)`; everything
/// else either parses completely or fails with the first violated
/// rule.
///
/// # Examples
///
/// ```rust
/// use toml_scribe::parse;
///
/// let root = parse("answer = 42").unwrap().unwrap();
/// assert_eq!(root.get("answer").and_then(|v| v.as_i64()), Some(42));
///
/// assert!(parse("   \n  ").unwrap().is_none());
/// ```
///
/// # Errors
///
/// Returns a typed [`Error`] carrying the 1-based line of the first
/// offending token. No partial tree is returned on failure.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &str) -> Result<Option<TomlMap>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    Parser::new(input)?.parse().map(Some)
}

/// Reads a file and parses it as a TOML document.
///
/// # Examples
///
/// ```rust,no_run
/// use toml_scribe::parse_file;
///
/// let root = parse_file("Config.toml").unwrap().unwrap();
/// assert!(root.len() > 0);
/// ```
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] when the path does not exist,
/// [`Error::FileNotReadable`] when it cannot be read, and
/// [`Error::InvalidUtf8`] for non-UTF-8 contents. Parse errors are
/// wrapped with the file path while keeping their line number.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Option<TomlMap>> {
    let path = path.as_ref();
    let display = path.display().to_string();
    if !path.exists() {
        return Err(Error::FileNotFound { path: display });
    }
    let bytes = fs::read(path).map_err(|_| Error::FileNotReadable {
        path: display.clone(),
    })?;
    let text =
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8.with_file(display.clone()))?;
    parse(&text).map_err(|err| err.with_file(display))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_parses_to_none() {
        assert!(parse("").unwrap().is_none());
        assert!(parse(" \n\t \n").unwrap().is_none());
    }

    #[test]
    fn smallest_document_parses_to_a_table() {
        let root = parse("x = 1").unwrap().unwrap();
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn build_then_parse_round_trips() {
        let mut builder = Builder::new();
        builder
            .add_value("title", "round trip")
            .unwrap()
            .add_table("owner")
            .unwrap()
            .add_value("name", "Tom")
            .unwrap();

        let root = parse(&builder.build()).unwrap().unwrap();
        assert_eq!(root.get("title").and_then(|v| v.as_str()), Some("round trip"));
        let owner = root.get("owner").and_then(|v| v.as_table()).unwrap();
        assert_eq!(owner.get("name").and_then(|v| v.as_str()), Some("Tom"));
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let err = parse_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
