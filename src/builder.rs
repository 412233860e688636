//! The TOML document builder.
//!
//! [`Builder`] accumulates TOML text while consulting its own
//! [`KeyRegistry`](crate::registry::KeyRegistry), so a document it
//! accepts obeys the same uniqueness and hierarchy rules the parser
//! enforces: what the builder emits, [`parse`](crate::parse) accepts.
//!
//! ## Usage
//!
//! ```rust
//! use toml_scribe::{parse, Builder};
//!
//! let mut builder = Builder::new();
//! builder
//!     .add_comment(" generated")
//!     .add_value("title", "Example")?
//!     .add_table("server.http")?
//!     .add_value("port", 8080)?;
//! let text = builder.build();
//!
//! assert!(parse(&text).is_ok());
//! # Ok::<(), toml_scribe::Error>(())
//! ```
//!
//! ## String values
//!
//! A string is normally emitted as a basic (double-quoted) string. A
//! leading `@` selects literal (single-quoted) output and is stripped;
//! write `@@` to emit a literal string that itself begins with `@`.
//! Inside basic strings, only the escape sequences TOML understands may
//! appear: a backslash that does not begin one is rejected.

use crate::registry::KeyRegistry;
use crate::scanner::scan;
use crate::token::TokenKind;
use crate::tree::DocumentTree;
use crate::{Error, Result, Value};

/// True when the scanner reads `key` back as exactly one unquoted-key
/// token. `true` and `false` tokenize as booleans, and dashed or
/// zero-led numeric shapes tokenize as dates and numbers, so keys like
/// those must be quoted (or, in headers, rejected) for the emission to
/// parse back.
fn is_bare_key(key: &str) -> bool {
    match scan(key) {
        Ok(tokens) => tokens.len() == 2 && tokens[0].kind() == TokenKind::UnquotedKey,
        Err(_) => false,
    }
}

/// A fluent TOML emitter.
///
/// Mutators return `Result<&mut Self>` so calls chain with `?`. Obtain
/// the accumulated text with [`build`](Builder::build).
///
/// # Examples
///
/// ```rust
/// use toml_scribe::Builder;
///
/// let mut builder = Builder::new();
/// builder
///     .add_array_of_table("bin")?
///     .add_value("name", "cli")?
///     .add_array_of_table("bin")?
///     .add_value("name", "daemon")?;
///
/// let text = builder.build();
/// assert!(text.contains("[[bin]]"));
/// # Ok::<(), toml_scribe::Error>(())
/// ```
#[derive(Debug)]
pub struct Builder {
    output: String,
    prefix: String,
    in_block: bool,
    registry: KeyRegistry,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// A builder with the default 4-space indentation for key-values
    /// inside table blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_indent(4)
    }

    /// A builder indenting by `indent` spaces; `0` disables
    /// indentation.
    #[must_use]
    pub fn with_indent(indent: usize) -> Self {
        Builder {
            output: String::new(),
            prefix: " ".repeat(indent),
            in_block: false,
            registry: KeyRegistry::new(),
        }
    }

    /// Appends `key = value`.
    ///
    /// Keys that would not read back as a single unquoted key — names
    /// with spaces, `true`/`false`, date- or number-shaped names — are
    /// emitted double-quoted so the line parses back to the same key.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKey`] when the trimmed key is empty;
    /// [`Error::DuplicateKey`] when the key is already defined in the
    /// current context; [`Error::UnsupportedDataType`] for table
    /// values; [`Error::MixedArrayTypes`] and
    /// [`Error::InvalidStringCharacters`] per the dump rules.
    pub fn add_value(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.push_key_value(key, &value.into(), "")
    }

    /// Appends `key = value # comment`.
    ///
    /// # Errors
    ///
    /// As [`add_value`](Builder::add_value).
    pub fn add_value_with_comment(
        &mut self,
        key: &str,
        value: impl Into<Value>,
        comment: &str,
    ) -> Result<&mut Self> {
        self.push_key_value(key, &value.into(), comment)
    }

    fn push_key_value(&mut self, key: &str, value: &Value, comment: &str) -> Result<&mut Self> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let escaped = DocumentTree::escape_key(key);
        if !self.registry.is_valid_key(&escaped) {
            return Err(Error::DuplicateKey {
                key: key.to_string(),
            });
        }
        let dumped = dump_value(value, key)?;
        self.registry.add_key(&escaped)?;

        if self.in_block {
            self.output.push_str(&self.prefix);
        }
        if is_bare_key(key) {
            self.output.push_str(key);
        } else {
            self.output.push('"');
            self.output.push_str(key);
            self.output.push('"');
        }
        self.output.push_str(" = ");
        self.output.push_str(&dumped);
        if !comment.is_empty() {
            self.output.push_str(" #");
            self.output.push_str(comment);
        }
        self.output.push('\n');
        Ok(self)
    }

    /// Appends a `[path]` header and makes it the current table.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKey`] for an empty path or segment;
    /// [`Error::UnquotedKeyRequired`] for segments that would need
    /// quoting; [`Error::TableAlreadyDefinedAsArray`] when the path is
    /// an existing array-of-tables; [`Error::DuplicateTableKey`] when
    /// the path is already defined.
    pub fn add_table(&mut self, path: &str) -> Result<&mut Self> {
        let path = path.trim();
        validate_header_path(path)?;
        if self.registry.is_registered_as_array_table_key(path) {
            return Err(Error::TableAlreadyDefinedAsArray {
                key: path.to_string(),
            });
        }
        if !self.registry.is_valid_table_key(path) {
            return Err(Error::DuplicateTableKey {
                key: path.to_string(),
            });
        }
        self.registry.add_table_key(path)?;

        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push('[');
        self.output.push_str(path);
        self.output.push_str("]\n");
        self.in_block = true;
        Ok(self)
    }

    /// Appends a `[[path]]` header, opening a new element of the array
    /// of tables.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyKey`] and [`Error::UnquotedKeyRequired`] as for
    /// [`add_table`](Builder::add_table);
    /// [`Error::DuplicateArrayTableKey`] when the path collides with an
    /// existing key or table; [`Error::KeyDefinedAsImplicitTable`] when
    /// an earlier array-of-tables implicitly materialized the path.
    pub fn add_array_of_table(&mut self, path: &str) -> Result<&mut Self> {
        let path = path.trim();
        validate_header_path(path)?;
        if !self.registry.is_valid_array_table_key(path) {
            return Err(Error::DuplicateArrayTableKey {
                key: path.to_string(),
            });
        }
        if self.registry.is_table_implicit_from_array_table(path) {
            return Err(Error::KeyDefinedAsImplicitTable {
                key: path.to_string(),
            });
        }
        self.registry.add_array_table_key(path)?;

        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str("[[");
        self.output.push_str(path);
        self.output.push_str("]]\n");
        self.in_block = true;
        Ok(self)
    }

    /// Appends `#text` on its own line.
    pub fn add_comment(&mut self, text: &str) -> &mut Self {
        self.output.push('#');
        self.output.push_str(text);
        self.output.push('\n');
        self
    }

    /// Returns the accumulated TOML text.
    #[must_use]
    pub fn build(&self) -> String {
        self.output.clone()
    }
}

/// Path for `[...]` / `[[...]]`: non-empty, dot-separated, every
/// segment readable back as an unquoted key. Headers cannot quote, so
/// segments that would need quoting are rejected outright.
fn validate_header_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::EmptyKey);
    }
    for segment in path.split('.') {
        if segment.trim().is_empty() {
            return Err(Error::EmptyKey);
        }
        if !is_bare_key(segment) {
            return Err(Error::UnquotedKeyRequired {
                key: segment.to_string(),
            });
        }
    }
    Ok(())
}

/// Renders a value per the dump rules. `key` is only used in
/// diagnostics.
fn dump_value(value: &Value, key: &str) -> Result<String> {
    match value {
        Value::String(s) => dump_string(s, key),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                Ok(format!("{f:.1}"))
            } else {
                Ok(format!("{f}"))
            }
        }
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_zulu_string()),
        Value::Array(elements) => {
            if let Some(first) = elements.first() {
                if elements.iter().any(|v| !first.is_same_type(v)) {
                    return Err(Error::MixedArrayTypes {
                        key: key.to_string(),
                    });
                }
            }
            let parts = elements
                .iter()
                .map(|v| dump_value(v, key))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", parts.join(", ")))
        }
        Value::Table(_) => Err(Error::UnsupportedDataType {
            key: key.to_string(),
            found: value.type_name().to_string(),
        }),
    }
}

/// Renders a string value.
///
/// A leading `@` selects literal output (one `@` stripped). Basic
/// strings escape control characters and quotes; a backslash must
/// begin `\b` (preserved as the two characters), `\uXXXX` or
/// `\UXXXXXXXX` (passed through untouched), or pair with another
/// backslash. Anything else is a bare backslash and is rejected.
fn dump_string(s: &str, key: &str) -> Result<String> {
    if let Some(rest) = s.strip_prefix('@') {
        return Ok(format!("'{rest}'"));
    }

    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => match chars.get(i + 1) {
                Some('b') => {
                    out.push_str("\\b");
                    i += 1;
                }
                Some('\\') => {
                    out.push_str("\\\\\\\\");
                    i += 1;
                }
                Some('u') if is_hex_run(&chars, i + 2, 4) => {
                    out.push_str("\\u");
                    out.extend(&chars[i + 2..i + 6]);
                    i += 5;
                }
                Some('U') if is_hex_run(&chars, i + 2, 8) => {
                    out.push_str("\\U");
                    out.extend(&chars[i + 2..i + 10]);
                    i += 9;
                }
                _ => {
                    return Err(Error::InvalidStringCharacters {
                        key: key.to_string(),
                    })
                }
            },
            _ => out.push(ch),
        }
        i += 1;
    }
    out.push('"');
    Ok(out)
}

fn is_hex_run(chars: &[char], start: usize, len: usize) -> bool {
    chars.len() >= start + len && chars[start..start + len].iter().all(char::is_ascii_hexdigit)
}
