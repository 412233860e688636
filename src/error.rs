//! Error types for TOML parsing and document building.
//!
//! Every failure in this crate is reported through the single [`Error`]
//! enum. Errors raised while parsing carry the 1-based line of the
//! offending token; errors raised by the [`Builder`](crate::Builder)
//! identify the key or table that violated a rule.
//!
//! ## Error Categories
//!
//! - **Lexing**: input that no token pattern matches, or invalid UTF-8
//! - **Parsing**: unexpected tokens and violated semantic rules
//!   (duplicates, mixed array types, malformed numbers)
//! - **Building**: redefinitions, unsupported value types, keys that
//!   need quoting
//! - **File layer**: missing or unreadable files, wrapped with the path
//!
//! ## Examples
//!
//! ```rust
//! use toml_scribe::parse;
//!
//! let result = parse("answer = 042");
//! assert!(result.is_err());
//!
//! if let Err(err) = result {
//!     // Parse errors report the offending line.
//!     assert_eq!(err.line(), Some(1));
//! }
//! ```

use thiserror::Error;

/// All errors that can occur while parsing TOML text or building a TOML
/// document.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Input bytes were not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    /// No token pattern matched at some position of a line.
    #[error("no token pattern matches line {line}: \"{snippet}\"")]
    LexerParse { line: usize, snippet: String },

    /// The parser saw a token it cannot consume at this position.
    #[error("unexpected token at line {line}: expected {expected}, found \"{found}\"")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// A semantic rule was violated: malformed number, mixed array
    /// types, misplaced construct.
    #[error("syntax error at line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    /// The key registry rejected a key definition during parse.
    #[error("invalid key \"{key}\" at line {line}: {msg}")]
    InvalidKey {
        line: usize,
        key: String,
        msg: String,
    },

    /// The key registry rejected a `[table]` header during parse.
    #[error("invalid table key \"{key}\" at line {line}: {msg}")]
    InvalidTableKey {
        line: usize,
        key: String,
        msg: String,
    },

    /// The key registry rejected a `[[array-of-tables]]` header during
    /// parse.
    #[error("invalid array-of-tables key \"{key}\" at line {line}: {msg}")]
    InvalidArrayTableKey {
        line: usize,
        key: String,
        msg: String,
    },

    /// A builder key, table, or array-of-tables name was empty or
    /// whitespace.
    #[error("key, table, or array-of-tables name is empty")]
    EmptyKey,

    /// The builder was asked to redefine a key.
    #[error("the key \"{key}\" has already been defined")]
    DuplicateKey { key: String },

    /// The builder was asked to redefine a table.
    #[error("the table [{key}] has already been defined")]
    DuplicateTableKey { key: String },

    /// The builder was asked to define an array-of-tables over an
    /// existing incompatible key.
    #[error("the array of tables [[{key}]] collides with an existing key")]
    DuplicateArrayTableKey { key: String },

    /// The builder table collides with an existing array-of-tables.
    #[error("the table [{key}] is already defined as an array of tables")]
    TableAlreadyDefinedAsArray { key: String },

    /// The builder array-of-tables collides with a path implicitly
    /// materialized by an earlier array-of-tables.
    #[error("the key \"{key}\" has been defined as an implicit table from a previous array of tables")]
    KeyDefinedAsImplicitTable { key: String },

    /// A builder table or array segment needs quoting, which headers do
    /// not support.
    #[error("only unquoted keys are allowed in table names: \"{key}\"")]
    UnquotedKeyRequired { key: String },

    /// A builder string value contains a bare backslash after escape
    /// substitution.
    #[error("the string value of \"{key}\" contains invalid characters")]
    InvalidStringCharacters { key: String },

    /// A heterogeneous array was given to the builder.
    #[error("data types cannot be mixed in the array \"{key}\"")]
    MixedArrayTypes { key: String },

    /// The builder was given a value outside the supported variant set.
    #[error("the value of \"{key}\" has an unsupported data type: {found}")]
    UnsupportedDataType { key: String, found: String },

    /// The file given to [`parse_file`](crate::parse_file) does not
    /// exist.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The file exists but could not be read.
    #[error("file is not readable: {path}")]
    FileNotReadable { path: String },

    /// A parse error annotated with the file it came from.
    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// A generic message, used by value conversions outside the
    /// parse/build cycle.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a syntax error at a 1-based line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_scribe::Error;
    ///
    /// let err = Error::syntax(10, "leading zeros are not allowed");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, msg: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            msg: msg.into(),
        }
    }

    /// Creates an unexpected-token error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_scribe::Error;
    ///
    /// let err = Error::unexpected_token(3, "equal sign", "]");
    /// assert!(err.to_string().contains("expected equal sign"));
    /// ```
    pub fn unexpected_token(
        line: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Error::UnexpectedToken {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a lexer error for a line with no matching token pattern.
    pub fn lexer_parse(line: usize, snippet: impl Into<String>) -> Self {
        Error::LexerParse {
            line,
            snippet: snippet.into(),
        }
    }

    /// Creates a registry rejection for a plain key.
    pub fn invalid_key(line: usize, key: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::InvalidKey {
            line,
            key: key.into(),
            msg: msg.into(),
        }
    }

    /// Creates a registry rejection for a `[table]` header.
    pub fn invalid_table_key(line: usize, key: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::InvalidTableKey {
            line,
            key: key.into(),
            msg: msg.into(),
        }
    }

    /// Creates a registry rejection for a `[[array-of-tables]]` header.
    pub fn invalid_array_table_key(
        line: usize,
        key: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Error::InvalidArrayTableKey {
            line,
            key: key.into(),
            msg: msg.into(),
        }
    }

    /// Returns the 1-based source line this error points at, if it
    /// carries one.
    ///
    /// File-wrapped errors report the line of the wrapped error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_scribe::Error;
    ///
    /// assert_eq!(Error::syntax(7, "oops").line(), Some(7));
    /// assert_eq!(Error::EmptyKey.line(), None);
    /// ```
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::LexerParse { line, .. }
            | Error::UnexpectedToken { line, .. }
            | Error::Syntax { line, .. }
            | Error::InvalidKey { line, .. }
            | Error::InvalidTableKey { line, .. }
            | Error::InvalidArrayTableKey { line, .. } => Some(*line),
            Error::File { source, .. } => source.line(),
            _ => None,
        }
    }

    /// Wraps this error with the path of the file it came from.
    ///
    /// The wrapped error keeps its line number, so file-level parse
    /// failures report both the path and the line.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_reported_through_file_wrapper() {
        let err = Error::syntax(12, "bad").with_file("conf/app.toml");
        assert_eq!(err.line(), Some(12));
        let text = err.to_string();
        assert!(text.contains("conf/app.toml"));
    }

    #[test]
    fn builder_errors_have_no_line() {
        assert_eq!(
            Error::DuplicateKey {
                key: "x".to_string()
            }
            .line(),
            None
        );
    }

    #[test]
    fn unexpected_token_message_names_both_sides() {
        let err = Error::unexpected_token(4, "a value", "}");
        let text = err.to_string();
        assert!(text.contains("a value"));
        assert!(text.contains('}'));
        assert!(text.contains("line 4"));
    }
}
