//! Tokens produced by the scanner.

use std::fmt;

/// The closed set of token kinds the scanner can produce.
///
/// Every kind corresponds to exactly one pattern in the scanner's
/// ordered alternatives, plus the two injected kinds `Newline` and
/// `End`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Equal,
    Boolean,
    Datetime,
    Float,
    Integer,
    TripleQuote,
    Quote,
    TripleApostrophe,
    Apostrophe,
    Hash,
    Space,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    UnquotedKey,
    EscapedChar,
    Escape,
    BasicUnescaped,
    Newline,
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Equal => "\"=\"",
            TokenKind::Boolean => "a boolean",
            TokenKind::Datetime => "a date-time",
            TokenKind::Float => "a float",
            TokenKind::Integer => "an integer",
            TokenKind::TripleQuote => "triple double quotes",
            TokenKind::Quote => "a double quote",
            TokenKind::TripleApostrophe => "triple single quotes",
            TokenKind::Apostrophe => "a single quote",
            TokenKind::Hash => "\"#\"",
            TokenKind::Space => "whitespace",
            TokenKind::LeftBracket => "\"[\"",
            TokenKind::RightBracket => "\"]\"",
            TokenKind::LeftBrace => "\"{\"",
            TokenKind::RightBrace => "\"}\"",
            TokenKind::Comma => "\",\"",
            TokenKind::Dot => "\".\"",
            TokenKind::UnquotedKey => "an unquoted key",
            TokenKind::EscapedChar => "an escaped character",
            TokenKind::Escape => "a backslash",
            TokenKind::BasicUnescaped => "string characters",
            TokenKind::Newline => "a newline",
            TokenKind::End => "end of input",
        };
        f.write_str(name)
    }
}

/// An immutable token: kind, lexeme, and the 1-based line the match
/// started on.
///
/// # Examples
///
/// ```rust
/// use toml_scribe::{Token, TokenKind};
///
/// let token = Token::new(TokenKind::Integer, "42", 1);
/// assert_eq!(token.kind(), TokenKind::Integer);
/// assert_eq!(token.lexeme(), "42");
/// assert_eq!(token.line(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    line: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Consumes the token and returns its lexeme.
    #[inline]
    #[must_use]
    pub fn into_lexeme(self) -> String {
        self.lexeme
    }
}
