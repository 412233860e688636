//! The scanner: UTF-8 text to a finite token sequence.
//!
//! Scanning is line-at-a-time. For each line, the remaining substring
//! is matched against an ordered list of anchored patterns; the first
//! pattern that matches wins and its lexeme becomes the next token.
//! After every line except the last a [`TokenKind::Newline`] token is
//! injected, and a single [`TokenKind::End`] token terminates the
//! sequence.
//!
//! The ordering of the alternatives is load-bearing: date and float
//! patterns are tried before the integer pattern, so a literal like
//! `1979-05-27` becomes one DATETIME token rather than an integer
//! followed by stray punctuation.
//!
//! Before scanning, line endings are normalized (CRLF and lone CR
//! become LF) and TAB characters are replaced with a single space.

use crate::token::{Token, TokenKind};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// The ordered token alternatives. First match wins.
static PATTERNS: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    [
        (TokenKind::Equal, r"^="),
        (TokenKind::Boolean, r"^(?:true|false)"),
        (
            TokenKind::Datetime,
            r"^\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?)?",
        ),
        (
            TokenKind::Float,
            r"^[+-]?(?:(?:\d_?)+\.?(?:\d_?)*[eE][+-]?(?:\d_?)+|(?:\d_?)+\.(?:\d_?)+)",
        ),
        (TokenKind::Integer, r"^[+-]?(?:\d_?)+"),
        (TokenKind::TripleQuote, r#"^""""#),
        (TokenKind::Quote, r#"^""#),
        (TokenKind::TripleApostrophe, r"^'''"),
        (TokenKind::Apostrophe, r"^'"),
        (TokenKind::Hash, r"^#"),
        (TokenKind::Space, r"^\s+"),
        (TokenKind::LeftBracket, r"^\["),
        (TokenKind::RightBracket, r"^\]"),
        (TokenKind::LeftBrace, r"^\{"),
        (TokenKind::RightBrace, r"^\}"),
        (TokenKind::Comma, r"^,"),
        (TokenKind::Dot, r"^\."),
        (TokenKind::UnquotedKey, r"^[A-Za-z0-9_-]+"),
        (
            TokenKind::EscapedChar,
            r#"^\\(?:[btnfr"\\]|u[0-9A-Fa-f]{4}|U[0-9A-Fa-f]{8})"#,
        ),
        (TokenKind::Escape, r"^\\"),
        (
            TokenKind::BasicUnescaped,
            r"^[\x08-\x0D\x20-\x21\x23-\x26\x28-\x5A\x5E-\x{10FFFF}]+",
        ),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("token pattern compiles")))
    .collect()
});

/// Tokenizes a TOML document.
///
/// # Errors
///
/// Returns [`Error::LexerParse`] when no pattern matches at some
/// position, reporting the 1-based line and the unmatched remainder.
///
/// # Examples
///
/// ```rust
/// use toml_scribe::scanner::scan;
/// use toml_scribe::TokenKind;
///
/// let tokens = scan("born = 1979-05-27").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::UnquotedKey,
///         TokenKind::Space,
///         TokenKind::Equal,
///         TokenKind::Space,
///         TokenKind::Datetime,
///         TokenKind::End,
///     ]
/// );
/// ```
pub fn scan(input: &str) -> Result<Vec<Token>> {
    let normalized = normalize(input);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last = lines.len() - 1;
    let mut tokens = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let mut rest = *line;
        while !rest.is_empty() {
            let token = match_one(rest, line_number)?;
            rest = &rest[token.lexeme().len()..];
            tokens.push(token);
        }
        if index != last {
            tokens.push(Token::new(TokenKind::Newline, "\n", line_number));
        }
    }

    tokens.push(Token::new(TokenKind::End, "", lines.len()));
    Ok(tokens)
}

/// Matches the first of the ordered alternatives against the start of
/// `rest`.
fn match_one(rest: &str, line: usize) -> Result<Token> {
    for (kind, pattern) in PATTERNS.iter() {
        if let Some(found) = pattern.find(rest) {
            return Ok(Token::new(*kind, found.as_str(), line));
        }
    }
    Err(Error::lexer_parse(line, rest))
}

/// CRLF and lone CR become LF; TAB becomes a single space.
fn normalize(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', " ")
}
