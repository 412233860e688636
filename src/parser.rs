//! The recursive-descent TOML parser.
//!
//! The parser drives a [`TokenCursor`] over the scanner's output and
//! feeds a [`KeyRegistry`] and a [`DocumentTree`]: the registry decides
//! whether each definition is legal, the tree records where it lands.
//!
//! Top-level dispatch looks at the next token:
//!
//! - `#` starts a comment, consumed to end of line
//! - `[[` starts an array-of-tables header
//! - `[` starts a table header
//! - a quote, unquoted key, or integer starts a `key = value` line
//! - whitespace and newlines are skipped
//!
//! Everything else is an unexpected token. On success the finished root
//! table is returned; on the first violated rule a typed error
//! propagates and no partial tree is exposed.

use crate::cursor::TokenCursor;
use crate::registry::KeyRegistry;
use crate::scanner::scan;
use crate::token::TokenKind;
use crate::tree::DocumentTree;
use crate::{Datetime, Error, Result, TomlMap, Value};

/// The grammar driver. Create one per document with [`Parser::new`] and
/// consume it with [`Parser::parse`].
///
/// # Examples
///
/// ```rust
/// use toml_scribe::parser::Parser;
///
/// let root = Parser::new("[server]\nport = 8080").unwrap().parse().unwrap();
/// let server = root.get("server").and_then(|v| v.as_table()).unwrap();
/// assert_eq!(server.get("port").and_then(|v| v.as_i64()), Some(8080));
/// ```
pub struct Parser {
    cursor: TokenCursor,
    registry: KeyRegistry,
    tree: DocumentTree,
}

impl Parser {
    /// Tokenizes the input and prepares a parser over it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LexerParse`] when the input contains a
    /// character sequence no token pattern matches.
    pub fn new(input: &str) -> Result<Self> {
        Ok(Parser {
            cursor: TokenCursor::new(scan(input)?),
            registry: KeyRegistry::new(),
            tree: DocumentTree::new(),
        })
    }

    /// Runs the grammar to completion and returns the root table.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a typed [`Error`] carrying
    /// the 1-based line of the offending token.
    pub fn parse(mut self) -> Result<TomlMap> {
        while self.cursor.has_more() {
            if self.cursor.peek(TokenKind::Hash) {
                self.skip_comment();
            } else if self
                .cursor
                .peek_sequence(&[TokenKind::LeftBracket, TokenKind::LeftBracket])
            {
                self.parse_array_table_header()?;
            } else if self.cursor.peek(TokenKind::LeftBracket) {
                self.parse_table_header()?;
            } else if self.cursor.peek_any(&[
                TokenKind::Quote,
                TokenKind::UnquotedKey,
                TokenKind::Integer,
            ]) {
                self.parse_key_value(true)?;
            } else if self
                .cursor
                .peek_any(&[TokenKind::Space, TokenKind::Newline, TokenKind::End])
            {
                self.cursor.advance();
            } else {
                let (line, found) = self.current_token_info();
                return Err(Error::unexpected_token(line, "a comment or a key", found));
            }
        }
        Ok(self.tree.into_root())
    }

    fn current_token_info(&self) -> (usize, String) {
        self.cursor
            .peek_token()
            .map_or((1, String::new()), |t| (t.line(), t.lexeme().to_string()))
    }

    /// Consumes tokens up to, but not including, the end of the line.
    fn skip_comment(&mut self) {
        while !self
            .cursor
            .peek_any(&[TokenKind::Newline, TokenKind::End])
        {
            self.cursor.advance();
        }
    }

    /// Consumes trailing whitespace and an optional comment, then
    /// requires the line to be over.
    fn finish_line(&mut self) -> Result<()> {
        self.cursor.skip_while(TokenKind::Space);
        if self.cursor.peek(TokenKind::Hash) {
            self.skip_comment();
        }
        if self
            .cursor
            .peek_any(&[TokenKind::Newline, TokenKind::End])
        {
            Ok(())
        } else {
            let (line, found) = self.current_token_info();
            Err(Error::unexpected_token(
                line,
                "a newline or end of input",
                found,
            ))
        }
    }

    /// One key name: an unquoted key, an integer (stringified with
    /// underscores removed), or a basic string.
    fn parse_key_name(&mut self) -> Result<String> {
        if self.cursor.peek(TokenKind::UnquotedKey) {
            return self.cursor.expect(TokenKind::UnquotedKey);
        }
        if self.cursor.peek(TokenKind::Integer) {
            let line = self.cursor.current_line();
            let lexeme = self.cursor.expect(TokenKind::Integer)?;
            return clean_integer(&lexeme, line);
        }
        if self.cursor.peek(TokenKind::Quote) {
            return self.parse_basic_string();
        }
        let (line, found) = self.current_token_info();
        Err(Error::unexpected_token(line, "a key", found))
    }

    /// The dotted path of a `[...]` or `[[...]]` header; each segment
    /// is escaped so quoted keys containing dots survive traversal.
    fn parse_dotted_path(&mut self) -> Result<String> {
        let mut segments = Vec::new();
        loop {
            self.cursor.skip_while(TokenKind::Space);
            let name = self.parse_key_name()?;
            segments.push(DocumentTree::escape_key(&name));
            self.cursor.skip_while(TokenKind::Space);
            if self.cursor.peek(TokenKind::Dot) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        Ok(segments.join("."))
    }

    /// `[path]`
    fn parse_table_header(&mut self) -> Result<()> {
        let line = self.cursor.current_line();
        self.cursor.expect(TokenKind::LeftBracket)?;
        let path = self.parse_dotted_path()?;
        let display = DocumentTree::unescape_key(&path);

        if !self.registry.is_valid_table_key(&path) {
            return Err(Error::invalid_table_key(
                line,
                &display,
                "the table has already been defined",
            ));
        }
        self.registry.add_table_key(&path).map_err(|_| {
            Error::invalid_table_key(line, &display, "the table has already been defined")
        })?;
        self.tree.enter_table(&path)?;
        self.cursor.expect(TokenKind::RightBracket)?;
        self.finish_line()
    }

    /// `[[path]]`
    fn parse_array_table_header(&mut self) -> Result<()> {
        let line = self.cursor.current_line();
        self.cursor.expect(TokenKind::LeftBracket)?;
        self.cursor.expect(TokenKind::LeftBracket)?;
        let path = self.parse_dotted_path()?;
        let display = DocumentTree::unescape_key(&path);

        if !self.registry.is_valid_array_table_key(&path) {
            return Err(Error::invalid_array_table_key(
                line,
                &display,
                "the name is already taken by a key or table",
            ));
        }
        if self.registry.is_table_implicit_from_array_table(&path) {
            return Err(Error::invalid_array_table_key(
                line,
                &display,
                "the name has already been claimed as an implicit table",
            ));
        }
        self.registry.add_array_table_key(&path).map_err(|_| {
            Error::invalid_array_table_key(line, &display, "the name is already taken")
        })?;
        self.tree.append_array_element(&path)?;
        self.cursor.expect(TokenKind::RightBracket)?;
        self.cursor.expect(TokenKind::RightBracket)?;
        self.finish_line()
    }

    /// `key = value`, including inline tables and arrays. When
    /// `top_level` is set the line must end after the value (modulo
    /// whitespace and a comment).
    fn parse_key_value(&mut self, top_level: bool) -> Result<()> {
        let line = self.cursor.current_line();
        let name = self.parse_key_name()?;
        let escaped = DocumentTree::escape_key(&name);

        self.cursor.skip_while(TokenKind::Space);
        self.cursor.expect(TokenKind::Equal)?;
        self.cursor.skip_while(TokenKind::Space);

        if self.cursor.peek(TokenKind::LeftBrace) {
            if !self.registry.is_valid_inline_table(&escaped) {
                return Err(Error::invalid_key(
                    line,
                    &name,
                    "the key has already been defined",
                ));
            }
            self.registry.add_inline_table_key(&escaped).map_err(|_| {
                Error::invalid_key(line, &name, "the key has already been defined")
            })?;
            self.registry.begin_inline_table(&escaped);
            self.tree.begin_inline_table(&name)?;
            self.parse_inline_table_body()?;
            self.tree.end_inline_table();
            self.registry.end_inline_table();
        } else {
            if !self.registry.is_valid_key(&escaped) {
                return Err(Error::invalid_key(
                    line,
                    &name,
                    "the key has already been defined",
                ));
            }
            let value = self.parse_value()?;
            self.registry.add_key(&escaped).map_err(|_| {
                Error::invalid_key(line, &name, "the key has already been defined")
            })?;
            self.tree.put_value(&name, value)?;
        }

        if top_level {
            self.finish_line()?;
        }
        Ok(())
    }

    /// `{ k1 = v1, k2 = v2 }` — single line; a newline anywhere inside
    /// is a syntax error.
    fn parse_inline_table_body(&mut self) -> Result<()> {
        self.cursor.expect(TokenKind::LeftBrace)?;
        self.cursor.skip_while(TokenKind::Space);
        if self.cursor.peek(TokenKind::RightBrace) {
            self.cursor.advance();
            return Ok(());
        }
        loop {
            self.reject_inline_newline()?;
            self.parse_key_value(false)?;
            self.cursor.skip_while(TokenKind::Space);
            self.reject_inline_newline()?;
            if self.cursor.peek(TokenKind::Comma) {
                self.cursor.advance();
                self.cursor.skip_while(TokenKind::Space);
            } else {
                break;
            }
        }
        self.cursor.expect(TokenKind::RightBrace)?;
        Ok(())
    }

    fn reject_inline_newline(&self) -> Result<()> {
        if self.cursor.peek(TokenKind::Newline) {
            return Err(Error::syntax(
                self.cursor.current_line(),
                "a newline is not allowed inside an inline table",
            ));
        }
        Ok(())
    }

    /// A value in assignment position: an array or a simple value.
    fn parse_value(&mut self) -> Result<Value> {
        if self.cursor.peek(TokenKind::LeftBracket) {
            return self.parse_array();
        }
        self.parse_simple_value()
    }

    /// A scalar: boolean, integer, float, date-time, or one of the four
    /// string forms.
    fn parse_simple_value(&mut self) -> Result<Value> {
        let Some(token) = self.cursor.peek_token() else {
            return Err(Error::unexpected_token(
                self.cursor.current_line(),
                "a value",
                "",
            ));
        };
        let line = token.line();
        match token.kind() {
            TokenKind::Boolean => {
                let lexeme = self.cursor.expect(TokenKind::Boolean)?;
                Ok(Value::Boolean(lexeme == "true"))
            }
            TokenKind::Integer => {
                let lexeme = self.cursor.expect(TokenKind::Integer)?;
                let cleaned = clean_integer(&lexeme, line)?;
                cleaned.parse::<i64>().map(Value::Integer).map_err(|_| {
                    Error::syntax(line, format!("integer \"{lexeme}\" is out of range"))
                })
            }
            TokenKind::Float => {
                let lexeme = self.cursor.expect(TokenKind::Float)?;
                let cleaned = clean_float(&lexeme, line)?;
                cleaned.parse::<f64>().map(Value::Float).map_err(|_| {
                    Error::syntax(line, format!("float \"{lexeme}\" cannot be parsed"))
                })
            }
            TokenKind::Datetime => {
                let lexeme = self.cursor.expect(TokenKind::Datetime)?;
                Datetime::from_literal(&lexeme)
                    .map(Value::Datetime)
                    .ok_or_else(|| {
                        Error::syntax(line, format!("invalid date-time \"{lexeme}\""))
                    })
            }
            TokenKind::Quote => self.parse_basic_string().map(Value::String),
            TokenKind::TripleQuote => self.parse_multiline_basic_string().map(Value::String),
            TokenKind::Apostrophe => self.parse_literal_string().map(Value::String),
            TokenKind::TripleApostrophe => {
                self.parse_multiline_literal_string().map(Value::String)
            }
            _ => {
                let (line, found) = self.current_token_info();
                Err(Error::unexpected_token(line, "a value", found))
            }
        }
    }

    /// `"..."` — escape sequences are translated; a bare backslash or a
    /// line break inside is an error.
    fn parse_basic_string(&mut self) -> Result<String> {
        self.cursor.expect(TokenKind::Quote)?;
        let mut out = String::new();
        loop {
            let Some(token) = self.cursor.peek_token() else {
                return Err(Error::syntax(
                    self.cursor.current_line(),
                    "unterminated basic string",
                ));
            };
            match token.kind() {
                TokenKind::Quote => {
                    self.cursor.advance();
                    return Ok(out);
                }
                TokenKind::Newline | TokenKind::End => {
                    return Err(Error::syntax(token.line(), "unterminated basic string"));
                }
                TokenKind::Escape => {
                    return Err(Error::syntax(
                        token.line(),
                        "a bare backslash is not allowed in a basic string",
                    ));
                }
                TokenKind::EscapedChar => {
                    let line = token.line();
                    let lexeme = self
                        .cursor
                        .advance()
                        .map(crate::Token::into_lexeme)
                        .unwrap_or_default();
                    out.push_str(&translate_escape(&lexeme, line)?);
                }
                _ => {
                    if let Some(token) = self.cursor.advance() {
                        out.push_str(token.lexeme());
                    }
                }
            }
        }
    }

    /// `"""..."""` — an immediate newline after the opener is dropped;
    /// a backslash swallows the following run of whitespace, newlines,
    /// and backslashes (line continuation).
    fn parse_multiline_basic_string(&mut self) -> Result<String> {
        self.cursor.expect(TokenKind::TripleQuote)?;
        if self.cursor.peek(TokenKind::Newline) {
            self.cursor.advance();
        }
        let mut out = String::new();
        loop {
            let Some(token) = self.cursor.peek_token() else {
                return Err(Error::syntax(
                    self.cursor.current_line(),
                    "unterminated multi-line basic string",
                ));
            };
            match token.kind() {
                TokenKind::TripleQuote => {
                    self.cursor.advance();
                    return Ok(out);
                }
                TokenKind::End => {
                    return Err(Error::syntax(
                        token.line(),
                        "unterminated multi-line basic string",
                    ));
                }
                TokenKind::Escape => {
                    self.cursor.advance();
                    self.cursor.skip_while_any(&[
                        TokenKind::Space,
                        TokenKind::Newline,
                        TokenKind::Escape,
                    ]);
                }
                TokenKind::EscapedChar => {
                    let line = token.line();
                    let lexeme = self
                        .cursor
                        .advance()
                        .map(crate::Token::into_lexeme)
                        .unwrap_or_default();
                    out.push_str(&translate_escape(&lexeme, line)?);
                }
                _ => {
                    if let Some(token) = self.cursor.advance() {
                        out.push_str(token.lexeme());
                    }
                }
            }
        }
    }

    /// `'...'` — verbatim, no escape processing.
    fn parse_literal_string(&mut self) -> Result<String> {
        self.cursor.expect(TokenKind::Apostrophe)?;
        let mut out = String::new();
        loop {
            let Some(token) = self.cursor.peek_token() else {
                return Err(Error::syntax(
                    self.cursor.current_line(),
                    "unterminated literal string",
                ));
            };
            match token.kind() {
                TokenKind::Apostrophe => {
                    self.cursor.advance();
                    return Ok(out);
                }
                TokenKind::Newline | TokenKind::End => {
                    return Err(Error::syntax(token.line(), "unterminated literal string"));
                }
                _ => {
                    if let Some(token) = self.cursor.advance() {
                        out.push_str(token.lexeme());
                    }
                }
            }
        }
    }

    /// `'''...'''` — verbatim including newlines; an immediate newline
    /// after the opener is dropped.
    fn parse_multiline_literal_string(&mut self) -> Result<String> {
        self.cursor.expect(TokenKind::TripleApostrophe)?;
        if self.cursor.peek(TokenKind::Newline) {
            self.cursor.advance();
        }
        let mut out = String::new();
        loop {
            let Some(token) = self.cursor.peek_token() else {
                return Err(Error::syntax(
                    self.cursor.current_line(),
                    "unterminated multi-line literal string",
                ));
            };
            match token.kind() {
                TokenKind::TripleApostrophe => {
                    self.cursor.advance();
                    return Ok(out);
                }
                TokenKind::End => {
                    return Err(Error::syntax(
                        token.line(),
                        "unterminated multi-line literal string",
                    ));
                }
                _ => {
                    if let Some(token) = self.cursor.advance() {
                        out.push_str(token.lexeme());
                    }
                }
            }
        }
    }

    /// `[v1, v2, ...]` with homogeneity: the first element fixes the
    /// type, nested arrays counting as "array" regardless of content.
    fn parse_array(&mut self) -> Result<Value> {
        self.cursor.expect(TokenKind::LeftBracket)?;
        let mut elements: Vec<Value> = Vec::new();
        loop {
            self.skip_array_filler();
            if self.cursor.peek(TokenKind::RightBracket) {
                break;
            }
            let line = self.cursor.current_line();
            let value = if self.cursor.peek(TokenKind::LeftBracket) {
                self.parse_array()?
            } else {
                self.parse_simple_value()?
            };
            if let Some(first) = elements.first() {
                if !first.is_same_type(&value) {
                    return Err(Error::syntax(
                        line,
                        format!("Data types cannot be mixed in an array. Value: \"{value}\""),
                    ));
                }
            }
            elements.push(value);
            self.skip_array_filler();
            if self.cursor.peek(TokenKind::Comma) {
                self.cursor.advance();
            } else if self.cursor.peek(TokenKind::RightBracket) {
                break;
            } else {
                let (line, found) = self.current_token_info();
                return Err(Error::unexpected_token(line, "\",\" or \"]\"", found));
            }
        }
        self.cursor.expect(TokenKind::RightBracket)?;
        Ok(Value::Array(elements))
    }

    /// Whitespace, newlines, and comments between array elements.
    fn skip_array_filler(&mut self) {
        loop {
            self.cursor
                .skip_while_any(&[TokenKind::Space, TokenKind::Newline]);
            if self.cursor.peek(TokenKind::Hash) {
                self.skip_comment();
            } else {
                return;
            }
        }
    }
}

/// Validates an integer lexeme and strips its underscores: every
/// underscore must sit between digits, and multi-digit literals must
/// not start with zero.
fn clean_integer(lexeme: &str, line: usize) -> Result<String> {
    check_underscores(lexeme, line)?;
    let stripped: String = lexeme.chars().filter(|c| *c != '_').collect();
    let digits = stripped
        .strip_prefix(['+', '-'])
        .unwrap_or(stripped.as_str());
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(Error::syntax(
            line,
            format!("leading zeros are not allowed: \"{lexeme}\""),
        ));
    }
    Ok(stripped)
}

/// Validates a float lexeme and strips its underscores. Underscores
/// must sit between digits (so `_e`, `e_`, `1._5` are rejected), and
/// the integral part must not carry leading zeros.
fn clean_float(lexeme: &str, line: usize) -> Result<String> {
    check_underscores(lexeme, line)?;
    let stripped: String = lexeme.chars().filter(|c| *c != '_').collect();
    let unsigned = stripped
        .strip_prefix(['+', '-'])
        .unwrap_or(stripped.as_str());
    let integral = unsigned
        .split(['.', 'e', 'E'])
        .next()
        .unwrap_or(unsigned);
    if integral.len() > 1 && integral.starts_with('0') {
        return Err(Error::syntax(
            line,
            format!("leading zeros are not allowed: \"{lexeme}\""),
        ));
    }
    Ok(stripped)
}

fn check_underscores(lexeme: &str, line: usize) -> Result<()> {
    let chars: Vec<char> = lexeme.chars().collect();
    for (index, ch) in chars.iter().enumerate() {
        if *ch != '_' {
            continue;
        }
        let digit_before = index > 0 && chars[index - 1].is_ascii_digit();
        let digit_after = chars
            .get(index + 1)
            .is_some_and(|next| next.is_ascii_digit());
        if !digit_before || !digit_after {
            return Err(Error::syntax(
                line,
                format!("underscores must be surrounded by digits: \"{lexeme}\""),
            ));
        }
    }
    Ok(())
}

/// Translates one ESCAPED_CHAR lexeme into the characters it denotes.
///
/// `\b` becomes the two characters backslash and `b` rather than
/// U+0008; the builder preserves the same sequence, so the pair
/// round-trips.
fn translate_escape(lexeme: &str, line: usize) -> Result<String> {
    let translated = match lexeme {
        r"\b" => r"\b",
        r"\t" => "\t",
        r"\n" => "\n",
        r"\f" => "\u{000C}",
        r"\r" => "\r",
        "\\\"" => "\"",
        r"\\" => "\\",
        _ => {
            let hex = &lexeme[2..];
            let code = u32::from_str_radix(hex, 16)
                .map_err(|_| Error::syntax(line, format!("invalid escape \"{lexeme}\"")))?;
            let ch = char::from_u32(code).ok_or_else(|| {
                Error::syntax(line, format!("\"{lexeme}\" is not a valid code point"))
            })?;
            return Ok(ch.to_string());
        }
    };
    Ok(translated.to_string())
}
