//! Lookahead cursor over the scanner's token sequence.

use crate::token::{Token, TokenKind};
use crate::{Error, Result};

/// A forward-only cursor with arbitrary lookahead.
///
/// All `peek*` operations leave the position untouched; only
/// [`advance`](TokenCursor::advance), [`expect`](TokenCursor::expect),
/// and the `skip_while*` operations consume tokens.
///
/// # Examples
///
/// ```rust
/// use toml_scribe::cursor::TokenCursor;
/// use toml_scribe::scanner::scan;
/// use toml_scribe::TokenKind;
///
/// let mut cursor = TokenCursor::new(scan("key = 1").unwrap());
/// assert!(cursor.peek(TokenKind::UnquotedKey));
/// assert_eq!(cursor.expect(TokenKind::UnquotedKey).unwrap(), "key");
/// cursor.skip_while(TokenKind::Space);
/// assert!(cursor.peek(TokenKind::Equal));
/// ```
#[derive(Debug)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenCursor {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenCursor {
            tokens,
            position: 0,
        }
    }

    /// Returns `true` if the next token has the given kind.
    #[must_use]
    pub fn peek(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| t.kind() == kind)
    }

    /// Returns `true` if the next token has any of the given kinds.
    #[must_use]
    pub fn peek_any(&self, kinds: &[TokenKind]) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| kinds.contains(&t.kind()))
    }

    /// Returns `true` if the next `kinds.len()` tokens match the
    /// sequence exactly. The position is unchanged.
    #[must_use]
    pub fn peek_sequence(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().enumerate().all(|(offset, kind)| {
            self.tokens
                .get(self.position + offset)
                .is_some_and(|t| t.kind() == *kind)
        })
    }

    /// Returns the next token without consuming it.
    #[must_use]
    pub fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Returns the next token and consumes it.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Consumes the next token if it has the given kind and returns its
    /// lexeme.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedToken`] naming the expected kind, the
    /// found lexeme, and the line.
    pub fn expect(&mut self, kind: TokenKind) -> Result<String> {
        match self.tokens.get(self.position) {
            Some(token) if token.kind() == kind => {
                let lexeme = token.lexeme().to_string();
                self.position += 1;
                Ok(lexeme)
            }
            Some(token) => Err(Error::unexpected_token(
                token.line(),
                kind.to_string(),
                token.lexeme(),
            )),
            None => Err(Error::unexpected_token(
                self.last_line(),
                kind.to_string(),
                "",
            )),
        }
    }

    /// Consumes tokens while the next one has the given kind.
    pub fn skip_while(&mut self, kind: TokenKind) {
        while self.peek(kind) {
            self.position += 1;
        }
    }

    /// Consumes tokens while the next one has any of the given kinds.
    pub fn skip_while_any(&mut self, kinds: &[TokenKind]) {
        while self.peek_any(kinds) {
            self.position += 1;
        }
    }

    /// Returns `true` while tokens remain.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Line of the token at the cursor, falling back to the last line
    /// seen. Used for diagnostics when input ends early.
    #[must_use]
    pub fn current_line(&self) -> usize {
        self.tokens
            .get(self.position)
            .map_or_else(|| self.last_line(), Token::line)
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map_or(1, Token::line)
    }
}
