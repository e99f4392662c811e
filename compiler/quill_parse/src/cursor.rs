//! Token cursor.
//!
//! Wraps the token vector with lookahead and expect helpers. The vector
//! always ends in an `Eof` token, which the cursor never moves past.

use quill_ir::{Keyword, Op, Position, Punct, Token, TokenKind};
use tracing::trace;

use crate::ParseError;

pub(crate) struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| !t.is_eof()) {
            let position = tokens.last().map_or(Position::START, |t| t.position);
            tokens.push(Token::new(TokenKind::Eof, "", position));
        }
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn position(&self) -> Position {
        self.current().position
    }

    /// Kind of the token `n` places ahead; `Eof` past the end.
    pub(crate) fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    /// Move past the current token and return it.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        trace!(kind = %token.kind, "advance");
        token
    }

    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub(crate) fn check_punct(&self, punct: Punct) -> bool {
        self.check(TokenKind::Punct(punct))
    }

    #[inline]
    pub(crate) fn check_op(&self, op: Op) -> bool {
        self.check(TokenKind::Operator(op))
    }

    #[inline]
    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check(TokenKind::Keyword(keyword))
    }

    /// Contextual keyword such as `of`, which lexes as an identifier.
    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.check(TokenKind::Ident) && self.current().text == word
    }

    pub(crate) fn eat_punct(&mut self, punct: Punct) -> bool {
        if self.check_punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_op(&mut self, op: Op) -> bool {
        if self.check_op(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_punct(&mut self, punct: Punct) -> Result<Position, ParseError> {
        let position = self.position();
        if self.eat_punct(punct) {
            Ok(position)
        } else {
            Err(self.expected(&format!("'{}'", punct.as_str())))
        }
    }

    pub(crate) fn expect_op(&mut self, op: Op) -> Result<Position, ParseError> {
        let position = self.position();
        if self.eat_op(op) {
            Ok(position)
        } else {
            Err(self.expected(&format!("'{}'", op.as_str())))
        }
    }

    /// Error for the current token when `what` was required.
    pub(crate) fn expected(&self, what: &str) -> ParseError {
        ParseError::expected(what, self.current_kind(), self.position())
    }

    /// Error for an unexpected current token.
    pub(crate) fn unexpected(&self) -> ParseError {
        let token = self.current();
        ParseError::unexpected(token.kind, &token.text, token.position)
    }

    /// Index of the token matching the bracket at `start`, scanning forward.
    ///
    /// Returns `None` when the input ends before the bracket closes.
    pub(crate) fn matching_close(&self, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(self.pos + start) {
            match token.kind {
                TokenKind::Punct(Punct::LParen | Punct::LBracket | Punct::LBrace) => depth += 1,
                TokenKind::Punct(Punct::RParen | Punct::RBracket | Punct::RBrace) => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i - self.pos);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }
}
