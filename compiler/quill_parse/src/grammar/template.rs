//! Template literals.
//!
//! The lexer hands over raw parts. Text parts are unescaped here and each
//! `${...}` part is tokenized at its own source position and parsed as an
//! expression in the enclosing scope.

use quill_diagnostic::ErrorCode;
use quill_ir::{ExprId, ExprKind, Literal, TemplatePartKind, Token};
use quill_lexer::{tokenize_at, unescape};

use super::Parser;
use crate::cursor::Cursor;
use crate::ParseError;

impl Parser {
    pub(crate) fn parse_template(&mut self, token: &Token) -> Result<ExprId, ParseError> {
        let mut parts = Vec::with_capacity(token.parts.len());
        for part in &token.parts {
            match part.kind {
                TemplatePartKind::Text => {
                    let cooked = unescape(&part.text).map_err(|_| {
                        ParseError::new(ErrorCode::E0005, "invalid escape sequence", part.position)
                    })?;
                    if !cooked.is_empty() {
                        let text = ExprKind::Literal(Literal::String(cooked.into()));
                        parts.push(self.expr(text, part.position));
                    }
                }
                TemplatePartKind::Expr => {
                    let tokens = tokenize_at(&part.text, part.position)?;
                    let saved = std::mem::replace(&mut self.cursor, Cursor::new(tokens));
                    let result = self.parse_interpolation();
                    self.cursor = saved;
                    parts.push(result?);
                }
            }
        }

        match parts.as_slice() {
            [] => Ok(self.expr(
                ExprKind::Literal(Literal::String("".into())),
                token.position,
            )),
            [only] if self.is_string_valued(*only) => Ok(*only),
            _ => Ok(self.expr(ExprKind::Concat(parts), token.position)),
        }
    }

    fn parse_interpolation(&mut self) -> Result<ExprId, ParseError> {
        let expr = self.parse_expression()?;
        if !self.cursor.is_at_end() {
            return Err(self.cursor.unexpected());
        }
        Ok(expr)
    }
}
