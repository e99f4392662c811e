//! Binding targets: identifiers and array/object destructuring patterns.

use std::rc::Rc;

use quill_diagnostic::ErrorCode;
use quill_ir::{
    BindingKind, BindingPattern, ExprId, Number, ObjectPatternProp, Op, PatternElement, Position,
    Punct, TokenKind, VarId,
};

use super::Parser;
use crate::ParseError;

impl Parser {
    /// Parse and declare the target of a declaration or parameter.
    pub(crate) fn parse_binding_target(
        &mut self,
        kind: BindingKind,
    ) -> Result<BindingPattern, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Punct(Punct::LBracket) => self.parse_array_pattern(kind),
            TokenKind::Punct(Punct::LBrace) => self.parse_object_pattern(kind),
            _ => Ok(BindingPattern::Ident(self.parse_binding_name(kind)?)),
        }
    }

    fn declare_binding(
        &mut self,
        name: &str,
        kind: BindingKind,
        position: Position,
    ) -> Result<VarId, ParseError> {
        if kind == BindingKind::Param {
            self.resolver.declare_param(&mut self.program, name, position)
        } else {
            self.resolver
                .declare_variable(&mut self.program, name, kind, position)
        }
    }

    fn parse_binding_name(&mut self, kind: BindingKind) -> Result<VarId, ParseError> {
        let token = self.cursor.current();
        match token.kind {
            TokenKind::Ident => {
                let token = self.cursor.advance();
                self.declare_binding(&token.text, kind, token.position)
            }
            TokenKind::Punct(Punct::LBracket | Punct::LBrace) => Err(ParseError::new(
                ErrorCode::E1007,
                "Nested destructuring patterns are not supported",
                token.position,
            )),
            found => Err(ParseError::new(
                ErrorCode::E1004,
                format!("Expected identifier but found {}", found.describe()),
                token.position,
            )),
        }
    }

    fn parse_rest_binding(&mut self, kind: BindingKind) -> Result<VarId, ParseError> {
        let token = self.cursor.advance();
        self.declare_binding(&token.text, kind, token.position)
    }

    fn parse_pattern_default(&mut self) -> Result<Option<ExprId>, ParseError> {
        if self.cursor.eat_op(Op::Assign) {
            Ok(Some(self.parse_assignment()?))
        } else {
            Ok(None)
        }
    }

    /// `[a, , b = 1, ...rest]`
    fn parse_array_pattern(&mut self, kind: BindingKind) -> Result<BindingPattern, ParseError> {
        self.cursor.advance();
        let mut elements = Vec::new();
        let mut rest = None;
        loop {
            if self.cursor.eat_punct(Punct::RBracket) {
                break;
            }
            if self.cursor.eat_punct(Punct::Comma) {
                elements.push(None);
                continue;
            }
            if self.cursor.check(TokenKind::RestIdent) {
                rest = Some(self.parse_rest_binding(kind)?);
                self.expect_pattern_end(Punct::RBracket)?;
                break;
            }
            let binding = self.parse_binding_name(kind)?;
            let default = self.parse_pattern_default()?;
            elements.push(Some(PatternElement { binding, default }));
            if !self.cursor.eat_punct(Punct::Comma) {
                self.cursor.expect_punct(Punct::RBracket)?;
                break;
            }
        }
        Ok(BindingPattern::Array { elements, rest })
    }

    /// `{a, b: c, d = 1, ...rest}`
    fn parse_object_pattern(&mut self, kind: BindingKind) -> Result<BindingPattern, ParseError> {
        self.cursor.advance();
        let mut properties = Vec::new();
        let mut rest = None;
        loop {
            if self.cursor.eat_punct(Punct::RBrace) {
                break;
            }
            if self.cursor.check(TokenKind::RestIdent) {
                rest = Some(self.parse_rest_binding(kind)?);
                self.expect_pattern_end(Punct::RBrace)?;
                break;
            }
            let token = self.cursor.current().clone();
            let key: Rc<str> = match token.kind {
                TokenKind::Ident | TokenKind::Keyword(_) | TokenKind::String => {
                    token.text.as_str().into()
                }
                TokenKind::Number => Number::parse_literal(&token.text)
                    .unwrap_or(Number::NAN)
                    .to_string()
                    .into(),
                _ => return Err(self.cursor.expected("property name")),
            };
            let binding = if token.kind == TokenKind::Ident
                && self.cursor.peek_kind(1) != TokenKind::Punct(Punct::Colon)
            {
                self.parse_binding_name(kind)?
            } else {
                self.cursor.advance();
                self.cursor.expect_punct(Punct::Colon)?;
                self.parse_binding_name(kind)?
            };
            let default = self.parse_pattern_default()?;
            properties.push(ObjectPatternProp {
                key,
                binding,
                default,
            });
            if !self.cursor.eat_punct(Punct::Comma) {
                self.cursor.expect_punct(Punct::RBrace)?;
                break;
            }
        }
        Ok(BindingPattern::Object { properties, rest })
    }

    fn expect_pattern_end(&mut self, close: Punct) -> Result<(), ParseError> {
        if self.cursor.eat_punct(close) {
            return Ok(());
        }
        Err(ParseError::new(
            ErrorCode::E1007,
            "Rest element must be last element",
            self.cursor.position(),
        ))
    }
}
