//! Function declarations, function expressions and arrows.

use std::rc::Rc;

use quill_diagnostic::ErrorCode;
use quill_ir::{
    BindingKind, BindingPattern, Block, ExprId, ExprKind, FuncId, FunctionBody, FunctionFlags, Op,
    Param, Position, Punct, StmtKind, TokenKind, VarId,
};

use super::Parser;
use crate::ParseError;

impl Parser {
    /// Parameters and body of a non-arrow function. The `function` keyword
    /// and name, if any, have been consumed.
    ///
    /// With `self_name`, the name is bound inside the function to the
    /// function itself, in a scope outside the parameters so either may
    /// shadow it.
    pub(crate) fn parse_function_rest(
        &mut self,
        name: Option<Rc<str>>,
        flags: FunctionFlags,
        position: Position,
        self_name: bool,
    ) -> Result<FuncId, ParseError> {
        let func = self.begin_function(position, false);
        let self_binding = match &name {
            Some(name) if self_name => {
                let var = self
                    .resolver
                    .declare_self(&mut self.program, name, position)?;
                self.resolver.start_block();
                Some(var)
            }
            _ => None,
        };

        let (params, rest) = self.parse_params()?;
        let body_position = self.cursor.expect_punct(Punct::LBrace)?;
        let body = self.parse_statements_until_brace()?;

        let inner_fresh = if self_binding.is_some() {
            self.resolver.end_block()
        } else {
            Vec::new()
        };
        let mut scope = self.finish_function();
        scope.fresh_slots.extend(inner_fresh);
        let block = self.stmt(StmtKind::Block(Block { body, scope }), body_position);

        let function = self.program.function_mut(func);
        function.name = name;
        function.params = params;
        function.rest = rest;
        function.body = FunctionBody::Block(block);
        function.flags = flags;
        function.self_binding = self_binding;
        Ok(func)
    }

    /// `( a, b = 1, [c, d], ...rest )`
    fn parse_params(&mut self) -> Result<(Vec<Param>, Option<VarId>), ParseError> {
        self.cursor.expect_punct(Punct::LParen)?;
        let mut params = Vec::new();
        let mut rest = None;
        while !self.cursor.eat_punct(Punct::RParen) {
            if self.cursor.check(TokenKind::RestIdent) {
                let token = self.cursor.advance();
                rest = Some(self.resolver.declare_param(
                    &mut self.program,
                    &token.text,
                    token.position,
                )?);
                if !self.cursor.eat_punct(Punct::RParen) {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "Rest parameter must be last formal parameter",
                        self.cursor.position(),
                    ));
                }
                break;
            }
            let target = self.parse_binding_target(BindingKind::Param)?;
            let default = if self.cursor.eat_op(Op::Assign) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            params.push(Param { target, default });
            if !self.cursor.eat_punct(Punct::Comma) {
                self.cursor.expect_punct(Punct::RParen)?;
                break;
            }
        }
        Ok((params, rest))
    }

    /// `function name? (...) { ... }` in expression position.
    pub(crate) fn parse_function_expression(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.advance().position;
        let name = if self.cursor.check(TokenKind::Ident) {
            Some(Rc::from(self.cursor.advance().text.as_str()))
        } else {
            None
        };
        let named = name.is_some();
        let func = self.parse_function_rest(name, FunctionFlags::empty(), position, named)?;
        Ok(self.expr(ExprKind::Function(func), position))
    }

    /// Whether the tokens ahead start an arrow function.
    pub(crate) fn is_arrow_ahead(&self) -> bool {
        match self.cursor.current_kind() {
            TokenKind::Ident => self.cursor.peek_kind(1) == TokenKind::Operator(Op::Arrow),
            TokenKind::Punct(Punct::LParen) => self
                .cursor
                .matching_close(0)
                .is_some_and(|close| {
                    self.cursor.peek_kind(close + 1) == TokenKind::Operator(Op::Arrow)
                }),
            _ => false,
        }
    }

    /// `x => body` or `(params) => body`.
    pub(crate) fn parse_arrow(&mut self) -> Result<ExprId, ParseError> {
        let position = self.cursor.position();
        let func = self.begin_function(position, true);

        let (params, rest) = if self.cursor.check(TokenKind::Ident) {
            let token = self.cursor.advance();
            let binding =
                self.resolver
                    .declare_param(&mut self.program, &token.text, token.position)?;
            (
                vec![Param {
                    target: BindingPattern::Ident(binding),
                    default: None,
                }],
                None,
            )
        } else {
            self.parse_params()?
        };
        self.cursor.expect_op(Op::Arrow)?;

        let body = if self.cursor.check_punct(Punct::LBrace) {
            let body_position = self.cursor.advance().position;
            let body = self.parse_statements_until_brace()?;
            let scope = self.finish_function();
            FunctionBody::Block(self.stmt(StmtKind::Block(Block { body, scope }), body_position))
        } else {
            let value = self.parse_assignment()?;
            self.finish_function();
            FunctionBody::Expr(value)
        };

        let function = self.program.function_mut(func);
        function.params = params;
        function.rest = rest;
        function.body = body;
        function.flags = FunctionFlags::ARROW;
        Ok(self.expr(ExprKind::Function(func), position))
    }
}
