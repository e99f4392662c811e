//! Statements.

use quill_diagnostic::ErrorCode;
use quill_ir::{
    BindingKind, BindingPattern, Block, CatchClause, DeclKind, Declarator, ForBinding,
    FunctionFlags, Keyword, Op, Position, Punct, StmtId, StmtKind, SwitchCase, TokenKind,
};
use quill_stack::ensure_sufficient_stack;

use super::Parser;
use crate::ParseError;

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.position();
        match self.cursor.current_kind() {
            TokenKind::Punct(Punct::LBrace) => self.parse_block_statement(),
            TokenKind::Punct(Punct::Semicolon) => {
                self.cursor.advance();
                Ok(self.stmt(StmtKind::Empty, position))
            }
            TokenKind::Keyword(Keyword::Let) => self.parse_declaration_statement(DeclKind::Let),
            TokenKind::Keyword(Keyword::Const) => self.parse_declaration_statement(DeclKind::Const),
            TokenKind::Keyword(Keyword::Function)
                if self.cursor.peek_kind(1) == TokenKind::Ident =>
            {
                self.parse_function_declaration()
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch(),
            TokenKind::Keyword(Keyword::Try) => self.parse_try(),
            TokenKind::Keyword(Keyword::Throw) => {
                self.cursor.advance();
                let value = self.parse_expression()?;
                self.consume_terminator()?;
                Ok(self.stmt(StmtKind::Throw(value), position))
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.cursor.advance();
                let token = self.cursor.current();
                let bare = token.is_eof()
                    || token.newline_before
                    || matches!(
                        token.kind,
                        TokenKind::Punct(Punct::Semicolon | Punct::RBrace)
                    );
                let value = if bare {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_terminator()?;
                Ok(self.stmt(StmtKind::Return(value), position))
            }
            TokenKind::Keyword(Keyword::Break) => {
                self.cursor.advance();
                self.consume_terminator()?;
                Ok(self.stmt(StmtKind::Break, position))
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.cursor.advance();
                self.consume_terminator()?;
                Ok(self.stmt(StmtKind::Continue, position))
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_terminator()?;
                Ok(self.stmt(StmtKind::Expr(expr), position))
            }
        }
    }

    /// Body of `if`/`while`/`for`: any statement except a declaration.
    fn parse_substatement(&mut self) -> Result<StmtId, ParseError> {
        let declaration = match self.cursor.current_kind() {
            TokenKind::Keyword(Keyword::Let | Keyword::Const) => true,
            TokenKind::Keyword(Keyword::Function) => {
                self.cursor.peek_kind(1) == TokenKind::Ident
            }
            _ => false,
        };
        if declaration {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "Declarations are not allowed in a single-statement context",
                self.cursor.position(),
            ));
        }
        self.parse_statement()
    }

    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.cursor.expect_punct(Punct::LBrace)?;
        self.enter_block();
        let body = self.parse_statements_until_brace()?;
        let scope = self.exit_block();
        Ok(Block { body, scope })
    }

    fn parse_block_statement(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.position();
        let block = self.parse_block()?;
        Ok(self.stmt(StmtKind::Block(block), position))
    }

    /// Statements up to and including the closing `}`.
    pub(crate) fn parse_statements_until_brace(&mut self) -> Result<Vec<StmtId>, ParseError> {
        let mut body = Vec::new();
        while !self.cursor.check_punct(Punct::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.expected("'}'"));
            }
            body.push(self.parse_statement()?);
        }
        self.cursor.advance();
        Ok(body)
    }

    fn parse_declaration_statement(&mut self, kind: DeclKind) -> Result<StmtId, ParseError> {
        let position = self.cursor.position();
        self.cursor.advance();
        let declarators = self.parse_declarators(kind)?;
        self.consume_terminator()?;
        Ok(self.stmt(
            StmtKind::Declaration { kind, declarators },
            position,
        ))
    }

    fn parse_declarators(&mut self, kind: DeclKind) -> Result<Vec<Declarator>, ParseError> {
        let mut declarators = Vec::new();
        loop {
            let position = self.cursor.position();
            let target = self.parse_binding_target(binding_kind(kind))?;
            declarators.push(self.finish_declarator(kind, target, position)?);
            if !self.cursor.eat_punct(Punct::Comma) {
                break;
            }
        }
        Ok(declarators)
    }

    /// Initializer of a declarator whose target has been parsed.
    fn finish_declarator(
        &mut self,
        kind: DeclKind,
        target: BindingPattern,
        position: Position,
    ) -> Result<Declarator, ParseError> {
        let init = if self.cursor.eat_op(Op::Assign) {
            let value = self.parse_assignment()?;
            if let BindingPattern::Ident(var) = &target {
                let name = self.program.var(*var).name.clone();
                self.name_function(value, &name);
            }
            Some(value)
        } else {
            None
        };
        if init.is_none() {
            if kind == DeclKind::Const {
                return Err(ParseError::new(
                    ErrorCode::E1006,
                    "Missing initializer in const declaration",
                    position,
                ));
            }
            if !matches!(target, BindingPattern::Ident(_)) {
                return Err(ParseError::new(
                    ErrorCode::E1007,
                    "Missing initializer in destructuring declaration",
                    position,
                ));
            }
        }
        Ok(Declarator { target, init })
    }

    fn parse_function_declaration(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.advance().position;
        let name = self.cursor.advance();
        let binding = self.resolver.declare_variable(
            &mut self.program,
            &name.text,
            BindingKind::Function,
            name.position,
        )?;
        let func = self.parse_function_rest(
            Some(name.text.as_str().into()),
            FunctionFlags::DECLARATION,
            position,
            false,
        )?;
        let stmt = self.stmt(StmtKind::Function { func, binding }, position);
        self.hoist(stmt);
        Ok(stmt)
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.advance().position;
        self.cursor.expect_punct(Punct::LParen)?;
        let test = self.parse_expression()?;
        self.cursor.expect_punct(Punct::RParen)?;
        let consequent = self.parse_substatement()?;
        let alternate = if self.cursor.eat_keyword(Keyword::Else) {
            Some(self.parse_substatement()?)
        } else {
            None
        };
        Ok(self.stmt(
            StmtKind::If {
                test,
                consequent,
                alternate,
            },
            position,
        ))
    }

    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.advance().position;
        self.cursor.expect_punct(Punct::LParen)?;
        let test = self.parse_expression()?;
        self.cursor.expect_punct(Punct::RParen)?;
        let body = self.parse_substatement()?;
        Ok(self.stmt(StmtKind::While { test, body }, position))
    }

    fn parse_do_while(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.advance().position;
        let body = self.parse_substatement()?;
        if !self.cursor.eat_keyword(Keyword::While) {
            return Err(self.cursor.expected("'while'"));
        }
        self.cursor.expect_punct(Punct::LParen)?;
        let test = self.parse_expression()?;
        self.cursor.expect_punct(Punct::RParen)?;
        self.cursor.eat_punct(Punct::Semicolon);
        Ok(self.stmt(StmtKind::DoWhile { body, test }, position))
    }

    /// `for (;;)`, `for (x in o)` and `for (x of xs)`.
    ///
    /// The header is a scope of its own so `let` bindings in it are visible
    /// to the body but not after the loop.
    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.advance().position;
        self.cursor.expect_punct(Punct::LParen)?;
        self.enter_block();

        let mut init = None;
        let decl_kind = match self.cursor.current_kind() {
            TokenKind::Keyword(Keyword::Let) => Some(DeclKind::Let),
            TokenKind::Keyword(Keyword::Const) => Some(DeclKind::Const),
            _ => None,
        };
        if let Some(kind) = decl_kind {
            let decl_position = self.cursor.advance().position;
            let target_position = self.cursor.position();
            let target = self.parse_binding_target(binding_kind(kind))?;
            if let Some(is_of) = self.for_each_keyword() {
                return self.finish_for_each(position, ForBinding::Declaration(target), is_of);
            }
            let mut declarators = vec![self.finish_declarator(kind, target, target_position)?];
            while self.cursor.eat_punct(Punct::Comma) {
                let target_position = self.cursor.position();
                let target = self.parse_binding_target(binding_kind(kind))?;
                declarators.push(self.finish_declarator(kind, target, target_position)?);
            }
            init = Some(self.stmt(
                StmtKind::Declaration { kind, declarators },
                decl_position,
            ));
        } else if !self.cursor.check_punct(Punct::Semicolon) {
            let expr_position = self.cursor.position();
            let expr = self.parse_expression()?;
            if let Some(is_of) = self.for_each_keyword() {
                self.check_assignment_target(expr)?;
                return self.finish_for_each(position, ForBinding::Target(expr), is_of);
            }
            init = Some(self.stmt(StmtKind::Expr(expr), expr_position));
        }

        self.cursor.expect_punct(Punct::Semicolon)?;
        let test = if self.cursor.check_punct(Punct::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.cursor.expect_punct(Punct::Semicolon)?;
        let update = if self.cursor.check_punct(Punct::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.cursor.expect_punct(Punct::RParen)?;
        let body = self.parse_substatement()?;
        let per_iteration = self.exit_block().fresh_slots;
        Ok(self.stmt(
            StmtKind::For {
                init,
                test,
                update,
                body,
                per_iteration,
            },
            position,
        ))
    }

    /// `Some(true)` at `of`, `Some(false)` at `in`.
    fn for_each_keyword(&self) -> Option<bool> {
        if self.cursor.check_word("of") {
            Some(true)
        } else if self.cursor.check_keyword(Keyword::In) {
            Some(false)
        } else {
            None
        }
    }

    fn finish_for_each(
        &mut self,
        position: Position,
        binding: ForBinding,
        is_of: bool,
    ) -> Result<StmtId, ParseError> {
        self.cursor.advance();
        let source = self.parse_expression()?;
        self.cursor.expect_punct(Punct::RParen)?;
        let body = self.parse_substatement()?;
        let fresh_slots = self.exit_block().fresh_slots;
        let kind = if is_of {
            StmtKind::ForOf {
                binding,
                iterable: source,
                body,
                fresh_slots,
            }
        } else {
            StmtKind::ForIn {
                binding,
                object: source,
                body,
                fresh_slots,
            }
        };
        Ok(self.stmt(kind, position))
    }

    fn parse_switch(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.advance().position;
        self.cursor.expect_punct(Punct::LParen)?;
        let discriminant = self.parse_expression()?;
        self.cursor.expect_punct(Punct::RParen)?;
        self.cursor.expect_punct(Punct::LBrace)?;
        self.enter_block();

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.cursor.eat_punct(Punct::RBrace) {
            let clause_position = self.cursor.position();
            let test = if self.cursor.eat_keyword(Keyword::Case) {
                Some(self.parse_expression()?)
            } else if self.cursor.eat_keyword(Keyword::Default) {
                if seen_default {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "More than one default clause in switch statement",
                        clause_position,
                    ));
                }
                seen_default = true;
                None
            } else {
                return Err(self.cursor.expected("'case' or 'default'"));
            };
            self.cursor.expect_punct(Punct::Colon)?;
            let mut body = Vec::new();
            while !matches!(
                self.cursor.current_kind(),
                TokenKind::Keyword(Keyword::Case | Keyword::Default)
                    | TokenKind::Punct(Punct::RBrace)
                    | TokenKind::Eof
            ) {
                body.push(self.parse_statement()?);
            }
            cases.push(SwitchCase { test, body });
        }
        let scope = self.exit_block();
        Ok(self.stmt(
            StmtKind::Switch {
                discriminant,
                cases,
                scope,
            },
            position,
        ))
    }

    fn parse_try(&mut self) -> Result<StmtId, ParseError> {
        let position = self.cursor.advance().position;
        let block = self.parse_block_statement()?;

        let handler = if self.cursor.eat_keyword(Keyword::Catch) {
            if self.cursor.eat_punct(Punct::LParen) {
                self.enter_block();
                let token = self.cursor.current().clone();
                if token.kind != TokenKind::Ident {
                    return Err(ParseError::new(
                        ErrorCode::E1004,
                        format!("Expected identifier but found {}", token.kind.describe()),
                        token.position,
                    ));
                }
                self.cursor.advance();
                let param = self.resolver.declare_variable(
                    &mut self.program,
                    &token.text,
                    BindingKind::Let,
                    token.position,
                )?;
                self.cursor.expect_punct(Punct::RParen)?;
                let body = self.parse_block_statement()?;
                self.exit_block();
                Some(CatchClause {
                    param: Some(param),
                    body,
                })
            } else {
                let body = self.parse_block_statement()?;
                Some(CatchClause { param: None, body })
            }
        } else {
            None
        };

        let finalizer = if self.cursor.eat_keyword(Keyword::Finally) {
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "Missing catch or finally after try",
                self.cursor.position(),
            ));
        }
        Ok(self.stmt(
            StmtKind::Try {
                block,
                handler,
                finalizer,
            },
            position,
        ))
    }
}

pub(super) fn binding_kind(kind: DeclKind) -> BindingKind {
    match kind {
        DeclKind::Let => BindingKind::Let,
        DeclKind::Const => BindingKind::Const,
    }
}
