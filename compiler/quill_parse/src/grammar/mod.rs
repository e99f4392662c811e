//! Recursive-descent grammar.
//!
//! The parser owns the [`Program`] arena it fills and drives the
//! [`Resolver`] as scopes open and close, so every identifier node leaves
//! here with a variable record whose storage `resolve_all` finalizes.

mod expr;
mod function;
mod pattern;
mod stmt;
mod template;

use quill_diagnostic::ErrorCode;
use quill_ir::{
    Block, BlockScope, Expr, ExprId, ExprKind, FuncId, Function, FunctionBody, Position, Program,
    Punct, Stmt, StmtId, StmtKind, Token,
};
use tracing::debug;

use crate::cursor::Cursor;
use crate::resolve::Resolver;
use crate::ParseError;

pub(crate) struct Parser {
    cursor: Cursor,
    program: Program,
    resolver: Resolver,
    /// Function declarations of each open block, innermost last.
    hoisted: Vec<Vec<StmtId>>,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            program: Program::new(),
            resolver: Resolver::new(),
            hoisted: Vec::new(),
        }
    }

    /// Parse the whole token stream as the program body and resolve every
    /// binding.
    pub(crate) fn parse_program(mut self) -> Result<Program, ParseError> {
        let position = self.cursor.position();
        let root = self.begin_function(position, false);
        debug_assert_eq!(root, Program::ROOT);

        let mut body = Vec::new();
        while !self.cursor.is_at_end() {
            body.push(self.parse_statement()?);
        }
        let scope = self.finish_function();
        let block = self.stmt(StmtKind::Block(Block { body, scope }), position);
        self.program.function_mut(root).body = FunctionBody::Block(block);

        let Parser {
            mut program,
            resolver,
            ..
        } = self;
        resolver.resolve_all(&mut program)?;
        debug!(
            exprs = program.expr_count(),
            stmts = program.stmt_count(),
            "parsed program"
        );
        Ok(program)
    }

    #[inline]
    fn expr(&mut self, kind: ExprKind, position: Position) -> ExprId {
        self.program.alloc_expr(Expr { kind, position })
    }

    #[inline]
    fn stmt(&mut self, kind: StmtKind, position: Position) -> StmtId {
        self.program.alloc_stmt(Stmt { kind, position })
    }

    fn enter_block(&mut self) {
        self.resolver.start_block();
        self.hoisted.push(Vec::new());
    }

    fn exit_block(&mut self) -> BlockScope {
        let fresh_slots = self.resolver.end_block();
        let hoisted = self.hoisted.pop().unwrap_or_default();
        BlockScope {
            fresh_slots,
            hoisted,
        }
    }

    /// Reserve a function record and open its scope.
    fn begin_function(&mut self, position: Position, is_arrow: bool) -> FuncId {
        let func = self.program.alloc_function(Function::reserved(position));
        self.resolver.start_function(func, is_arrow);
        self.hoisted.push(Vec::new());
        func
    }

    fn finish_function(&mut self) -> BlockScope {
        let fresh_slots = self.resolver.end_function();
        let hoisted = self.hoisted.pop().unwrap_or_default();
        BlockScope {
            fresh_slots,
            hoisted,
        }
    }

    fn hoist(&mut self, stmt: StmtId) {
        if let Some(list) = self.hoisted.last_mut() {
            list.push(stmt);
        }
    }

    /// Identifier reference expression.
    fn reference(&mut self, name: &str, position: Position) -> Result<ExprId, ParseError> {
        let var = self.resolver.reference(&mut self.program, name, position)?;
        Ok(self.expr(ExprKind::Ident(var), position))
    }

    /// Statement end: `;`, or implied by `}`, end of input, or a line break.
    fn consume_terminator(&mut self) -> Result<(), ParseError> {
        if self.cursor.eat_punct(Punct::Semicolon) {
            return Ok(());
        }
        let token = self.cursor.current();
        if token.is_eof() || token.newline_before || self.cursor.check_punct(Punct::RBrace) {
            return Ok(());
        }
        Err(ParseError::new(
            ErrorCode::E1003,
            format!("Expected ';' but found {}", token.kind.describe()),
            token.position,
        ))
    }

    /// Accept `target` as the left side of a write.
    fn check_assignment_target(&mut self, target: ExprId) -> Result<(), ParseError> {
        let expr = self.program.expr(target);
        match expr.kind {
            ExprKind::Ident(var) => {
                self.resolver.mark_assigned(var);
                Ok(())
            }
            ExprKind::Member { .. } => Ok(()),
            _ => Err(ParseError::new(
                ErrorCode::E1005,
                "Invalid left-hand side in assignment",
                expr.position,
            )),
        }
    }

    /// Give an anonymous function expression the name it is bound to.
    fn name_function(&mut self, value: ExprId, name: &str) {
        if let ExprKind::Function(func) = self.program.expr(value).kind {
            let function = self.program.function_mut(func);
            if function.name.is_none() {
                function.name = Some(name.into());
            }
        }
    }
}
