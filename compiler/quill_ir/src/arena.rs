//! The program arena.

use std::rc::Rc;

use crate::{Expr, ExprId, FuncId, Function, Position, Stmt, StmtId, Storage, VarId};

/// A variable occurrence: declaration site or reference.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: Rc<str>,
    pub storage: Storage,
    /// Resolves to a `const` binding; writes through it are rejected.
    pub constant: bool,
    pub position: Position,
}

/// Every node of a parsed program.
///
/// The top-level code is function [`Program::ROOT`]; its body is an
/// ordinary block and its layout sizes the top-level activation.
#[derive(Clone, Debug, Default)]
pub struct Program {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    functions: Vec<Function>,
    vars: Vec<Variable>,
}

impl Program {
    pub const ROOT: FuncId = FuncId::new(0);

    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Variable {
        &self.vars[id.index()]
    }

    pub fn root(&self) -> &Function {
        self.function(Self::ROOT)
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(self.stmts.len() as u32);
        self.stmts.push(stmt);
        id
    }

    /// Append a function. The first function added is the program body.
    pub fn alloc_function(&mut self, function: Function) -> FuncId {
        let id = FuncId::new(self.functions.len() as u32);
        self.functions.push(function);
        id
    }

    pub fn alloc_var(&mut self, var: Variable) -> VarId {
        let id = VarId::new(self.vars.len() as u32);
        self.vars.push(var);
        id
    }

    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.stmts[id.index()]
    }

    pub fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    pub fn var_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.vars[id.index()]
    }

    pub fn functions(&self) -> impl Iterator<Item = (FuncId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FuncId::new(i as u32), f))
    }

    pub fn vars(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, v)| (VarId::new(i as u32), v))
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}
