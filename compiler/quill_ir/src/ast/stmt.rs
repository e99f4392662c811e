//! Statement nodes.

use std::rc::Rc;

use crate::{ExprId, FuncId, Position, StmtId, VarId};

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub position: Position,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Let,
    Const,
}

/// Block-level bookkeeping used at block entry.
#[derive(Clone, Default, Debug)]
pub struct BlockScope {
    /// Slots of `let`/`const`/function bindings declared directly in the
    /// block; each entry into the block starts them uninitialized.
    pub fresh_slots: Vec<u32>,
    /// Function declarations, instantiated before the first statement runs.
    pub hoisted: Vec<StmtId>,
}

#[derive(Clone, Debug)]
pub struct Block {
    pub body: Vec<StmtId>,
    pub scope: BlockScope,
}

#[derive(Clone, Debug)]
pub struct PatternElement {
    pub binding: VarId,
    pub default: Option<ExprId>,
}

#[derive(Clone, Debug)]
pub struct ObjectPatternProp {
    pub key: Rc<str>,
    pub binding: VarId,
    pub default: Option<ExprId>,
}

#[derive(Clone, Debug)]
pub enum BindingPattern {
    Ident(VarId),
    Array {
        elements: Vec<Option<PatternElement>>,
        rest: Option<VarId>,
    },
    Object {
        properties: Vec<ObjectPatternProp>,
        rest: Option<VarId>,
    },
}

#[derive(Clone, Debug)]
pub struct Declarator {
    pub target: BindingPattern,
    pub init: Option<ExprId>,
}

/// Loop variable of `for-in` / `for-of`.
#[derive(Clone, Debug)]
pub enum ForBinding {
    /// `let x` / `const [k, v]`: fresh bindings per iteration.
    Declaration(BindingPattern),
    /// An existing identifier or member expression.
    Target(ExprId),
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
    /// `None` for `default`.
    pub test: Option<ExprId>,
    pub body: Vec<StmtId>,
}

#[derive(Clone, Debug)]
pub struct CatchClause {
    pub param: Option<VarId>,
    pub body: StmtId,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Expr(ExprId),
    Declaration {
        kind: DeclKind,
        declarators: Vec<Declarator>,
    },
    /// Hoisted function declaration.
    Function {
        func: FuncId,
        binding: VarId,
    },
    Block(Block),
    If {
        test: ExprId,
        consequent: StmtId,
        alternate: Option<StmtId>,
    },
    While {
        test: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        test: ExprId,
    },
    For {
        init: Option<StmtId>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
        /// Header slots: reset on loop entry and copied into fresh cells
        /// between iterations.
        per_iteration: Vec<u32>,
    },
    ForIn {
        binding: ForBinding,
        object: ExprId,
        body: StmtId,
        /// Slots of the loop variables, reset every iteration.
        fresh_slots: Vec<u32>,
    },
    ForOf {
        binding: ForBinding,
        iterable: ExprId,
        body: StmtId,
        fresh_slots: Vec<u32>,
    },
    Break,
    Continue,
    Return(Option<ExprId>),
    Switch {
        discriminant: ExprId,
        cases: Vec<SwitchCase>,
        scope: BlockScope,
    },
    Throw(ExprId),
    Try {
        block: StmtId,
        handler: Option<CatchClause>,
        finalizer: Option<StmtId>,
    },
    Empty,
}
