//! Expression nodes.

use std::rc::Rc;

use crate::{BinaryOp, ExprId, FuncId, LogicalOp, Number, Position, UnaryOp, UpdateOp, VarId};

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(Literal),
    /// Variable reference; the name and storage are in the variable table.
    Ident(VarId),
    Array(Vec<ArrayElement>),
    Object(Vec<Property>),
    /// Function expression or arrow function.
    Function(FuncId),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },
    /// String concatenation of every part, left to right.
    Concat(Vec<ExprId>),
    /// `target = value`, or `target op= value` when `op` is set.
    Assign {
        op: Option<BinaryOp>,
        target: ExprId,
        value: ExprId,
    },
    Conditional {
        test: ExprId,
        consequent: ExprId,
        alternate: ExprId,
    },
    Member {
        object: ExprId,
        property: MemberKey,
    },
    /// Operand of `?.`: evaluates the operand and short-circuits the
    /// enclosing chain when it is `null` or `undefined`.
    OptionalGuard(ExprId),
    /// Boundary of a member/call chain containing `?.`; a short-circuit
    /// inside it yields `undefined`.
    OptionalChain(ExprId),
    Call {
        callee: ExprId,
        args: Vec<ArrayElement>,
    },
}

#[derive(Clone, Debug)]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(Rc<str>),
}

/// Element of an array literal or argument list.
#[derive(Clone, Debug)]
pub enum ArrayElement {
    Expr(ExprId),
    /// `...name`
    Spread(ExprId),
    /// Elided element in `[a, , b]`.
    Hole,
}

#[derive(Clone, Debug)]
pub enum MemberKey {
    Static(Rc<str>),
    Computed(ExprId),
}

#[derive(Clone, Debug)]
pub enum Property {
    Init { key: MemberKey, value: ExprId },
    Spread(ExprId),
}
