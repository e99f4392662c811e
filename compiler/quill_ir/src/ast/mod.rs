//! AST node definitions.
//!
//! Nodes live in the [`Program`](crate::Program) arena and refer to their
//! children by id.

mod expr;
mod function;
mod operators;
mod stmt;

pub use expr::{ArrayElement, Expr, ExprKind, Literal, MemberKey, Property};
pub use function::{Function, FunctionBody, FunctionFlags, Param};
pub use operators::{BinaryOp, LogicalOp, UnaryOp, UpdateOp};
pub use stmt::{
    BindingPattern, Block, BlockScope, CatchClause, DeclKind, Declarator, ForBinding,
    ObjectPatternProp, PatternElement, Stmt, StmtKind, SwitchCase,
};
