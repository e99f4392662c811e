//! Quill IR - types shared between the front end and the evaluator.
//!
//! - [`Position`] for line/column source locations
//! - [`Token`] and [`TokenKind`] produced by the lexer
//! - [`Number`], the three-tier numeric representation
//! - [`Program`], the arena that owns every AST node
//! - [`Storage`] descriptors and [`FrameLayout`] binding records written by
//!   the binding analyzer
//!
//! # Design
//!
//! - **Flat arena**: nodes refer to each other through `ExprId`/`StmtId`/
//!   `FuncId` indices, never `Box`
//! - **Resolved once**: every identifier carries a [`VarId`] whose
//!   [`Storage`] is fixed before evaluation starts

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod ids;
mod number;
mod position;
mod storage;
mod token;

pub use arena::{Program, Variable};
pub use ast::{
    ArrayElement, BinaryOp, Block, BlockScope, BindingPattern, CatchClause, DeclKind, Declarator,
    Expr, ExprKind, ForBinding, Function, FunctionBody, FunctionFlags, Literal, LogicalOp,
    MemberKey, ObjectPatternProp, Param, PatternElement, Property, Stmt, StmtKind, SwitchCase,
    UnaryOp, UpdateOp,
};
pub use ids::{ExprId, FuncId, StmtId, VarId};
pub use number::Number;
pub use position::Position;
pub use storage::{
    BindingKind, Capture, CaptureSource, FrameLayout, LocalBinding, Storage, ARGUMENTS_SLOT,
    THIS_SLOT,
};
pub use token::{Keyword, Op, Punct, TemplatePart, TemplatePartKind, Token, TokenKind};
