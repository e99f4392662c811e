//! Function nodes.

use std::rc::Rc;

use bitflags::bitflags;

use crate::{BindingPattern, ExprId, FrameLayout, Position, StmtId, VarId};

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u8 {
        /// Arrow function: no own `this` or `arguments`.
        const ARROW = 1;
        /// Declared with `function name() {}` as a statement.
        const DECLARATION = 1 << 1;
        /// Method or property of an object literal.
        const METHOD = 1 << 2;
    }
}

#[derive(Clone, Debug)]
pub struct Param {
    pub target: BindingPattern,
    pub default: Option<ExprId>,
}

#[derive(Clone, Debug)]
pub enum FunctionBody {
    /// `{ ... }` block; the block statement.
    Block(StmtId),
    /// Concise arrow body.
    Expr(ExprId),
}

#[derive(Clone, Debug)]
pub struct Function {
    pub name: Option<Rc<str>>,
    pub params: Vec<Param>,
    pub rest: Option<VarId>,
    pub body: FunctionBody,
    pub layout: FrameLayout,
    pub flags: FunctionFlags,
    /// Slot of a named function expression's own name.
    pub self_binding: Option<VarId>,
    pub position: Position,
}

impl Function {
    /// Empty function record, filled in once its body has been parsed.
    pub fn reserved(position: Position) -> Self {
        Function {
            name: None,
            params: Vec::new(),
            rest: None,
            body: FunctionBody::Block(StmtId::new(u32::MAX)),
            layout: FrameLayout::default(),
            flags: FunctionFlags::empty(),
            self_binding: None,
            position,
        }
    }

    #[inline]
    pub fn is_arrow(&self) -> bool {
        self.flags.contains(FunctionFlags::ARROW)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }
}
