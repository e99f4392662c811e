//! Storage descriptors and function binding records.
//!
//! The binding analyzer assigns each variable occurrence one [`Storage`]
//! before evaluation begins. Each function gets a [`FrameLayout`] that sizes
//! its activation and lists the cells it captures from the enclosing
//! activation when the closure is created.

use std::fmt;
use std::rc::Rc;

/// Slot of the receiver in a non-arrow function activation.
pub const THIS_SLOT: u32 = 0;
/// Slot of the `arguments` array in a non-arrow function activation.
pub const ARGUMENTS_SLOT: u32 = 1;

/// Where a variable lives at run time.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Storage {
    /// Slot in the current function's activation.
    Local(u32),
    /// Index into the current activation's captured-cell array.
    Captured(u32),
    /// Key into the interpreter's global scope.
    Global(Rc<str>),
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Local(slot) => write!(f, "local#{slot}"),
            Storage::Captured(idx) => write!(f, "captured#{idx}"),
            Storage::Global(name) => write!(f, "global:{name}"),
        }
    }
}

/// Declaration kind of a binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    Let,
    Const,
    Function,
    Param,
}

impl BindingKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BindingKind::Let => "let",
            BindingKind::Const => "const",
            BindingKind::Function => "function",
            BindingKind::Param => "param",
        }
    }
}

/// A variable declared directly in a function.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LocalBinding {
    pub name: Rc<str>,
    pub kind: BindingKind,
    pub slot: u32,
}

/// Where a captured cell comes from in the activation that creates the
/// closure.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CaptureSource {
    /// A slot of the creating activation (boxed on first capture).
    Local(u32),
    /// A cell the creating activation itself captured.
    Captured(u32),
}

/// One external reference of a function.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Capture {
    pub name: Rc<str>,
    /// How many function boundaries separate the use from the declaration.
    pub depth: u32,
    pub source: CaptureSource,
}

/// Binding record of one function body.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct FrameLayout {
    pub locals: Vec<LocalBinding>,
    pub captures: Vec<Capture>,
    /// Function nesting depth; the program body is 0.
    pub depth: u32,
}

impl FrameLayout {
    /// Length of the activation's slot array.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.locals.len()
    }
}
