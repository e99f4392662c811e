//! Runtime errors and non-local control flow.
//!
//! # Error Categories
//!
//! Every [`EvalErrorKind`] belongs to an [`ErrorClass`]. Class errors
//! (`ReferenceError`, `TypeError`, `RangeError`, `SyntaxError`) and thrown
//! script values are exceptions a script can catch. The iteration ceiling is
//! a host failure: `catch` never sees it and it ends evaluation.
//!
//! Factory functions (`not_callable()`, `undefined_variable()`, ...) are the
//! public API; they fill in both `kind` and `message`.

use std::fmt;
use std::rc::Rc;

use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::Position;
use quill_parse::ParseError;

use crate::Value;

/// Result of evaluating an expression or statement.
pub type EvalResult<T = Value> = Result<T, ControlAction>;

/// Non-local exit from an expression or statement.
///
/// Each construct handles the signals it is responsible for and propagates
/// the rest: loops take `Break`/`Continue`, function calls take `Return`,
/// `try` takes catchable errors, optional chains take `ShortCircuit`.
#[derive(Clone, Debug)]
pub enum ControlAction {
    Error(EvalError),
    Return(Value),
    Break,
    Continue,
    /// `?.` met `null` or `undefined`.
    ShortCircuit,
}

impl ControlAction {
    /// Attach `position` to an error that has none yet.
    #[must_use]
    pub fn at(self, position: Position) -> Self {
        match self {
            ControlAction::Error(err) => ControlAction::Error(err.with_position(position)),
            other => other,
        }
    }
}

impl From<EvalError> for ControlAction {
    fn from(err: EvalError) -> Self {
        ControlAction::Error(err)
    }
}

/// Script-visible error class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorClass {
    ReferenceError,
    TypeError,
    RangeError,
    SyntaxError,
}

impl ErrorClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorClass::ReferenceError => "ReferenceError",
            ErrorClass::TypeError => "TypeError",
            ErrorClass::RangeError => "RangeError",
            ErrorClass::SyntaxError => "SyntaxError",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed runtime failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // References
    UndefinedVariable {
        name: Rc<str>,
    },
    Uninitialized {
        name: Rc<str>,
    },

    // Assignment
    ConstAssignment {
        name: Rc<str>,
    },
    ReadOnlyProperty {
        property: String,
        type_name: &'static str,
    },
    InvalidArrayIndex {
        index: String,
    },

    // Access and calls
    NotCallable {
        type_name: &'static str,
    },
    PropertyOfNullish {
        property: String,
        base: &'static str,
        write: bool,
    },
    NotIterable {
        type_name: &'static str,
    },
    CallDepthExceeded {
        limit: usize,
    },

    /// Error raised by a native function.
    Native {
        class: ErrorClass,
        message: String,
    },

    /// Value passed to `throw`.
    Thrown,

    /// Iteration ceiling reached.
    LoopLimitExceeded {
        limit: usize,
    },
}

impl EvalErrorKind {
    /// Script-visible class. `None` for thrown values and host failures.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            Self::UndefinedVariable { .. } | Self::Uninitialized { .. } => {
                Some(ErrorClass::ReferenceError)
            }
            Self::ConstAssignment { .. }
            | Self::ReadOnlyProperty { .. }
            | Self::NotCallable { .. }
            | Self::PropertyOfNullish { .. }
            | Self::NotIterable { .. } => Some(ErrorClass::TypeError),
            Self::InvalidArrayIndex { .. } | Self::CallDepthExceeded { .. } => {
                Some(ErrorClass::RangeError)
            }
            Self::Native { class, .. } => Some(*class),
            Self::Thrown | Self::LoopLimitExceeded { .. } => None,
        }
    }

    /// Whether the failure ends evaluation without reaching `catch`.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LoopLimitExceeded { .. })
    }

    pub fn code(&self) -> ErrorCode {
        match self.class() {
            Some(ErrorClass::ReferenceError) => ErrorCode::E6001,
            Some(ErrorClass::TypeError | ErrorClass::SyntaxError) => ErrorCode::E6002,
            Some(ErrorClass::RangeError) => ErrorCode::E6003,
            None if self.is_fatal() => ErrorCode::E6005,
            None => ErrorCode::E6004,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "{name} is not defined"),
            Self::Uninitialized { name } => {
                write!(f, "Cannot access '{name}' before initialization")
            }
            Self::ConstAssignment { name } => {
                write!(f, "Assignment to constant variable '{name}'")
            }
            Self::ReadOnlyProperty {
                property,
                type_name,
            } => write!(
                f,
                "Cannot assign to read only property '{property}' of {type_name}"
            ),
            Self::InvalidArrayIndex { index } => write!(f, "Invalid array index '{index}'"),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not a function"),
            Self::PropertyOfNullish {
                property,
                base,
                write: false,
            } => write!(f, "Cannot read properties of {base} (reading '{property}')"),
            Self::PropertyOfNullish {
                property,
                base,
                write: true,
            } => write!(f, "Cannot set properties of {base} (setting '{property}')"),
            Self::NotIterable { type_name } => write!(f, "{type_name} is not iterable"),
            Self::CallDepthExceeded { .. } => f.write_str("Maximum call stack size exceeded"),
            Self::Native { message, .. } => f.write_str(message),
            Self::Thrown => f.write_str("uncaught exception"),
            Self::LoopLimitExceeded { limit } => {
                write!(f, "infinite loop detected (more than {limit} iterations)")
            }
        }
    }
}

/// Runtime error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message without the class prefix.
    pub message: String,
    /// The script value, for errors raised by `throw`.
    pub thrown: Option<Value>,
    /// Where the error was raised.
    pub position: Option<Position>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            thrown: None,
            position: None,
        }
    }

    /// Set the position unless one is already recorded.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position.get_or_insert(position);
        self
    }

    pub fn class(&self) -> Option<ErrorClass> {
        self.kind.class()
    }

    pub fn is_catchable(&self) -> bool {
        !self.kind.is_fatal()
    }

    /// Value bound to a `catch` parameter: the thrown value itself, or the
    /// error text for runtime errors.
    pub fn into_catch_value(self) -> Value {
        match self.thrown {
            Some(value) => value,
            None => Value::from(self.to_string()),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self.kind {
            EvalErrorKind::Thrown => format!("Uncaught {}", self.message),
            _ => self.to_string(),
        };
        Diagnostic::error(
            self.kind.code(),
            message,
            self.position.unwrap_or(Position::START),
        )
    }
}

/// `TypeError: x is not a function`; thrown values render as their text.
impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.class() {
            Some(class) => write!(f, "{class}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for EvalError {}

/// Read of a global name that does not exist.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable { name: name.into() })
}

/// Read or write of a binding before its declaration ran.
#[cold]
pub fn uninitialized(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Uninitialized { name: name.into() })
}

#[cold]
pub fn const_assignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstAssignment { name: name.into() })
}

/// Write to a property of a string, number, boolean or function.
#[cold]
pub fn read_only_property(property: &str, type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReadOnlyProperty {
        property: property.to_string(),
        type_name,
    })
}

/// Array write at a negative, non-integral or over-limit index.
#[cold]
pub fn invalid_array_index(index: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArrayIndex {
        index: index.to_string(),
    })
}

/// Call of a value that is not a function.
#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable { type_name })
}

/// Property read on `null` or `undefined`.
#[cold]
pub fn property_of_nullish(property: &str, base: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PropertyOfNullish {
        property: property.to_string(),
        base,
        write: false,
    })
}

/// Property write on `null` or `undefined`.
#[cold]
pub fn set_property_of_nullish(property: &str, base: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PropertyOfNullish {
        property: property.to_string(),
        base,
        write: true,
    })
}

#[cold]
pub fn not_iterable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable { type_name })
}

#[cold]
pub fn call_depth_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CallDepthExceeded { limit })
}

#[cold]
pub fn type_error(message: impl Into<String>) -> EvalError {
    native(ErrorClass::TypeError, message.into())
}

#[cold]
pub fn range_error(message: impl Into<String>) -> EvalError {
    native(ErrorClass::RangeError, message.into())
}

#[cold]
pub fn syntax_error(message: impl Into<String>) -> EvalError {
    native(ErrorClass::SyntaxError, message.into())
}

fn native(class: ErrorClass, message: String) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Native { class, message })
}

/// `throw value`.
pub fn thrown(value: Value) -> EvalError {
    EvalError {
        kind: EvalErrorKind::Thrown,
        message: value.to_string(),
        thrown: Some(value),
        position: None,
    }
}

/// Failure of [`Interpreter::run_source`](crate::Interpreter::run_source):
/// the source did not parse, or evaluation failed.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl ScriptError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ScriptError::Parse(err) => err.to_diagnostic(),
            ScriptError::Eval(err) => err.to_diagnostic(),
        }
    }
}

#[cold]
pub fn loop_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::LoopLimitExceeded { limit })
}
