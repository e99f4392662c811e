//! Quill Eval - tree-walking evaluator for Quill programs.
//!
//! # Architecture
//!
//! - `Interpreter`: runs a resolved [`quill_ir::Program`] statement by
//!   statement, one [`Activation`] per call
//! - `Value`: primitives inline; arrays and objects as [`Shared`] containers
//! - `coerce` / `operators`: conversions and binary operator semantics
//! - `MethodTable`: built-in methods dispatched by receiver kind
//! - `builtins`: globals (`Math`, `JSON`, `Object`, `print`, ...) installed
//!   by [`InterpreterBuilder::build`]
//!
//! Errors a script can catch and host failures share [`EvalError`];
//! `return`, `break` and the other exits travel as [`ControlAction`].

mod builtins;
pub mod coerce;
mod config;
pub mod errors;
mod interpreter;
mod methods;
pub mod operators;
mod print_handler;
mod scope;
mod value;

pub use builtins::{parse_json, stringify_json};
pub use config::{EvalConfig, DEFAULT_LOOP_LIMIT, DEFAULT_MAX_CALL_DEPTH};
pub use errors::{ControlAction, ErrorClass, EvalError, EvalErrorKind, EvalResult, ScriptError};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use methods::{MethodTable, ReceiverKind};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use scope::{Activation, Cell, GlobalScope};
pub use value::{Closure, FunctionValue, NativeFn, NativeFunction, ObjectMap, Shared, Value};
