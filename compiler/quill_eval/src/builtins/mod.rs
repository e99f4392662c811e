//! Standard library.
//!
//! Global functions and namespace objects (`Math`, `JSON`, `Object`,
//! `Array`) are constant globals. Methods on strings, arrays, objects,
//! numbers and functions are registered in the interpreter's
//! [`MethodTable`](crate::MethodTable) and found by receiver kind.

mod array;
mod globals;
mod json;
mod object;
mod string;

use std::rc::Rc;

use tracing::debug;

use crate::errors::{type_error, EvalError, EvalResult};
use crate::methods::ReceiverKind;
use crate::value::{FunctionValue, NativeFunction, ObjectMap, Shared};
use crate::{Interpreter, Value};

pub use json::{parse_json, stringify_json};

/// Install every global and method.
pub fn install(interpreter: &mut Interpreter) {
    globals::install(interpreter);
    json::install(interpreter);
    string::install(interpreter);
    array::install(interpreter);
    object::install(interpreter);
    debug!(
        globals = interpreter.globals().names().len(),
        "standard library installed"
    );
}

/// Argument `index`, or `undefined` when absent.
#[inline]
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Register a method for `kind`.
pub(crate) fn method<F>(interpreter: &mut Interpreter, kind: ReceiverKind, signature: &str, f: F)
where
    F: Fn(&mut Interpreter, &Value, &[Value]) -> EvalResult + 'static,
{
    interpreter
        .methods_mut()
        .register(kind, NativeFunction::new(signature, f));
}

/// Builds a namespace object of native functions and constants.
pub(crate) struct Namespace {
    members: ObjectMap,
}

impl Namespace {
    pub(crate) fn new() -> Self {
        Namespace {
            members: ObjectMap::new(),
        }
    }

    #[must_use]
    pub(crate) fn function<F>(mut self, signature: &str, f: F) -> Self
    where
        F: Fn(&mut Interpreter, &Value, &[Value]) -> EvalResult + 'static,
    {
        let native = NativeFunction::new(signature, f);
        let name: Rc<str> = native.name().into();
        self.members
            .insert(name, Value::Function(FunctionValue::native(native)));
        self
    }

    #[must_use]
    pub(crate) fn constant(mut self, name: &str, value: Value) -> Self {
        self.members.insert(name, value);
        self
    }

    pub(crate) fn define(self, interpreter: &mut Interpreter, name: &str) {
        interpreter
            .globals_mut()
            .define_constant(name, Value::object(self.members));
    }
}

/// The array a method was called on.
pub(crate) fn this_array(this: &Value, method: &str) -> Result<Shared<Vec<Value>>, EvalError> {
    match this {
        Value::Array(items) => Ok(items.clone()),
        other => Err(type_error(format!(
            "Array.prototype.{method} called on {}",
            other.type_name()
        ))),
    }
}

/// The function argument of a higher-order method.
pub(crate) fn callback(args: &[Value], index: usize) -> Result<Value, EvalError> {
    match args.get(index) {
        Some(f @ Value::Function(_)) => Ok(f.clone()),
        Some(other) => Err(type_error(format!("{other} is not a function"))),
        None => Err(type_error("undefined is not a function")),
    }
}

/// Resolve a relative index (negative counts from the end) and clamp it
/// into `0..=len`.
pub(crate) fn relative_index(value: &Value, len: usize, default: usize) -> usize {
    if matches!(value, Value::Undefined) {
        return default;
    }
    let index = crate::coerce::to_integer(value);
    let len = len as i64;
    let resolved = if index < 0 { len + index } else { index };
    resolved.clamp(0, len) as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap evaluation results")]
mod tests;
