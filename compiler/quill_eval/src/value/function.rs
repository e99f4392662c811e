//! Function values: script closures, native functions and bound functions.

use std::rc::Rc;

use quill_ir::{FuncId, Function, Program};

use super::Value;
use crate::errors::EvalResult;
use crate::scope::Cell;
use crate::Interpreter;

/// Signature of a native function body: interpreter, receiver, arguments.
pub type NativeFn = dyn Fn(&mut Interpreter, &Value, &[Value]) -> EvalResult;

/// Function implemented in Rust.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    params: Rc<[Rc<str>]>,
    callback: Rc<NativeFn>,
}

impl NativeFunction {
    /// Create from a `name(a,b)` signature. The parameter list is
    /// documentation only, except that its length becomes the function's
    /// `length`.
    pub fn new<F>(signature: &str, callback: F) -> Self
    where
        F: Fn(&mut Interpreter, &Value, &[Value]) -> EvalResult + 'static,
    {
        let (name, params) = parse_signature(signature);
        NativeFunction {
            name,
            params: params.into(),
            callback: Rc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Rc<str>] {
        &self.params
    }

    #[inline]
    pub(crate) fn invoke(
        &self,
        interpreter: &mut Interpreter,
        this: &Value,
        args: &[Value],
    ) -> EvalResult {
        (self.callback)(interpreter, this, args)
    }
}

/// Split `name(a, b)` into the name and trimmed parameter names. Text
/// without parentheses is a bare name.
fn parse_signature(signature: &str) -> (Rc<str>, Vec<Rc<str>>) {
    let Some((name, rest)) = signature.split_once('(') else {
        return (signature.trim().into(), Vec::new());
    };
    let list = rest.split_once(')').map_or(rest, |(list, _)| list);
    let params = list
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(Rc::from)
        .collect();
    (name.trim().into(), params)
}

/// A script function together with the cells it captured when created.
pub struct Closure {
    pub(crate) program: Rc<Program>,
    pub(crate) func: FuncId,
    pub(crate) captured: Rc<[Cell]>,
}

impl Closure {
    pub fn function(&self) -> &Function {
        self.program.function(self.func)
    }
}

pub(crate) enum Callable {
    Closure(Closure),
    Native(NativeFunction),
    /// Result of `bind`: fixed receiver and leading arguments.
    Bound {
        target: FunctionValue,
        this: Value,
        args: Vec<Value>,
    },
}

/// A callable value.
///
/// Reading a function out of an object attaches that object as the
/// receiver; the call then sees it as `this` unless the call site passes
/// one explicitly. Arrows and bound functions ignore receivers.
#[derive(Clone)]
pub struct FunctionValue {
    callable: Rc<Callable>,
    receiver: Option<Rc<Value>>,
}

impl FunctionValue {
    pub fn native(native: NativeFunction) -> Self {
        Self::from_callable(Callable::Native(native))
    }

    pub(crate) fn closure(closure: Closure) -> Self {
        Self::from_callable(Callable::Closure(closure))
    }

    pub(crate) fn bound(target: FunctionValue, this: Value, args: Vec<Value>) -> Self {
        Self::from_callable(Callable::Bound { target, this, args })
    }

    fn from_callable(callable: Callable) -> Self {
        FunctionValue {
            callable: Rc::new(callable),
            receiver: None,
        }
    }

    #[inline]
    pub(crate) fn callable(&self) -> &Callable {
        &self.callable
    }

    pub fn name(&self) -> Rc<str> {
        match &*self.callable {
            Callable::Closure(closure) => closure.function().name.clone().unwrap_or_else(|| "".into()),
            Callable::Native(native) => Rc::clone(&native.name),
            Callable::Bound { target, .. } => format!("bound {}", target.name()).into(),
        }
    }

    /// Declared parameter count.
    pub fn length(&self) -> usize {
        match &*self.callable {
            Callable::Closure(closure) => closure.function().params.len(),
            Callable::Native(native) => native.params.len(),
            Callable::Bound { target, args, .. } => target.length().saturating_sub(args.len()),
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(&*self.callable, Callable::Closure(c) if c.function().is_arrow())
    }

    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_deref()
    }

    /// This function with `this` attached as its receiver.
    #[must_use]
    pub fn with_receiver(&self, this: Value) -> FunctionValue {
        if self.is_arrow() || matches!(&*self.callable, Callable::Bound { .. }) {
            return self.clone();
        }
        FunctionValue {
            callable: Rc::clone(&self.callable),
            receiver: Some(Rc::new(this)),
        }
    }

    /// Identity: the same function, regardless of receiver.
    #[inline]
    pub fn ptr_eq(&self, other: &FunctionValue) -> bool {
        Rc::ptr_eq(&self.callable, &other.callable)
    }
}
