//! Function calls.

use std::rc::Rc;

use quill_ir::{FunctionBody, ARGUMENTS_SLOT, THIS_SLOT};
use tracing::trace;

use super::Interpreter;
use crate::errors::{call_depth_exceeded, not_callable, ControlAction, EvalResult};
use crate::scope::Activation;
use crate::value::{Callable, Closure};
use crate::Value;

impl Interpreter {
    /// Call `callee` with an explicit receiver.
    ///
    /// The callee sees `this` when it is not `undefined`, otherwise the
    /// receiver attached when the function was read from an object.
    pub fn call_function(&mut self, callee: &Value, this: Value, args: &[Value]) -> EvalResult {
        let Value::Function(function) = callee else {
            return Err(not_callable(callee.type_name()).into());
        };
        if self.call_depth >= self.config.max_call_depth {
            return Err(call_depth_exceeded(self.config.max_call_depth).into());
        }
        let this = match (this, function.receiver()) {
            (Value::Undefined, Some(receiver)) => receiver.clone(),
            (this, _) => this,
        };

        self.call_depth += 1;
        let result = match function.callable() {
            Callable::Native(native) => native.invoke(self, &this, args),
            Callable::Closure(closure) => self.call_closure(closure, callee, this, args),
            Callable::Bound {
                target,
                this: bound_this,
                args: bound_args,
            } => {
                let mut all = Vec::with_capacity(bound_args.len() + args.len());
                all.extend_from_slice(bound_args);
                all.extend_from_slice(args);
                let target = Value::Function(target.clone());
                self.call_function(&target, bound_this.clone(), &all)
            }
        };
        self.call_depth -= 1;
        result
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        callee: &Value,
        this: Value,
        args: &[Value],
    ) -> EvalResult {
        let function = closure.function();
        trace!(
            name = function.display_name(),
            args = args.len(),
            depth = self.call_depth,
            "call"
        );
        let mut activation =
            Activation::new(function.layout.slot_count(), Rc::clone(&closure.captured));
        if !function.is_arrow() {
            activation.set(THIS_SLOT, this);
            activation.set(ARGUMENTS_SLOT, Value::array(args.to_vec()));
        }

        let saved_activation = std::mem::replace(&mut self.activation, activation);
        let saved_program = std::mem::replace(&mut self.program, Rc::clone(&closure.program));
        let result = self.run_closure_body(closure, callee, args);
        self.activation = saved_activation;
        self.program = saved_program;

        match result {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Break | ControlAction::Continue | ControlAction::ShortCircuit) => {
                Ok(Value::Undefined)
            }
            Err(err @ ControlAction::Error(_)) => Err(err),
        }
    }

    fn run_closure_body(&mut self, closure: &Closure, callee: &Value, args: &[Value]) -> EvalResult {
        let function = closure.function();
        if let Some(var) = function.self_binding {
            self.init_var(var, callee.clone());
        }
        for (i, param) in function.params.iter().enumerate() {
            let mut value = args.get(i).cloned().unwrap_or_default();
            if let (Value::Undefined, Some(default)) = (&value, param.default) {
                value = self.eval_expr(default)?;
            }
            self.bind_pattern(&param.target, value)?;
        }
        if let Some(rest) = function.rest {
            let tail = args.get(function.params.len()..).unwrap_or_default();
            self.init_var(rest, Value::array(tail.to_vec()));
        }
        match function.body {
            FunctionBody::Block(body) => {
                self.exec_stmt(body)?;
                Ok(Value::Undefined)
            }
            FunctionBody::Expr(expr) => self.eval_expr(expr),
        }
    }
}
