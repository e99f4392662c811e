//! Tree-walking interpreter.
//!
//! The interpreter owns the global scope, the method table and the
//! activation of the function currently running. A call swaps in a fresh
//! activation for the callee and restores the caller's afterwards, so the
//! activation chain lives on the Rust stack.
//!
//! # Control flow
//!
//! Expressions return `Result<Value, ControlAction>` and statements
//! `Result<(), ControlAction>`; `return`, `break`, `continue`, thrown
//! errors and optional-chain short-circuits travel in the error channel
//! until the construct that handles them.

mod builder;
mod call;
mod expr;
mod member;
mod pattern;
mod stmt;

use std::rc::Rc;

use quill_ir::{CaptureSource, FuncId, FunctionBody, Program, Storage, VarId};
use tracing::{debug, trace};

use crate::config::EvalConfig;
use crate::errors::{
    const_assignment, uninitialized, undefined_variable, ControlAction, EvalError, EvalResult,
    ScriptError,
};
use crate::methods::MethodTable;
use crate::print_handler::SharedPrintHandler;
use crate::scope::{Activation, Cell, GlobalScope};
use crate::value::{Closure, FunctionValue, NativeFunction};
use crate::Value;

pub use builder::InterpreterBuilder;

pub struct Interpreter {
    config: EvalConfig,
    globals: GlobalScope,
    methods: MethodTable,
    print: SharedPrintHandler,
    /// Program of the running function.
    program: Rc<Program>,
    activation: Activation,
    call_depth: usize,
    /// Value of the last top-level expression statement.
    completion: Value,
}

impl Interpreter {
    /// Interpreter with the default configuration and standard library,
    /// printing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    fn from_parts(config: EvalConfig, print: SharedPrintHandler) -> Self {
        Interpreter {
            config,
            globals: GlobalScope::new(),
            methods: MethodTable::new(),
            print,
            program: Rc::new(Program::new()),
            activation: Activation::empty(),
            call_depth: 0,
            completion: Value::Undefined,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut GlobalScope {
        &mut self.globals
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn methods_mut(&mut self) -> &mut MethodTable {
        &mut self.methods
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print
    }

    pub fn println(&self, msg: &str) {
        self.print.println(msg);
    }

    /// Register a native function as a constant global.
    pub fn define_native<F>(&mut self, signature: &str, callback: F)
    where
        F: Fn(&mut Interpreter, &Value, &[Value]) -> EvalResult + 'static,
    {
        let native = NativeFunction::new(signature, callback);
        let name = native.name().to_string();
        self.globals
            .define_constant(&name, Value::Function(FunctionValue::native(native)));
    }

    /// Run a parsed program, returning the completion value: the value of
    /// the last expression statement executed, or the value of a top-level
    /// `return`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(&mut self, program: impl Into<Rc<Program>>) -> Result<Value, EvalError> {
        let program: Rc<Program> = program.into();
        let root = program.root();
        debug!(
            slots = root.layout.slot_count(),
            functions = program.functions().count(),
            "evaluating program"
        );
        let activation = Activation::new(root.layout.slot_count(), Rc::from(Vec::new()));
        let saved_activation = std::mem::replace(&mut self.activation, activation);
        let saved_program = std::mem::replace(&mut self.program, Rc::clone(&program));
        let saved_depth = std::mem::take(&mut self.call_depth);
        self.completion = Value::Undefined;

        let outcome = match root.body {
            FunctionBody::Block(body) => self.exec_stmt(body),
            FunctionBody::Expr(expr) => self.eval_expr(expr).map(|value| {
                self.completion = value;
            }),
        };

        self.activation = saved_activation;
        self.program = saved_program;
        self.call_depth = saved_depth;
        let completion = std::mem::take(&mut self.completion);
        match outcome {
            Ok(()) | Err(ControlAction::Break | ControlAction::Continue | ControlAction::ShortCircuit) => {
                Ok(completion)
            }
            Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(err)) => {
                debug!(error = %err, "evaluation failed");
                Err(err)
            }
        }
    }

    /// Parse and run `source`.
    pub fn run_source(&mut self, source: &str) -> Result<Value, ScriptError> {
        let program = quill_parse::parse_source(source)?;
        Ok(self.evaluate(program)?)
    }

    /// Call a function value from host code.
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
        match self.call_function(callee, Value::Undefined, args) {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(err)) => Err(err),
            Err(_) => Ok(Value::Undefined),
        }
    }

    pub(crate) fn read_var(&self, var: VarId) -> Result<Value, EvalError> {
        let variable = self.program.var(var);
        match &variable.storage {
            Storage::Local(slot) => self
                .activation
                .get(*slot)
                .ok_or_else(|| uninitialized(&variable.name)),
            Storage::Captured(index) => self
                .activation
                .captured(*index)
                .get()
                .ok_or_else(|| uninitialized(&variable.name)),
            Storage::Global(name) => self.read_global(name),
        }
    }

    fn read_global(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(value) = self.globals.get(name) {
            return Ok(value);
        }
        if name == "this" {
            return Ok(self.globals.as_value());
        }
        Err(undefined_variable(name))
    }

    /// Whether `var` is a global name with no definition.
    pub(crate) fn is_unresolved_global(&self, var: VarId) -> bool {
        match &self.program.var(var).storage {
            Storage::Global(name) => &**name != "this" && !self.globals.contains(name),
            Storage::Local(_) | Storage::Captured(_) => false,
        }
    }

    /// Script assignment to an existing binding.
    pub(crate) fn write_var(&mut self, var: VarId, value: Value) -> Result<(), EvalError> {
        let variable = self.program.var(var);
        if variable.constant {
            return Err(const_assignment(&variable.name));
        }
        match &variable.storage {
            Storage::Local(slot) => {
                if !self.activation.is_initialized(*slot) {
                    return Err(uninitialized(&variable.name));
                }
                self.activation.set(*slot, value);
                Ok(())
            }
            Storage::Captured(index) => {
                let cell = self.activation.captured(*index);
                if !cell.is_initialized() {
                    return Err(uninitialized(&variable.name));
                }
                cell.set(value);
                Ok(())
            }
            Storage::Global(name) => self.globals.assign(name, value),
        }
    }

    /// Initialize a binding as its declaration runs.
    pub(crate) fn init_var(&mut self, var: VarId, value: Value) {
        let variable = self.program.var(var);
        match &variable.storage {
            Storage::Local(slot) => self.activation.set(*slot, value),
            Storage::Captured(index) => self.activation.captured(*index).set(value),
            Storage::Global(name) => self.globals.define(name, value),
        }
    }

    /// Give a local binding a fresh, uninitialized slot.
    pub(crate) fn reset_var(&mut self, var: VarId) {
        if let Storage::Local(slot) = self.program.var(var).storage {
            self.activation.reset(slot);
        }
    }

    /// Create a closure for `func`, capturing the cells its layout lists
    /// from the running activation.
    pub(crate) fn make_closure(&mut self, func: FuncId) -> FunctionValue {
        let program = Rc::clone(&self.program);
        let function = program.function(func);
        let captured: Rc<[Cell]> = function
            .layout
            .captures
            .iter()
            .map(|capture| match capture.source {
                CaptureSource::Local(slot) => self.activation.capture(slot),
                CaptureSource::Captured(index) => self.activation.captured(index).clone(),
            })
            .collect();
        trace!(
            name = function.display_name(),
            captures = captured.len(),
            "closure"
        );
        FunctionValue::closure(Closure {
            program,
            func,
            captured,
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Iteration counter enforcing the loop ceiling.
struct LoopGuard {
    count: usize,
    limit: usize,
}

impl LoopGuard {
    fn new(limit: usize) -> Self {
        LoopGuard { count: 0, limit }
    }

    #[inline]
    fn tick(&mut self) -> Result<(), EvalError> {
        self.count += 1;
        if self.count > self.limit {
            debug!(limit = self.limit, "loop limit exceeded");
            return Err(crate::errors::loop_limit_exceeded(self.limit));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap evaluation results")]
mod tests;
