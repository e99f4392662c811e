//! Statement execution.

use std::rc::Rc;

use quill_ir::{
    BlockScope, CatchClause, DeclKind, Declarator, ExprId, ForBinding, StmtId, StmtKind,
    SwitchCase,
};
use quill_stack::ensure_sufficient_stack;
use tracing::trace;

use super::{Interpreter, LoopGuard};
use crate::coerce::to_boolean;
use crate::errors::{not_iterable, thrown, ControlAction, EvalResult};
use crate::operators::strict_equals;
use crate::Value;

/// What a loop does after running its body once.
enum LoopFlow {
    Next,
    Exit,
}

impl Interpreter {
    pub(crate) fn exec_stmt(&mut self, id: StmtId) -> EvalResult<()> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(id))
    }

    fn exec_stmt_inner(&mut self, id: StmtId) -> EvalResult<()> {
        let program = Rc::clone(&self.program);
        let stmt = program.stmt(id);
        let result = match &stmt.kind {
            StmtKind::Expr(expr) => {
                let value = self.eval_expr(*expr)?;
                if self.call_depth == 0 {
                    self.completion = value;
                }
                Ok(())
            }
            StmtKind::Declaration { kind, declarators } => self.exec_declaration(*kind, declarators),
            // Instantiated when the enclosing block is entered.
            StmtKind::Function { .. } | StmtKind::Empty => Ok(()),
            StmtKind::Block(block) => {
                self.enter_scope(&block.scope);
                self.exec_list(&block.body)
            }
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.eval_expr(*test)?;
                if to_boolean(&test) {
                    self.exec_stmt(*consequent)
                } else if let Some(alternate) = alternate {
                    self.exec_stmt(*alternate)
                } else {
                    Ok(())
                }
            }
            StmtKind::While { test, body } => self.exec_while(*test, *body),
            StmtKind::DoWhile { body, test } => self.exec_do_while(*body, *test),
            StmtKind::For {
                init,
                test,
                update,
                body,
                per_iteration,
            } => self.exec_for(*init, *test, *update, *body, per_iteration),
            StmtKind::ForIn {
                binding,
                object,
                body,
                fresh_slots,
            } => {
                let object = self.eval_expr(*object)?;
                let keys = enumerable_keys(&object);
                let mut guard = LoopGuard::new(self.config.loop_limit);
                for key in keys {
                    guard.tick()?;
                    self.bind_loop_variable(binding, fresh_slots, key)?;
                    if let LoopFlow::Exit = self.run_body(*body)? {
                        break;
                    }
                }
                Ok(())
            }
            StmtKind::ForOf {
                binding,
                iterable,
                body,
                fresh_slots,
            } => {
                let iterable = self.eval_expr(*iterable)?;
                self.exec_for_of(binding, fresh_slots, &iterable, *body)
            }
            StmtKind::Break => Err(ControlAction::Break),
            StmtKind::Continue => Err(ControlAction::Continue),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(*expr)?,
                    None => Value::Undefined,
                };
                Err(ControlAction::Return(value))
            }
            StmtKind::Switch {
                discriminant,
                cases,
                scope,
            } => self.exec_switch(*discriminant, cases, scope),
            StmtKind::Throw(expr) => {
                let value = self.eval_expr(*expr)?;
                Err(thrown(value).into())
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => self.exec_try(*block, handler.as_ref(), *finalizer),
        };
        result.map_err(|action| action.at(stmt.position))
    }

    fn exec_list(&mut self, body: &[StmtId]) -> EvalResult<()> {
        for stmt in body {
            self.exec_stmt(*stmt)?;
        }
        Ok(())
    }

    /// Start a fresh instance of a block: its bindings become uninitialized
    /// and its function declarations are created up front.
    fn enter_scope(&mut self, scope: &BlockScope) {
        for slot in &scope.fresh_slots {
            self.activation.reset(*slot);
        }
        let program = Rc::clone(&self.program);
        for stmt in &scope.hoisted {
            if let StmtKind::Function { func, binding } = program.stmt(*stmt).kind {
                let closure = self.make_closure(func);
                self.init_var(binding, Value::Function(closure));
            }
        }
    }

    fn exec_declaration(&mut self, kind: DeclKind, declarators: &[Declarator]) -> EvalResult<()> {
        for declarator in declarators {
            let value = match declarator.init {
                Some(init) => self.eval_expr(init)?,
                None => Value::Undefined,
            };
            trace!(kind = ?kind, "declare");
            self.bind_pattern(&declarator.target, value)?;
        }
        Ok(())
    }

    /// Run a loop body, consuming `break` and `continue`.
    fn run_body(&mut self, body: StmtId) -> EvalResult<LoopFlow> {
        match self.exec_stmt(body) {
            Ok(()) | Err(ControlAction::Continue) => Ok(LoopFlow::Next),
            Err(ControlAction::Break) => Ok(LoopFlow::Exit),
            Err(other) => Err(other),
        }
    }

    fn exec_while(&mut self, test: ExprId, body: StmtId) -> EvalResult<()> {
        let mut guard = LoopGuard::new(self.config.loop_limit);
        loop {
            let value = self.eval_expr(test)?;
            if !to_boolean(&value) {
                return Ok(());
            }
            guard.tick()?;
            if let LoopFlow::Exit = self.run_body(body)? {
                return Ok(());
            }
        }
    }

    fn exec_do_while(&mut self, body: StmtId, test: ExprId) -> EvalResult<()> {
        let mut guard = LoopGuard::new(self.config.loop_limit);
        loop {
            guard.tick()?;
            if let LoopFlow::Exit = self.run_body(body)? {
                return Ok(());
            }
            let value = self.eval_expr(test)?;
            if !to_boolean(&value) {
                return Ok(());
            }
        }
    }

    /// `for (init; test; update) body`. Header bindings get a fresh copy for
    /// every iteration, so closures created in the body keep the value of
    /// their own iteration.
    fn exec_for(
        &mut self,
        init: Option<StmtId>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
        per_iteration: &[u32],
    ) -> EvalResult<()> {
        for slot in per_iteration {
            self.activation.reset(*slot);
        }
        if let Some(init) = init {
            self.exec_stmt(init)?;
        }
        let mut guard = LoopGuard::new(self.config.loop_limit);
        loop {
            if let Some(test) = test {
                let value = self.eval_expr(test)?;
                if !to_boolean(&value) {
                    return Ok(());
                }
            }
            guard.tick()?;
            if let LoopFlow::Exit = self.run_body(body)? {
                return Ok(());
            }
            for slot in per_iteration {
                self.activation.renew(*slot);
            }
            if let Some(update) = update {
                self.eval_expr(update)?;
            }
        }
    }

    /// Elements are read by index on every iteration, so pushing inside the
    /// body extends the loop.
    fn exec_for_of(
        &mut self,
        binding: &ForBinding,
        fresh_slots: &[u32],
        iterable: &Value,
        body: StmtId,
    ) -> EvalResult<()> {
        let mut guard = LoopGuard::new(self.config.loop_limit);
        match iterable {
            Value::Array(items) => {
                let mut index = 0;
                loop {
                    let Some(item) = items.borrow().get(index).cloned() else {
                        return Ok(());
                    };
                    guard.tick()?;
                    self.bind_loop_variable(binding, fresh_slots, item)?;
                    if let LoopFlow::Exit = self.run_body(body)? {
                        return Ok(());
                    }
                    index += 1;
                }
            }
            Value::String(s) => {
                for c in s.chars() {
                    guard.tick()?;
                    self.bind_loop_variable(binding, fresh_slots, Value::from(c.to_string()))?;
                    if let LoopFlow::Exit = self.run_body(body)? {
                        break;
                    }
                }
                Ok(())
            }
            other => Err(not_iterable(other.type_name()).into()),
        }
    }

    fn bind_loop_variable(
        &mut self,
        binding: &ForBinding,
        fresh_slots: &[u32],
        value: Value,
    ) -> EvalResult<()> {
        for slot in fresh_slots {
            self.activation.reset(*slot);
        }
        match binding {
            ForBinding::Declaration(pattern) => self.bind_pattern(pattern, value),
            ForBinding::Target(target) => {
                let place = self.place(*target)?;
                self.write_place(&place, value)?;
                Ok(())
            }
        }
    }

    fn exec_switch(
        &mut self,
        discriminant: ExprId,
        cases: &[SwitchCase],
        scope: &BlockScope,
    ) -> EvalResult<()> {
        let value = self.eval_expr(discriminant)?;
        self.enter_scope(scope);

        let mut start = None;
        for (i, case) in cases.iter().enumerate() {
            if let Some(test) = case.test {
                let candidate = self.eval_expr(test)?;
                if strict_equals(&value, &candidate) {
                    start = Some(i);
                    break;
                }
            }
        }
        let start = start.or_else(|| cases.iter().position(|case| case.test.is_none()));
        let Some(start) = start else {
            return Ok(());
        };
        for case in &cases[start..] {
            match self.exec_list(&case.body) {
                Ok(()) => {}
                Err(ControlAction::Break) => return Ok(()),
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    /// `finally` runs on every exit except a fatal error. A completion of
    /// the `finally` block itself replaces the pending one.
    fn exec_try(
        &mut self,
        block: StmtId,
        handler: Option<&CatchClause>,
        finalizer: Option<StmtId>,
    ) -> EvalResult<()> {
        let mut result = self.exec_stmt(block);
        if let Some(handler) = handler {
            result = match result {
                Err(ControlAction::Error(err)) if err.is_catchable() => {
                    trace!(error = %err, "caught");
                    self.exec_catch(handler, err.into_catch_value())
                }
                other => other,
            };
        }
        if let Some(finalizer) = finalizer {
            let fatal = matches!(&result, Err(ControlAction::Error(err)) if !err.is_catchable());
            if !fatal {
                self.exec_stmt(finalizer)?;
            }
        }
        result
    }

    fn exec_catch(&mut self, handler: &CatchClause, value: Value) -> EvalResult<()> {
        if let Some(param) = handler.param {
            self.reset_var(param);
            self.init_var(param, value);
        }
        self.exec_stmt(handler.body)
    }
}

/// Keys visited by `for-in`: object keys in insertion order, or the
/// indices of an array or string. Other values have none.
fn enumerable_keys(value: &Value) -> Vec<Value> {
    match value {
        Value::Object(map) => map
            .borrow()
            .keys()
            .map(|key| Value::String(Rc::clone(key)))
            .collect(),
        Value::Array(items) => (0..items.borrow().len()).map(Value::from).collect(),
        Value::String(s) => (0..s.chars().count()).map(Value::from).collect(),
        _ => Vec::new(),
    }
}
