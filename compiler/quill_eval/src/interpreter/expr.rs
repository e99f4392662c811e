//! Expression evaluation.

use std::rc::Rc;

use quill_ir::{
    ArrayElement, BinaryOp, ExprId, ExprKind, Literal, LogicalOp, MemberKey, Number, Property,
    UnaryOp, UpdateOp,
};
use quill_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use super::Interpreter;
use crate::coerce::{to_boolean, to_number, to_property_key, to_string};
use crate::errors::{not_iterable, ControlAction, EvalError, EvalResult};
use crate::operators::{arithmetic, binary, negate};
use crate::value::ObjectMap;
use crate::Value;

/// Call arguments; most calls pass only a few.
pub(crate) type Args = SmallVec<[Value; 4]>;

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(id))
    }

    fn eval_expr_inner(&mut self, id: ExprId) -> EvalResult {
        let program = Rc::clone(&self.program);
        let expr = program.expr(id);
        let result = match &expr.kind {
            ExprKind::Literal(literal) => Ok(literal_value(literal)),
            ExprKind::Ident(var) => self.read_var(*var).map_err(ControlAction::from),
            ExprKind::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                self.eval_elements(elements, &mut items)?;
                Ok(Value::array(items))
            }
            ExprKind::Object(properties) => self.eval_object(properties),
            ExprKind::Function(func) => Ok(Value::Function(self.make_closure(*func))),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, *operand),
            ExprKind::Update { op, prefix, target } => self.eval_update(*op, *prefix, *target),
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(*left)?;
                let right = self.eval_expr(*right)?;
                Ok(binary(*op, &left, &right))
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval_expr(*left)?;
                let keep_left = match op {
                    LogicalOp::And => !to_boolean(&left),
                    LogicalOp::Or => to_boolean(&left),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if keep_left {
                    Ok(left)
                } else {
                    self.eval_expr(*right)
                }
            }
            ExprKind::Concat(parts) => {
                let mut text = String::new();
                for part in parts {
                    let value = self.eval_expr(*part)?;
                    text.push_str(&to_string(&value));
                }
                Ok(Value::from(text))
            }
            ExprKind::Assign { op, target, value } => self.eval_assign(*op, *target, *value),
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let test = self.eval_expr(*test)?;
                if to_boolean(&test) {
                    self.eval_expr(*consequent)
                } else {
                    self.eval_expr(*alternate)
                }
            }
            ExprKind::Member { object, property } => {
                let base = self.eval_expr(*object)?;
                let key = self.member_key(property)?;
                self.get_property(&base, &key).map_err(ControlAction::from)
            }
            ExprKind::OptionalGuard(operand) => {
                let value = self.eval_expr(*operand)?;
                if value.is_nullish() {
                    Err(ControlAction::ShortCircuit)
                } else {
                    Ok(value)
                }
            }
            ExprKind::OptionalChain(chain) => match self.eval_expr(*chain) {
                Err(ControlAction::ShortCircuit) => Ok(Value::Undefined),
                other => other,
            },
            ExprKind::Call { callee, args } => self.eval_call(*callee, args),
        };
        result.map_err(|action| action.at(expr.position))
    }

    pub(crate) fn member_key(&mut self, key: &MemberKey) -> EvalResult {
        match key {
            MemberKey::Static(name) => Ok(Value::String(Rc::clone(name))),
            MemberKey::Computed(expr) => self.eval_expr(*expr),
        }
    }

    /// Evaluate literal elements or call arguments, expanding spreads.
    fn eval_elements<E>(&mut self, elements: &[ArrayElement], out: &mut E) -> EvalResult<()>
    where
        E: Extend<Value>,
    {
        for element in elements {
            match element {
                ArrayElement::Expr(expr) => {
                    let value = self.eval_expr(*expr)?;
                    out.extend(std::iter::once(value));
                }
                ArrayElement::Spread(expr) => {
                    let value = self.eval_expr(*expr)?;
                    out.extend(spread_items(&value)?);
                }
                ArrayElement::Hole => out.extend(std::iter::once(Value::Undefined)),
            }
        }
        Ok(())
    }

    fn eval_object(&mut self, properties: &[Property]) -> EvalResult {
        let mut map = ObjectMap::with_capacity(properties.len());
        for property in properties {
            match property {
                Property::Init { key, value } => {
                    let key = match key {
                        MemberKey::Static(name) => Rc::clone(name),
                        MemberKey::Computed(expr) => to_property_key(&self.eval_expr(*expr)?),
                    };
                    let value = self.eval_expr(*value)?;
                    map.insert(key, value);
                }
                Property::Spread(expr) => {
                    let source = self.eval_expr(*expr)?;
                    spread_properties(&mut map, &source);
                }
            }
        }
        Ok(Value::object(map))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: ExprId) -> EvalResult {
        if op == UnaryOp::Typeof {
            if let ExprKind::Ident(var) = self.program.expr(operand).kind {
                if self.is_unresolved_global(var) {
                    return Ok(Value::from("undefined"));
                }
            }
        }
        let value = self.eval_expr(operand)?;
        Ok(match op {
            UnaryOp::Neg => Value::Number(negate(to_number(&value))),
            UnaryOp::Plus => Value::Number(to_number(&value)),
            UnaryOp::Not => Value::Bool(!to_boolean(&value)),
            UnaryOp::Typeof => Value::from(value.type_name()),
        })
    }

    fn eval_update(&mut self, op: UpdateOp, prefix: bool, target: ExprId) -> EvalResult {
        let place = self.place(target)?;
        let old = to_number(&self.read_place(&place)?);
        let delta = match op {
            UpdateOp::Increment => Number::Int(1),
            UpdateOp::Decrement => Number::Int(-1),
        };
        let new = arithmetic(BinaryOp::Add, old, delta);
        self.write_place(&place, Value::Number(new))?;
        Ok(Value::Number(if prefix { new } else { old }))
    }

    fn eval_assign(&mut self, op: Option<BinaryOp>, target: ExprId, value: ExprId) -> EvalResult {
        let place = self.place(target)?;
        let value = match op {
            None => self.eval_expr(value)?,
            Some(op) => {
                let old = self.read_place(&place)?;
                let rhs = self.eval_expr(value)?;
                binary(op, &old, &rhs)
            }
        };
        self.write_place(&place, value.clone())?;
        Ok(value)
    }

    fn eval_call(&mut self, callee: ExprId, args: &[ArrayElement]) -> EvalResult {
        let (function, this) = self.eval_callee(callee)?;
        let mut values = Args::new();
        self.eval_elements(args, &mut values)?;
        self.call_function(&function, this, &values)
    }

    /// The function to call and the receiver a member call passes.
    fn eval_callee(&mut self, callee: ExprId) -> EvalResult<(Value, Value)> {
        let program = Rc::clone(&self.program);
        match &program.expr(callee).kind {
            ExprKind::Member { object, property } => {
                let base = self.eval_expr(*object)?;
                let key = self.member_key(property)?;
                let function = self.get_property(&base, &key)?;
                Ok((function, base))
            }
            // `o.m?.()`
            ExprKind::OptionalGuard(inner) => {
                let (function, this) = self.eval_callee(*inner)?;
                if function.is_nullish() {
                    return Err(ControlAction::ShortCircuit);
                }
                Ok((function, this))
            }
            _ => Ok((self.eval_expr(callee)?, Value::Undefined)),
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Undefined => Value::Undefined,
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(Rc::clone(s)),
    }
}

/// Elements produced by `...value`.
pub(crate) fn spread_items(value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::Array(items) => Ok(items.borrow().clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::from(c.to_string())).collect()),
        other => Err(not_iterable(other.type_name())),
    }
}

/// Copy the properties of `source` into an object literal under
/// construction. Primitives other than strings contribute nothing.
fn spread_properties(map: &mut ObjectMap, source: &Value) {
    match source {
        Value::Object(source) => {
            for (key, value) in source.borrow().iter() {
                map.insert(Rc::clone(key), value.clone());
            }
        }
        Value::Array(items) => {
            for (i, item) in items.borrow().iter().enumerate() {
                map.insert(i.to_string(), item.clone());
            }
        }
        Value::String(s) => {
            for (i, c) in s.chars().enumerate() {
                map.insert(i.to_string(), Value::from(c.to_string()));
            }
        }
        _ => {}
    }
}
