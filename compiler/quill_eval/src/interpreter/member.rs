//! Property access and assignment targets.

use std::rc::Rc;

use quill_ir::{ExprId, ExprKind, Number, VarId};

use super::Interpreter;
use crate::coerce::{to_array_index, to_integer, to_property_key};
use crate::errors::{
    invalid_array_index, property_of_nullish, range_error, read_only_property,
    set_property_of_nullish, EvalError, EvalResult,
};
use crate::methods::ReceiverKind;
use crate::Value;

/// A resolved assignment target. The base and key of a member target are
/// evaluated once, so compound assignment and `++` read and write the same
/// property.
pub(crate) enum Place {
    Variable(VarId),
    Property { base: Value, key: Value },
}

impl Interpreter {
    pub(crate) fn place(&mut self, target: ExprId) -> EvalResult<Place> {
        let program = Rc::clone(&self.program);
        match &program.expr(target).kind {
            ExprKind::Ident(var) => Ok(Place::Variable(*var)),
            ExprKind::Member { object, property } => {
                let base = self.eval_expr(*object)?;
                let key = self.member_key(property)?;
                Ok(Place::Property { base, key })
            }
            // The parser only produces identifier and member targets.
            _ => Err(crate::errors::syntax_error("Invalid assignment target").into()),
        }
    }

    pub(crate) fn read_place(&self, place: &Place) -> Result<Value, EvalError> {
        match place {
            Place::Variable(var) => self.read_var(*var),
            Place::Property { base, key } => self.get_property(base, key),
        }
    }

    pub(crate) fn write_place(&mut self, place: &Place, value: Value) -> Result<(), EvalError> {
        match place {
            Place::Variable(var) => self.write_var(*var, value),
            Place::Property { base, key } => self.set_property(base, key, value),
        }
    }

    /// `base[key]`.
    ///
    /// Own data comes first: object entries, array elements, string
    /// characters and the built-in `length`. Anything else is looked up in
    /// the method table for the base's kind and comes back bound to `base`.
    /// Missing properties read as `undefined`.
    pub fn get_property(&self, base: &Value, key: &Value) -> Result<Value, EvalError> {
        let name = to_property_key(key);
        let own = match base {
            Value::Undefined | Value::Null => {
                return Err(property_of_nullish(&name, base.type_name()));
            }
            Value::Object(map) => {
                let map = map.borrow();
                match map.get(&name) {
                    Some(Value::Function(f)) => Some(Value::Function(f.with_receiver(base.clone()))),
                    Some(value) => Some(value.clone()),
                    None if &*name == "length" => Some(Value::from(map.len())),
                    None => None,
                }
            }
            Value::Array(items) => {
                let items = items.borrow();
                if let Some(index) = to_array_index(key) {
                    return Ok(items.get(index).cloned().unwrap_or_default());
                }
                (&*name == "length").then(|| Value::from(items.len()))
            }
            Value::String(s) => {
                if let Some(index) = to_array_index(key) {
                    return Ok(s
                        .chars()
                        .nth(index)
                        .map(|c| Value::from(c.to_string()))
                        .unwrap_or_default());
                }
                (&*name == "length").then(|| Value::from(s.chars().count()))
            }
            Value::Function(f) => match &*name {
                "length" => Some(Value::from(f.length())),
                "name" => Some(Value::String(f.name())),
                _ => None,
            },
            Value::Bool(_) | Value::Number(_) => None,
        };
        if let Some(value) = own {
            return Ok(value);
        }
        Ok(ReceiverKind::of(base)
            .and_then(|kind| self.methods.lookup(kind, &name))
            .map(|method| Value::Function(method.with_receiver(base.clone())))
            .unwrap_or_default())
    }

    /// `base[key] = value`.
    ///
    /// Array writes grow the array, filling the gap with `undefined`, but
    /// never past the loop limit. Writing `length` truncates or extends.
    pub fn set_property(&self, base: &Value, key: &Value, value: Value) -> Result<(), EvalError> {
        match base {
            Value::Undefined | Value::Null => Err(set_property_of_nullish(
                &to_property_key(key),
                base.type_name(),
            )),
            Value::Object(map) => {
                map.borrow_mut().insert(to_property_key(key), value);
                Ok(())
            }
            Value::Array(items) => {
                if let Some(index) = to_array_index(key) {
                    if index > self.config.loop_limit {
                        return Err(invalid_array_index(&to_property_key(key)));
                    }
                    let mut items = items.borrow_mut();
                    if index >= items.len() {
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = value;
                    return Ok(());
                }
                if key.as_str() == Some("length") {
                    let length = array_length(&value, self.config.loop_limit)?;
                    items.borrow_mut().resize(length, Value::Undefined);
                    return Ok(());
                }
                Err(invalid_array_index(&to_property_key(key)))
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Function(_) => Err(
                read_only_property(&to_property_key(key), base.type_name()),
            ),
        }
    }
}

/// New array length assigned through `length`.
fn array_length(value: &Value, limit: usize) -> Result<usize, EvalError> {
    let length = match value {
        Value::Number(Number::Double(v)) if v.fract() != 0.0 || v.is_nan() => -1,
        other => to_integer(other),
    };
    match usize::try_from(length) {
        Ok(length) if length <= limit => Ok(length),
        _ => Err(range_error("Invalid array length")),
    }
}
