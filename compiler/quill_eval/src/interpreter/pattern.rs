//! Destructuring.

use std::rc::Rc;

use quill_ir::{BindingPattern, ExprId, VarId};

use super::expr::spread_items;
use super::Interpreter;
use crate::errors::{type_error, EvalResult};
use crate::value::ObjectMap;
use crate::Value;

impl Interpreter {
    /// Initialize the bindings of `pattern` from `value`.
    pub(crate) fn bind_pattern(&mut self, pattern: &BindingPattern, value: Value) -> EvalResult<()> {
        match pattern {
            BindingPattern::Ident(var) => {
                self.init_var(*var, value);
                Ok(())
            }
            BindingPattern::Array { elements, rest } => {
                let items = spread_items(&value)?;
                for (i, element) in elements.iter().enumerate() {
                    let Some(element) = element else { continue };
                    let item = items.get(i).cloned().unwrap_or_default();
                    self.bind_element(element.binding, element.default, item)?;
                }
                if let Some(rest) = rest {
                    let tail = items.get(elements.len()..).unwrap_or_default().to_vec();
                    self.init_var(*rest, Value::array(tail));
                }
                Ok(())
            }
            BindingPattern::Object { properties, rest } => {
                if value.is_nullish() {
                    return Err(type_error(format!(
                        "Cannot destructure '{value}' as it is {}.",
                        value.type_name()
                    ))
                    .into());
                }
                for property in properties {
                    let key = Value::String(Rc::clone(&property.key));
                    let item = self.get_property(&value, &key)?;
                    self.bind_element(property.binding, property.default, item)?;
                }
                if let Some(rest) = rest {
                    let remaining = rest_properties(&value, |key| {
                        properties.iter().any(|p| *p.key == *key)
                    });
                    self.init_var(*rest, Value::object(remaining));
                }
                Ok(())
            }
        }
    }

    fn bind_element(&mut self, var: VarId, default: Option<ExprId>, value: Value) -> EvalResult<()> {
        let value = match (value, default) {
            (Value::Undefined, Some(default)) => self.eval_expr(default)?,
            (value, _) => value,
        };
        self.init_var(var, value);
        Ok(())
    }
}

/// Own properties of `value` whose keys `taken` rejects.
fn rest_properties(value: &Value, taken: impl Fn(&str) -> bool) -> ObjectMap {
    let mut map = ObjectMap::new();
    match value {
        Value::Object(source) => {
            for (key, item) in source.borrow().iter() {
                if !taken(key) {
                    map.insert(Rc::clone(key), item.clone());
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.borrow().iter().enumerate() {
                let key = i.to_string();
                if !taken(&key) {
                    map.insert(key, item.clone());
                }
            }
        }
        Value::String(s) => {
            for (i, c) in s.chars().enumerate() {
                let key = i.to_string();
                if !taken(&key) {
                    map.insert(key, Value::from(c.to_string()));
                }
            }
        }
        _ => {}
    }
    map
}
