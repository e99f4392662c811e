//! Coercions between value kinds.

use std::rc::Rc;

use quill_ir::Number;

use crate::Value;

/// Truthiness. Empty strings, arrays and objects are false, as are zero,
/// `NaN`, `null` and `undefined`.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(n.is_zero() || n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.borrow().is_empty(),
        Value::Object(map) => !map.borrow().is_empty(),
        Value::Function(_) => true,
    }
}

/// Numeric value. `null` and `undefined` are zero; strings parse into the
/// narrowest tier; containers and functions are `NaN`.
pub fn to_number(value: &Value) -> Number {
    match value {
        Value::Undefined | Value::Null => Number::ZERO,
        Value::Bool(b) => Number::Int(i32::from(*b)),
        Value::Number(n) => *n,
        Value::String(s) => Number::parse(s),
        Value::Array(_) | Value::Object(_) | Value::Function(_) => Number::NAN,
    }
}

/// Integer view used by index and count arguments. `NaN` is zero,
/// infinities saturate.
pub fn to_integer(value: &Value) -> i64 {
    match to_number(value) {
        Number::Double(v) if v.is_nan() => 0,
        Number::Double(v) => v.trunc() as i64,
        n => n.as_i64(),
    }
}

/// String conversion.
pub fn to_string(value: &Value) -> Rc<str> {
    match value {
        Value::String(s) => Rc::clone(s),
        other => other.to_string().into(),
    }
}

/// Key used to address an object property.
#[inline]
pub fn to_property_key(value: &Value) -> Rc<str> {
    to_string(value)
}

/// Whether arithmetic and comparison treat the value as a number rather than
/// as text.
#[inline]
pub fn is_numeric(value: &Value) -> bool {
    matches!(
        value,
        Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_)
    )
}

/// Array index named by a property key: a non-negative integral number or
/// the decimal text of one.
pub fn to_array_index(key: &Value) -> Option<usize> {
    match key {
        Value::Number(n) => n.as_index(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;
