//! Binary operators.
//!
//! Arithmetic promotes both operands to the narrowest common tier: `int32`
//! when both are `int32`, `int64` when neither is a double, `float64`
//! otherwise. Integer results that overflow move up a tier instead of
//! wrapping. Integer division and modulo by zero give `NaN`.

use quill_ir::{BinaryOp, Number};

use crate::coerce::{is_numeric, to_number, to_string};
use crate::Value;

/// Apply a non-short-circuiting binary operator.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Pow => {
            Value::Number(arithmetic(op, to_number(left), to_number(right)))
        }
        BinaryOp::Eq => Value::Bool(loose_equals(left, right)),
        BinaryOp::NotEq => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNotEq => Value::Bool(!strict_equals(left, right)),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            Value::Bool(compare(op, left, right))
        }
    }
}

/// `+`: numeric when both operands are numeric, concatenation otherwise.
pub fn add(left: &Value, right: &Value) -> Value {
    if is_numeric(left) && is_numeric(right) {
        return Value::Number(arithmetic(BinaryOp::Add, to_number(left), to_number(right)));
    }
    let left = to_string(left);
    let right = to_string(right);
    let mut text = String::with_capacity(left.len() + right.len());
    text.push_str(&left);
    text.push_str(&right);
    Value::from(text)
}

/// Arithmetic on two numbers.
pub fn arithmetic(op: BinaryOp, left: Number, right: Number) -> Number {
    if op == BinaryOp::Pow {
        return Number::Double(left.as_f64().powf(right.as_f64()));
    }
    if left.is_double() || right.is_double() {
        return Number::Double(float_op(op, left.as_f64(), right.as_f64()));
    }
    integer_op(op, left.as_i64(), right.as_i64())
}

fn integer_op(op: BinaryOp, a: i64, b: i64) -> Number {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Number::NAN;
            }
            match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                _ => return Number::Double(a as f64 / b as f64),
            }
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Number::NAN;
            }
            a.checked_rem(b)
        }
        _ => None,
    };
    match result {
        Some(v) => Number::from_i64(v),
        None => Number::Double(float_op(op, a as f64, b as f64)),
    }
}

fn float_op(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        BinaryOp::Pow => a.powf(b),
        _ => f64::NAN,
    }
}

fn compare_numbers(op: BinaryOp, a: Number, b: Number) -> bool {
    if a.is_double() || b.is_double() {
        let (a, b) = (a.as_f64(), b.as_f64());
        return match op {
            BinaryOp::Lt => a < b,
            BinaryOp::LtEq => a <= b,
            BinaryOp::Gt => a > b,
            _ => a >= b,
        };
    }
    let (a, b) = (a.as_i64(), b.as_i64());
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}

/// Relational operators: numeric when both sides are numeric, otherwise a
/// comparison of the string forms.
pub fn compare(op: BinaryOp, left: &Value, right: &Value) -> bool {
    if is_numeric(left) && is_numeric(right) {
        return compare_numbers(op, to_number(left), to_number(right));
    }
    let (a, b) = (to_string(left), to_string(right));
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}

/// `==`.
///
/// `undefined` counts as `null`. If either side is numeric both compare as
/// numbers; arrays, objects and functions equal only themselves; anything
/// else compares as text.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    if left.is_nullish() && right.is_nullish() {
        return true;
    }
    if same_reference(left, right) {
        return true;
    }
    if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
        return a == b;
    }
    if is_numeric(left) || is_numeric(right) {
        return to_number(left) == to_number(right);
    }
    if is_reference(left) || is_reference(right) {
        return false;
    }
    to_string(left) == to_string(right)
}

/// `===`. Numbers compare by magnitude across tiers, containers and
/// functions by identity.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => same_reference(left, right),
    }
}

/// `===` except that `NaN` equals itself; used by `includes`.
pub fn same_value_zero(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
        _ => strict_equals(left, right),
    }
}

fn same_reference(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
        (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
        (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
        _ => false,
    }
}

fn is_reference(value: &Value) -> bool {
    matches!(
        value,
        Value::Array(_) | Value::Object(_) | Value::Function(_)
    )
}

/// Numeric negation, staying in the integer tiers where possible.
pub fn negate(n: Number) -> Number {
    match n {
        Number::Int(v) => v.checked_neg().map_or(Number::Long(-i64::from(v)), Number::Int),
        Number::Long(v) => v
            .checked_neg()
            .map_or(Number::Double(-(v as f64)), Number::from_i64),
        Number::Double(v) => Number::Double(-v),
    }
}

#[cfg(test)]
mod tests;
