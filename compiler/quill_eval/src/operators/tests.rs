use pretty_assertions::assert_eq;

use super::*;
use crate::value::ObjectMap;

fn num(value: Value) -> Number {
    match value {
        Value::Number(n) => n,
        other => panic!("expected a number, got {other:?}"),
    }
}

#[test]
fn addition_concatenates_unless_both_numeric() {
    assert_eq!(add(&Value::from(1), &Value::from(2)), Value::from(3));
    assert_eq!(add(&Value::from("a"), &Value::from(1)), Value::from("a1"));
    assert_eq!(add(&Value::from(1), &Value::from("2")), Value::from("12"));
    assert_eq!(add(&Value::Bool(true), &Value::Null), Value::from(1));
}

#[test]
fn int_overflow_promotes() {
    let sum = arithmetic(BinaryOp::Add, Number::Int(i32::MAX), Number::Int(1));
    assert_eq!(sum, Number::Long(i64::from(i32::MAX) + 1));
    assert!(matches!(sum, Number::Long(_)));

    let product = arithmetic(BinaryOp::Mul, Number::Long(i64::MAX), Number::Int(2));
    assert!(matches!(product, Number::Double(_)));
}

#[test]
fn division() {
    assert!(matches!(
        arithmetic(BinaryOp::Div, Number::Int(6), Number::Int(3)),
        Number::Int(2)
    ));
    assert_eq!(
        arithmetic(BinaryOp::Div, Number::Int(7), Number::Int(2)),
        Number::Double(3.5)
    );
    assert!(arithmetic(BinaryOp::Div, Number::Int(1), Number::Int(0)).is_nan());
    assert!(arithmetic(BinaryOp::Mod, Number::Int(1), Number::Int(0)).is_nan());
    assert_eq!(
        arithmetic(BinaryOp::Div, Number::Double(1.0), Number::Int(0)),
        Number::Double(f64::INFINITY)
    );
}

#[test]
fn exponent_is_double() {
    let power = arithmetic(BinaryOp::Pow, Number::Int(2), Number::Int(10));
    assert!(matches!(power, Number::Double(v) if v == 1024.0));
}

#[test]
fn negation_stays_integral() {
    assert!(matches!(negate(Number::Int(5)), Number::Int(-5)));
    assert!(matches!(negate(Number::Int(i32::MIN)), Number::Long(_)));
    assert_eq!(negate(Number::Double(0.5)), Number::Double(-0.5));
}

#[test]
fn loose_equality() {
    assert!(loose_equals(&Value::Null, &Value::Undefined));
    assert!(loose_equals(&Value::from("1"), &Value::from(1)));
    assert!(loose_equals(&Value::Bool(true), &Value::from(1)));
    assert!(loose_equals(&Value::from("5"), &Value::from(5.0)));
    assert!(!loose_equals(&Value::from("a"), &Value::from("b")));
    let a = Value::array(Vec::new());
    assert!(loose_equals(&a, &a.clone()));
    assert!(!loose_equals(&a, &Value::array(Vec::new())));
    assert!(!loose_equals(&Value::object(ObjectMap::new()), &Value::from("[object Object]")));
}

#[test]
fn strict_equality() {
    assert!(strict_equals(&Value::from(1), &Value::from(1.0)));
    assert!(!strict_equals(&Value::from(1), &Value::from("1")));
    assert!(!strict_equals(&Value::Null, &Value::Undefined));
    assert!(!strict_equals(&Value::from(f64::NAN), &Value::from(f64::NAN)));
    assert!(same_value_zero(&Value::from(f64::NAN), &Value::from(f64::NAN)));
}

#[test]
fn comparison() {
    assert!(compare(BinaryOp::Lt, &Value::from(2), &Value::from(10)));
    assert!(!compare(BinaryOp::Lt, &Value::from("2"), &Value::from("10")));
    assert!(compare(BinaryOp::GtEq, &Value::from(3), &Value::from(3.0)));
    assert!(!compare(BinaryOp::Lt, &Value::from(f64::NAN), &Value::from(1)));
    assert_eq!(num(binary(BinaryOp::Sub, &Value::from("5"), &Value::from(2))), Number::Int(3));
}
