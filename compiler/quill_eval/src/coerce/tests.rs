use pretty_assertions::assert_eq;

use super::*;
use crate::value::ObjectMap;

#[test]
fn truthiness() {
    let falsy = [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::from(0),
        Value::from(f64::NAN),
        Value::from(""),
        Value::array(Vec::new()),
        Value::object(ObjectMap::new()),
    ];
    for value in &falsy {
        assert!(!to_boolean(value), "{value:?} should be falsy");
    }
    assert!(to_boolean(&Value::from("0")));
    assert!(to_boolean(&Value::from(-1)));
    assert!(to_boolean(&Value::array(vec![Value::Null])));
}

#[test]
fn numbers_from_values() {
    assert_eq!(to_number(&Value::Null), Number::ZERO);
    assert_eq!(to_number(&Value::Undefined), Number::ZERO);
    assert_eq!(to_number(&Value::Bool(true)), Number::Int(1));
    assert_eq!(to_number(&Value::from(" 42 ")), Number::Int(42));
    assert_eq!(to_number(&Value::from("1.5")), Number::Double(1.5));
    assert!(to_number(&Value::from("abc")).is_nan());
    assert!(to_number(&Value::array(Vec::new())).is_nan());
}

#[test]
fn integers_truncate_and_zero_nan() {
    assert_eq!(to_integer(&Value::from(2.9)), 2);
    assert_eq!(to_integer(&Value::from(-2.9)), -2);
    assert_eq!(to_integer(&Value::from(f64::NAN)), 0);
    assert_eq!(to_integer(&Value::from("7")), 7);
}

#[test]
fn strings_from_values() {
    assert_eq!(&*to_string(&Value::from(1.0)), "1");
    assert_eq!(&*to_string(&Value::Null), "null");
    assert_eq!(&*to_string(&Value::Bool(false)), "false");
    assert_eq!(
        &*to_string(&Value::array(vec![Value::from(1), Value::from("a")])),
        "1,a"
    );
}

#[test]
fn array_indices() {
    assert_eq!(to_array_index(&Value::from(3)), Some(3));
    assert_eq!(to_array_index(&Value::from("12")), Some(12));
    assert_eq!(to_array_index(&Value::from(1.5)), None);
    assert_eq!(to_array_index(&Value::from(-1)), None);
    assert_eq!(to_array_index(&Value::from("")), None);
    assert_eq!(to_array_index(&Value::from("1a")), None);
}
