use pretty_assertions::assert_eq;

use super::*;

fn activation(slots: usize) -> Activation {
    Activation::new(slots, Rc::from(Vec::new()))
}

#[test]
fn slots_start_uninitialized() {
    let mut frame = activation(2);
    assert!(!frame.is_initialized(0));
    assert_eq!(frame.get(0), None);
    frame.set(0, Value::from(1));
    assert_eq!(frame.get(0), Some(Value::from(1)));
    assert!(!frame.is_initialized(1));
}

#[test]
fn captured_slot_writes_through_cell() {
    let mut frame = activation(1);
    frame.set(0, Value::from(1));
    let cell = frame.capture(0);
    frame.set(0, Value::from(2));
    assert_eq!(cell.get(), Some(Value::from(2)));
    cell.set(Value::from(3));
    assert_eq!(frame.get(0), Some(Value::from(3)));
    assert!(frame.capture(0).ptr_eq(&cell));
}

#[test]
fn capture_before_initialization() {
    let mut frame = activation(1);
    let cell = frame.capture(0);
    assert!(!cell.is_initialized());
    frame.set(0, Value::from("late"));
    assert_eq!(cell.get(), Some(Value::from("late")));
}

#[test]
fn renew_detaches_old_closures() {
    let mut frame = activation(1);
    frame.set(0, Value::from(0));
    let first = frame.capture(0);
    frame.renew(0);
    frame.set(0, Value::from(1));
    assert_eq!(first.get(), Some(Value::from(0)));
    assert_eq!(frame.get(0), Some(Value::from(1)));
}

#[test]
fn reset_starts_a_new_binding() {
    let mut frame = activation(1);
    frame.set(0, Value::from(1));
    let cell = frame.capture(0);
    frame.reset(0);
    assert!(!frame.is_initialized(0));
    assert_eq!(cell.get(), Some(Value::from(1)));
}

#[test]
fn globals_upsert_writes_except_constants() {
    let mut globals = GlobalScope::new();
    globals.define("x", Value::from(1));
    globals.define_constant("PI", Value::from(2.5));
    assert!(globals.assign("x", Value::from(2)).is_ok());
    assert_eq!(globals.get("x"), Some(Value::from(2)));

    assert!(!globals.contains("y"));
    assert!(globals.assign("y", Value::from(1)).is_ok());
    assert_eq!(globals.get("y"), Some(Value::from(1)));
    let err = globals.assign("PI", Value::from(3)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "TypeError: Assignment to constant variable 'PI'"
    );
}

#[test]
fn global_object_is_live() {
    let mut globals = GlobalScope::new();
    let object = globals.as_value();
    globals.define("answer", Value::from(42));
    let Value::Object(map) = object else {
        panic!("global object is an object");
    };
    assert_eq!(map.borrow().get("answer"), Some(&Value::from(42)));
}
