//! Global functions and the `Math`, `Object`, `Array` and `console`
//! namespaces.

use std::cell::Cell;
use std::hash::{BuildHasher, Hasher};
use std::rc::Rc;

use quill_ir::{BinaryOp, Number};

use super::{arg, callback, Namespace};
use crate::coerce::{to_boolean, to_number, to_property_key, to_string};
use crate::errors::type_error;
use crate::operators::arithmetic;
use crate::value::ObjectMap;
use crate::{Interpreter, Value};

pub(super) fn install(interp: &mut Interpreter) {
    interp.define_native("parseInt(string,radix)", |_, _, args| {
        let radix = match arg(args, 1) {
            Value::Undefined => None,
            radix => Some(crate::coerce::to_integer(&radix)),
        };
        Ok(Value::Number(parse_int(&to_string(&arg(args, 0)), radix)))
    });
    interp.define_native("parseFloat(string)", |_, _, args| {
        Ok(Value::Number(parse_float(&to_string(&arg(args, 0)))))
    });
    interp.define_native("isNaN(value)", |_, _, args| {
        Ok(Value::Bool(to_number(&arg(args, 0)).is_nan()))
    });
    interp.define_native("isFinite(value)", |_, _, args| {
        Ok(Value::Bool(to_number(&arg(args, 0)).as_f64().is_finite()))
    });
    interp.define_native("Boolean(value)", |_, _, args| {
        Ok(Value::Bool(to_boolean(&arg(args, 0))))
    });
    interp.define_native("Number(value)", |_, _, args| {
        Ok(Value::Number(to_number(&arg(args, 0))))
    });
    interp.define_native("String(value)", |_, _, args| {
        Ok(Value::String(to_string(&arg(args, 0))))
    });
    interp.define_native("print()", |interp, _, args| {
        interp.println(&join_display(args));
        Ok(Value::Undefined)
    });

    Namespace::new()
        .function("log()", |interp, _, args| {
            interp.println(&join_display(args));
            Ok(Value::Undefined)
        })
        .define(interp, "console");

    Namespace::new()
        .function("isArray(value)", |_, _, args| {
            Ok(Value::Bool(matches!(arg(args, 0), Value::Array(_))))
        })
        .define(interp, "Array");

    install_object(interp);
    install_math(interp);
}

fn join_display(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn install_object(interp: &mut Interpreter) {
    Namespace::new()
        .function("keys(obj)", |_, _, args| {
            let keys = own_entries(&arg(args, 0))
                .into_iter()
                .map(|(key, _)| Value::String(key))
                .collect();
            Ok(Value::array(keys))
        })
        .function("values(obj)", |_, _, args| {
            let values = own_entries(&arg(args, 0))
                .into_iter()
                .map(|(_, value)| value)
                .collect();
            Ok(Value::array(values))
        })
        .function("entries(obj)", |_, _, args| {
            let entries = own_entries(&arg(args, 0))
                .into_iter()
                .map(|(key, value)| Value::array(vec![Value::String(key), value]))
                .collect();
            Ok(Value::array(entries))
        })
        .function("getOwnPropertyNames(obj)", |_, _, args| {
            let value = arg(args, 0);
            let mut names: Vec<Value> = own_entries(&value)
                .into_iter()
                .map(|(key, _)| Value::String(key))
                .collect();
            if matches!(value, Value::Array(_) | Value::String(_)) {
                names.push(Value::from("length"));
            }
            Ok(Value::array(names))
        })
        .function("assign(target,sources)", |_, _, args| {
            let target = arg(args, 0);
            let Value::Object(map) = &target else {
                return Err(type_error(format!(
                    "Cannot convert {} to object",
                    target.type_name()
                ))
                .into());
            };
            for source in args.iter().skip(1) {
                for (key, value) in own_entries(source) {
                    map.borrow_mut().insert(key, value);
                }
            }
            Ok(target)
        })
        .function("hasOwn(obj,prop)", |_, _, args| {
            Ok(Value::Bool(has_own(&arg(args, 0), &arg(args, 1))))
        })
        .function("fromEntries(entries)", |_, _, args| {
            let Value::Array(entries) = arg(args, 0) else {
                return Err(type_error("Object.fromEntries requires an array of entries").into());
            };
            let mut map = ObjectMap::new();
            for entry in entries.borrow().iter() {
                let Value::Array(pair) = entry else {
                    return Err(type_error(format!("Iterator value {entry} is not an entry object")).into());
                };
                let pair = pair.borrow();
                let key = to_property_key(pair.first().unwrap_or(&Value::Undefined));
                map.insert(key, pair.get(1).cloned().unwrap_or_default());
            }
            Ok(Value::object(map))
        })
        .function("groupBy(items,callbackFn)", |interp, _, args| {
            let f = callback(args, 1)?;
            let items = match arg(args, 0) {
                Value::Array(items) => items.borrow().clone(),
                other => return Err(type_error(format!("{} is not iterable", other.type_name())).into()),
            };
            let mut groups = ObjectMap::new();
            for (i, item) in items.into_iter().enumerate() {
                let key = interp.call_function(&f, Value::Undefined, &[item.clone(), Value::from(i)])?;
                let key = to_property_key(&key);
                match groups.get(&key) {
                    Some(Value::Array(group)) => group.borrow_mut().push(item),
                    _ => {
                        groups.insert(key, Value::array(vec![item]));
                    }
                }
            }
            Ok(Value::object(groups))
        })
        .define(interp, "Object");
}

/// Own enumerable properties: object entries, or the index/element pairs of
/// an array or string.
pub(super) fn own_entries(value: &Value) -> Vec<(Rc<str>, Value)> {
    match value {
        Value::Object(map) => map
            .borrow()
            .iter()
            .map(|(key, value)| (Rc::clone(key), value.clone()))
            .collect(),
        Value::Array(items) => items
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, item)| (Rc::from(i.to_string()), item.clone()))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (Rc::from(i.to_string()), Value::from(c.to_string())))
            .collect(),
        _ => Vec::new(),
    }
}

pub(super) fn has_own(value: &Value, key: &Value) -> bool {
    match value {
        Value::Object(map) => map.borrow().contains_key(&to_property_key(key)),
        Value::Array(items) => {
            crate::coerce::to_array_index(key).is_some_and(|i| i < items.borrow().len())
        }
        Value::String(s) => {
            crate::coerce::to_array_index(key).is_some_and(|i| i < s.chars().count())
        }
        _ => false,
    }
}

fn install_math(interp: &mut Interpreter) {
    let state = Cell::new(random_seed());
    Namespace::new()
        .constant("PI", Value::from(std::f64::consts::PI))
        .constant("E", Value::from(std::f64::consts::E))
        .function("abs(x)", |_, _, args| Ok(Value::Number(abs(to_number(&arg(args, 0))))))
        .function("floor(x)", |_, _, args| Ok(round_with(&arg(args, 0), f64::floor)))
        .function("ceil(x)", |_, _, args| Ok(round_with(&arg(args, 0), f64::ceil)))
        .function("round(x)", |_, _, args| {
            Ok(round_with(&arg(args, 0), |v| (v + 0.5).floor()))
        })
        .function("trunc(x)", |_, _, args| Ok(round_with(&arg(args, 0), f64::trunc)))
        .function("sign(x)", |_, _, args| {
            let n = to_number(&arg(args, 0));
            Ok(Value::Number(if n.is_nan() {
                Number::NAN
            } else if n.is_zero() {
                Number::ZERO
            } else if n.as_f64() < 0.0 {
                Number::Int(-1)
            } else {
                Number::Int(1)
            }))
        })
        .function("sqrt(x)", |_, _, args| {
            Ok(Value::from(to_number(&arg(args, 0)).as_f64().sqrt()))
        })
        .function("pow(x,y)", |_, _, args| {
            let base = to_number(&arg(args, 0));
            let exponent = to_number(&arg(args, 1));
            Ok(Value::Number(arithmetic(BinaryOp::Pow, base, exponent)))
        })
        .function("max(values)", |_, _, args| Ok(Value::Number(extreme(args, true))))
        .function("min(values)", |_, _, args| Ok(Value::Number(extreme(args, false))))
        .function("random()", move |_, _, _| {
            let (value, next) = xorshift(state.get());
            state.set(next);
            Ok(Value::from(value))
        })
        .define(interp, "Math");
}

fn abs(n: Number) -> Number {
    match n {
        Number::Int(v) => Number::from_i64(i64::from(v).abs()),
        Number::Long(v) => v
            .checked_abs()
            .map_or(Number::Double((v as f64).abs()), Number::from_i64),
        Number::Double(v) => Number::Double(v.abs()),
    }
}

/// Apply a rounding function; integers pass through and integral results
/// narrow back to an integer tier.
fn round_with(value: &Value, round: impl Fn(f64) -> f64) -> Value {
    match to_number(value) {
        Number::Double(v) => Value::Number(integral(round(v))),
        n => Value::Number(n),
    }
}

fn integral(v: f64) -> Number {
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    if v.is_finite() && v.abs() < LIMIT && !(v == 0.0 && v.is_sign_negative()) {
        Number::from_i64(v as i64)
    } else {
        Number::Double(v)
    }
}

/// `Math.max` / `Math.min`. `NaN` wins; no arguments give the identity
/// infinity.
fn extreme(args: &[Value], max: bool) -> Number {
    let mut best = Number::Double(if max { f64::NEG_INFINITY } else { f64::INFINITY });
    for value in args {
        let n = to_number(value);
        if n.is_nan() {
            return Number::NAN;
        }
        let better = if max {
            n.as_f64() > best.as_f64()
        } else {
            n.as_f64() < best.as_f64()
        };
        if better {
            best = n;
        }
    }
    best
}

/// `parseInt`: leading whitespace and sign, optional `0x` prefix when the
/// radix is 16 or absent, then as many digits as the radix allows.
fn parse_int(text: &str, radix: Option<i64>) -> Number {
    let s = text.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
    let (radix, digits) = match (radix, hex) {
        (None | Some(0 | 16), Some(rest)) => (16, rest),
        (None | Some(0), None) => (10, s),
        (Some(r @ 2..=36), _) => (r as u32, s),
        (Some(_), _) => return Number::NAN,
    };

    let mut exact: Option<i64> = Some(0);
    let mut approx = 0.0_f64;
    let mut any = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        any = true;
        exact = exact
            .and_then(|v| v.checked_mul(i64::from(radix)))
            .and_then(|v| v.checked_add(i64::from(d)));
        approx = approx * f64::from(radix) + f64::from(d);
    }
    if !any {
        return Number::NAN;
    }
    match exact {
        Some(v) => Number::from_i64(if negative { -v } else { v }),
        None => Number::Double(if negative { -approx } else { approx }),
    }
}

/// `parseFloat`: the longest decimal prefix after leading whitespace.
fn parse_float(text: &str) -> Number {
    let s = text.trim_start();
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if body.starts_with("Infinity") {
        return Number::Double(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    let bytes = s.as_bytes();
    let mut end = s.len() - body.len();
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start || &s[digits_start..end] == "." {
        return Number::NAN;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }
    let prefix = &s[..end];
    if prefix.contains(['.', 'e', 'E']) {
        prefix.parse::<f64>().map_or(Number::NAN, Number::Double)
    } else {
        Number::parse(prefix)
    }
}

fn random_seed() -> u64 {
    let mut hasher = std::collections::hash_map::RandomState::new().build_hasher();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64);
    hasher.write_u64(nanos);
    hasher.finish() | 1
}

/// One xorshift64* step: a value in `[0, 1)` and the next state.
fn xorshift(mut x: u64) -> (f64, u64) {
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    let out = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
    ((out >> 11) as f64 / (1_u64 << 53) as f64, x)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_int_prefixes() {
        assert_eq!(parse_int("42px", None), Number::Int(42));
        assert_eq!(parse_int("  -17", None), Number::Int(-17));
        assert_eq!(parse_int("0x1F", None), Number::Int(31));
        assert_eq!(parse_int("ff", Some(16)), Number::Int(255));
        assert_eq!(parse_int("101", Some(2)), Number::Int(5));
        assert!(parse_int("abc", None).is_nan());
        assert!(parse_int("1", Some(40)).is_nan());
    }

    #[test]
    fn parse_float_prefixes() {
        assert_eq!(parse_float("3.25abc"), Number::Double(3.25));
        assert_eq!(parse_float("12"), Number::Int(12));
        assert_eq!(parse_float("1e3x"), Number::Double(1000.0));
        assert_eq!(parse_float("-Infinity"), Number::Double(f64::NEG_INFINITY));
        assert!(parse_float(".").is_nan());
        assert!(parse_float("x1").is_nan());
    }

    #[test]
    fn rounding_narrows() {
        assert_eq!(round_with(&Value::from(2.5), f64::floor), Value::from(2));
        assert_eq!(round_with(&Value::from(-2.5), |v| (v + 0.5).floor()), Value::from(-2));
        assert_eq!(round_with(&Value::from(7), f64::ceil), Value::from(7));
    }

    #[test]
    fn random_stays_in_unit_interval() {
        let mut state = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..1000 {
            let (value, next) = xorshift(state);
            assert!((0.0..1.0).contains(&value));
            state = next;
        }
    }
}
