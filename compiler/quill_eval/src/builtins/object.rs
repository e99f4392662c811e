//! Object, number, boolean and function methods.

use quill_ir::Number;

use super::globals::has_own;
use super::{arg, method};
use crate::coerce::{to_integer, to_number, to_string};
use crate::errors::{range_error, type_error, EvalResult};
use crate::methods::ReceiverKind;
use crate::value::FunctionValue;
use crate::{Interpreter, Value};

pub(super) fn install(interp: &mut Interpreter) {
    method(interp, ReceiverKind::Object, "hasOwnProperty(prop)", |_, this, args| {
        Ok(Value::Bool(has_own(this, &arg(args, 0))))
    });
    method(interp, ReceiverKind::Object, "toString()", |_, this, _| {
        Ok(Value::String(to_string(this)))
    });
    method(interp, ReceiverKind::Boolean, "toString()", |_, this, _| {
        Ok(Value::String(to_string(this)))
    });

    method(interp, ReceiverKind::Number, "toFixed(digits)", |_, this, args| {
        let digits = to_integer(&arg(args, 0));
        let Ok(digits @ 0..=100) = usize::try_from(digits) else {
            return Err(range_error("toFixed() digits argument must be between 0 and 100").into());
        };
        let value = to_number(this).as_f64();
        if !value.is_finite() {
            return Ok(Value::String(to_string(this)));
        }
        Ok(Value::from(format!("{value:.digits$}")))
    });
    method(interp, ReceiverKind::Number, "toString(radix)", |_, this, args| {
        let radix = match arg(args, 0) {
            Value::Undefined => 10,
            radix => to_integer(&radix),
        };
        let Ok(radix @ 2..=36) = u32::try_from(radix) else {
            return Err(range_error("toString() radix must be between 2 and 36").into());
        };
        let n = to_number(this);
        if radix == 10 {
            return Ok(Value::from(n.to_string()));
        }
        Ok(Value::from(format_radix(n, radix)))
    });

    method(interp, ReceiverKind::Function, "call(thisArg)", |interp, this, args| {
        let rest = args.get(1..).unwrap_or_default();
        interp.call_function(this, arg(args, 0), rest)
    });
    method(interp, ReceiverKind::Function, "apply(thisArg,argsArray)", |interp, this, args| {
        let list = match arg(args, 1) {
            Value::Undefined | Value::Null => Vec::new(),
            Value::Array(items) => items.borrow().clone(),
            _ => {
                return Err(type_error("CreateListFromArrayLike called on non-object").into());
            }
        };
        interp.call_function(this, arg(args, 0), &list)
    });
    method(interp, ReceiverKind::Function, "bind(thisArg)", |_, this, args| {
        bind(this, args)
    });
}

fn bind(this: &Value, args: &[Value]) -> EvalResult {
    let Value::Function(target) = this else {
        return Err(type_error("Bind must be called on a function").into());
    };
    let bound_args = args.get(1..).unwrap_or_default().to_vec();
    Ok(Value::Function(FunctionValue::bound(
        target.clone(),
        arg(args, 0),
        bound_args,
    )))
}

/// Digits of `n` in `radix`. Fractions get at most 20 digits.
fn format_radix(n: Number, radix: u32) -> String {
    let value = n.as_f64();
    if !value.is_finite() {
        return n.to_string();
    }
    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    let magnitude = value.abs();
    let mut integer = magnitude.trunc();
    let mut digits = Vec::new();
    loop {
        let digit = (integer % f64::from(radix)) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        integer = (integer / f64::from(radix)).trunc();
        if integer < 1.0 {
            break;
        }
    }
    out.extend(digits.iter().rev());

    let mut fraction = magnitude.fract();
    if fraction > 0.0 {
        out.push('.');
        for _ in 0..20 {
            fraction *= f64::from(radix);
            let digit = fraction.trunc() as u32;
            out.push(std::char::from_digit(digit, radix).unwrap_or('0'));
            fraction = fraction.fract();
            if fraction == 0.0 {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn radix_formatting() {
        assert_eq!(format_radix(Number::Int(255), 16), "ff");
        assert_eq!(format_radix(Number::Int(-5), 2), "-101");
        assert_eq!(format_radix(Number::Int(0), 8), "0");
        assert_eq!(format_radix(Number::Double(0.5), 2), "0.1");
    }
}
