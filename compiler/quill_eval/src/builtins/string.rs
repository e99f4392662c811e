//! String methods. Positions and lengths count characters.

use std::rc::Rc;

use super::{arg, method, relative_index};
use crate::coerce::{to_integer, to_string};
use crate::errors::{range_error, EvalError, EvalResult};
use crate::methods::ReceiverKind;
use crate::{Interpreter, Value};

pub(super) fn install(interp: &mut Interpreter) {
    let kind = ReceiverKind::String;
    method(interp, kind, "charAt(index)", |_, this, args| {
        let chars = chars_of(this);
        let c = clamp_index(&arg(args, 0)).and_then(|i| chars.get(i));
        Ok(Value::from(c.map(char::to_string).unwrap_or_default()))
    });
    method(interp, kind, "at(index)", |_, this, args| {
        let chars = chars_of(this);
        let index = to_integer(&arg(args, 0));
        let resolved = if index < 0 { chars.len() as i64 + index } else { index };
        Ok(usize::try_from(resolved)
            .ok()
            .and_then(|i| chars.get(i))
            .map_or(Value::Undefined, |c| Value::from(c.to_string())))
    });
    method(interp, kind, "charCodeAt(index)", |_, this, args| {
        let chars = chars_of(this);
        Ok(clamp_index(&arg(args, 0))
            .and_then(|i| chars.get(i))
            .map_or(Value::from(f64::NAN), |c| Value::from(i64::from(u32::from(*c)))))
    });
    method(interp, kind, "concat(strings)", |_, this, args| {
        let mut text = to_string(this).to_string();
        for value in args {
            text.push_str(&to_string(value));
        }
        Ok(Value::from(text))
    });
    method(interp, kind, "endsWith(searchString,endPosition)", |_, this, args| {
        let chars = chars_of(this);
        let search = chars_of(&arg(args, 0));
        let end = clamp_to(&arg(args, 1), chars.len(), chars.len());
        Ok(Value::Bool(chars[..end].ends_with(&search)))
    });
    method(interp, kind, "startsWith(searchString,position)", |_, this, args| {
        let chars = chars_of(this);
        let search = chars_of(&arg(args, 0));
        let start = clamp_to(&arg(args, 1), chars.len(), 0);
        Ok(Value::Bool(chars[start..].starts_with(&search)))
    });
    method(interp, kind, "includes(searchString,position)", |_, this, args| {
        let chars = chars_of(this);
        let search = chars_of(&arg(args, 0));
        let from = clamp_to(&arg(args, 1), chars.len(), 0);
        Ok(Value::Bool(find_chars(&chars, &search, from).is_some()))
    });
    method(interp, kind, "indexOf(searchValue,fromIndex)", |_, this, args| {
        let chars = chars_of(this);
        let search = chars_of(&arg(args, 0));
        let from = clamp_to(&arg(args, 1), chars.len(), 0);
        Ok(position_value(find_chars(&chars, &search, from)))
    });
    method(interp, kind, "lastIndexOf(searchValue,fromIndex)", |_, this, args| {
        let chars = chars_of(this);
        let search = chars_of(&arg(args, 0));
        let from = clamp_to(&arg(args, 1), chars.len(), chars.len());
        Ok(position_value(rfind_chars(&chars, &search, from)))
    });
    method(interp, kind, "padStart(targetLength,padString)", |interp, this, args| {
        pad(interp, this, args, true)
    });
    method(interp, kind, "padEnd(targetLength,padString)", |interp, this, args| {
        pad(interp, this, args, false)
    });
    method(interp, kind, "repeat(count)", |interp, this, args| {
        let count = crate::coerce::to_number(&arg(args, 0));
        if count.as_f64() < 0.0 || count.as_f64().is_infinite() {
            return Err(range_error(format!("Invalid count value: {count}")).into());
        }
        let text = to_string(this);
        let count = usize::try_from(to_integer(&Value::Number(count))).unwrap_or(usize::MAX);
        let length = text.chars().count().checked_mul(count);
        check_length(interp, length.unwrap_or(usize::MAX))?;
        Ok(Value::from(text.repeat(count)))
    });
    method(interp, kind, "replace(searchFor,replaceWith)", |interp, this, args| {
        replace(interp, this, args, false)
    });
    method(interp, kind, "replaceAll(searchFor,replaceWith)", |interp, this, args| {
        replace(interp, this, args, true)
    });
    method(interp, kind, "slice(start,end)", |_, this, args| {
        let chars = chars_of(this);
        let start = relative_index(&arg(args, 0), chars.len(), 0);
        let end = relative_index(&arg(args, 1), chars.len(), chars.len());
        Ok(Value::from(collect(chars.get(start..end).unwrap_or_default())))
    });
    method(interp, kind, "substring(start,end)", |_, this, args| {
        let chars = chars_of(this);
        let len = chars.len();
        let start = clamp_to(&arg(args, 0), len, 0);
        let end = clamp_to(&arg(args, 1), len, len);
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        Ok(Value::from(collect(&chars[start..end])))
    });
    method(interp, kind, "split(separator,limit)", |_, this, args| {
        let text = to_string(this);
        let limit = match arg(args, 1) {
            Value::Undefined => usize::MAX,
            limit => usize::try_from(to_integer(&limit)).unwrap_or(usize::MAX),
        };
        let parts: Vec<Value> = match arg(args, 0) {
            Value::Undefined => vec![Value::String(text)],
            separator => {
                let separator = to_string(&separator);
                if separator.is_empty() {
                    text.chars().map(|c| Value::from(c.to_string())).collect()
                } else {
                    text.split(&*separator).map(Value::from).collect()
                }
            }
        };
        Ok(Value::array(parts.into_iter().take(limit).collect()))
    });
    method(interp, kind, "toLowerCase()", |_, this, _| {
        Ok(Value::from(to_string(this).to_lowercase()))
    });
    method(interp, kind, "toUpperCase()", |_, this, _| {
        Ok(Value::from(to_string(this).to_uppercase()))
    });
    method(interp, kind, "trim()", |_, this, _| Ok(Value::from(to_string(this).trim())));
    method(interp, kind, "trimStart()", |_, this, _| {
        Ok(Value::from(to_string(this).trim_start()))
    });
    method(interp, kind, "trimEnd()", |_, this, _| {
        Ok(Value::from(to_string(this).trim_end()))
    });
    method(interp, kind, "toString()", |_, this, _| Ok(Value::String(to_string(this))));
}

fn chars_of(value: &Value) -> Vec<char> {
    to_string(value).chars().collect()
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Non-negative position argument; negative values are out of range.
fn clamp_index(value: &Value) -> Option<usize> {
    usize::try_from(to_integer(value)).ok()
}

/// Position clamped into `0..=len`, `default` when absent.
fn clamp_to(value: &Value, len: usize, default: usize) -> usize {
    if matches!(value, Value::Undefined) {
        return default;
    }
    usize::try_from(to_integer(value)).map_or(0, |i| i.min(len))
}

fn position_value(position: Option<usize>) -> Value {
    position.map_or(Value::from(-1), Value::from)
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    let from = from.min(haystack.len());
    if needle.is_empty() {
        return Some(from);
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

fn rfind_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    let last = from.min(haystack.len() - needle.len());
    (0..=last)
        .rev()
        .find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Results longer than the loop limit, counted in characters, are a
/// `RangeError`, the same bound array growth uses.
fn check_length(interp: &Interpreter, length: usize) -> Result<(), EvalError> {
    if length > interp.config().loop_limit {
        return Err(range_error("Invalid string length"));
    }
    Ok(())
}

fn pad(interp: &Interpreter, this: &Value, args: &[Value], start: bool) -> EvalResult {
    let text = to_string(this);
    let current = text.chars().count();
    let target = usize::try_from(to_integer(&arg(args, 0))).unwrap_or(0);
    let filler: Rc<str> = match arg(args, 1) {
        Value::Undefined => " ".into(),
        value => to_string(&value),
    };
    if target <= current || filler.is_empty() {
        return Ok(Value::String(text));
    }
    check_length(interp, target)?;
    let padding: String = filler.chars().cycle().take(target - current).collect();
    Ok(Value::from(if start {
        padding + &*text
    } else {
        format!("{text}{padding}")
    }))
}

/// `replace` / `replaceAll` with a string or function replacement. The
/// function receives the match, its character position and the whole
/// string.
fn replace(interp: &mut Interpreter, this: &Value, args: &[Value], all: bool) -> EvalResult {
    let text = to_string(this);
    let chars: Vec<char> = text.chars().collect();
    let search: Vec<char> = chars_of(&arg(args, 0));
    let replacement = arg(args, 1);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(found) = find_chars(&chars, &search, cursor) {
        out.extend(&chars[cursor..found]);
        let matched = collect(&search);
        match &replacement {
            Value::Function(_) => {
                let args = [Value::from(matched), Value::from(found), Value::String(Rc::clone(&text))];
                let value = interp.call_function(&replacement, Value::Undefined, &args)?;
                out.push_str(&to_string(&value));
            }
            other => out.push_str(&to_string(other)),
        }
        cursor = found + search.len();
        if !all {
            break;
        }
        if search.is_empty() {
            if let Some(c) = chars.get(cursor) {
                out.push(*c);
            }
            cursor += 1;
            if cursor > chars.len() {
                break;
            }
        }
    }
    if cursor < chars.len() {
        out.extend(&chars[cursor..]);
    }
    Ok(Value::from(out))
}
