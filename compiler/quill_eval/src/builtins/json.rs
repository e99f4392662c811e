//! `JSON.parse` and `JSON.stringify` on top of `serde_json`.

use std::rc::Rc;

use quill_ir::Number;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::{arg, Namespace};
use crate::coerce::{to_integer, to_property_key, to_string};
use crate::errors::{syntax_error, type_error, EvalError};
use crate::value::ObjectMap;
use crate::{Interpreter, Value};

/// Widest indentation `JSON.stringify` honours.
const MAX_INDENT: usize = 10;

pub(super) fn install(interp: &mut Interpreter) {
    Namespace::new()
        .function("parse(text)", |_, _, args| {
            Ok(parse_json(&to_string(&arg(args, 0)))?)
        })
        .function("stringify(value,replacer,space)", |interp, _, args| {
            let replacer = match arg(args, 1) {
                f @ Value::Function(_) => Replacer::Function(f),
                Value::Array(keys) => {
                    Replacer::Keys(keys.borrow().iter().map(to_property_key).collect())
                }
                _ => Replacer::None,
            };
            let indent = indent_of(&arg(args, 2));
            let mut stringifier = Stringifier {
                interp: Some(interp),
                replacer,
                stack: Vec::new(),
            };
            let text = stringifier.stringify(&arg(args, 0), indent.as_deref())?;
            Ok(text.map_or(Value::Undefined, Value::from))
        })
        .define(interp, "JSON");
}

/// Parse JSON text into a script value. Integers take the narrowest
/// integer tier; other numbers are doubles.
pub fn parse_json(text: &str) -> Result<Value, EvalError> {
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| syntax_error(format!("Unexpected token in JSON: {err}")))?;
    Ok(from_json(json))
}

/// Serialize a value. `None` when the value has no JSON form
/// (`undefined` or a function).
pub fn stringify_json(value: &Value, indent: Option<&str>) -> Result<Option<String>, EvalError> {
    Stringifier {
        interp: None,
        replacer: Replacer::None,
        stack: Vec::new(),
    }
    .stringify(value, indent)
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Number(Number::from_i64(i)),
            None => Value::Number(Number::Double(n.as_f64().unwrap_or(f64::NAN))),
        },
        serde_json::Value::String(s) => Value::from(s),
        serde_json::Value::Array(items) => Value::array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::object(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect::<ObjectMap>(),
        ),
    }
}

/// The `space` argument: a count of spaces or a literal string, at most
/// ten characters either way. Empty means compact output.
fn indent_of(space: &Value) -> Option<String> {
    let indent = match space {
        Value::Number(_) => " ".repeat(to_integer(space).clamp(0, MAX_INDENT as i64) as usize),
        Value::String(s) => s.chars().take(MAX_INDENT).collect(),
        _ => return None,
    };
    (!indent.is_empty()).then_some(indent)
}

enum Replacer {
    None,
    /// Called as `replacer(key, value)`; its result replaces the value.
    Function(Value),
    /// Only these object keys are written.
    Keys(Vec<Rc<str>>),
}

struct Stringifier<'a> {
    interp: Option<&'a mut Interpreter>,
    replacer: Replacer,
    /// Containers being written, for cycle detection.
    stack: Vec<usize>,
}

impl Stringifier<'_> {
    fn stringify(&mut self, value: &Value, indent: Option<&str>) -> Result<Option<String>, EvalError> {
        let Some(json) = self.convert("", value.clone())? else {
            return Ok(None);
        };
        let text = match indent {
            None => serde_json::to_string(&json),
            Some(indent) => {
                let mut buf = Vec::new();
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let result = json.serialize(&mut Serializer::with_formatter(&mut buf, formatter));
                result.map(|()| String::from_utf8_lossy(&buf).into_owned())
            }
        };
        text.map(Some)
            .map_err(|err| type_error(format!("JSON serialization failed: {err}")))
    }

    fn replace(&mut self, key: &str, value: Value) -> Result<Value, EvalError> {
        let (Replacer::Function(f), Some(interp)) = (&self.replacer, self.interp.as_deref_mut()) else {
            return Ok(value);
        };
        interp.call(f, &[Value::from(key), value])
    }

    /// `None` for values JSON omits.
    fn convert(&mut self, key: &str, value: Value) -> Result<Option<serde_json::Value>, EvalError> {
        let value = self.replace(key, value)?;
        Ok(Some(match &value {
            Value::Undefined | Value::Function(_) => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Array(items) => {
                self.enter(items.addr())?;
                let snapshot = items.borrow().clone();
                let mut out = Vec::with_capacity(snapshot.len());
                for (i, item) in snapshot.into_iter().enumerate() {
                    let item = self.convert(&i.to_string(), item)?;
                    out.push(item.unwrap_or(serde_json::Value::Null));
                }
                self.stack.pop();
                serde_json::Value::Array(out)
            }
            Value::Object(map) => {
                self.enter(map.addr())?;
                let entries: Vec<(Rc<str>, Value)> = map
                    .borrow()
                    .iter()
                    .map(|(key, value)| (Rc::clone(key), value.clone()))
                    .collect();
                let mut out = serde_json::Map::new();
                for (key, item) in entries {
                    if let Replacer::Keys(keys) = &self.replacer {
                        if !keys.contains(&key) {
                            continue;
                        }
                    }
                    if let Some(item) = self.convert(&key, item)? {
                        out.insert(key.to_string(), item);
                    }
                }
                self.stack.pop();
                serde_json::Value::Object(out)
            }
        }))
    }

    fn enter(&mut self, addr: usize) -> Result<(), EvalError> {
        if self.stack.contains(&addr) {
            return Err(type_error("Converting circular structure to JSON"));
        }
        self.stack.push(addr);
        Ok(())
    }
}

/// Integral doubles are written without a fraction; `NaN` and the
/// infinities become `null`.
fn number_to_json(n: Number) -> serde_json::Value {
    const EXACT: f64 = 9_007_199_254_740_992.0;
    match n {
        Number::Int(v) => serde_json::Value::from(v),
        Number::Long(v) => serde_json::Value::from(v),
        Number::Double(v) if v.fract() == 0.0 && v.abs() < EXACT => {
            serde_json::Value::from(v as i64)
        }
        Number::Double(v) => serde_json::Number::from_f64(v)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
    }
}
