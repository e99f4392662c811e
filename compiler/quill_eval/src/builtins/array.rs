//! Array methods.
//!
//! Callbacks may mutate the array they iterate, so no borrow of the
//! element vector is held across a call back into the interpreter.

use std::cmp::Ordering;

use quill_stack::ensure_sufficient_stack;

use super::{arg, callback, method, relative_index, this_array};
use crate::coerce::{to_boolean, to_integer, to_number, to_string};
use crate::errors::{range_error, type_error, EvalResult};
use crate::methods::ReceiverKind;
use crate::operators::{same_value_zero, strict_equals};
use crate::value::Shared;
use crate::{Interpreter, Value};

/// Nesting levels `flat` descends at most.
const MAX_FLAT_DEPTH: i64 = 1024;

type Items = Shared<Vec<Value>>;

pub(super) fn install(interp: &mut Interpreter) {
    let kind = ReceiverKind::Array;
    method(interp, kind, "at(index)", |_, this, args| {
        let items = this_array(this, "at")?;
        let items = items.borrow();
        let index = to_integer(&arg(args, 0));
        let resolved = if index < 0 { items.len() as i64 + index } else { index };
        Ok(usize::try_from(resolved)
            .ok()
            .and_then(|i| items.get(i).cloned())
            .unwrap_or_default())
    });
    method(interp, kind, "concat(arrays)", |_, this, args| {
        let mut out = this_array(this, "concat")?.borrow().clone();
        for value in args {
            match value {
                Value::Array(other) => out.extend(other.borrow().iter().cloned()),
                other => out.push(other.clone()),
            }
        }
        Ok(Value::array(out))
    });
    method(interp, kind, "every(callbackFn)", |interp, this, args| {
        let items = this_array(this, "every")?;
        let f = callback(args, 0)?;
        for i in 0..len(&items) {
            let Some(item) = element(&items, i) else { break };
            if !to_boolean(&visit(interp, &f, &items, item, i)?) {
                return Ok(Value::Bool(false));
            }
        }
        Ok(Value::Bool(true))
    });
    method(interp, kind, "some(callbackFn)", |interp, this, args| {
        let items = this_array(this, "some")?;
        let f = callback(args, 0)?;
        for i in 0..len(&items) {
            let Some(item) = element(&items, i) else { break };
            if to_boolean(&visit(interp, &f, &items, item, i)?) {
                return Ok(Value::Bool(true));
            }
        }
        Ok(Value::Bool(false))
    });
    method(interp, kind, "fill(value,start,end)", |_, this, args| {
        let items = this_array(this, "fill")?;
        {
            let mut items = items.borrow_mut();
            let len = items.len();
            let start = relative_index(&arg(args, 1), len, 0);
            let end = relative_index(&arg(args, 2), len, len);
            let value = arg(args, 0);
            for slot in items.iter_mut().take(end).skip(start) {
                *slot = value.clone();
            }
        }
        Ok(this.clone())
    });
    method(interp, kind, "filter(callbackFn)", |interp, this, args| {
        let items = this_array(this, "filter")?;
        let f = callback(args, 0)?;
        let mut out = Vec::new();
        for i in 0..len(&items) {
            let Some(item) = element(&items, i) else { break };
            if to_boolean(&visit(interp, &f, &items, item.clone(), i)?) {
                out.push(item);
            }
        }
        Ok(Value::array(out))
    });
    method(interp, kind, "find(callbackFn)", |interp, this, args| {
        Ok(find(interp, this, args, false)?.map_or(Value::Undefined, |(_, item)| item))
    });
    method(interp, kind, "findIndex(callbackFn)", |interp, this, args| {
        Ok(find(interp, this, args, false)?.map_or(Value::from(-1), |(i, _)| Value::from(i)))
    });
    method(interp, kind, "findLast(callbackFn)", |interp, this, args| {
        Ok(find(interp, this, args, true)?.map_or(Value::Undefined, |(_, item)| item))
    });
    method(interp, kind, "findLastIndex(callbackFn)", |interp, this, args| {
        Ok(find(interp, this, args, true)?.map_or(Value::from(-1), |(i, _)| Value::from(i)))
    });
    method(interp, kind, "flat(depth)", |_, this, args| {
        let items = this_array(this, "flat")?.borrow().clone();
        let depth = match arg(args, 0) {
            Value::Undefined => 1,
            depth => to_integer(&depth).min(MAX_FLAT_DEPTH),
        };
        let mut out = Vec::new();
        flatten(items, depth, &mut out);
        Ok(Value::array(out))
    });
    method(interp, kind, "flatMap(callbackFn)", |interp, this, args| {
        let items = this_array(this, "flatMap")?;
        let f = callback(args, 0)?;
        let mut out = Vec::new();
        for i in 0..len(&items) {
            let Some(item) = element(&items, i) else { break };
            match visit(interp, &f, &items, item, i)? {
                Value::Array(inner) => out.extend(inner.borrow().iter().cloned()),
                other => out.push(other),
            }
        }
        Ok(Value::array(out))
    });
    method(interp, kind, "forEach(callbackFn)", |interp, this, args| {
        let items = this_array(this, "forEach")?;
        let f = callback(args, 0)?;
        for i in 0..len(&items) {
            let Some(item) = element(&items, i) else { break };
            visit(interp, &f, &items, item, i)?;
        }
        Ok(Value::Undefined)
    });
    method(interp, kind, "map(callbackFn)", |interp, this, args| {
        let items = this_array(this, "map")?;
        let f = callback(args, 0)?;
        let mut out = Vec::with_capacity(len(&items));
        for i in 0..len(&items) {
            let Some(item) = element(&items, i) else { break };
            out.push(visit(interp, &f, &items, item, i)?);
        }
        Ok(Value::array(out))
    });
    method(interp, kind, "includes(searchElement,fromIndex)", |_, this, args| {
        let items = this_array(this, "includes")?;
        let items = items.borrow();
        let from = relative_index(&arg(args, 1), items.len(), 0);
        let target = arg(args, 0);
        Ok(Value::Bool(
            items[from..].iter().any(|item| same_value_zero(item, &target)),
        ))
    });
    method(interp, kind, "indexOf(searchElement,fromIndex)", |_, this, args| {
        let items = this_array(this, "indexOf")?;
        let items = items.borrow();
        let from = relative_index(&arg(args, 1), items.len(), 0);
        let target = arg(args, 0);
        Ok(items[from..]
            .iter()
            .position(|item| strict_equals(item, &target))
            .map_or(Value::from(-1), |i| Value::from(i + from)))
    });
    method(interp, kind, "lastIndexOf(searchElement,fromIndex)", |_, this, args| {
        let items = this_array(this, "lastIndexOf")?;
        let items = items.borrow();
        if items.is_empty() {
            return Ok(Value::from(-1));
        }
        let last = match arg(args, 1) {
            Value::Undefined => items.len() - 1,
            from => relative_index(&from, items.len(), 0).min(items.len() - 1),
        };
        let target = arg(args, 0);
        Ok(items[..=last]
            .iter()
            .rposition(|item| strict_equals(item, &target))
            .map_or(Value::from(-1), Value::from))
    });
    method(interp, kind, "join(separator)", |_, this, args| {
        let items = this_array(this, "join")?;
        let separator = match arg(args, 0) {
            Value::Undefined => ",".into(),
            separator => to_string(&separator),
        };
        let text = join(&items.borrow(), &separator);
        Ok(Value::from(text))
    });
    method(interp, kind, "toString()", |_, this, _| {
        let items = this_array(this, "toString")?;
        let text = join(&items.borrow(), ",");
        Ok(Value::from(text))
    });
    method(interp, kind, "pop()", |_, this, _| {
        let items = this_array(this, "pop")?;
        let popped = items.borrow_mut().pop();
        Ok(popped.unwrap_or_default())
    });
    method(interp, kind, "push(items)", |_, this, args| {
        let items = this_array(this, "push")?;
        let mut items = items.borrow_mut();
        items.extend_from_slice(args);
        Ok(Value::from(items.len()))
    });
    method(interp, kind, "shift()", |_, this, _| {
        let items = this_array(this, "shift")?;
        let mut items = items.borrow_mut();
        if items.is_empty() {
            return Ok(Value::Undefined);
        }
        Ok(items.remove(0))
    });
    method(interp, kind, "unshift(items)", |_, this, args| {
        let items = this_array(this, "unshift")?;
        let mut items = items.borrow_mut();
        let tail = std::mem::take(&mut *items);
        items.extend_from_slice(args);
        items.extend(tail);
        Ok(Value::from(items.len()))
    });
    method(interp, kind, "reduce(callbackFn,initialValue)", |interp, this, args| {
        reduce(interp, this, args, false)
    });
    method(interp, kind, "reduceRight(callbackFn,initialValue)", |interp, this, args| {
        reduce(interp, this, args, true)
    });
    method(interp, kind, "reverse()", |_, this, _| {
        this_array(this, "reverse")?.borrow_mut().reverse();
        Ok(this.clone())
    });
    method(interp, kind, "slice(start,end)", |_, this, args| {
        let items = this_array(this, "slice")?;
        let items = items.borrow();
        let start = relative_index(&arg(args, 0), items.len(), 0);
        let end = relative_index(&arg(args, 1), items.len(), items.len());
        Ok(Value::array(
            items.get(start..end).unwrap_or_default().to_vec(),
        ))
    });
    method(interp, kind, "sort(compareFn)", |interp, this, args| {
        let items = this_array(this, "sort")?;
        let compare = match arg(args, 0) {
            Value::Undefined => None,
            f @ Value::Function(_) => Some(f),
            other => {
                return Err(type_error(format!(
                    "The comparison function must be either a function or undefined: {other}"
                ))
                .into());
            }
        };
        let snapshot = items.borrow().clone();
        let (defined, undefined): (Vec<Value>, Vec<Value>) = snapshot
            .into_iter()
            .partition(|item| !matches!(item, Value::Undefined));
        let mut sorted = merge_sort(defined, &mut |a: &Value, b: &Value| match &compare {
            Some(f) => {
                let result = interp.call_function(f, Value::Undefined, &[a.clone(), b.clone()])?;
                let order = to_number(&result).as_f64();
                Ok(order.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
            }
            None => Ok(to_string(a).cmp(&to_string(b))),
        })?;
        sorted.extend(undefined);
        *items.borrow_mut() = sorted;
        Ok(this.clone())
    });
    method(interp, kind, "splice(start,deleteCount)", |_, this, args| {
        let items = this_array(this, "splice")?;
        let mut items = items.borrow_mut();
        let len = items.len();
        let start = relative_index(&arg(args, 0), len, 0);
        let count = match args.get(1) {
            None => len - start,
            Some(count) => usize::try_from(to_integer(count))
                .unwrap_or(0)
                .min(len - start),
        };
        let inserted = args.iter().skip(2).cloned();
        let removed: Vec<Value> = items.splice(start..start + count, inserted).collect();
        Ok(Value::array(removed))
    });
    method(interp, kind, "with(index,value)", |_, this, args| {
        let items = this_array(this, "with")?;
        let mut copy = items.borrow().clone();
        let index = to_integer(&arg(args, 0));
        let resolved = if index < 0 { copy.len() as i64 + index } else { index };
        match usize::try_from(resolved) {
            Ok(i) if i < copy.len() => {
                copy[i] = arg(args, 1);
                Ok(Value::array(copy))
            }
            _ => Err(range_error(format!("Invalid index : {index}")).into()),
        }
    });
}

fn len(items: &Items) -> usize {
    items.borrow().len()
}

/// Element `i`, read fresh so mutations by earlier callbacks are seen.
fn element(items: &Items, i: usize) -> Option<Value> {
    items.borrow().get(i).cloned()
}

/// Call `f(item, index, array)`.
fn visit(interp: &mut Interpreter, f: &Value, items: &Items, item: Value, i: usize) -> EvalResult {
    interp.call_function(
        f,
        Value::Undefined,
        &[item, Value::from(i), Value::Array(items.clone())],
    )
}

fn find(
    interp: &mut Interpreter,
    this: &Value,
    args: &[Value],
    from_end: bool,
) -> EvalResult<Option<(usize, Value)>> {
    let items = this_array(this, if from_end { "findLast" } else { "find" })?;
    let f = callback(args, 0)?;
    let count = len(&items);
    for step in 0..count {
        let i = if from_end { count - 1 - step } else { step };
        let item = element(&items, i).unwrap_or_default();
        if to_boolean(&visit(interp, &f, &items, item.clone(), i)?) {
            return Ok(Some((i, item)));
        }
    }
    Ok(None)
}

fn reduce(interp: &mut Interpreter, this: &Value, args: &[Value], from_end: bool) -> EvalResult {
    let items = this_array(this, if from_end { "reduceRight" } else { "reduce" })?;
    let f = callback(args, 0)?;
    let count = len(&items);
    let mut order: Box<dyn Iterator<Item = usize>> = if from_end {
        Box::new((0..count).rev())
    } else {
        Box::new(0..count)
    };
    let mut acc = match args.get(1) {
        Some(initial) => initial.clone(),
        None => match order.next() {
            Some(first) => element(&items, first).unwrap_or_default(),
            None => return Err(type_error("Reduce of empty array with no initial value").into()),
        },
    };
    for i in order {
        let Some(item) = element(&items, i) else { continue };
        acc = interp.call_function(
            &f,
            Value::Undefined,
            &[acc, item, Value::from(i), Value::Array(items.clone())],
        )?;
    }
    Ok(acc)
}

/// `null` and `undefined` elements join as empty strings.
pub(super) fn join(items: &[Value], separator: &str) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        if !item.is_nullish() {
            out.push_str(&to_string(item));
        }
    }
    out
}

fn flatten(items: Vec<Value>, depth: i64, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) if depth > 0 => {
                let inner = inner.borrow().clone();
                ensure_sufficient_stack(|| flatten(inner, depth - 1, out));
            }
            other => out.push(other),
        }
    }
}

/// Stable merge sort with a comparator that may fail.
fn merge_sort<F>(mut items: Vec<Value>, compare: &mut F) -> EvalResult<Vec<Value>>
where
    F: FnMut(&Value, &Value) -> EvalResult<Ordering>,
{
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let take_right = compare(r, l)? == Ordering::Less;
        if take_right {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn merge_sort_is_stable() {
        let pairs: Vec<Value> = [(2, "a"), (1, "b"), (2, "c"), (1, "d")]
            .into_iter()
            .map(|(k, v)| Value::array(vec![Value::from(k), Value::from(v)]))
            .collect();
        let key = |v: &Value| match v {
            Value::Array(items) => to_integer(&items.borrow()[0]),
            _ => 0,
        };
        let sorted = merge_sort(pairs, &mut |a: &Value, b: &Value| Ok(key(a).cmp(&key(b)))).unwrap_or_default();
        let labels: Vec<String> = sorted
            .iter()
            .map(|v| match v {
                Value::Array(items) => items.borrow()[1].to_string(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(labels, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn join_skips_nullish() {
        let items = vec![Value::from(1), Value::Null, Value::Undefined, Value::from("x")];
        assert_eq!(join(&items, "-"), "1---x");
    }
}
