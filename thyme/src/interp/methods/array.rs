use super::{TYPE, arg, array_receiver, callable_arg, entry, int_arg, random, str_arg};
use crate::interp::dispatch::{MethodEntry, Runtime};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::value::Value;
use crate::introspect::Arity;
use std::cmp::Ordering;

pub(super) const METHODS: &[MethodEntry] = &[
    TYPE,
    entry("length", Arity::Exact(0), length),
    entry("has", Arity::Exact(1), has),
    entry("reverse", Arity::Exact(0), reverse),
    entry("sort", Arity::Exact(0), sort),
    entry("join", Arity::Range(0, 1), join),
    entry("insert", Arity::Exact(2), insert),
    entry("map", Arity::Exact(1), map),
    entry("filter", Arity::Exact(1), filter),
    entry("reduce", Arity::Exact(2), reduce),
    entry("pick", Arity::Range(0, 1), random::pick),
    entry("take", Arity::Exact(1), random::take),
    entry("shuffle", Arity::Exact(0), random::shuffle),
];

fn length(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let len = array_receiver(receiver)?.len();
    Ok(Value::Int(len as i64))
}

fn has(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    Ok(Value::Bool(args.first().is_some_and(|item| items.contains(item))))
}

fn reverse(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let mut items = array_receiver(receiver)?.to_vec();
    items.reverse();
    Ok(Value::array(items))
}

/// Numbers compare numerically (integers and floats mix), strings and
/// booleans within their own kind. Anything else has no order.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => Some(a.as_float()?.total_cmp(&b.as_float()?)),
    }
}

fn sort(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let mut items = array_receiver(receiver)?.to_vec();
    let mut unordered: Option<(&'static str, &'static str)> = None;
    items.sort_by(|a, b| {
        compare(a, b).unwrap_or_else(|| {
            unordered.get_or_insert((a.type_name(), b.type_name()));
            Ordering::Equal
        })
    });
    match unordered {
        Some((left, right)) => Err(RuntimeError::type_mismatch(
            "comparable elements",
            &format!("{left} and {right}"),
        )),
        None => Ok(Value::array(items)),
    }
}

fn join(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    let separator = match args.first() {
        Some(arg) => str_arg("join", arg)?,
        None => "",
    };
    let parts: Vec<String> = items.iter().map(Value::to_string).collect();
    Ok(Value::str(parts.join(separator)))
}

/// `insert(index, value)`: negative index counts from the end, so
/// `insert(-1, x)` lands before the last element.
fn insert(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    let index = int_arg("insert", arg("insert", args, 0)?)?;
    let value = arg("insert", args, 1)?;
    let len = items.len() as i64;
    let position = if index < 0 { len + index } else { index };
    if !(0..=len).contains(&position) {
        return Err(RuntimeError::index_out_of_bounds(index, items.len()));
    }
    let mut out = items.to_vec();
    out.insert(position as usize, value.clone());
    Ok(Value::array(out))
}

fn map(rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    let f = arg("map", args, 0)?;
    callable_arg("map", f)?;
    let mapped = items
        .iter()
        .map(|item| rt.call_value(f, vec![item.clone()]))
        .collect::<InterpResult<Vec<_>>>()?;
    Ok(Value::array(mapped))
}

fn filter(rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    let f = arg("filter", args, 0)?;
    callable_arg("filter", f)?;
    let mut kept = Vec::new();
    for item in items {
        if rt.call_value(f, vec![item.clone()])?.is_truthy() {
            kept.push(item.clone());
        }
    }
    Ok(Value::array(kept))
}

fn reduce(rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let items = array_receiver(receiver)?;
    let f = arg("reduce", args, 0)?;
    callable_arg("reduce", f)?;
    let initial = arg("reduce", args, 1)?.clone();
    items.iter().try_fold(initial, |acc, item| {
        rt.call_value(f, vec![acc, item.clone()])
    })
}
