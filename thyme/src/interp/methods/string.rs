use super::{TYPE, arg, entry, str_arg, str_receiver};
use crate::interp::dispatch::{MethodEntry, Runtime};
use crate::interp::error::InterpResult;
use crate::interp::value::Value;
use crate::introspect::Arity;

pub(super) const METHODS: &[MethodEntry] = &[
    TYPE,
    entry("length", Arity::Exact(0), length),
    entry("includes", Arity::Exact(1), includes),
    entry("toUpper", Arity::Exact(0), to_upper),
    entry("toLower", Arity::Exact(0), to_lower),
    entry("trim", Arity::Exact(0), trim),
    entry("split", Arity::Exact(1), split),
    entry("replace", Arity::Exact(2), replace),
];

/// Character count, not bytes
fn length(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Int(str_receiver(receiver)?.chars().count() as i64))
}

fn includes(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let s = str_receiver(receiver)?;
    let needle = str_arg("includes", arg("includes", args, 0)?)?;
    Ok(Value::Bool(s.contains(needle)))
}

fn to_upper(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::str(str_receiver(receiver)?.to_uppercase()))
}

fn to_lower(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::str(str_receiver(receiver)?.to_lowercase()))
}

fn trim(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::str(str_receiver(receiver)?.trim()))
}

/// An empty delimiter splits into characters
fn split(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let s = str_receiver(receiver)?;
    let delimiter = str_arg("split", arg("split", args, 0)?)?;
    let parts: Vec<Value> = if delimiter.is_empty() {
        s.chars().map(|c| Value::str(c.to_string())).collect()
    } else {
        s.split(delimiter).map(Value::str).collect()
    };
    Ok(Value::array(parts))
}

fn replace(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let s = str_receiver(receiver)?;
    let search = str_arg("replace", arg("replace", args, 0)?)?;
    let replacement = str_arg("replace", arg("replace", args, 1)?)?;
    if search.is_empty() {
        return Ok(receiver.clone());
    }
    Ok(Value::str(s.replace(search, replacement)))
}
