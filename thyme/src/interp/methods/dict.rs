use super::{TYPE, arg, dict_receiver, entry, str_arg};
use crate::interp::dispatch::{MethodEntry, Runtime};
use crate::interp::error::InterpResult;
use crate::interp::value::{Dict, Value};
use crate::introspect::Arity;

pub(super) const METHODS: &[MethodEntry] = &[
    TYPE,
    entry("keys", Arity::Exact(0), keys),
    entry("values", Arity::Exact(0), values),
    entry("entries", Arity::Exact(0), entries),
    entry("has", Arity::Exact(1), has),
    entry("delete", Arity::Exact(1), delete),
];

fn keys(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let dict = dict_receiver(receiver)?;
    Ok(Value::array(dict.keys().map(Value::str).collect()))
}

fn values(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let dict = dict_receiver(receiver)?;
    Ok(Value::array(dict.iter().map(|(_, v)| v.clone()).collect()))
}

/// `[[key, value], ...]` in insertion order
fn entries(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let dict = dict_receiver(receiver)?;
    let pairs = dict
        .iter()
        .map(|(k, v)| Value::array(vec![Value::str(k), v.clone()]))
        .collect();
    Ok(Value::array(pairs))
}

fn has(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let dict = dict_receiver(receiver)?;
    let key = str_arg("has", arg("has", args, 0)?)?;
    Ok(Value::Bool(dict.contains_key(key)))
}

/// Copy without `key`; an absent key yields an equal copy
fn delete(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let dict = dict_receiver(receiver)?;
    let key = str_arg("delete", arg("delete", args, 0)?)?;
    let kept: Dict = dict
        .iter()
        .filter(|(k, _)| *k != key)
        .map(|(k, v)| (k, v.clone()))
        .collect();
    Ok(Value::dict(kept))
}
