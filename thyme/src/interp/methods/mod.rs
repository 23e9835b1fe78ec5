//! Native methods, one table per receiver type
//!
//! Methods are pure: they read the receiver and return a new value.

mod array;
mod dict;
mod number;
mod random;
mod string;

pub use random::{sample_distinct, shuffle_slice};

use super::dispatch::{MethodEntry, Runtime};
use super::error::{InterpResult, RuntimeError};
use super::value::{Dict, TypeTag, Value};
use crate::introspect::Arity;

/// Executable method tables. Every `TypeTag` appears exactly once.
pub static TABLES: &[(TypeTag, &[MethodEntry])] = &[
    (TypeTag::Null, BASE),
    (TypeTag::Boolean, BASE),
    (TypeTag::Integer, number::INTEGER_METHODS),
    (TypeTag::Float, number::FLOAT_METHODS),
    (TypeTag::String, string::METHODS),
    (TypeTag::Array, array::METHODS),
    (TypeTag::Dictionary, dict::METHODS),
    (TypeTag::Function, BASE),
    (TypeTag::Builtin, BASE),
    (TypeTag::Method, BASE),
    (TypeTag::Error, ERROR_METHODS),
];

const fn entry(
    name: &'static str,
    arity: Arity,
    func: fn(&mut dyn Runtime, &Value, &[Value]) -> InterpResult<Value>,
) -> MethodEntry {
    MethodEntry { name, arity, func }
}

const TYPE: MethodEntry = entry("type", Arity::Exact(0), type_name);

const BASE: &[MethodEntry] = &[TYPE];

const ERROR_METHODS: &[MethodEntry] = &[TYPE, entry("message", Arity::Exact(0), error_message)];

fn type_name(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::str(receiver.type_name()))
}

fn error_message(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    match receiver {
        Value::Error(err) => Ok(Value::str(&err.message)),
        other => Err(receiver_mismatch("error", other)),
    }
}

// Dispatch keys on the receiver's tag, so these only fail if a table is
// registered under the wrong type.
fn receiver_mismatch(expected: &str, got: &Value) -> RuntimeError {
    RuntimeError::internal(format!(
        "{expected} method invoked on {} receiver",
        got.type_name()
    ))
}

fn array_receiver(receiver: &Value) -> InterpResult<&[Value]> {
    receiver
        .as_array()
        .ok_or_else(|| receiver_mismatch("array", receiver))
}

fn str_receiver(receiver: &Value) -> InterpResult<&str> {
    receiver
        .as_str()
        .ok_or_else(|| receiver_mismatch("string", receiver))
}

fn dict_receiver(receiver: &Value) -> InterpResult<&Dict> {
    receiver
        .as_dict()
        .ok_or_else(|| receiver_mismatch("dictionary", receiver))
}

/// Positional argument; dispatch has already checked the count
fn arg<'a>(method: &str, args: &'a [Value], index: usize) -> InterpResult<&'a Value> {
    args.get(index).ok_or_else(|| {
        RuntimeError::internal(format!("`{method}` invoked without argument {index}"))
    })
}

fn int_arg(method: &str, arg: &Value) -> InterpResult<i64> {
    arg.as_int().ok_or_else(|| {
        RuntimeError::type_mismatch(&format!("integer argument to `{method}`"), arg.type_name())
    })
}

fn str_arg<'a>(method: &str, arg: &'a Value) -> InterpResult<&'a str> {
    arg.as_str().ok_or_else(|| {
        RuntimeError::type_mismatch(&format!("string argument to `{method}`"), arg.type_name())
    })
}

fn callable_arg(method: &str, arg: &Value) -> InterpResult<()> {
    match arg {
        Value::Function(_) | Value::Builtin(_) | Value::Method(_) => Ok(()),
        other => Err(RuntimeError::type_mismatch(
            &format!("function argument to `{method}`"),
            other.type_name(),
        )),
    }
}
