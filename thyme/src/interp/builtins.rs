//! Global builtin functions
//!
//! Looked up by name when an identifier is not bound in any frame.

use super::dispatch::Runtime;
use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use crate::introspect::{self, Arity};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Builtin function type
pub type BuiltinFn = fn(&mut dyn Runtime, &[Value]) -> InterpResult<Value>;

#[derive(Debug, Clone, Copy)]
pub struct BuiltinEntry {
    pub name: &'static str,
    pub arity: Arity,
    pub func: BuiltinFn,
}

const fn builtin(name: &'static str, arity: Arity, func: BuiltinFn) -> BuiltinEntry {
    BuiltinEntry { name, arity, func }
}

pub static BUILTINS: &[BuiltinEntry] = &[
    builtin("inspect", Arity::Exact(1), inspect),
    builtin("describe", Arity::Exact(1), describe),
    builtin("builtins", Arity::Range(0, 1), list_builtins),
    builtin("toInt", Arity::Exact(1), to_int),
    builtin("toFloat", Arity::Exact(1), to_float),
    builtin("toString", Arity::Exact(1), to_string),
    builtin("repr", Arity::Exact(1), repr),
    builtin("fail", Arity::Exact(1), fail),
    builtin("format", Arity::AtLeast(1), format),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static BuiltinEntry>> =
    LazyLock::new(|| BUILTINS.iter().map(|entry| (entry.name, entry)).collect());

pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinEntry> {
    BY_NAME.get(name).copied()
}

/// Builtin names, sorted
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTINS.iter().map(|entry| entry.name).collect();
    names.sort_unstable();
    names
}

/// Invoke a builtin by name, checking its arity first
pub fn call_builtin(rt: &mut dyn Runtime, name: &str, args: &[Value]) -> InterpResult<Value> {
    let entry = lookup_builtin(name)
        .ok_or_else(|| RuntimeError::internal(format!("builtin value `{name}` has no implementation")))?;
    if !entry.arity.accepts(args.len()) {
        return Err(RuntimeError::arity_mismatch(entry.name, entry.arity, args.len()));
    }
    tracing::debug!(builtin = entry.name, argc = args.len(), "call builtin");
    (entry.func)(rt, args)
}

fn first(args: &[Value]) -> InterpResult<&Value> {
    args.first()
        .ok_or_else(|| RuntimeError::internal("builtin invoked without arguments"))
}

fn inspect(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    introspect::inspect_value(first(args)?)
}

fn describe(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    introspect::describe_value(first(args)?)
}

fn list_builtins(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    let category = match args.first() {
        Some(Value::Str(s)) => Some(&**s),
        Some(other) => {
            return Err(RuntimeError::type_mismatch(
                "string argument to `builtins`",
                other.type_name(),
            ));
        }
        None => None,
    };
    introspect::builtins_value(category)
}

fn to_int(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    match first(args)? {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => {
            if x.is_finite() && *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                Ok(Value::Int(x.trunc() as i64))
            } else {
                Err(RuntimeError::invalid_argument(format!(
                    "cannot convert {x} to integer"
                )))
            }
        }
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            RuntimeError::invalid_argument(format!("cannot convert {s:?} to integer"))
        }),
        other => Err(RuntimeError::type_mismatch(
            "number, string or boolean",
            other.type_name(),
        )),
    }
}

fn to_float(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    match first(args)? {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            RuntimeError::invalid_argument(format!("cannot convert {s:?} to float"))
        }),
        other => Err(RuntimeError::type_mismatch(
            "number, string or boolean",
            other.type_name(),
        )),
    }
}

fn to_string(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    Ok(Value::str(first(args)?.to_string()))
}

fn repr(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    Ok(Value::str(first(args)?.repr()))
}

fn fail(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    Err(RuntimeError::failed(first(args)?.to_string()))
}

/// `format("{} of {}", a, b)`: placeholders are filled left to right and the
/// count must match the values given
fn format(_rt: &mut dyn Runtime, args: &[Value]) -> InterpResult<Value> {
    let template = match first(args)? {
        Value::Str(s) => s.clone(),
        other => {
            return Err(RuntimeError::type_mismatch(
                "string template for `format`",
                other.type_name(),
            ));
        }
    };
    let values = &args[1..];
    let pieces: Vec<&str> = template.split("{}").collect();
    let placeholders = pieces.len() - 1;
    if placeholders != values.len() {
        return Err(RuntimeError::invalid_argument(format!(
            "format: template has {placeholders} placeholder(s) but {} value(s) were given",
            values.len()
        )));
    }

    let mut out = String::from(pieces[0]);
    for (piece, value) in pieces[1..].iter().zip(values) {
        out.push_str(&value.to_string());
        out.push_str(piece);
    }
    Ok(Value::str(out))
}
