use super::{TYPE, entry, int_arg, receiver_mismatch};
use crate::interp::dispatch::{MethodEntry, Runtime};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::value::Value;
use crate::introspect::Arity;

pub(super) const INTEGER_METHODS: &[MethodEntry] = &[TYPE, entry("abs", Arity::Exact(0), int_abs)];

pub(super) const FLOAT_METHODS: &[MethodEntry] = &[
    TYPE,
    entry("abs", Arity::Exact(0), float_abs),
    entry("round", Arity::Range(0, 1), round),
    entry("floor", Arity::Exact(0), floor),
    entry("ceil", Arity::Exact(0), ceil),
];

fn float_receiver(receiver: &Value) -> InterpResult<f64> {
    match receiver {
        Value::Float(x) => Ok(*x),
        other => Err(receiver_mismatch("float", other)),
    }
}

fn int_abs(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    let n = receiver
        .as_int()
        .ok_or_else(|| receiver_mismatch("integer", receiver))?;
    n.checked_abs()
        .map(Value::Int)
        .ok_or_else(|| RuntimeError::invalid_argument(format!("abs({n}) overflows an integer")))
}

fn float_abs(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Float(float_receiver(receiver)?.abs()))
}

/// `round(decimals?)`: half away from zero; negative decimals round to tens,
/// hundreds and so on.
fn round(_rt: &mut dyn Runtime, receiver: &Value, args: &[Value]) -> InterpResult<Value> {
    let x = float_receiver(receiver)?;
    let decimals = match args.first() {
        Some(arg) => int_arg("round", arg)?,
        None => 0,
    };
    let decimals = i32::try_from(decimals)
        .ok()
        .filter(|d| d.abs() <= 308)
        .ok_or_else(|| {
            RuntimeError::invalid_argument(format!("round: decimals out of range, got {decimals}"))
        })?;
    let rounded = if decimals >= 0 {
        let factor = 10f64.powi(decimals);
        (x * factor).round() / factor
    } else {
        let factor = 10f64.powi(-decimals);
        (x / factor).round() * factor
    };
    Ok(Value::Float(rounded))
}

fn floor(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Float(float_receiver(receiver)?.floor()))
}

fn ceil(_rt: &mut dyn Runtime, receiver: &Value, _args: &[Value]) -> InterpResult<Value> {
    Ok(Value::Float(float_receiver(receiver)?.ceil()))
}
