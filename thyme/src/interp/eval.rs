//! Expression evaluator

use super::bind::BindMode;
use super::builtins::{builtin_names, call_builtin, lookup_builtin};
use super::dispatch::{Runtime, dispatch, method_table};
use super::env::{EnvRef, Environment, child_env};
use super::error::{InterpResult, RuntimeError};
use super::value::{BoundMethod, Closure, Dict, Value};
use crate::ast::Expr;
use crate::config::RuntimeConfig;
use crate::introspect;
use crate::util::find_similar_name;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::rc::Rc;

/// Default limit on nested function calls
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter
pub struct Interpreter {
    /// Global environment
    global_env: EnvRef,
    /// Randomness source handed to methods through `Runtime`
    rng: StdRng,
    /// Current call depth
    recursion_depth: usize,
    max_depth: usize,
}

impl Interpreter {
    /// Create an interpreter seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic interpreter: the same seed gives the same random draws
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        let interp = match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        };
        interp.with_max_depth(config.max_depth)
    }

    fn with_rng(rng: StdRng) -> Self {
        // The metadata registry is checked once per process, before any call.
        introspect::registry();
        Interpreter {
            global_env: Environment::new().into_ref(),
            rng,
            recursion_depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn global_env(&self) -> &EnvRef {
        &self.global_env
    }

    /// Evaluate top-level expressions in the global frame; yields the last value
    pub fn run(&mut self, program: &[Expr]) -> InterpResult<Value> {
        let env = Rc::clone(&self.global_env);
        let mut last = Value::Null;
        for expr in program {
            last = self.eval(expr, &env)?;
        }
        Ok(last)
    }

    /// `receiver.method(args)` on already-evaluated values
    pub fn call_method(&mut self, receiver: &Value, method: &str, args: &[Value]) -> InterpResult<Value> {
        dispatch(self, receiver, method, args)
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    pub fn eval(&mut self, expr: &Expr, env: &EnvRef) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Expr, env: &EnvRef) -> InterpResult<Value> {
        match expr {
            Expr::NullLit => Ok(Value::Null),
            Expr::BoolLit(b) => Ok(Value::Bool(*b)),
            Expr::IntLit(n) => Ok(Value::Int(*n)),
            Expr::FloatLit(f) => Ok(Value::Float(*f)),
            Expr::StrLit(s) => Ok(Value::str(s)),

            Expr::Var(name) => self.lookup(name, env),

            Expr::ArrayLit(items) => Ok(Value::array(self.eval_args(items, env)?)),

            Expr::DictLit(pairs) => {
                let mut dict = Dict::new();
                for (key, value) in pairs {
                    dict.insert(key.clone(), self.eval(value, env)?);
                }
                Ok(Value::dict(dict))
            }

            Expr::Member { object, name } => {
                let object = self.eval(object, env)?;
                self.member(object, name)
            }

            Expr::Index { object, index } => {
                let object = self.eval(object, env)?;
                let index = self.eval(index, env)?;
                index_value(&object, &index)
            }

            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval(receiver, env)?;
                let args = self.eval_args(args, env)?;
                // A callable stored under the key wins over a method of the same name.
                if let Value::Dict(dict) = &receiver
                    && let Some(f) = dict.get(method).filter(|v| is_callable(v))
                {
                    let f = f.clone();
                    return self.call_value(&f, args);
                }
                dispatch(self, &receiver, method, &args)
            }

            Expr::Call { callee, args } => {
                let callee = self.eval(callee, env)?;
                let args = self.eval_args(args, env)?;
                self.call_value(&callee, args)
            }

            Expr::Function { params, body } => Ok(Value::Function(Rc::new(Closure {
                params: params.clone(),
                body: (**body).clone(),
                env: Rc::clone(env),
            }))),

            Expr::Let { pattern, value } => {
                let value = self.eval(value, env)?;
                self.bind(pattern, value, env, BindMode::Let)?;
                Ok(Value::Null)
            }

            Expr::Assign { pattern, value } => {
                let value = self.eval(value, env)?;
                self.bind(pattern, value, env, BindMode::Assign)?;
                Ok(Value::Null)
            }

            Expr::Block(exprs) => {
                let frame = child_env(env);
                let mut last = Value::Null;
                for expr in exprs {
                    last = self.eval(expr, &frame)?;
                }
                Ok(last)
            }

            Expr::Try(inner) => match self.eval(inner, env) {
                Err(err) if err.kind.is_catchable() => Ok(Value::error(err)),
                other => other,
            },
        }
    }

    fn eval_args(&mut self, args: &[Expr], env: &EnvRef) -> InterpResult<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg, env)).collect()
    }

    /// Frames first, then builtins
    fn lookup(&self, name: &str, env: &EnvRef) -> InterpResult<Value> {
        if let Some(value) = env.borrow().get(name) {
            return Ok(value);
        }
        if let Some(entry) = lookup_builtin(name) {
            return Ok(Value::Builtin(entry.name));
        }
        let mut candidates = env.borrow().names();
        candidates.extend(builtin_names().into_iter().map(str::to_string));
        let hint = find_similar_name(name, candidates.iter().map(String::as_str));
        Err(RuntimeError::undefined_variable(name).with_hint(hint))
    }

    /// `object.name` without a call: a dictionary key, else a bound method
    fn member(&mut self, object: Value, name: &str) -> InterpResult<Value> {
        if let Value::Dict(dict) = &object
            && let Some(value) = dict.get(name)
        {
            return Ok(value.clone());
        }

        let tag = object.tag();
        if method_table().has_method(tag, name) {
            return Ok(Value::Method(Rc::new(BoundMethod {
                receiver: object,
                name: name.to_string(),
            })));
        }
        if matches!(object, Value::Dict(_)) {
            return Ok(Value::Null);
        }
        let names = method_table().names(tag);
        let hint = find_similar_name(name, names.iter().copied());
        Err(RuntimeError::method_not_found(tag.name(), name).with_hint(hint))
    }

    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> InterpResult<Value> {
        if args.len() > closure.params.len() {
            return Err(RuntimeError::arity_mismatch(
                "function",
                closure.params.len(),
                args.len(),
            ));
        }

        self.recursion_depth += 1;
        if self.recursion_depth > self.max_depth {
            self.recursion_depth -= 1;
            return Err(RuntimeError::stack_overflow(self.max_depth));
        }

        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            // Create child env from the captured environment (lexical scoping)
            let frame = child_env(&closure.env);
            let mut args = args.into_iter();
            let pairs = closure
                .params
                .iter()
                .map(|param| (param, args.next().unwrap_or(Value::Null)))
                .collect();
            self.bind_all(pairs, &frame, BindMode::Let)?;
            self.eval(&closure.body, &frame)
        });
        self.recursion_depth -= 1;
        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime for Interpreter {
    fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> InterpResult<Value> {
        match callee {
            Value::Function(closure) => self.call_closure(closure, args),
            Value::Builtin(name) => call_builtin(self, name, &args),
            Value::Method(bound) => dispatch(self, &bound.receiver, &bound.name, &args),
            other => Err(RuntimeError::not_callable(other.type_name())),
        }
    }
}

fn is_callable(value: &Value) -> bool {
    matches!(value, Value::Function(_) | Value::Builtin(_) | Value::Method(_))
}

/// Resolve a possibly negative index against `len`
fn resolve_index(index: i64, len: usize) -> InterpResult<usize> {
    let signed_len = len as i64;
    let position = if index < 0 { signed_len + index } else { index };
    if (0..signed_len).contains(&position) {
        Ok(position as usize)
    } else {
        Err(RuntimeError::index_out_of_bounds(index, len))
    }
}

fn index_value(object: &Value, index: &Value) -> InterpResult<Value> {
    match (object, index) {
        (Value::Array(items), Value::Int(i)) => Ok(items[resolve_index(*i, items.len())?].clone()),
        (Value::Str(s), Value::Int(i)) => {
            let chars: Vec<char> = s.chars().collect();
            let c = chars[resolve_index(*i, chars.len())?];
            Ok(Value::str(c.to_string()))
        }
        (Value::Dict(dict), Value::Str(key)) => Ok(dict.get(key).cloned().unwrap_or(Value::Null)),
        (Value::Array(_) | Value::Str(_), other) => {
            Err(RuntimeError::type_mismatch("integer index", other.type_name()))
        }
        (Value::Dict(_), other) => Err(RuntimeError::type_mismatch("string key", other.type_name())),
        (other, _) => Err(RuntimeError::type_mismatch(
            "array, string or dictionary",
            other.type_name(),
        )),
    }
}
