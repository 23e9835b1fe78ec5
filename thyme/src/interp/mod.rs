//! Tree-walking runtime
//!
//! Evaluates already-parsed expression trees: lexical environments,
//! destructuring, method dispatch on values, and the global builtins.

mod bind;
pub mod builtins;
mod dispatch;
mod env;
mod error;
mod eval;
pub mod methods;
mod value;

pub use bind::BindMode;
pub use builtins::{BuiltinEntry, BuiltinFn, builtin_names, call_builtin, lookup_builtin};
pub use dispatch::{MethodEntry, MethodFn, MethodTable, Runtime, dispatch, method_table};
pub use env::{EnvRef, Environment, child_env};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{DEFAULT_MAX_DEPTH, Interpreter};
pub use value::{BoundMethod, Closure, Dict, TypeTag, Value};
