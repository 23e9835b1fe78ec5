//! Thyme runtime library
//!
//! Runtime core of a server-side template language: lexical environments,
//! destructuring binding, value methods (including random `pick`, `take`
//! and `shuffle`), and a checked metadata registry behind `inspect`,
//! `describe` and `builtins`.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod introspect;
pub mod util;

pub use config::RuntimeConfig;
pub use error::{Result, ThymeError};
pub use interp::{ErrorKind, Interpreter, RuntimeError, TypeTag, Value};
