//! Abstract Syntax Tree definitions
//!
//! The front end hands these trees over already validated; this crate only
//! evaluates them.

mod expr;
mod pattern;

pub use expr::*;
pub use pattern::*;
