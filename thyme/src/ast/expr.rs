//! Expression AST nodes

use super::Pattern;
use serde::{Deserialize, Serialize};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `null`
    NullLit,
    /// Boolean literal
    BoolLit(bool),
    /// Integer literal
    IntLit(i64),
    /// Float literal
    FloatLit(f64),
    /// String literal
    StrLit(String),

    /// Variable reference
    Var(String),

    /// Array literal: `[a, b, c]`
    ArrayLit(Vec<Expr>),

    /// Dictionary literal: `{key: value, ...}` (keys keep source order)
    DictLit(Vec<(String, Expr)>),

    /// Member access: `expr.name`
    ///
    /// Reads a dictionary key, or yields a bound method value for any
    /// receiver whose type registers a method called `name`.
    Member { object: Box<Expr>, name: String },

    /// Index access: `expr[index]`
    Index { object: Box<Expr>, index: Box<Expr> },

    /// Method call: `receiver.method(args)`
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },

    /// Call of any callable value: `callee(args)`
    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// Function literal: `fn(p1, [a, b], {c}) { body }`
    Function { params: Vec<Pattern>, body: Box<Expr> },

    /// `let pattern = value` (declares in the current frame, yields null)
    Let { pattern: Pattern, value: Box<Expr> },

    /// `pattern = value` (updates the declaring frame, yields null)
    Assign { pattern: Pattern, value: Box<Expr> },

    /// Block: `{ expr1; expr2; ...; result }` in a fresh lexical frame
    Block(Vec<Expr>),

    /// `try expr`: a failing expression yields an error value instead of
    /// aborting evaluation
    Try(Box<Expr>),
}

impl Expr {
    pub fn str(s: impl Into<String>) -> Self {
        Expr::StrLit(s.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn member(object: Expr, name: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            name: name.into(),
        }
    }

    pub fn index(object: Expr, index: Expr) -> Self {
        Expr::Index {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn method(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn function(params: Vec<Pattern>, body: Expr) -> Self {
        Expr::Function {
            params,
            body: Box::new(body),
        }
    }

    pub fn let_(pattern: Pattern, value: Expr) -> Self {
        Expr::Let {
            pattern,
            value: Box::new(value),
        }
    }

    pub fn assign(pattern: Pattern, value: Expr) -> Self {
        Expr::Assign {
            pattern,
            value: Box::new(value),
        }
    }

    pub fn try_(expr: Expr) -> Self {
        Expr::Try(Box::new(expr))
    }

    /// Array literal of integers (test and demo convenience)
    pub fn ints(values: &[i64]) -> Self {
        Expr::ArrayLit(values.iter().map(|n| Expr::IntLit(*n)).collect())
    }
}
