//! Runtime errors for the interpreter
//!
//! Per-call failures are ordinary return values: every operation in this
//! crate returns `InterpResult` and callers decide whether an error halts
//! the program or is caught (see `Expr::Try`).

use crate::util::format_suggestion_hint;
use std::fmt;

/// Runtime error during binding, dispatch or evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// "did you mean" suggestion, when one is close enough
    pub hint: Option<String>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Value kind incompatible with a pattern or argument expectation
    TypeMismatch,
    /// Value of the right kind but outside the allowed range
    InvalidArgument,
    /// No implementation registered for (type, method)
    MethodNotFound,
    /// Malformed pattern reached the binder (front-end bug)
    PatternShape,
    /// Argument count outside the callable's declared arity
    ArityMismatch,
    /// Unknown identifier
    UndefinedVariable,
    /// Call of a value that is not a function, builtin or method
    NotCallable,
    /// Index outside an array
    IndexOutOfBounds,
    /// Call depth limit exceeded
    StackOverflow,
    /// Raised by the program itself via `fail(message)`
    Failed,
    /// Internal consistency failure (e.g. a type tag with no method table)
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::MethodNotFound => "MethodNotFound",
            ErrorKind::PatternShape => "PatternShape",
            ErrorKind::ArityMismatch => "ArityMismatch",
            ErrorKind::UndefinedVariable => "UndefinedVariable",
            ErrorKind::NotCallable => "NotCallable",
            ErrorKind::IndexOutOfBounds => "IndexOutOfBounds",
            ErrorKind::StackOverflow => "StackOverflow",
            ErrorKind::Failed => "Failed",
            ErrorKind::Internal => "Internal",
        }
    }

    /// Whether `try` may turn this error into a value. Malformed patterns and
    /// internal failures are bugs, not program conditions.
    pub fn is_catchable(self) -> bool {
        !matches!(self, ErrorKind::PatternShape | ErrorKind::Internal)
    }
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError {
            kind,
            message,
            hint: None,
        }
    }

    /// Attach a suggestion (no-op when `None`)
    pub fn with_hint(mut self, suggestion: Option<&str>) -> Self {
        self.hint = suggestion.map(str::to_string);
        self
    }

    pub fn type_mismatch(expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type mismatch: expected {expected}, got {got}"),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message.into())
    }

    pub fn method_not_found(type_name: &str, method: &str) -> Self {
        Self::new(
            ErrorKind::MethodNotFound,
            format!("unknown method '{method}' for {type_name}"),
        )
    }

    pub fn pattern_shape(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::PatternShape,
            format!("malformed pattern: {}", detail.into()),
        )
    }

    pub fn arity_mismatch(name: &str, expected: impl fmt::Display, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("{name} expects {expected} argument(s), got {got}"),
        )
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("undefined variable: {name}"),
        )
    }

    pub fn not_callable(type_name: &str) -> Self {
        Self::new(
            ErrorKind::NotCallable,
            format!("value of type {type_name} is not callable"),
        )
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfBounds,
            format!("index {index} out of bounds for length {len}"),
        )
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("stack overflow: call depth exceeded {limit}"),
        )
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Failed, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Internal,
            format!("internal error: {}", message.into()),
        )
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)?;
        write!(f, "{}", format_suggestion_hint(self.hint.as_deref()))
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
