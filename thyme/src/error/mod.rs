//! Error types for the host-facing surface
//!
//! Errors raised while evaluating are `RuntimeError`s; this type wraps them
//! together with everything that can go wrong around evaluation.

use crate::interp::RuntimeError;
use crate::introspect::RegistryInconsistency;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ThymeError>;

#[derive(Debug, Error)]
pub enum ThymeError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command-line input that parsed but makes no sense
    #[error("Invalid input: {message}")]
    Input { message: String },

    #[error("Registry inconsistency: {0}")]
    Registry(#[from] RegistryInconsistency),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl ThymeError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } | Self::Config { .. } | Self::Input { .. } | Self::Json(_) => 2,
            Self::Registry(_) => 3,
            Self::Runtime(_) => 1,
        }
    }
}
