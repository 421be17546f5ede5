//! Error types for husk.

use std::io;

/// Errors produced by the husk engine.
///
/// `Validation` is the one recoverable kind: it carries the name of the
/// command that rejected its input, and the dispatcher turns it into the
/// stage's visible output instead of aborting the line. Everything else
/// signals a broken invariant or a failed environment and propagates.
#[derive(Debug, thiserror::Error)]
pub enum HuskError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("{0}: not a file")]
    NotAFile(String),

    #[error("parent directory not found: {0}")]
    ParentNotFound(String),

    #[error("parent is not a directory")]
    InvalidParent,

    #[error("{command}: {message}")]
    Validation { command: String, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl HuskError {
    /// Build a `Validation` error for `command` with the given message.
    pub fn validation(command: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            command: command.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HuskError>;
