use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown level: {0}")]
    UnknownLevel(String),

    #[error("invalid logger name {name:?}: {reason}")]
    InvalidLoggerName { name: String, reason: String },
}
