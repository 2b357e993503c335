//! Error types for the logging core.

use plume_types::TypeError;
use thiserror::Error;

/// Failure inside a [`Sink`](crate::Sink) while receiving an event.
///
/// Sink errors never reach the caller of a logging method; the logger
/// reports them on the `plume::delivery` tracing target and moves on to
/// the next sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink refused the event.
    #[error("sink rejected event: {0}")]
    Rejected(String),

    /// I/O failure in the sink's backing resource.
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the sink's state was poisoned.
    #[error("sink state lock poisoned")]
    Poisoned,
}

/// Errors raised while (re)configuring a [`LoggingContext`](crate::LoggingContext).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `reconfigure` was called with no factory installed.
    #[error("no configuration factory installed")]
    NoFactory,

    /// The configuration did not name a root level.
    #[error("configuration does not define a root level")]
    MissingRootLevel,

    /// A logger refers to a sink the configuration does not define.
    #[error("logger {logger:?} refers to unknown sink {sink:?}")]
    UnknownSink { logger: String, sink: String },

    /// Two sinks were registered under the same name.
    #[error("duplicate sink name: {name}")]
    DuplicateSink { name: String },

    /// A configured logger name is malformed.
    #[error("invalid logger name {name:?}: {reason}")]
    InvalidLoggerName { name: String, reason: String },

    /// The factory itself failed to produce a configuration.
    #[error("configuration factory failed: {0}")]
    Factory(String),
}

impl From<TypeError> for ConfigError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidLoggerName { name, reason } => {
                Self::InvalidLoggerName { name, reason }
            }
            other => Self::Factory(other.to_string()),
        }
    }
}

/// Convenience alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience alias for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;
