use std::error::Error as StdError;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::Level;

/// An error attached to a log event, rendered at capture time.
///
/// Holding text instead of the live error keeps [`LogEvent`] `Clone` and
/// serializable, and decouples the event from the error's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// `Display` output of the top-level error.
    pub message: String,
    /// `Display` output of each `source()`, outermost first.
    pub causes: Vec<String>,
}

impl ErrorInfo {
    /// Render `error` and walk its source chain.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            causes,
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for cause in &self.causes {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

/// Immutable record of one accepted logging call.
///
/// Built once by the logger that accepted the call and then shared, by
/// reference, with every sink on the delivery path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Name of the logger the call was made on.
    pub logger: String,
    /// Level of the call.
    pub level: Level,
    /// Final message text.
    pub message: String,
    /// Associated error, if any.
    pub error: Option<ErrorInfo>,
    /// Wall-clock capture time.
    pub timestamp: DateTime<Utc>,
    /// Name of the emitting thread, when it has one.
    pub thread: Option<String>,
    /// Facade that issued the call (e.g. a legacy adapter type name).
    pub caller: Option<String>,
}

impl LogEvent {
    /// Capture an event at the current time on the current thread.
    pub fn new(logger: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            level,
            message: message.into(),
            error: None,
            timestamp: Utc::now(),
            thread: std::thread::current().name().map(str::to_string),
            caller: None,
        }
    }

    /// Attach a rendered error.
    pub fn with_error(mut self, error: Option<ErrorInfo>) -> Self {
        self.error = error;
        self
    }

    /// Record the calling facade.
    pub fn with_caller(mut self, caller: Option<&str>) -> Self {
        self.caller = caller.map(str::to_string);
        self
    }

    /// Returns `true` if an error is attached.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let logger = if self.logger.is_empty() {
            "root"
        } else {
            self.logger.as_str()
        };
        write!(f, "{} {logger} - {}", self.level, self.message)?;
        if let Some(error) = &self.error {
            write!(f, " ({error})")?;
        }
        Ok(())
    }
}
