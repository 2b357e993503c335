//! Bridge from Plume events into the `tracing` ecosystem.

use plume_types::{Level, LogEvent};

use crate::error::SinkResult;
use crate::traits::Sink;

/// Tracing target used for forwarded events.
pub const FORWARD_TARGET: &str = "plume";

macro_rules! forward {
    ($mac:ident, $event:expr) => {
        match &$event.error {
            Some(error) => tracing::$mac!(
                target: FORWARD_TARGET,
                logger = %$event.logger,
                error = %error,
                "{}",
                $event.message
            ),
            None => tracing::$mac!(
                target: FORWARD_TARGET,
                logger = %$event.logger,
                "{}",
                $event.message
            ),
        }
    };
}

/// A [`Sink`] that re-emits every event through `tracing`.
///
/// The Plume level maps to the tracing level of the same name; `Fatal`
/// has no tracing counterpart and is emitted at `ERROR`. The logger name
/// travels as the `logger` field and the attached error, if any, as
/// `error`.
#[derive(Debug)]
pub struct TracingSink {
    name: String,
}

impl TracingSink {
    /// Create a forwarding sink with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("tracing")
    }
}

impl Sink for TracingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, event: &LogEvent) -> SinkResult<()> {
        match event.level {
            Level::Trace => forward!(trace, event),
            Level::Debug => forward!(debug, event),
            Level::Info => forward!(info, event),
            Level::Warn => forward!(warn, event),
            Level::Error | Level::Fatal => forward!(error, event),
        }
        Ok(())
    }
}
