//! The [`Sink`] trait: the destination side of event delivery.

use plume_types::LogEvent;

use crate::error::SinkResult;

/// Destination for accepted log events.
///
/// Implementations must be thread-safe (`Send + Sync`): loggers call
/// `receive` synchronously from whichever thread made the logging call,
/// and many threads may log through the same sink at once.
///
/// Filtering is the logger's job. A sink receives every event that reaches
/// it and must not drop events based on level.
pub trait Sink: Send + Sync {
    /// Name used to refer to this sink from configuration.
    fn name(&self) -> &str;

    /// Accept one event.
    ///
    /// An `Err` is reported on a side channel by the dispatching logger and
    /// never reaches the code that made the logging call.
    fn receive(&self, event: &LogEvent) -> SinkResult<()>;
}
