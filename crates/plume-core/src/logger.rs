//! The [`Logger`]: a named node in the logger hierarchy.
//!
//! A logger owns an optional explicit level, an additivity flag, and an
//! ordered list of sinks. Every leveled call funnels into one dispatch path
//! ([`Logger::forced_log`]):
//!
//! 1. resolve the effective level and return early if the call is below it;
//! 2. build one [`LogEvent`];
//! 3. hand it to this logger's sinks in attachment order;
//! 4. while the logger just delivered to is additive, repeat step 3 on its
//!    parent. Ancestor levels are not consulted again.
//!
//! Sink failures (errors and panics) are isolated per sink and reported on
//! the `plume::delivery` tracing target. A logging call never fails.

use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use plume_types::{ErrorInfo, Level, LogEvent};

use crate::traits::Sink;

/// Level the root logger starts with and returns to on reset.
pub const DEFAULT_ROOT_LEVEL: Level = Level::Debug;

/// Tracing target for sink delivery failures.
pub const DELIVERY_TARGET: &str = "plume::delivery";

type SinkList = Arc<Vec<Arc<dyn Sink>>>;

/// Outcome of a dispatch through [`Logger::forced_log`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The call was below the effective level; no event was built.
    Filtered,
    /// An event was built and offered to `sinks` sinks, `failures` of
    /// which returned an error or panicked.
    Delivered { sinks: usize, failures: usize },
}

impl Delivery {
    /// Returns `true` if the call was filtered out.
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Filtered)
    }

    /// Number of sinks the event was offered to.
    pub fn sink_count(&self) -> usize {
        match self {
            Self::Filtered => 0,
            Self::Delivered { sinks, .. } => *sinks,
        }
    }
}

/// A named emitter in the logger hierarchy.
///
/// Loggers are only created by a [`LoggingContext`](crate::LoggingContext),
/// which guarantees one instance per name and links each logger to its
/// parent. Handles are `Arc<Logger>` and stay valid for the life of the
/// context, across reconfiguration.
pub struct Logger {
    name: String,
    parent: Option<Arc<Logger>>,
    level: RwLock<Option<Level>>,
    additive: AtomicBool,
    sinks: RwLock<SinkList>,
}

impl Logger {
    pub(crate) fn root() -> Self {
        Self {
            name: plume_types::ROOT_LOGGER_NAME.to_string(),
            parent: None,
            level: RwLock::new(Some(DEFAULT_ROOT_LEVEL)),
            additive: AtomicBool::new(true),
            sinks: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub(crate) fn child(name: &str, parent: Arc<Logger>) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(parent),
            level: RwLock::new(None),
            additive: AtomicBool::new(true),
            sinks: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Replace level, additivity and sinks in place. The sink list is
    /// swapped in one step: a concurrent dispatch sees the old list or the
    /// new one. A `None` level on the root becomes [`DEFAULT_ROOT_LEVEL`].
    pub(crate) fn install(
        &self,
        level: Option<Level>,
        additive: bool,
        sinks: Vec<Arc<dyn Sink>>,
    ) {
        let level = if self.is_root() {
            level.or(Some(DEFAULT_ROOT_LEVEL))
        } else {
            level
        };
        let mut unique: Vec<Arc<dyn Sink>> = Vec::with_capacity(sinks.len());
        for sink in sinks {
            if !unique.iter().any(|s| same_sink(s, &sink)) {
                unique.push(sink);
            }
        }
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
        self.additive.store(additive, Ordering::Release);
        *self.sinks.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(unique);
    }

    /// Restore the freshly created state: no explicit level (the root keeps
    /// [`DEFAULT_ROOT_LEVEL`]), additive, no sinks.
    pub(crate) fn reset(&self) {
        self.install(None, true, Vec::new());
    }

    /// Dotted name of this logger (`""` for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent logger, or `None` for the root.
    pub fn parent(&self) -> Option<&Arc<Logger>> {
        self.parent.as_ref()
    }

    /// Returns `true` for the root logger.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    // -----------------------------------------------------------------------
    // Level
    // -----------------------------------------------------------------------

    /// Explicit level, or `None` when inherited.
    pub fn level(&self) -> Option<Level> {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the explicit level; `None` means inherit from the parent.
    ///
    /// The root must always have a level, so `None` on the root is ignored.
    pub fn set_level(&self, level: Option<Level>) {
        if level.is_none() && self.is_root() {
            tracing::warn!("ignoring attempt to clear the root logger level");
            return;
        }
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    /// Level used for filtering: this logger's own level, else the nearest
    /// ancestor's. Resolved on every call, so ancestor changes are seen
    /// immediately.
    pub fn effective_level(&self) -> Level {
        let mut current = Some(self);
        while let Some(logger) = current {
            if let Some(level) = logger.level() {
                return level;
            }
            current = logger.parent.as_deref();
        }
        DEFAULT_ROOT_LEVEL
    }

    /// Returns `true` if a call at `level` would produce an event.
    pub fn is_enabled_for(&self, level: Level) -> bool {
        Level::is_enabled_for(level, self.effective_level())
    }

    // -----------------------------------------------------------------------
    // Additivity
    // -----------------------------------------------------------------------

    /// Whether events continue to the parent's sinks.
    pub fn additivity(&self) -> bool {
        self.additive.load(Ordering::Acquire)
    }

    /// Set whether events continue to the parent's sinks.
    pub fn set_additivity(&self, additive: bool) {
        self.additive.store(additive, Ordering::Release);
    }

    // -----------------------------------------------------------------------
    // Sinks
    // -----------------------------------------------------------------------

    fn sink_list(&self) -> SinkList {
        let guard = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    fn update_sinks<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Vec<Arc<dyn Sink>>) -> bool,
    {
        let mut guard = self.sinks.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Vec::clone(&**guard);
        let changed = f(&mut next);
        if changed {
            *guard = Arc::new(next);
        }
        changed
    }

    /// Attach a sink. Returns `false` if this exact sink (by identity) is
    /// already attached, in which case nothing changes.
    pub fn add_sink(&self, sink: Arc<dyn Sink>) -> bool {
        self.update_sinks(|sinks| {
            if sinks.iter().any(|s| same_sink(s, &sink)) {
                return false;
            }
            sinks.push(sink);
            true
        })
    }

    /// Detach a sink by identity. Returns `true` if it was attached.
    pub fn remove_sink(&self, sink: &Arc<dyn Sink>) -> bool {
        self.update_sinks(|sinks| {
            let before = sinks.len();
            sinks.retain(|s| !same_sink(s, sink));
            sinks.len() != before
        })
    }

    /// Detach every sink with the given name. Returns `true` if any was.
    pub fn remove_sink_named(&self, name: &str) -> bool {
        self.update_sinks(|sinks| {
            let before = sinks.len();
            sinks.retain(|s| s.name() != name);
            sinks.len() != before
        })
    }

    /// Detach all sinks.
    pub fn remove_all_sinks(&self) {
        self.update_sinks(|sinks| {
            let had_any = !sinks.is_empty();
            sinks.clear();
            had_any
        });
    }

    /// Snapshot of the attached sinks, in attachment order.
    pub fn sinks(&self) -> Vec<Arc<dyn Sink>> {
        self.sink_list().to_vec()
    }

    /// First attached sink with the given name.
    pub fn sink_named(&self, name: &str) -> Option<Arc<dyn Sink>> {
        self.sink_list().iter().find(|s| s.name() == name).cloned()
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Generic dispatch entry point.
    ///
    /// `caller` names the facade issuing the call and is recorded on the
    /// event. Filtering, event construction, and delivery all happen here.
    pub fn forced_log(
        &self,
        caller: Option<&str>,
        level: Level,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Delivery {
        self.dispatch(caller, level, || message.to_string(), error)
    }

    fn dispatch<F>(
        &self,
        caller: Option<&str>,
        level: Level,
        render: F,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Delivery
    where
        F: FnOnce() -> String,
    {
        if !self.is_enabled_for(level) {
            return Delivery::Filtered;
        }
        let event = LogEvent::new(self.name.as_str(), level, render())
            .with_error(error.map(ErrorInfo::from_error))
            .with_caller(caller);
        self.deliver(&event)
    }

    fn deliver(&self, event: &LogEvent) -> Delivery {
        let mut sinks = 0;
        let mut failures = 0;
        let mut current = Some(self);
        while let Some(logger) = current {
            for sink in logger.sink_list().iter() {
                sinks += 1;
                if !deliver_to(sink.as_ref(), event) {
                    failures += 1;
                }
            }
            if !logger.additivity() {
                break;
            }
            current = logger.parent.as_deref();
        }
        Delivery::Delivered { sinks, failures }
    }

    /// Log `message` at `level`.
    pub fn log(&self, level: Level, message: &str) -> Delivery {
        self.forced_log(None, level, message, None)
    }

    /// Log pre-built format arguments at `level`. Formatting only happens
    /// when the call passes the level check.
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) -> Delivery {
        self.dispatch(None, level, || args.to_string(), None)
    }

    /// Log `message` at `level` with an optional associated error.
    pub fn log_error(
        &self,
        level: Level,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Delivery {
        self.forced_log(None, level, message, error)
    }

    /// Log at TRACE.
    pub fn trace(&self, message: &str) {
        self.log(Level::Trace, message);
    }

    /// Log at DEBUG.
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Log at INFO.
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Log at WARN.
    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Log at ERROR.
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Log at FATAL.
    pub fn fatal(&self, message: &str) {
        self.log(Level::Fatal, message);
    }
}

fn same_sink(a: &Arc<dyn Sink>, b: &Arc<dyn Sink>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Offer `event` to one sink, containing errors and panics.
fn deliver_to(sink: &dyn Sink, event: &LogEvent) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| sink.receive(event))) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            tracing::warn!(
                target: DELIVERY_TARGET,
                sink = sink.name(),
                logger = %event.logger,
                error = %err,
                "sink failed to receive event"
            );
            false
        }
        Err(_) => {
            tracing::warn!(
                target: DELIVERY_TARGET,
                sink = sink.name(),
                logger = %event.logger,
                "sink panicked while receiving event"
            );
            false
        }
    }
}

// Unlink the parent chain iteratively; the default drop would recurse once
// per ancestor released.
impl Drop for Logger {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(logger) = parent {
            parent = match Arc::try_unwrap(logger) {
                Ok(mut logger) => logger.parent.take(),
                Err(_) => None,
            };
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("additive", &self.additivity())
            .field("sink_count", &self.sink_list().len())
            .finish()
    }
}
