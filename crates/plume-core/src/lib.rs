//! Level-filtered, hierarchical logging core for Plume.
//!
//! Loggers are named nodes in a dotted hierarchy (`org.example.foo` →
//! `org.example` → `org` → root). Each call on a logger is checked against
//! its effective level; accepted calls become one immutable
//! [`LogEvent`](plume_types::LogEvent) that is handed, synchronously and in
//! order, to the logger's sinks and then to its ancestors' sinks while
//! additivity allows.
//!
//! # Modules
//!
//! - [`error`] — [`SinkError`] and [`ConfigError`]
//! - [`traits`] — The [`Sink`] trait
//! - [`memory`] — In-memory [`ListSink`] for tests
//! - [`tracing_sink`] — [`TracingSink`], forwarding events into `tracing`
//! - [`logger`] — [`Logger`] and the dispatch path
//! - [`context`] — [`LoggingContext`]: registry and reconfiguration
//! - [`config`] — Configuration factories, builder, and serializable settings
//!
//! # Design Rules
//!
//! 1. One logger per name per context; lookup never fails.
//! 2. A filtered call builds no event and touches no sink.
//! 3. Sink lists are copy-on-write; dispatch never holds a lock while a
//!    sink runs.
//! 4. A sink error or panic is reported via `tracing` and never reaches
//!    the caller.
//! 5. Only configuration errors are returned to callers.

pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod memory;
pub mod tracing_sink;
pub mod traits;

pub use config::{
    BasicConfigurationFactory, Configuration, ConfigurationBuilder, ConfigurationFactory,
    LoggerConfig, LoggerSettings, LoggingSettings, RootSettings, SettingsConfigurationFactory,
};
pub use context::LoggingContext;
pub use error::{ConfigError, ConfigResult, SinkError, SinkResult};
pub use logger::{Delivery, Logger, DEFAULT_ROOT_LEVEL};
pub use memory::ListSink;
pub use tracing_sink::TracingSink;
pub use traits::Sink;

pub use plume_types::{ErrorInfo, Level, LogEvent};
