//! Foundation types for Plume.
//!
//! This crate provides the value types shared by every other Plume crate.
//! Nothing here holds mutable state: levels are a fixed total order, names
//! are plain strings, and events are immutable once built.
//!
//! # Key Types
//!
//! - [`Level`] — Ordered severity scale (TRACE < DEBUG < INFO < WARN < ERROR < FATAL)
//! - [`LogEvent`] — Immutable record of one accepted logging call
//! - [`ErrorInfo`] — Rendered error plus its `source()` chain
//!
//! Logger-name helpers live in [`name`]: [`parent_name`], [`ancestors`] and
//! [`validate_logger_name`].

pub mod error;
pub mod event;
pub mod level;
pub mod name;

pub use error::TypeError;
pub use event::{ErrorInfo, LogEvent};
pub use level::Level;
pub use name::{ancestors, is_root_name, parent_name, validate_logger_name, ROOT_LOGGER_NAME};
