//! Legacy `Category`/`Priority` logging API on top of `plume-core`.
//!
//! Code written against the older API keeps its vocabulary of categories,
//! priorities and appenders, while every call is translated and delegated
//! to the core [`Logger`](plume_core::Logger).
//! There is no separate hierarchy: a category and the core logger of the
//! same name are the same node.
//!
//! # Modules
//!
//! - [`priority`] — [`Priority`], the legacy severity value
//! - [`category`] — [`Category`], the legacy logging handle
//! - [`repository`] — [`LegacyRepository`]: context plus resource bundles
//! - [`bundle`] — [`ResourceBundle`], [`MapBundle`], `{N}` pattern formatting

pub mod bundle;
pub mod category;
pub mod priority;
pub mod repository;

pub use bundle::{format_pattern, MapBundle, ResourceBundle};
pub use category::{Category, FQCN};
pub use priority::Priority;
pub use repository::LegacyRepository;

/// The legacy API's name for a priority constant.
pub type Level = Priority;
