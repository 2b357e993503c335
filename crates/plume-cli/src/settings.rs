//! Loading [`LoggingSettings`] from TOML files.
//!
//! ```toml
//! [root]
//! level = "info"
//! sinks = ["console"]
//!
//! [loggers."org.example"]
//! level = "debug"
//! additivity = false
//! sinks = ["console"]
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use plume_core::{LoggingContext, LoggingSettings, SettingsConfigurationFactory, TracingSink};

/// Name under which the console sink is available to settings files.
pub const CONSOLE_SINK: &str = "console";

/// Parse settings from TOML text.
pub fn parse_settings(text: &str) -> anyhow::Result<LoggingSettings> {
    toml::from_str(text).context("invalid logging settings")
}

/// Read and parse a settings file.
pub fn load_settings(path: &Path) -> anyhow::Result<LoggingSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_settings(&text).with_context(|| format!("in {}", path.display()))
}

/// Build a context configured from `settings`, with the console sink
/// registered under [`CONSOLE_SINK`].
pub fn configured_context(
    source: &str,
    settings: LoggingSettings,
) -> anyhow::Result<Arc<LoggingContext>> {
    let context = Arc::new(LoggingContext::new());
    let factory = SettingsConfigurationFactory::new(source, settings)
        .with_sink(Arc::new(TracingSink::new(CONSOLE_SINK)));
    context.install_configuration_factory(Arc::new(factory));
    context
        .reconfigure()
        .with_context(|| format!("failed to apply settings from {source}"))?;
    Ok(context)
}
