//! Configuration consumed by [`LoggingContext::reconfigure`](crate::LoggingContext::reconfigure).
//!
//! A [`ConfigurationFactory`] produces a validated [`Configuration`]: the
//! root level, the sinks it defines (by name), which of them attach to the
//! root, and per-logger overrides. Building goes through
//! [`ConfigurationBuilder`], which rejects dangling sink references and
//! malformed logger names before anything touches a live context.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use plume_types::{is_root_name, validate_logger_name, Level};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::traits::Sink;

// ---------------------------------------------------------------------------
// ConfigurationFactory
// ---------------------------------------------------------------------------

/// Source of configuration for a logging context.
pub trait ConfigurationFactory: Send + Sync {
    /// Human-readable name of this factory.
    fn name(&self) -> &str;

    /// Produce the configuration to apply.
    fn configuration(&self) -> ConfigResult<Configuration>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Per-logger settings inside a [`Configuration`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Dotted logger name.
    pub name: String,
    /// Explicit level; `None` inherits.
    pub level: Option<Level>,
    /// Whether events continue to ancestor sinks.
    pub additivity: bool,
    /// Names of sinks to attach, in order.
    pub sinks: Vec<String>,
}

impl LoggerConfig {
    /// Settings for `name` with no level, additive, no sinks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: None,
            additivity: true,
            sinks: Vec::new(),
        }
    }

    /// Set an explicit level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Set additivity.
    pub fn with_additivity(mut self, additivity: bool) -> Self {
        self.additivity = additivity;
        self
    }

    /// Attach a sink by name.
    pub fn with_sink(mut self, sink: impl Into<String>) -> Self {
        self.sinks.push(sink.into());
        self
    }
}

/// A validated logging configuration.
///
/// Only obtainable through [`ConfigurationBuilder::build`], so every sink
/// reference resolves and the root level is always present.
#[derive(Clone)]
pub struct Configuration {
    root_level: Level,
    root_sinks: Vec<String>,
    sinks: HashMap<String, Arc<dyn Sink>>,
    loggers: Vec<LoggerConfig>,
}

impl Configuration {
    /// Start building a configuration.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Level assigned to the root logger.
    pub fn root_level(&self) -> Level {
        self.root_level
    }

    /// Sink names attached to the root logger.
    pub fn root_sinks(&self) -> &[String] {
        &self.root_sinks
    }

    /// Look up a defined sink.
    pub fn sink(&self, name: &str) -> Option<&Arc<dyn Sink>> {
        self.sinks.get(name)
    }

    /// Number of defined sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Per-logger settings, in definition order.
    pub fn loggers(&self) -> &[LoggerConfig] {
        &self.loggers
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sink_names: Vec<&String> = self.sinks.keys().collect();
        sink_names.sort();
        f.debug_struct("Configuration")
            .field("root_level", &self.root_level)
            .field("root_sinks", &self.root_sinks)
            .field("sinks", &sink_names)
            .field("loggers", &self.loggers)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ConfigurationBuilder
// ---------------------------------------------------------------------------

/// Assembles and validates a [`Configuration`].
#[derive(Default)]
pub struct ConfigurationBuilder {
    root_level: Option<Level>,
    root_sinks: Vec<String>,
    sinks: Vec<Arc<dyn Sink>>,
    loggers: Vec<LoggerConfig>,
}

impl ConfigurationBuilder {
    /// An empty builder. A root level must be set before [`build`](Self::build).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root level.
    pub fn root_level(mut self, level: Level) -> Self {
        self.root_level = Some(level);
        self
    }

    /// Define a sink, addressable by its [`Sink::name`].
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Attach a defined sink to the root logger.
    pub fn root_sink(mut self, name: impl Into<String>) -> Self {
        self.root_sinks.push(name.into());
        self
    }

    /// Add per-logger settings.
    pub fn logger(mut self, logger: LoggerConfig) -> Self {
        self.loggers.push(logger);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> ConfigResult<Configuration> {
        let root_level = self.root_level.ok_or(ConfigError::MissingRootLevel)?;

        let mut sinks: HashMap<String, Arc<dyn Sink>> = HashMap::with_capacity(self.sinks.len());
        for sink in self.sinks {
            let name = sink.name().to_string();
            if sinks.contains_key(&name) {
                return Err(ConfigError::DuplicateSink { name });
            }
            sinks.insert(name, sink);
        }

        for name in &self.root_sinks {
            if !sinks.contains_key(name) {
                return Err(ConfigError::UnknownSink {
                    logger: plume_types::ROOT_LOGGER_NAME.to_string(),
                    sink: name.clone(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.loggers.len());
        for logger in &self.loggers {
            if is_root_name(&logger.name) {
                return Err(ConfigError::InvalidLoggerName {
                    name: logger.name.clone(),
                    reason: "the root logger is configured through the root settings".into(),
                });
            }
            validate_logger_name(&logger.name)?;
            if !seen.insert(logger.name.as_str()) {
                return Err(ConfigError::InvalidLoggerName {
                    name: logger.name.clone(),
                    reason: "configured more than once".into(),
                });
            }
            if let Some(missing) = logger.sinks.iter().find(|s| !sinks.contains_key(*s)) {
                return Err(ConfigError::UnknownSink {
                    logger: logger.name.clone(),
                    sink: missing.clone(),
                });
            }
        }

        Ok(Configuration {
            root_level,
            root_sinks: self.root_sinks,
            sinks,
            loggers: self.loggers,
        })
    }
}

// ---------------------------------------------------------------------------
// BasicConfigurationFactory
// ---------------------------------------------------------------------------

/// Minimal factory: root at [`Level::Debug`], optionally with sinks
/// attached to the root.
#[derive(Default)]
pub struct BasicConfigurationFactory {
    root_sinks: Vec<Arc<dyn Sink>>,
}

impl BasicConfigurationFactory {
    /// A factory with no sinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `sink` to the root in every configuration produced.
    pub fn with_root_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.root_sinks.push(sink);
        self
    }
}

impl ConfigurationFactory for BasicConfigurationFactory {
    fn name(&self) -> &str {
        "basic"
    }

    fn configuration(&self) -> ConfigResult<Configuration> {
        let mut builder = ConfigurationBuilder::new().root_level(Level::Debug);
        for sink in &self.root_sinks {
            builder = builder.root_sink(sink.name()).sink(Arc::clone(sink));
        }
        builder.build()
    }
}

// ---------------------------------------------------------------------------
// Serializable settings
// ---------------------------------------------------------------------------

/// Root logger settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSettings {
    /// Root level. Required by [`SettingsConfigurationFactory`].
    pub level: Option<Level>,
    /// Names of sinks attached to the root.
    #[serde(default)]
    pub sinks: Vec<String>,
}

/// Settings for one named logger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Explicit level; omitted means inherit.
    #[serde(default)]
    pub level: Option<Level>,
    /// Whether events continue to ancestor sinks.
    #[serde(default = "default_additivity")]
    pub additivity: bool,
    /// Names of sinks to attach.
    #[serde(default)]
    pub sinks: Vec<String>,
}

fn default_additivity() -> bool {
    true
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: None,
            additivity: true,
            sinks: Vec::new(),
        }
    }
}

/// Plain-data logging settings, suitable for loading from a file.
///
/// Sinks are not data; they are registered alongside the settings on a
/// [`SettingsConfigurationFactory`] and referred to here by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Root logger settings.
    pub root: RootSettings,
    /// Per-logger settings keyed by dotted name.
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerSettings>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            root: RootSettings {
                level: Some(Level::Debug),
                sinks: Vec::new(),
            },
            loggers: BTreeMap::new(),
        }
    }
}

/// Factory that turns [`LoggingSettings`] plus registered sinks into a
/// [`Configuration`].
pub struct SettingsConfigurationFactory {
    name: String,
    settings: LoggingSettings,
    sinks: Vec<Arc<dyn Sink>>,
}

impl SettingsConfigurationFactory {
    /// Wrap `settings` under the given factory name.
    pub fn new(name: impl Into<String>, settings: LoggingSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            sinks: Vec::new(),
        }
    }

    /// Register a sink the settings may refer to by name.
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// The wrapped settings.
    pub fn settings(&self) -> &LoggingSettings {
        &self.settings
    }
}

impl ConfigurationFactory for SettingsConfigurationFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn configuration(&self) -> ConfigResult<Configuration> {
        let root_level = self.settings.root.level.ok_or(ConfigError::MissingRootLevel)?;
        let mut builder = ConfigurationBuilder::new().root_level(root_level);
        for sink in &self.sinks {
            builder = builder.sink(Arc::clone(sink));
        }
        for name in &self.settings.root.sinks {
            builder = builder.root_sink(name.as_str());
        }
        for (name, logger) in &self.settings.loggers {
            builder = builder.logger(LoggerConfig {
                name: name.clone(),
                level: logger.level,
                additivity: logger.additivity,
                sinks: logger.sinks.clone(),
            });
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ListSink;

    #[test]
    fn build_requires_root_level() {
        let err = ConfigurationBuilder::new().build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingRootLevel));
    }

    #[test]
    fn build_rejects_unknown_root_sink() {
        let err = ConfigurationBuilder::new()
            .root_level(Level::Info)
            .root_sink("console")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSink { ref sink, .. } if sink == "console"));
    }

    #[test]
    fn build_rejects_unknown_logger_sink() {
        let err = ConfigurationBuilder::new()
            .root_level(Level::Info)
            .logger(LoggerConfig::new("a.b").with_sink("missing"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSink { ref logger, .. } if logger == "a.b"));
    }

    #[test]
    fn build_rejects_duplicate_sink_names() {
        let err = ConfigurationBuilder::new()
            .root_level(Level::Info)
            .sink(Arc::new(ListSink::new("List")))
            .sink(Arc::new(ListSink::new("List")))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSink { ref name } if name == "List"));
    }

    #[test]
    fn build_rejects_malformed_logger_name() {
        let err = ConfigurationBuilder::new()
            .root_level(Level::Info)
            .logger(LoggerConfig::new("bad..name"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLoggerName { .. }));
    }

    #[test]
    fn build_rejects_root_alias_as_logger() {
        for name in ["root", "ROOT"] {
            let err = ConfigurationBuilder::new()
                .root_level(Level::Warn)
                .logger(LoggerConfig::new(name).with_level(Level::Trace))
                .build()
                .unwrap_err();
            let ConfigError::InvalidLoggerName { reason, .. } = err else {
                panic!("expected InvalidLoggerName for {name}");
            };
            assert!(reason.contains("root settings"));
        }
    }

    #[test]
    fn build_rejects_logger_configured_twice() {
        let err = ConfigurationBuilder::new()
            .root_level(Level::Info)
            .logger(LoggerConfig::new("svc").with_level(Level::Warn))
            .logger(LoggerConfig::new("svc").with_level(Level::Error))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLoggerName { ref name, .. } if name == "svc"));
    }

    #[test]
    fn settings_factory_rejects_root_logger_section() {
        let mut settings = LoggingSettings::default();
        settings.loggers.insert(
            "root".into(),
            LoggerSettings {
                level: Some(Level::Trace),
                ..LoggerSettings::default()
            },
        );
        let factory = SettingsConfigurationFactory::new("file", settings);
        assert!(matches!(
            factory.configuration().unwrap_err(),
            ConfigError::InvalidLoggerName { ref name, .. } if name == "root"
        ));
    }

    #[test]
    fn build_keeps_logger_order() {
        let config = Configuration::builder()
            .root_level(Level::Warn)
            .sink(Arc::new(ListSink::new("List")))
            .root_sink("List")
            .logger(LoggerConfig::new("z").with_level(Level::Trace))
            .logger(LoggerConfig::new("a").with_additivity(false).with_sink("List"))
            .build()
            .unwrap();
        assert_eq!(config.root_level(), Level::Warn);
        assert_eq!(config.root_sinks(), ["List".to_string()]);
        assert_eq!(config.sink_count(), 1);
        let names: Vec<&str> = config.loggers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn basic_factory_uses_debug_root() {
        let factory = BasicConfigurationFactory::new()
            .with_root_sink(Arc::new(ListSink::new("List")));
        let config = factory.configuration().unwrap();
        assert_eq!(config.root_level(), Level::Debug);
        assert!(config.sink("List").is_some());
        assert_eq!(factory.name(), "basic");
    }

    #[test]
    fn settings_factory_requires_root_level() {
        let settings = LoggingSettings {
            root: RootSettings::default(),
            loggers: BTreeMap::new(),
        };
        let factory = SettingsConfigurationFactory::new("file", settings);
        assert!(matches!(
            factory.configuration().unwrap_err(),
            ConfigError::MissingRootLevel
        ));
    }

    #[test]
    fn settings_factory_maps_loggers() {
        let mut settings = LoggingSettings::default();
        settings.loggers.insert(
            "org.example".into(),
            LoggerSettings {
                level: Some(Level::Error),
                additivity: false,
                sinks: vec!["List".into()],
            },
        );
        let factory = SettingsConfigurationFactory::new("file", settings)
            .with_sink(Arc::new(ListSink::new("List")));
        let config = factory.configuration().unwrap();
        let logger = &config.loggers()[0];
        assert_eq!(logger.name, "org.example");
        assert_eq!(logger.level, Some(Level::Error));
        assert!(!logger.additivity);
    }

    #[test]
    fn default_settings_are_valid() {
        let factory = SettingsConfigurationFactory::new("default", LoggingSettings::default());
        assert_eq!(factory.configuration().unwrap().root_level(), Level::Debug);
    }

    #[test]
    fn logger_settings_default_to_additive() {
        assert!(LoggerSettings::default().additivity);
        assert!(LoggerConfig::new("x").additivity);
    }
}
