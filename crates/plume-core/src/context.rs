//! The [`LoggingContext`]: registry of loggers plus configuration lifecycle.
//!
//! A context owns the name → logger map and the active configuration
//! factory. Lookups are atomic insert-if-absent: a read lock serves the
//! common case, and creation happens under the write lock so two threads
//! asking for the same name always get the same `Arc<Logger>`.
//!
//! Contexts are plain values. Tests build their own; the legacy facade
//! shares one process-wide instance via [`LoggingContext::global`].

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use plume_types::{ancestors, is_root_name};

use crate::config::{Configuration, ConfigurationFactory};
use crate::error::{ConfigError, ConfigResult};
use crate::logger::Logger;
use crate::traits::Sink;

/// Tracing target for configuration lifecycle messages.
pub const CONFIG_TARGET: &str = "plume::config";

static GLOBAL: OnceLock<Arc<LoggingContext>> = OnceLock::new();

/// Registry of loggers and owner of the active configuration factory.
pub struct LoggingContext {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
    factory: RwLock<Option<Arc<dyn ConfigurationFactory>>>,
}

impl LoggingContext {
    /// A fresh context: root at [`DEFAULT_ROOT_LEVEL`](crate::DEFAULT_ROOT_LEVEL),
    /// no other loggers, no factory.
    pub fn new() -> Self {
        Self {
            root: Arc::new(Logger::root()),
            loggers: RwLock::new(HashMap::new()),
            factory: RwLock::new(None),
        }
    }

    /// The process-wide context, created on first use.
    pub fn global() -> Arc<LoggingContext> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(LoggingContext::new())))
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// The root logger.
    pub fn root_logger(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Retrieve the logger for `name`, creating it (and any missing
    /// ancestors) on first use. Never fails; `""` and `"root"` return the
    /// root logger.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        if is_root_name(name) {
            return self.root_logger();
        }
        {
            let map = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(logger) = map.get(name) {
                return Arc::clone(logger);
            }
        }
        let mut map = self.loggers.write().unwrap_or_else(PoisonError::into_inner);
        Self::get_or_create(&mut map, &self.root, name)
    }

    fn get_or_create(
        map: &mut HashMap<String, Arc<Logger>>,
        root: &Arc<Logger>,
        name: &str,
    ) -> Arc<Logger> {
        // Collect the missing names, nearest first, until an existing node.
        let mut parent = Arc::clone(root);
        let mut missing = Vec::new();
        for candidate in std::iter::once(name).chain(ancestors(name)) {
            if is_root_name(candidate) {
                break;
            }
            if let Some(existing) = map.get(candidate) {
                parent = Arc::clone(existing);
                break;
            }
            missing.push(candidate);
        }
        for candidate in missing.into_iter().rev() {
            let logger = Arc::new(Logger::child(candidate, parent));
            map.insert(candidate.to_string(), Arc::clone(&logger));
            tracing::trace!(target: CONFIG_TARGET, logger = candidate, "created logger");
            parent = logger;
        }
        parent
    }

    /// Look up an existing logger without creating it.
    pub fn exists(&self, name: &str) -> Option<Arc<Logger>> {
        if is_root_name(name) {
            return Some(self.root_logger());
        }
        let map = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).cloned()
    }

    /// Sorted names of every non-root logger created so far.
    pub fn current_loggers(&self) -> Vec<String> {
        let map = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }

    fn all_loggers(&self) -> Vec<Arc<Logger>> {
        let map = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
        let mut loggers: Vec<Arc<Logger>> = Vec::with_capacity(map.len() + 1);
        loggers.push(self.root_logger());
        loggers.extend(map.values().cloned());
        loggers
    }

    // -----------------------------------------------------------------------
    // Configuration lifecycle
    // -----------------------------------------------------------------------

    /// Install `factory` as the active configuration source, replacing any
    /// previous one. Takes effect on the next [`reconfigure`](Self::reconfigure).
    pub fn install_configuration_factory(&self, factory: Arc<dyn ConfigurationFactory>) {
        tracing::debug!(
            target: CONFIG_TARGET,
            factory = factory.name(),
            "installed configuration factory"
        );
        *self.factory.write().unwrap_or_else(PoisonError::into_inner) = Some(factory);
    }

    /// Remove `factory` if it is the active one (by identity). Returns
    /// `true` if it was removed. The current logger state is left as is.
    pub fn remove_configuration_factory(&self, factory: &Arc<dyn ConfigurationFactory>) -> bool {
        let mut active = self.factory.write().unwrap_or_else(PoisonError::into_inner);
        let matches = active
            .as_ref()
            .is_some_and(|current| same_factory(current, factory));
        if matches {
            *active = None;
            tracing::debug!(
                target: CONFIG_TARGET,
                factory = factory.name(),
                "removed configuration factory"
            );
        }
        matches
    }

    /// The active configuration factory, if any.
    pub fn configuration_factory(&self) -> Option<Arc<dyn ConfigurationFactory>> {
        self.factory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-derive every logger's level, additivity, and sinks from the
    /// active factory.
    ///
    /// On error nothing is changed. Logger handles survive; they simply
    /// observe the new state.
    pub fn reconfigure(&self) -> ConfigResult<()> {
        let factory = self.configuration_factory().ok_or(ConfigError::NoFactory)?;
        let config = factory.configuration().inspect_err(|err| {
            tracing::error!(
                target: CONFIG_TARGET,
                factory = factory.name(),
                error = %err,
                "configuration factory failed"
            );
        })?;
        self.apply(&config);
        tracing::info!(
            target: CONFIG_TARGET,
            factory = factory.name(),
            root_level = %config.root_level(),
            loggers = config.loggers().len(),
            "logging context reconfigured"
        );
        Ok(())
    }

    /// Move every logger to the state `config` describes; loggers it does
    /// not name return to their defaults.
    ///
    /// Each logger goes straight from its old state to the new one, so a
    /// call racing with reconfiguration sees the old sink list or the new
    /// one, never an empty interim list.
    pub fn apply(&self, config: &Configuration) {
        let resolve = |names: &[String]| -> Vec<Arc<dyn Sink>> {
            names
                .iter()
                .filter_map(|name| config.sink(name).cloned())
                .collect()
        };

        self.root.install(Some(config.root_level()), true, resolve(config.root_sinks()));

        let mut configured = HashSet::with_capacity(config.loggers().len());
        for settings in config.loggers() {
            let logger = self.get_logger(&settings.name);
            logger.install(settings.level, settings.additivity, resolve(&settings.sinks));
            configured.insert(settings.name.as_str());
        }

        for logger in self.all_loggers() {
            if !logger.is_root() && !configured.contains(logger.name()) {
                logger.reset();
            }
        }
    }

    /// Return every logger to its defaults (root at
    /// [`DEFAULT_ROOT_LEVEL`](crate::DEFAULT_ROOT_LEVEL), no explicit levels,
    /// additive, no sinks) without consulting the factory.
    pub fn reset(&self) {
        for logger in self.all_loggers() {
            logger.reset();
        }
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .loggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let factory = self.configuration_factory().map(|f| f.name().to_string());
        f.debug_struct("LoggingContext")
            .field("logger_count", &count)
            .field("factory", &factory)
            .finish()
    }
}

fn same_factory(a: &Arc<dyn ConfigurationFactory>, b: &Arc<dyn ConfigurationFactory>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
