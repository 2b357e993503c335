//! The legacy [`Category`] facade.
//!
//! A `Category` is a thin handle: an `Arc` to the core logger of the same
//! name plus the [`LegacyRepository`] it came from. Every call translates
//! priorities to core levels and delegates to [`Logger::forced_log`], so
//! legacy and core callers share one hierarchy, one set of levels, and one
//! set of sinks.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use plume_core::{Delivery, Logger, Sink};

use crate::bundle::{format_pattern, ResourceBundle};
use crate::priority::Priority;
use crate::repository::LegacyRepository;

/// Caller tag recorded on events issued through this facade.
pub const FQCN: &str = "plume_legacy::Category";

/// Legacy named logging handle.
#[derive(Clone)]
pub struct Category {
    logger: Arc<Logger>,
    repository: Arc<LegacyRepository>,
}

impl Category {
    pub(crate) fn new(logger: Arc<Logger>, repository: Arc<LegacyRepository>) -> Self {
        Self { logger, repository }
    }

    /// The category named `name` in the global repository.
    pub fn get_instance(name: &str) -> Self {
        LegacyRepository::global().get_instance(name)
    }

    /// The root category of the global repository.
    pub fn get_root() -> Self {
        LegacyRepository::global().root()
    }

    /// The core logger this category delegates to.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// The repository this category belongs to.
    pub fn repository(&self) -> &Arc<LegacyRepository> {
        &self.repository
    }

    /// Dotted name of this category (`""` for the root).
    pub fn name(&self) -> &str {
        self.logger.name()
    }

    /// The parent category, or `None` for the root.
    pub fn parent(&self) -> Option<Category> {
        self.logger
            .parent()
            .map(|parent| Category::new(Arc::clone(parent), Arc::clone(&self.repository)))
    }

    // -----------------------------------------------------------------------
    // Additivity and levels
    // -----------------------------------------------------------------------

    /// Whether events continue to ancestor appenders.
    pub fn additivity(&self) -> bool {
        self.logger.additivity()
    }

    /// Set whether events continue to ancestor appenders.
    pub fn set_additivity(&self, additive: bool) {
        self.logger.set_additivity(additive);
    }

    /// Set the explicit priority; `None` inherits from the parent.
    pub fn set_level(&self, priority: Option<Priority>) {
        self.logger.set_level(priority.map(Priority::to_level));
    }

    /// Set the explicit priority.
    #[deprecated(note = "use `set_level`")]
    pub fn set_priority(&self, priority: Priority) {
        self.set_level(Some(priority));
    }

    /// Explicit priority, or `None` when inherited.
    pub fn level(&self) -> Option<Priority> {
        self.logger.level().map(Priority::from_level)
    }

    /// Explicit priority, or `None` when inherited.
    #[deprecated(note = "use `level`")]
    pub fn priority(&self) -> Option<Priority> {
        self.level()
    }

    /// The inherited priority: this category's, or its nearest ancestor's.
    pub fn chained_priority(&self) -> Priority {
        Priority::from_level(self.logger.effective_level())
    }

    /// Same as [`chained_priority`](Self::chained_priority).
    pub fn effective_level(&self) -> Priority {
        self.chained_priority()
    }

    /// Returns `true` if a call at `priority` would produce an event.
    pub fn is_enabled_for(&self, priority: Priority) -> bool {
        self.logger.is_enabled_for(priority.to_level())
    }

    /// Returns `true` if TRACE calls pass the level check.
    pub fn is_trace_enabled(&self) -> bool {
        self.is_enabled_for(Priority::TRACE)
    }

    /// Returns `true` if DEBUG calls pass the level check.
    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled_for(Priority::DEBUG)
    }

    /// Returns `true` if INFO calls pass the level check.
    pub fn is_info_enabled(&self) -> bool {
        self.is_enabled_for(Priority::INFO)
    }

    // -----------------------------------------------------------------------
    // Appenders
    // -----------------------------------------------------------------------

    /// Attach an appender. Returns `false` if it is already attached.
    pub fn add_appender(&self, appender: Arc<dyn Sink>) -> bool {
        self.logger.add_sink(appender)
    }

    /// Detach an appender by identity. Returns `true` if it was attached.
    pub fn remove_appender(&self, appender: &Arc<dyn Sink>) -> bool {
        self.logger.remove_sink(appender)
    }

    /// Detach every appender with the given name.
    pub fn remove_appender_named(&self, name: &str) -> bool {
        self.logger.remove_sink_named(name)
    }

    /// Detach all appenders.
    pub fn remove_all_appenders(&self) {
        self.logger.remove_all_sinks();
    }

    /// Snapshot of the attached appenders, in attachment order.
    pub fn all_appenders(&self) -> Vec<Arc<dyn Sink>> {
        self.logger.sinks()
    }

    /// First attached appender with the given name.
    pub fn appender(&self, name: &str) -> Option<Arc<dyn Sink>> {
        self.logger.sink_named(name)
    }

    // -----------------------------------------------------------------------
    // Resource bundles
    // -----------------------------------------------------------------------

    /// Attach (or with `None`, detach) a bundle for localized calls on this
    /// category and its descendants.
    pub fn set_resource_bundle(&self, bundle: Option<Arc<dyn ResourceBundle>>) {
        self.repository.set_bundle(self.name(), bundle);
    }

    /// The bundle attached directly to this category.
    pub fn resource_bundle(&self) -> Option<Arc<dyn ResourceBundle>> {
        self.repository.own_bundle(self.name())
    }

    fn resource_bundle_string(&self, key: &str) -> Option<String> {
        let bundle = self.repository.resolve_bundle(self.name())?;
        let pattern = bundle.get_string(key);
        if pattern.is_none() {
            tracing::debug!(category = self.name(), key, "no resource bundle entry");
        }
        pattern
    }

    // -----------------------------------------------------------------------
    // Logging
    // -----------------------------------------------------------------------

    /// Log without the convenience wrappers' checks; delegates to
    /// [`Logger::forced_log`] with `fqcn` as the caller tag.
    pub fn forced_log(
        &self,
        fqcn: &str,
        priority: Priority,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Delivery {
        self.logger
            .forced_log(Some(fqcn), priority.to_level(), message, error)
    }

    /// Log `message` at `priority` with an optional error.
    pub fn log(
        &self,
        priority: Priority,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Delivery {
        self.forced_log(FQCN, priority, message, error)
    }

    /// Log at TRACE.
    pub fn trace(&self, message: &str) {
        self.log(Priority::TRACE, message, None);
    }

    /// Log at DEBUG.
    pub fn debug(&self, message: &str) {
        self.log(Priority::DEBUG, message, None);
    }

    /// Log at INFO.
    pub fn info(&self, message: &str) {
        self.log(Priority::INFO, message, None);
    }

    /// Log at WARN.
    pub fn warn(&self, message: &str) {
        self.log(Priority::WARN, message, None);
    }

    /// Log at ERROR.
    pub fn error(&self, message: &str) {
        self.log(Priority::ERROR, message, None);
    }

    /// Log at FATAL.
    pub fn fatal(&self, message: &str) {
        self.log(Priority::FATAL, message, None);
    }

    /// Log at DEBUG with an associated error.
    pub fn debug_with_error(&self, message: &str, error: &(dyn StdError + 'static)) {
        self.log(Priority::DEBUG, message, Some(error));
    }

    /// Log at INFO with an associated error.
    pub fn info_with_error(&self, message: &str, error: &(dyn StdError + 'static)) {
        self.log(Priority::INFO, message, Some(error));
    }

    /// Log at WARN with an associated error.
    pub fn warn_with_error(&self, message: &str, error: &(dyn StdError + 'static)) {
        self.log(Priority::WARN, message, Some(error));
    }

    /// Log at ERROR with an associated error.
    pub fn error_with_error(&self, message: &str, error: &(dyn StdError + 'static)) {
        self.log(Priority::ERROR, message, Some(error));
    }

    /// Log at FATAL with an associated error.
    pub fn fatal_with_error(&self, message: &str, error: &(dyn StdError + 'static)) {
        self.log(Priority::FATAL, message, Some(error));
    }

    /// Log `message` at ERROR when `assertion` is false.
    pub fn assert_log(&self, assertion: bool, message: &str) {
        if !assertion {
            self.error(message);
        }
    }

    /// Localized log: resolve `key` through the resource bundle, falling
    /// back to the key itself. Nothing is resolved when the priority is
    /// filtered.
    pub fn l7dlog(
        &self,
        priority: Priority,
        key: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Delivery {
        if !self.is_enabled_for(priority) {
            return Delivery::Filtered;
        }
        let message = self
            .resource_bundle_string(key)
            .unwrap_or_else(|| key.to_string());
        self.forced_log(FQCN, priority, &message, error)
    }

    /// Localized log with `{N}` parameters substituted into the resolved
    /// pattern. When no pattern is found the key is logged verbatim.
    pub fn l7dlog_with_params(
        &self,
        priority: Priority,
        key: &str,
        params: &[&dyn fmt::Display],
        error: Option<&(dyn StdError + 'static)>,
    ) -> Delivery {
        if !self.is_enabled_for(priority) {
            return Delivery::Filtered;
        }
        let message = match self.resource_bundle_string(key) {
            Some(pattern) => format_pattern(&pattern, params),
            None => key.to_string(),
        };
        self.forced_log(FQCN, priority, &message, error)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name())
            .field("level", &self.level())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MapBundle;
    use plume_core::{BasicConfigurationFactory, ConfigurationFactory, ListSink, LoggingContext};

    struct Fixture {
        repository: Arc<LegacyRepository>,
        factory: Arc<dyn ConfigurationFactory>,
        appender: Arc<ListSink>,
    }

    impl Fixture {
        fn new() -> Self {
            let context = Arc::new(LoggingContext::new());
            let factory: Arc<dyn ConfigurationFactory> = Arc::new(BasicConfigurationFactory::new());
            context.install_configuration_factory(Arc::clone(&factory));
            context.reconfigure().unwrap();
            Self {
                repository: LegacyRepository::new(context),
                factory,
                appender: Arc::new(ListSink::new("List")),
            }
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            self.repository
                .context()
                .remove_configuration_factory(&self.factory);
        }
    }

    #[test]
    fn forced_log_reaches_attached_appender() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("org.example.foo");
        category.set_additivity(false);
        category.logger().add_sink(fx.appender.clone());

        category.forced_log("tests::MockCategory", Priority::INFO, "Hello, World", None);
        assert_eq!(fx.appender.len(), 1);
        let events = fx.appender.events();
        assert_eq!(events[0].caller.as_deref(), Some("tests::MockCategory"));

        fx.appender.clear();
        assert_eq!(fx.appender.len(), 0);
    }

    #[test]
    fn info_uses_facade_caller_tag() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("org.example.foo");
        category.add_appender(fx.appender.clone());
        category.info("Hello, World");
        let events = fx.appender.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].caller.as_deref(), Some(FQCN));
    }

    #[test]
    fn chained_priority_returns_priority() {
        let fx = Fixture::new();
        let chained: fn(&Category) -> Priority = Category::chained_priority;
        let category = fx.repository.get_instance("org.example.foo");
        assert_eq!(chained(&category), Priority::DEBUG);
    }

    #[test]
    fn chained_priority_follows_ancestors() {
        let fx = Fixture::new();
        let parent = fx.repository.get_instance("org.example");
        let child = fx.repository.get_instance("org.example.foo");
        parent.set_level(Some(Priority::WARN));
        assert_eq!(child.level(), None);
        assert_eq!(child.chained_priority(), Priority::WARN);
    }

    #[test]
    fn l7dlog_below_threshold_is_filtered() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("org.example.foo");
        category.add_appender(fx.appender.clone());
        category.set_level(Some(Priority::ERROR));

        let delivery = category.l7dlog(Priority::DEBUG, "Hello, World", None);
        assert!(delivery.is_filtered());
        assert_eq!(fx.appender.len(), 0);
    }

    #[test]
    fn l7dlog_with_params_below_threshold_is_filtered() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("org.example.foo");
        category.add_appender(fx.appender.clone());
        category.set_level(Some(Priority::ERROR));

        category.l7dlog_with_params(Priority::DEBUG, "Hello, World", &[], None);
        assert_eq!(fx.appender.len(), 0);
    }

    #[test]
    fn l7dlog_falls_back_to_key() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("app");
        category.add_appender(fx.appender.clone());
        category.l7dlog(Priority::INFO, "msg.unknown", None);
        category.l7dlog_with_params(Priority::INFO, "msg.unknown.{0}", &[&42], None);
        assert_eq!(fx.appender.messages(), vec!["msg.unknown", "msg.unknown.{0}"]);
    }

    #[test]
    fn l7dlog_resolves_through_ancestor_bundle() {
        let fx = Fixture::new();
        let parent = fx.repository.get_instance("app");
        parent.set_resource_bundle(Some(Arc::new(
            MapBundle::new()
                .with_entry("greet", "Hello, World")
                .with_entry("greet.named", "Hello, {0} from {1}"),
        )));
        let child = fx.repository.get_instance("app.web");
        child.add_appender(fx.appender.clone());

        child.l7dlog(Priority::WARN, "greet", None);
        child.l7dlog_with_params(Priority::WARN, "greet.named", &[&"Ada", &"London"], None);
        assert_eq!(
            fx.appender.messages(),
            vec!["Hello, World", "Hello, Ada from London"]
        );
        assert!(child.resource_bundle().is_none());
        assert!(parent.resource_bundle().is_some());
    }

    #[test]
    fn nearer_bundle_wins() {
        let fx = Fixture::new();
        let parent = fx.repository.get_instance("svc");
        let child = fx.repository.get_instance("svc.db");
        parent.set_resource_bundle(Some(Arc::new(MapBundle::new().with_entry("k", "parent"))));
        child.set_resource_bundle(Some(Arc::new(MapBundle::new().with_entry("k", "child"))));
        child.add_appender(fx.appender.clone());

        child.l7dlog(Priority::INFO, "k", None);
        child.set_resource_bundle(None);
        child.l7dlog(Priority::INFO, "k", None);
        assert_eq!(fx.appender.messages(), vec!["child", "parent"]);
    }

    #[test]
    #[allow(deprecated)]
    fn set_priority_sets_level() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("org.example.foo");
        category.set_priority(Priority::DEBUG);
        assert_eq!(category.priority(), Some(Priority::DEBUG));
        assert_eq!(category.logger().level(), Some(plume_types::Level::Debug));
    }

    #[test]
    fn legacy_and_core_share_one_logger() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("shared.name");
        let core = fx.repository.context().get_logger("shared.name");
        assert!(Arc::ptr_eq(category.logger(), &core));

        core.add_sink(fx.appender.clone());
        category.warn("via legacy");
        core.warn("via core");
        assert_eq!(fx.appender.len(), 2);
    }

    #[test]
    fn error_variants_attach_error() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("io");
        category.add_appender(fx.appender.clone());
        let err = std::io::Error::other("broken pipe");
        category.error_with_error("write failed", &err);
        let events = fx.appender.events();
        assert_eq!(events[0].error.as_ref().unwrap().message, "broken pipe");
    }

    #[test]
    fn assert_log_only_logs_on_failure() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("checks");
        category.add_appender(fx.appender.clone());
        category.assert_log(true, "fine");
        category.assert_log(false, "violated");
        let events = fx.appender.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, plume_types::Level::Error);
    }

    #[test]
    fn enabled_checks() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("gate");
        category.set_level(Some(Priority::INFO));
        assert!(!category.is_trace_enabled());
        assert!(!category.is_debug_enabled());
        assert!(category.is_info_enabled());
        assert!(category.is_enabled_for(Priority::FATAL));
    }

    #[test]
    fn parent_and_root() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("a.b");
        let parent = category.parent().expect("has parent");
        assert_eq!(parent.name(), "a");
        let root = parent.parent().expect("root");
        assert_eq!(root.name(), "");
        assert!(root.parent().is_none());
        assert!(Arc::ptr_eq(root.logger(), fx.repository.root().logger()));
    }

    #[test]
    fn appender_management() {
        let fx = Fixture::new();
        let category = fx.repository.get_instance("appenders");
        let appender: Arc<dyn Sink> = fx.appender.clone();
        assert!(category.add_appender(Arc::clone(&appender)));
        assert!(!category.add_appender(Arc::clone(&appender)));
        assert_eq!(category.all_appenders().len(), 1);
        assert!(category.appender("List").is_some());
        assert!(category.remove_appender(&appender));
        category.add_appender(appender);
        assert!(category.remove_appender_named("List"));
        category.add_appender(fx.appender.clone());
        category.remove_all_appenders();
        assert!(category.all_appenders().is_empty());
    }

    #[test]
    fn global_repository_is_shared() {
        let a = Category::get_instance("plume_legacy.tests.global");
        let b = Category::get_instance("plume_legacy.tests.global");
        assert!(Arc::ptr_eq(a.logger(), b.logger()));
        assert!(Category::get_root().logger().is_root());
    }
}
