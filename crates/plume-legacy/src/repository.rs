use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use plume_core::LoggingContext;
use plume_types::ancestors;

use crate::bundle::ResourceBundle;
use crate::category::Category;

static GLOBAL: OnceLock<Arc<LegacyRepository>> = OnceLock::new();

/// Owner of the state the legacy API keeps beside the core: the logging
/// context categories resolve against, and the resource bundles attached
/// to category names.
pub struct LegacyRepository {
    context: Arc<LoggingContext>,
    bundles: RwLock<HashMap<String, Arc<dyn ResourceBundle>>>,
}

impl LegacyRepository {
    /// A repository over `context`.
    pub fn new(context: Arc<LoggingContext>) -> Arc<Self> {
        Arc::new(Self {
            context,
            bundles: RwLock::new(HashMap::new()),
        })
    }

    /// The repository over [`LoggingContext::global`], created on first use.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Self::new(LoggingContext::global())))
    }

    /// The underlying logging context.
    pub fn context(&self) -> &Arc<LoggingContext> {
        &self.context
    }

    /// The category named `name`, creating its logger on first use.
    pub fn get_instance(self: &Arc<Self>, name: &str) -> Category {
        Category::new(self.context.get_logger(name), Arc::clone(self))
    }

    /// The root category.
    pub fn root(self: &Arc<Self>) -> Category {
        Category::new(self.context.root_logger(), Arc::clone(self))
    }

    pub(crate) fn set_bundle(&self, name: &str, bundle: Option<Arc<dyn ResourceBundle>>) {
        let mut bundles = self.bundles.write().unwrap_or_else(PoisonError::into_inner);
        match bundle {
            Some(bundle) => {
                bundles.insert(name.to_string(), bundle);
            }
            None => {
                bundles.remove(name);
            }
        }
    }

    pub(crate) fn own_bundle(&self, name: &str) -> Option<Arc<dyn ResourceBundle>> {
        let bundles = self.bundles.read().unwrap_or_else(PoisonError::into_inner);
        bundles.get(name).cloned()
    }

    /// The bundle attached to `name` or its nearest ancestor.
    pub(crate) fn resolve_bundle(&self, name: &str) -> Option<Arc<dyn ResourceBundle>> {
        let bundles = self.bundles.read().unwrap_or_else(PoisonError::into_inner);
        std::iter::once(name)
            .chain(ancestors(name))
            .find_map(|candidate| bundles.get(candidate).cloned())
    }
}

impl std::fmt::Debug for LegacyRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bundle_count = self
            .bundles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("LegacyRepository")
            .field("context", &self.context)
            .field("bundle_count", &bundle_count)
            .finish()
    }
}
