//! Hook Registry
//!
//! Capability map from symbolic keys to refresh callbacks. Whichever module
//! owns a chart or widget registers its hook here; refresh strategies look
//! hooks up by key and silently skip the ones that are absent.

use ahash::AHashMap;
use futures::future::BoxFuture;
use hashlink::LinkedHashMap;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;

use crate::error::Result;

/// Something that can be refreshed
pub trait RefreshHook: Send + Sync {
    fn refresh(&self) -> BoxFuture<'_, Result<()>>;
}

/// Adapter turning an async closure into a [`RefreshHook`]
pub struct FnHook<F>(F);

impl<F, Fut> RefreshHook for FnHook<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin((self.0)())
    }
}

/// Wrap an async closure as a shareable hook
pub fn hook_fn<F, Fut>(f: F) -> Arc<dyn RefreshHook>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnHook(f))
}

/// Registered hooks, populated by chart and widget owners
#[derive(Default)]
pub struct HookRegistry {
    /// Reloads the production chart
    production_reload: RwLock<Option<Arc<dyn RefreshHook>>>,
    /// Chart update hooks in registration order
    chart_updates: RwLock<LinkedHashMap<String, Arc<dyn RefreshHook>>>,
    /// Widget refresh functions addressed by name from the DOM
    widgets: RwLock<AHashMap<String, Arc<dyn RefreshHook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_production_reload(&self, hook: Arc<dyn RefreshHook>) {
        *self.production_reload.write() = Some(hook);
    }

    pub fn production_reload(&self) -> Option<Arc<dyn RefreshHook>> {
        self.production_reload.read().clone()
    }

    /// Register a chart update hook; re-registering a key replaces it in place
    pub fn register_chart_update(&self, key: impl Into<String>, hook: Arc<dyn RefreshHook>) {
        let key = key.into();
        let mut updates = self.chart_updates.write();
        if let Some(existing) = updates.get_mut(&key) {
            *existing = hook;
        } else {
            updates.insert(key, hook);
        }
    }

    pub fn unregister_chart_update(&self, key: &str) -> bool {
        self.chart_updates.write().remove(key).is_some()
    }

    /// Snapshot of chart update hooks in registration order
    pub fn chart_updates(&self) -> Vec<(String, Arc<dyn RefreshHook>)> {
        self.chart_updates
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn register_widget(&self, name: impl Into<String>, hook: Arc<dyn RefreshHook>) {
        self.widgets.write().insert(name.into(), hook);
    }

    pub fn widget(&self, name: &str) -> Option<Arc<dyn RefreshHook>> {
        self.widgets.read().get(name).cloned()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("production_reload", &self.production_reload.read().is_some())
            .field(
                "chart_updates",
                &self.chart_updates.read().keys().cloned().collect::<Vec<_>>(),
            )
            .field("widgets", &self.widgets.read().len())
            .finish()
    }
}
