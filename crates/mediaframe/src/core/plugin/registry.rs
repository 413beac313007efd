//! Content Plugin Registry
//!
//! Dispatch table keyed by [`ContentType`], populated at startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::context::PluginContext;
use crate::core::config::ContentConfig;
use crate::core::{ContentType, CoreResult};

/// Cleanup callback a plugin may hand back from `load`
pub type Cleanup = Box<dyn FnOnce() + Send>;

/// Renders one content type.
///
/// `load` may register its own listeners through the host; if it returns a
/// cleanup callback the controller runs it on destroy. Errors are caught by
/// the controller and rendered as an error panel.
#[async_trait]
pub trait ContentPlugin: Send + Sync {
    /// Content type this plugin renders
    fn content_type(&self) -> ContentType;

    /// Renders the content into `ctx.content_root()`
    async fn load(&self, ctx: &PluginContext, config: &ContentConfig) -> CoreResult<Option<Cleanup>>;
}

/// Content type to plugin table
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<ContentType, Arc<dyn ContentPlugin>>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("types", &self.types())
            .finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under its content type, returning the one it replaced
    pub fn register(&mut self, plugin: Arc<dyn ContentPlugin>) -> Option<Arc<dyn ContentPlugin>> {
        let content_type = plugin.content_type();
        debug!(%content_type, "Registering content plugin");
        self.plugins.insert(content_type, plugin)
    }

    /// Builder-style [`Self::register`]
    pub fn with(mut self, plugin: Arc<dyn ContentPlugin>) -> Self {
        self.register(plugin);
        self
    }

    pub fn get(&self, content_type: ContentType) -> Option<Arc<dyn ContentPlugin>> {
        self.plugins.get(&content_type).cloned()
    }

    pub fn contains(&self, content_type: ContentType) -> bool {
        self.plugins.contains_key(&content_type)
    }

    /// Registered types in dispatch-table order
    pub fn types(&self) -> Vec<ContentType> {
        ContentType::ALL
            .into_iter()
            .filter(|t| self.plugins.contains_key(t))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
