//! Plugin Context
//!
//! The controller-facing handle a content plugin receives in `load`.

use std::sync::Arc;

use tracing::debug;

use super::capability::{Capability, CapabilityHandle, CapabilityLoader};
use crate::core::events::{AnalyticsEvent, WrapperEvent};
use crate::core::host::{ContentRoot, DocumentHost};
use crate::core::resize::ResizeNegotiator;

/// Callbacks into the wrapper available to content plugins
#[derive(Clone)]
pub struct PluginContext {
    content_root: ContentRoot,
    negotiator: Arc<ResizeNegotiator>,
    document: Arc<dyn DocumentHost>,
    capabilities: Arc<CapabilityLoader>,
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("content_root", &self.content_root)
            .finish_non_exhaustive()
    }
}

impl PluginContext {
    pub fn new(
        content_root: ContentRoot,
        negotiator: Arc<ResizeNegotiator>,
        document: Arc<dyn DocumentHost>,
        capabilities: Arc<CapabilityLoader>,
    ) -> Self {
        Self {
            content_root,
            negotiator,
            document,
            capabilities,
        }
    }

    /// Element the plugin renders into
    pub fn content_root(&self) -> &ContentRoot {
        &self.content_root
    }

    /// Requests a debounced resize report
    pub fn request_resize(&self) {
        self.negotiator.report_debounced();
    }

    /// Requests a forced resize report (fullscreen, control-bar changes)
    pub fn request_forced_resize(&self) {
        self.negotiator.report_forced();
    }

    /// Records an analytics event
    pub fn track(&self, action: &str, category: &str, label: Option<&str>) {
        debug!(action, category, label, "Analytics event");
        self.document
            .dispatch_event(&WrapperEvent::AnalyticsTrack(AnalyticsEvent::new(
                action, category, label,
            )));
    }

    /// Loads an optional support library; `None` means continue without it
    pub async fn ensure_capability(&self, capability: Capability) -> Option<CapabilityHandle> {
        self.capabilities.ensure_optional(capability).await
    }
}
