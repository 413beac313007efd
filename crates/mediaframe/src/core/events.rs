//! Wrapper Event Emission
//!
//! Lifecycle and analytics events dispatched on the wrapper root and the
//! document. These are the integration surface for host pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::Configuration;
use super::Theme;

// =============================================================================
// Event Names
// =============================================================================

/// Event names dispatched by the wrapper
pub mod event_names {
    /// Initialization finished; carries the final configuration
    pub const WRAPPER_READY: &str = "wrapper:ready";
    /// Applied theme changed
    pub const THEME_CHANGE: &str = "theme:change";
    /// Analytics event recorded by the wrapper or a content plugin
    pub const ANALYTICS_TRACK: &str = "analytics:track";
}

// =============================================================================
// Event Payloads
// =============================================================================

/// `wrapper:ready` payload
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyEvent {
    pub config: Configuration,
}

/// `theme:change` payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChangeEvent {
    pub theme: Theme,
}

/// `analytics:track` payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub action: String,
    pub category: String,
    pub label: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(action: &str, category: &str, label: Option<&str>) -> Self {
        Self {
            action: action.to_string(),
            category: category.to_string(),
            label: label.map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}

/// Event dispatched through [`crate::core::host::DocumentHost::dispatch_event`]
#[derive(Clone, Debug, PartialEq)]
pub enum WrapperEvent {
    Ready(ReadyEvent),
    ThemeChange(ThemeChangeEvent),
    AnalyticsTrack(AnalyticsEvent),
}

impl WrapperEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready(_) => event_names::WRAPPER_READY,
            Self::ThemeChange(_) => event_names::THEME_CHANGE,
            Self::AnalyticsTrack(_) => event_names::ANALYTICS_TRACK,
        }
    }

    /// `CustomEvent.detail` payload
    pub fn detail(&self) -> serde_json::Value {
        let detail = match self {
            Self::Ready(e) => serde_json::to_value(e),
            Self::ThemeChange(e) => serde_json::to_value(e),
            Self::AnalyticsTrack(e) => serde_json::to_value(e),
        };
        detail.unwrap_or(serde_json::Value::Null)
    }
}
