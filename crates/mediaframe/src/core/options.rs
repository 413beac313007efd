//! Wrapper Options
//!
//! Ambient configuration for a wrapper instance:
//! - Resize negotiation timings and thresholds
//! - Optional support-library locations and load timeout
//! - Built-in configuration defaults
//! - Log level (passed explicitly, never stored globally)
//!
//! Options are tolerant: out-of-range values are clamped by [`WrapperOptions::normalize`]
//! instead of failing.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::ConfigDefaults;
use super::CoreResult;

/// Top-level wrapper options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WrapperOptions {
    /// Resize negotiation settings
    #[serde(default)]
    pub resize: ResizeOptions,

    /// Optional asset settings
    #[serde(default)]
    pub assets: AssetOptions,

    /// Lowest-priority configuration values
    #[serde(default)]
    pub defaults: ConfigDefaults,

    /// Log level for the subscriber installed by the embedding application
    #[serde(default)]
    pub log_level: LogLevel,
}

impl WrapperOptions {
    /// Parses options from JSON and normalizes them
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let mut options: Self = serde_json::from_str(json)?;
        options.normalize();
        Ok(options)
    }

    /// Clamps every value into its supported range
    pub fn normalize(&mut self) {
        self.resize.normalize();
        self.assets.normalize();
    }
}

// =============================================================================
// Resize Options
// =============================================================================

/// Bounded polling burst: check every `interval_ms`, at most `max_iterations` times
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollBurst {
    pub interval_ms: u64,
    pub max_iterations: u32,
}

impl PollBurst {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    fn normalize(&mut self, default: PollBurst) {
        if self.interval_ms == 0 {
            self.interval_ms = default.interval_ms;
        }
        self.interval_ms = self.interval_ms.clamp(50, 10_000);
        self.max_iterations = self.max_iterations.min(1_000);
    }
}

/// Resize negotiation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOptions {
    /// Quiet period before a debounced report fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Height changes at or below this many pixels are treated as noise
    #[serde(default = "default_height_threshold")]
    pub height_threshold: f64,

    /// Height reported when every measurement is non-positive
    #[serde(default = "default_fallback_height")]
    pub fallback_height: f64,

    /// Width-poll interval for hosts without a size observer
    #[serde(default = "default_width_poll_ms")]
    pub width_poll_ms: u64,

    /// Polling burst started after initialization
    #[serde(default = "default_initial_poll")]
    pub initial_poll: PollBurst,

    /// Polling burst started when H5P content is detected
    #[serde(default = "default_h5p_poll")]
    pub h5p_poll: PollBurst,
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_height_threshold() -> f64 {
    1.0
}

fn default_fallback_height() -> f64 {
    600.0
}

fn default_width_poll_ms() -> u64 {
    500
}

fn default_initial_poll() -> PollBurst {
    PollBurst {
        interval_ms: 500,
        max_iterations: 60,
    }
}

fn default_h5p_poll() -> PollBurst {
    PollBurst {
        interval_ms: 500,
        max_iterations: 30,
    }
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            height_threshold: default_height_threshold(),
            fallback_height: default_fallback_height(),
            width_poll_ms: default_width_poll_ms(),
            initial_poll: default_initial_poll(),
            h5p_poll: default_h5p_poll(),
        }
    }
}

impl ResizeOptions {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn width_poll(&self) -> Duration {
        Duration::from_millis(self.width_poll_ms)
    }

    fn normalize(&mut self) {
        self.debounce_ms = self.debounce_ms.clamp(10, 2_000);
        self.height_threshold = clamp_f64(self.height_threshold, 0.0, 50.0, default_height_threshold());
        self.fallback_height =
            clamp_f64(self.fallback_height, 1.0, 10_000.0, default_fallback_height());
        self.width_poll_ms = self.width_poll_ms.clamp(50, 10_000);
        self.initial_poll.normalize(default_initial_poll());
        self.h5p_poll.normalize(default_h5p_poll());
    }
}

// =============================================================================
// Asset Options
// =============================================================================

/// Optional support-library settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetOptions {
    /// Cap on loading one external script
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,

    /// Enhanced video player script
    #[serde(default = "default_video_player_script")]
    pub video_player_script: String,

    /// H5P resizer script
    #[serde(default = "default_h5p_resizer_script")]
    pub h5p_resizer_script: String,
}

fn default_load_timeout_ms() -> u64 {
    5_000
}

fn default_video_player_script() -> String {
    "https://cdn.plyr.io/3.7.8/plyr.polyfilled.js".to_string()
}

fn default_h5p_resizer_script() -> String {
    "https://h5p.org/sites/all/modules/h5p/library/js/h5p-resizer.js".to_string()
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            load_timeout_ms: default_load_timeout_ms(),
            video_player_script: default_video_player_script(),
            h5p_resizer_script: default_h5p_resizer_script(),
        }
    }
}

impl AssetOptions {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    fn normalize(&mut self) {
        self.load_timeout_ms = self.load_timeout_ms.clamp(100, 60_000);
        if self.video_player_script.trim().is_empty() {
            self.video_player_script = default_video_player_script();
        }
        if self.h5p_resizer_script.trim().is_empty() {
            self.h5p_resizer_script = default_h5p_resizer_script();
        }
    }
}

// =============================================================================
// Log Level
// =============================================================================

/// Log level handed to the subscriber by the embedding application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn clamp_f64(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        warn!(value, "Non-finite option value replaced with default");
        return fallback;
    }
    value.clamp(min, max)
}
