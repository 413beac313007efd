//! Theme Resolution
//!
//! Strict priority chain, first match wins:
//! configuration override, high-contrast query, dark-scheme query, light.

use tracing::debug;

use super::host::DocumentHost;
use super::{Theme, ThemePreference};

/// Resolves the theme from a configured preference and the system media queries
pub fn resolve_theme(
    preference: ThemePreference,
    prefers_high_contrast: bool,
    prefers_dark: bool,
) -> Theme {
    match preference {
        ThemePreference::Light => Theme::Light,
        ThemePreference::Dark => Theme::Dark,
        ThemePreference::HighContrast => Theme::HighContrast,
        ThemePreference::Auto if prefers_high_contrast => Theme::HighContrast,
        ThemePreference::Auto if prefers_dark => Theme::Dark,
        ThemePreference::Auto => Theme::Light,
    }
}

/// Theme sub-state owned by the wrapper controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    preference: ThemePreference,
    current: Theme,
    /// System listener attached; only when the preference is `Auto`
    listening: bool,
}

impl ThemeState {
    /// Resolves and applies the initial theme
    pub fn init(preference: ThemePreference, host: &dyn DocumentHost) -> Self {
        let current = resolve_theme(
            preference,
            host.prefers_high_contrast(),
            host.prefers_dark_scheme(),
        );
        host.apply_theme(current);
        debug!(theme = %current, ?preference, "Theme applied");

        Self {
            preference,
            current,
            listening: preference == ThemePreference::Auto,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Re-evaluates after a system preference change.
    ///
    /// Returns the new theme when it changed; `None` when pinned, detached, or unchanged.
    pub fn on_system_change(&mut self, host: &dyn DocumentHost) -> Option<Theme> {
        if !self.listening {
            return None;
        }
        let next = resolve_theme(
            self.preference,
            host.prefers_high_contrast(),
            host.prefers_dark_scheme(),
        );
        if next == self.current {
            return None;
        }
        self.current = next;
        host.apply_theme(next);
        Some(next)
    }

    pub fn detach(&mut self) {
        self.listening = false;
    }
}
