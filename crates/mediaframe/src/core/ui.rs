//! Wrapper UI View Models
//!
//! Everything the controller hands to [`crate::core::host::DocumentHost`] for
//! rendering. Text is escaped here, so hosts can insert it as markup.

use serde::Serialize;

use super::config::{Attribution, Configuration, LinkedText, Transcript};
use super::WrapperError;

/// Escapes text for safe insertion into HTML
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Link targets allowed in rendered markup: http(s), mailto, or scheme-less relative
pub fn sanitize_href(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    let scheme = lower
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|s| !s.contains('/') && !s.contains('?') && !s.contains('#'));
    match scheme {
        None | Some("http") | Some("https") | Some("mailto") => Some(escape_html(trimmed)),
        Some(_) => None,
    }
}

// =============================================================================
// Shell / Header
// =============================================================================

/// Parameters for building the wrapper shell
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShellLayout {
    pub background_color: Option<String>,
}

/// Header bar
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub title: String,
}

impl HeaderView {
    /// Header for a configuration, if it shows one
    pub fn from_config(config: &Configuration) -> Option<Self> {
        let title = config.title.as_deref().map(str::trim).unwrap_or_default();
        (config.show_header && !title.is_empty()).then(|| Self {
            title: escape_html(title),
        })
    }
}

// =============================================================================
// Error Panel
// =============================================================================

/// Optional retry action supplied by the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RetryAction {
    pub label: String,
    /// Opaque token the host hands back when the action is taken
    pub token: String,
}

/// User-visible failure: short title, escaped message, optional retry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorPanel {
    pub title: String,
    pub message: String,
    pub retry: Option<RetryAction>,
}

impl ErrorPanel {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            title: escape_html(title),
            message: escape_html(message),
            retry: None,
        }
    }

    pub fn from_error(error: &WrapperError) -> Self {
        Self::new(error.panel_title(), &error.to_string())
    }

    pub fn with_retry(mut self, label: &str, token: &str) -> Self {
        self.retry = Some(RetryAction {
            label: escape_html(label),
            token: token.to_string(),
        });
        self
    }
}

// =============================================================================
// Attribution
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributionRole {
    Title,
    Author,
    License,
}

impl AttributionRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::License => "License",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributionPart {
    pub role: AttributionRole,
    pub text: String,
    pub href: Option<String>,
}

/// Attribution block
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributionView {
    pub parts: Vec<AttributionPart>,
}

impl AttributionView {
    pub fn from_attribution(attribution: &Attribution) -> Option<Self> {
        let parts: Vec<AttributionPart> = [
            (AttributionRole::Title, &attribution.title),
            (AttributionRole::Author, &attribution.author),
            (AttributionRole::License, &attribution.license),
        ]
        .into_iter()
        .filter_map(|(role, part)| part.as_ref().and_then(|p| Self::part(role, p)))
        .collect();

        (!parts.is_empty()).then_some(Self { parts })
    }

    fn part(role: AttributionRole, linked: &LinkedText) -> Option<AttributionPart> {
        let href = linked.uri.as_deref().and_then(sanitize_href);
        let text = linked
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(escape_html)
            .or_else(|| href.clone())?;
        Some(AttributionPart { role, text, href })
    }
}

// =============================================================================
// Transcripts
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscriptOption {
    pub language: String,
    pub is_default: bool,
}

/// Collapsed transcript panel with its language options
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscriptPanelView {
    pub options: Vec<TranscriptOption>,
    /// Panel starts hidden
    pub hidden: bool,
}

impl TranscriptPanelView {
    pub fn from_transcripts(transcripts: &[Transcript]) -> Option<Self> {
        if transcripts.is_empty() {
            return None;
        }
        Some(Self {
            options: transcripts
                .iter()
                .map(|t| TranscriptOption {
                    language: escape_html(&t.language),
                    is_default: t.is_default,
                })
                .collect(),
            hidden: true,
        })
    }
}

/// Default transcript: the one flagged default, else the first
pub fn default_transcript(transcripts: &[Transcript]) -> Option<&Transcript> {
    transcripts
        .iter()
        .find(|t| t.is_default)
        .or_else(|| transcripts.first())
}

/// Two-state transcript visibility, independent of the wrapper lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscriptToggle {
    hidden: bool,
}

impl Default for TranscriptToggle {
    fn default() -> Self {
        Self { hidden: true }
    }
}

impl TranscriptToggle {
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Flips visibility; returns the new `aria-hidden` value
    pub fn toggle(&mut self) -> bool {
        self.hidden = !self.hidden;
        self.hidden
    }
}
