//! Configuration Data Models
//!
//! The resolved configuration and its content-specific sub-records.
//! A [`Configuration`] is immutable once resolved; content plugins receive
//! a read-only [`ContentConfig`] slice of it.

use serde::{Deserialize, Serialize};

use crate::core::{ContentType, ThemePreference, TypeRequest};

// =============================================================================
// Sub-records
// =============================================================================

/// Text with an optional link
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, rename = "url", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl LinkedText {
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.uri.as_deref().map_or(true, |u| u.trim().is_empty())
    }

    /// Field-wise merge: values present in `self` win over `fallback`
    pub fn or(self, fallback: LinkedText) -> LinkedText {
        LinkedText {
            text: self.text.or(fallback.text),
            uri: self.uri.or(fallback.uri),
        }
    }
}

/// Attribution block shown below the content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<LinkedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<LinkedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LinkedText>,
}

impl Attribution {
    pub fn is_empty(&self) -> bool {
        [&self.title, &self.author, &self.license]
            .iter()
            .all(|part| part.as_ref().map_or(true, LinkedText::is_empty))
    }

    /// Field-wise merge: parts present in `self` win over `fallback`
    pub fn or(self, fallback: Attribution) -> Attribution {
        fn merge(a: Option<LinkedText>, b: Option<LinkedText>) -> Option<LinkedText> {
            match (a, b) {
                (Some(a), Some(b)) => Some(a.or(b)),
                (a, b) => a.or(b),
            }
        }

        Attribution {
            title: merge(self.title, fallback.title),
            author: merge(self.author, fallback.author),
            license: merge(self.license, fallback.license),
        }
    }
}

/// Caption track for video content
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub uri: String,
    pub language: String,
    pub label: String,
    pub is_default: bool,
}

/// Transcript document offered in the transcript panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub language: String,
    pub uri: String,
    pub is_default: bool,
}

/// Entries that must be unique per language within their list
pub trait LanguageKeyed {
    fn language(&self) -> &str;
    fn is_default(&self) -> bool;
    fn set_default(&mut self, value: bool);
}

impl LanguageKeyed for Caption {
    fn language(&self) -> &str {
        &self.language
    }
    fn is_default(&self) -> bool {
        self.is_default
    }
    fn set_default(&mut self, value: bool) {
        self.is_default = value;
    }
}

impl LanguageKeyed for Transcript {
    fn language(&self) -> &str {
        &self.language
    }
    fn is_default(&self) -> bool {
        self.is_default
    }
    fn set_default(&mut self, value: bool) {
        self.is_default = value;
    }
}

/// Collapses duplicate languages and default flags.
///
/// A later entry for a language replaces the earlier one in place, and only
/// the last entry flagged as default keeps the flag.
pub fn dedupe_by_language<T: LanguageKeyed>(entries: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(entries.len());
    for entry in entries {
        let lang = entry.language().to_ascii_lowercase();
        match out
            .iter()
            .position(|e| e.language().eq_ignore_ascii_case(&lang))
        {
            Some(idx) => out[idx] = entry,
            None => out.push(entry),
        }
    }

    if let Some(last_default) = out.iter().rposition(|e| e.is_default()) {
        for (idx, entry) in out.iter_mut().enumerate() {
            if idx != last_default {
                entry.set_default(false);
            }
        }
    }
    out
}

// =============================================================================
// Configuration
// =============================================================================

/// Fully resolved wrapper configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Resolved content type; never `auto`
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Content source URI
    pub src: String,
    pub title: Option<String>,
    pub show_header: bool,
    pub theme: ThemePreference,
    pub background_color: Option<String>,
    pub poster: Option<String>,
    pub captions: Vec<Caption>,
    pub transcripts: Vec<Transcript>,
    pub attribution: Option<Attribution>,
    /// Identifier of the manifest the configuration was resolved from
    pub manifest_id: Option<String>,
}

impl Configuration {
    /// Read-only slice handed to the content plugin
    pub fn content_slice(&self) -> ContentConfig {
        ContentConfig {
            content_type: self.content_type,
            src: self.src.clone(),
            title: self.title.clone(),
            poster: self.poster.clone(),
            captions: self.captions.clone(),
            background_color: self.background_color.clone(),
        }
    }
}

/// Content-specific configuration handed to a content plugin
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentConfig {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub src: String,
    pub title: Option<String>,
    pub poster: Option<String>,
    pub captions: Vec<Caption>,
    pub background_color: Option<String>,
}

/// Built-in lowest-priority configuration values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDefaults {
    #[serde(rename = "type", default)]
    pub content_type: TypeRequest,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_show_header")]
    pub show_header: bool,
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default)]
    pub background_color: Option<String>,
}

fn default_show_header() -> bool {
    true
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            content_type: TypeRequest::Auto,
            src: None,
            title: None,
            show_header: default_show_header(),
            theme: ThemePreference::Auto,
            background_color: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caption(lang: &str, uri: &str, is_default: bool) -> Caption {
        Caption {
            uri: uri.to_string(),
            language: lang.to_string(),
            label: lang.to_uppercase(),
            is_default,
        }
    }

    #[test]
    fn test_dedupe_replaces_duplicate_language_in_place() {
        let deduped = dedupe_by_language(vec![
            caption("en", "a.vtt", false),
            caption("fr", "b.vtt", false),
            caption("EN", "c.vtt", false),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].uri, "c.vtt");
        assert_eq!(deduped[1].language, "fr");
    }

    #[test]
    fn test_dedupe_last_default_wins() {
        let deduped = dedupe_by_language(vec![
            caption("en", "a.vtt", true),
            caption("fr", "b.vtt", true),
            caption("de", "c.vtt", false),
        ]);
        let defaults: Vec<_> = deduped.iter().filter(|c| c.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].language, "fr");
    }

    #[test]
    fn test_attribution_merge_prefers_self() {
        let url_side = Attribution {
            title: Some(LinkedText {
                text: Some("URL title".into()),
                uri: None,
            }),
            ..Default::default()
        };
        let manifest_side = Attribution {
            title: Some(LinkedText {
                text: Some("Manifest title".into()),
                uri: Some("https://example.org".into()),
            }),
            author: Some(LinkedText {
                text: Some("Ada".into()),
                uri: None,
            }),
            license: None,
        };

        let merged = url_side.or(manifest_side);
        let title = merged.title.unwrap();
        assert_eq!(title.text.as_deref(), Some("URL title"));
        assert_eq!(title.uri.as_deref(), Some("https://example.org"));
        assert_eq!(merged.author.unwrap().text.as_deref(), Some("Ada"));
        assert!(merged.license.is_none());
    }

    #[test]
    fn test_attribution_is_empty() {
        assert!(Attribution::default().is_empty());
        let blank = Attribution {
            author: Some(LinkedText {
                text: Some("  ".into()),
                uri: None,
            }),
            ..Default::default()
        };
        assert!(blank.is_empty());
    }
}
