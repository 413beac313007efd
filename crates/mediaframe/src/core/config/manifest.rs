//! Content Manifest
//!
//! JSON document describing a learning object's content source, type, and
//! auxiliary assets (captions, transcripts, attribution).
//! `src` and `type` from a manifest are protected during resolution.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::model::{dedupe_by_language, Attribution, Caption, Transcript};
use super::params::is_valid_color;
use crate::core::{CoreResult, ThemePreference, TypeRequest, WrapperError};

/// Manifest document as fetched from the `m` parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type", default)]
    pub content_type: Option<TypeRequest>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub src: Option<String>,

    #[serde(default)]
    pub poster: Option<String>,

    #[serde(default)]
    pub show_header: Option<bool>,

    #[serde(default)]
    pub background_color: Option<String>,

    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Option<ThemePreference>,

    #[serde(default)]
    pub captions: Vec<ManifestCaption>,

    #[serde(default)]
    pub transcripts: Vec<ManifestTranscript>,

    #[serde(default)]
    pub attribution: Option<Attribution>,
}

/// Caption entry in manifest wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCaption {
    pub src: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub default: bool,
}

/// Transcript entry in manifest wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTranscript {
    #[serde(default = "default_language")]
    pub language: String,
    pub url: String,
    #[serde(default)]
    pub default: bool,
}

fn default_language() -> String {
    "en".to_string()
}

/// Unknown theme names fall through to lower-priority sources
fn lenient_theme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ThemePreference>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw.parse::<ThemePreference>() {
        Ok(theme) => Some(theme),
        Err(e) => {
            warn!(value = %raw, "Ignoring invalid manifest theme: {}", e);
            None
        }
    }))
}

impl Manifest {
    /// Parses a manifest from a JSON string
    pub fn parse(json: &str) -> CoreResult<Self> {
        let mut manifest: Self = serde_json::from_str(json)
            .map_err(|e| WrapperError::InvalidManifest(format!("Invalid manifest JSON: {}", e)))?;

        manifest.drop_invalid_presentation();
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validates manifest fields
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(src) = &self.src {
            if src.trim().is_empty() {
                return Err(WrapperError::InvalidManifest(
                    "src cannot be empty".to_string(),
                ));
            }
        }

        for caption in &self.captions {
            if caption.src.trim().is_empty() {
                return Err(WrapperError::InvalidManifest(format!(
                    "caption '{}' has an empty src",
                    caption.language
                )));
            }
        }

        for transcript in &self.transcripts {
            if transcript.url.trim().is_empty() {
                return Err(WrapperError::InvalidManifest(format!(
                    "transcript '{}' has an empty url",
                    transcript.language
                )));
            }
        }

        Ok(())
    }

    /// Clears presentation fields that fail validation; they never reject the manifest
    fn drop_invalid_presentation(&mut self) {
        if let Some(color) = self.background_color.take() {
            if is_valid_color(&color) {
                self.background_color = Some(color);
            } else {
                warn!(value = %color, "Ignoring invalid manifest backgroundColor");
            }
        }
    }

    /// Manifest captions, deduplicated per language
    pub fn captions(&self) -> Vec<Caption> {
        dedupe_by_language(
            self.captions
                .iter()
                .map(|c| Caption {
                    uri: c.src.clone(),
                    language: c.language.clone(),
                    label: c.label.clone().unwrap_or_else(|| c.language.clone()),
                    is_default: c.default,
                })
                .collect(),
        )
    }

    /// Manifest transcripts, deduplicated per language
    pub fn transcripts(&self) -> Vec<Transcript> {
        dedupe_by_language(
            self.transcripts
                .iter()
                .map(|t| Transcript {
                    language: t.language.clone(),
                    uri: t.url.clone(),
                    is_default: t.default,
                })
                .collect(),
        )
    }
}
