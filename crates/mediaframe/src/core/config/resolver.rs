//! Configuration Resolver
//!
//! Merges URL parameters, an optional manifest, and built-in defaults into one
//! [`Configuration`], field by field, under a fixed priority:
//!
//! 1. Manifest `src` and `type` (protected, never overridden)
//! 2. URL parameters (every other field)
//! 3. Manifest values for every other field
//! 4. Built-in defaults
//!
//! When the merged type is `auto`, the type is detected from the resolved `src`.

use tracing::{debug, warn};

use super::detect::detect_type;
use super::manifest::Manifest;
use super::model::{dedupe_by_language, ConfigDefaults, Configuration};
use super::params::QueryParams;
use crate::core::host::ResourceFetcher;
use crate::core::{CoreResult, TypeRequest, WrapperError};

/// Resolves configuration from one set of sources
pub fn resolve(
    params: &QueryParams,
    manifest: Option<&Manifest>,
    defaults: &ConfigDefaults,
) -> CoreResult<Configuration> {
    // Protected fields: manifest first, then URL, then defaults.
    let src = manifest
        .and_then(|m| m.src.clone())
        .or_else(|| params.src.clone())
        .or_else(|| defaults.src.clone())
        .filter(|s| !s.trim().is_empty());

    let requested = manifest
        .and_then(|m| m.content_type)
        .or(params.content_type)
        .unwrap_or(defaults.content_type);

    let Some(src) = src else {
        return Err(WrapperError::MissingSource(match manifest {
            Some(_) => "neither the manifest nor the URL provides a src".to_string(),
            None => "add a src or m parameter to the URL".to_string(),
        }));
    };

    let content_type = match requested {
        TypeRequest::Explicit(t) => t,
        TypeRequest::Auto => {
            let detected = detect_type(&src);
            debug!(src = %src, detected = %detected, "Detected content type");
            detected
        }
    };

    // Unprotected fields: URL, then manifest, then defaults.
    let title = params
        .title
        .clone()
        .or_else(|| manifest.and_then(|m| m.title.clone()))
        .or_else(|| defaults.title.clone());

    let show_header = params
        .show_header
        .or_else(|| manifest.and_then(|m| m.show_header))
        .unwrap_or(defaults.show_header);

    let theme = params
        .theme
        .or_else(|| manifest.and_then(|m| m.theme))
        .unwrap_or(defaults.theme);

    let background_color = params
        .background_color
        .clone()
        .or_else(|| manifest.and_then(|m| m.background_color.clone()))
        .or_else(|| defaults.background_color.clone());

    let poster = params
        .poster
        .clone()
        .or_else(|| manifest.and_then(|m| m.poster.clone()));

    let captions = match &params.caption {
        Some(caption) => vec![caption.clone()],
        None => manifest.map(Manifest::captions).unwrap_or_default(),
    };

    let attribution = match (
        params.attribution.clone(),
        manifest.and_then(|m| m.attribution.clone()),
    ) {
        (Some(from_url), Some(from_manifest)) => Some(from_url.or(from_manifest)),
        (from_url, from_manifest) => from_url.or(from_manifest),
    }
    .filter(|a| !a.is_empty());

    Ok(Configuration {
        content_type,
        src,
        title,
        show_header,
        theme,
        background_color,
        poster,
        captions: dedupe_by_language(captions),
        transcripts: manifest.map(Manifest::transcripts).unwrap_or_default(),
        attribution,
        manifest_id: manifest.and_then(|m| m.id.clone()),
    })
}

/// Outcome of the second (manifest) resolution pass
#[derive(Debug)]
pub enum ManifestOutcome {
    /// Manifest fetched and merged
    Resolved {
        config: Configuration,
        manifest: Manifest,
    },
    /// Manifest unavailable; prior configuration (if any) stays in effect
    Degraded { error: WrapperError },
}

/// Resolver bound to a set of defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    defaults: ConfigDefaults,
}

impl ConfigResolver {
    pub fn new(defaults: ConfigDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ConfigDefaults {
        &self.defaults
    }

    /// First pass: URL parameters and defaults only
    pub fn resolve_initial(&self, params: &QueryParams) -> CoreResult<Configuration> {
        resolve(params, None, &self.defaults)
    }

    /// Merges an already-parsed manifest
    pub fn resolve_with_manifest(
        &self,
        params: &QueryParams,
        manifest: &Manifest,
    ) -> CoreResult<Configuration> {
        resolve(params, Some(manifest), &self.defaults)
    }

    /// Fetches and parses a manifest
    pub async fn fetch_manifest(
        &self,
        fetcher: &dyn ResourceFetcher,
        uri: &str,
    ) -> CoreResult<Manifest> {
        let body = fetcher.fetch_text(uri).await?;
        Manifest::parse(&body)
    }

    /// Second pass: fetch the manifest and re-resolve.
    ///
    /// Never fails; fetch, parse, and resolution errors are reported as
    /// [`ManifestOutcome::Degraded`].
    pub async fn resolve_manifest(
        &self,
        fetcher: &dyn ResourceFetcher,
        params: &QueryParams,
        uri: &str,
    ) -> ManifestOutcome {
        let manifest = match self.fetch_manifest(fetcher, uri).await {
            Ok(manifest) => manifest,
            Err(error) => {
                warn!(uri, error = %error, "Manifest unavailable; keeping URL configuration");
                return ManifestOutcome::Degraded { error };
            }
        };

        match self.resolve_with_manifest(params, &manifest) {
            Ok(config) => ManifestOutcome::Resolved { config, manifest },
            Err(error) => {
                warn!(uri, error = %error, "Manifest did not resolve to a usable configuration");
                ManifestOutcome::Degraded { error }
            }
        }
    }
}
