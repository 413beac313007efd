//! HTTP Resource Fetcher
//!
//! [`ResourceFetcher`] over reqwest, for hosts that fetch manifests and
//! transcripts outside a browser (the CLI, server-side previews).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::host::ResourceFetcher;
use super::{CoreResult, WrapperError};

// =============================================================================
// HTTP Fetcher
// =============================================================================

pub struct HttpFetcher {
    /// Base that relative manifest and transcript references resolve against
    base: Option<Url>,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new() -> CoreResult<Self> {
        Self::with_timeout(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WrapperError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base: None, client })
    }

    /// Resolves relative references against `base`
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    fn resolve(&self, uri: &str) -> CoreResult<Url> {
        let parsed = match &self.base {
            Some(base) => base.join(uri),
            None => Url::parse(uri),
        };
        parsed.map_err(|e| WrapperError::ManifestFetch {
            uri: uri.to_string(),
            reason: format!("invalid URL: {}", e),
        })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch_text(&self, uri: &str) -> CoreResult<String> {
        let url = self.resolve(uri)?;
        debug!(url = %url, "Fetching resource");

        let fetch_error = |reason: String| WrapperError::ManifestFetch {
            uri: uri.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| fetch_error(format!("Failed to read response: {}", e)))
    }
}
