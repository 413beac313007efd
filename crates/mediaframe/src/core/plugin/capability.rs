//! Optional Capability Loading
//!
//! "Ensure capability loaded" as an async operation returning a handle.
//! Loads are memoized per process: concurrent and repeated requests for the
//! same capability share one in-flight load. Each load is capped by
//! `assets.loadTimeoutMs`; failures degrade to baseline behavior.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::core::host::AssetLoader;
use crate::core::options::AssetOptions;
use crate::core::{CoreResult, WrapperError};

/// Optional support library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Enhanced video player
    VideoPlayer,
    /// H5P resizer for H5P embeds
    H5pResizer,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Self::VideoPlayer => "video-player",
            Self::H5pResizer => "h5p-resizer",
        }
    }
}

/// Proof that a capability's script loaded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityHandle {
    pub capability: Capability,
    pub script: String,
}

/// Memoizing loader for optional capabilities
pub struct CapabilityLoader {
    loader: Arc<dyn AssetLoader>,
    options: AssetOptions,
    cells: Mutex<HashMap<Capability, Arc<OnceCell<CapabilityHandle>>>>,
}

impl CapabilityLoader {
    pub fn new(loader: Arc<dyn AssetLoader>, options: AssetOptions) -> Self {
        Self {
            loader,
            options,
            cells: Mutex::new(HashMap::new()),
        }
    }

    fn script_for(&self, capability: Capability) -> &str {
        match capability {
            Capability::VideoPlayer => &self.options.video_player_script,
            Capability::H5pResizer => &self.options.h5p_resizer_script,
        }
    }

    fn cell(&self, capability: Capability) -> Arc<OnceCell<CapabilityHandle>> {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.entry(capability).or_default().clone()
    }

    /// Loads the capability once; later calls return the same handle.
    ///
    /// A failed or timed-out load is not cached, so a later call tries again.
    pub async fn ensure(&self, capability: Capability) -> CoreResult<CapabilityHandle> {
        let cell = self.cell(capability);
        let script = self.script_for(capability).to_string();
        let timeout = self.options.load_timeout();

        let handle = cell
            .get_or_try_init(|| async {
                match tokio::time::timeout(timeout, self.loader.load_script(&script)).await {
                    Ok(Ok(())) => {
                        info!(capability = capability.name(), script = %script, "Capability loaded");
                        Ok(CapabilityHandle {
                            capability,
                            script: script.clone(),
                        })
                    }
                    Ok(Err(e)) => Err(WrapperError::OptionalAsset(format!(
                        "{}: {}",
                        capability.name(),
                        e
                    ))),
                    Err(_) => Err(WrapperError::AssetTimeout {
                        asset: capability.name().to_string(),
                        timeout_ms: self.options.load_timeout_ms,
                    }),
                }
            })
            .await?;

        Ok(handle.clone())
    }

    /// Like [`Self::ensure`], but failures are logged and yield `None`
    pub async fn ensure_optional(&self, capability: Capability) -> Option<CapabilityHandle> {
        match self.ensure(capability).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(capability = capability.name(), error = %e, "Continuing without optional capability");
                None
            }
        }
    }

    pub fn is_loaded(&self, capability: Capability) -> bool {
        self.cell(capability).initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MockAssetLoader;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_load() {
        let assets = Arc::new(MockAssetLoader::with_delay(Duration::from_millis(200)));
        let loader = CapabilityLoader::new(assets.clone(), AssetOptions::default());

        let (a, b) = tokio::join!(
            loader.ensure(Capability::VideoPlayer),
            loader.ensure(Capability::VideoPlayer)
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(assets.load_count(), 1);

        loader.ensure(Capability::VideoPlayer).await.unwrap();
        assert_eq!(assets.load_count(), 1);
        assert!(loader.is_loaded(Capability::VideoPlayer));
        assert!(!loader.is_loaded(Capability::H5pResizer));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades() {
        let assets = Arc::new(MockAssetLoader::with_delay(Duration::from_secs(30)));
        let loader = CapabilityLoader::new(assets, AssetOptions::default());

        let result = loader.ensure(Capability::H5pResizer).await;
        assert!(matches!(
            result,
            Err(WrapperError::AssetTimeout { timeout_ms: 5_000, .. })
        ));
        assert!(loader.ensure_optional(Capability::H5pResizer).await.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let assets = Arc::new(MockAssetLoader::failing());
        let loader = CapabilityLoader::new(assets.clone(), AssetOptions::default());

        assert!(loader.ensure_optional(Capability::VideoPlayer).await.is_none());
        assert!(loader.ensure_optional(Capability::VideoPlayer).await.is_none());
        assert_eq!(assets.load_count(), 2);
        assert!(!loader.is_loaded(Capability::VideoPlayer));
    }
}
