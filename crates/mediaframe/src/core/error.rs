//! Mediaframe Error Definitions
//!
//! Defines error types used throughout the wrapper.

use thiserror::Error;

use super::ContentType;

/// Core wrapper error types
#[derive(Error, Debug)]
pub enum WrapperError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("No content source provided: {0}")]
    MissingSource(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    // =========================================================================
    // Manifest I/O Errors
    // =========================================================================
    #[error("Failed to fetch {uri}: {reason}")]
    ManifestFetch { uri: String, reason: String },

    // =========================================================================
    // Plugin Errors
    // =========================================================================
    #[error("No content plugin registered for type: {0}")]
    PluginNotRegistered(ContentType),

    #[error("Content plugin failed: {0}")]
    PluginLoad(String),

    // =========================================================================
    // Transcript Errors
    // =========================================================================
    #[error("Transcript unavailable ({language}): {reason}")]
    TranscriptFetch { language: String, reason: String },

    // =========================================================================
    // Optional Asset Errors
    // =========================================================================
    #[error("Optional asset failed to load: {0}")]
    OptionalAsset(String),

    #[error("Optional asset timed out after {timeout_ms}ms: {asset}")]
    AssetTimeout { asset: String, timeout_ms: u64 },

    // =========================================================================
    // Structure / Lifecycle Errors
    // =========================================================================
    #[error("Failed to build wrapper structure: {0}")]
    Structure(String),

    #[error("Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core wrapper result type
pub type CoreResult<T> = Result<T, WrapperError>;

/// Failure classes the wrapper distinguishes when deciding how to surface an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing source or malformed manifest; rendered as an error panel
    Config,
    /// A content plugin rejected; rendered as an error panel
    PluginLoad,
    /// Localized to the transcript panel
    TranscriptFetch,
    /// Logged only; the wrapper degrades to baseline behavior
    OptionalAsset,
    /// DOM construction failed; the wrapper never becomes ready
    Structure,
    /// Anything else
    Internal,
}

impl WrapperError {
    /// Classifies the error into the failure class used for surfacing
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSource(_)
            | Self::InvalidManifest(_)
            | Self::InvalidParameter { .. }
            | Self::ManifestFetch { .. }
            | Self::Json(_) => ErrorKind::Config,
            Self::PluginNotRegistered(_) | Self::PluginLoad(_) => ErrorKind::PluginLoad,
            Self::TranscriptFetch { .. } => ErrorKind::TranscriptFetch,
            Self::OptionalAsset(_) | Self::AssetTimeout { .. } => ErrorKind::OptionalAsset,
            Self::Structure(_) => ErrorKind::Structure,
            Self::InvalidTransition { .. } | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Short title shown above the message in an error panel
    pub fn panel_title(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Config => "Configuration Error",
            ErrorKind::PluginLoad => "Content Failed to Load",
            ErrorKind::TranscriptFetch => "Transcript Unavailable",
            ErrorKind::OptionalAsset => "Feature Unavailable",
            ErrorKind::Structure => "Wrapper Error",
            ErrorKind::Internal => "Unexpected Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            WrapperError::MissingSource("x".into()).kind(),
            ErrorKind::Config
        );
        assert_eq!(
            WrapperError::PluginNotRegistered(ContentType::Pdf).kind(),
            ErrorKind::PluginLoad
        );
        assert_eq!(
            WrapperError::AssetTimeout {
                asset: "plyr".into(),
                timeout_ms: 5000
            }
            .kind(),
            ErrorKind::OptionalAsset
        );
    }

    #[test]
    fn test_json_error_is_config() {
        let err: WrapperError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.panel_title(), "Configuration Error");
    }

    #[test]
    fn test_display_messages() {
        let err = WrapperError::PluginNotRegistered(ContentType::Supersplat);
        assert_eq!(
            err.to_string(),
            "No content plugin registered for type: supersplat"
        );
    }
}
