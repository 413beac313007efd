//! Mediaframe CLI
//!
//! Developer tool for inspecting how a wrapper URL resolves, which plugin a
//! source dispatches to, and what the resize protocol sends and accepts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mediaframe::core::config::{ManifestOutcome, QueryParams};
use mediaframe::core::options::LogLevel;
use mediaframe::{
    detect_type, ConfigResolver, Configuration, CoreResult, FrameMessage, HttpFetcher, InboundMessage,
    Manifest, WrapperError, WrapperOptions,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Wrapper options JSON file (defaults, timings, log level)
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a wrapper query string into its final configuration
    Resolve {
        /// Query string, with or without the leading `?`
        query: String,
        /// Manifest file or http(s) URL; overrides the query's `m` parameter
        #[arg(short, long)]
        manifest: Option<String>,
    },
    /// Print the content type detected for a source URL
    Detect { src: String },
    /// Classify an inbound cross-frame message payload
    Classify { json: String },
    /// Print the outbound frame-resize message for a height
    Message { height: f64 },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Wrapper(#[from] WrapperError),
}

// =============================================================================
// Manifest Sources
// =============================================================================

enum ManifestSource {
    Remote(String),
    Local(PathBuf),
}

impl ManifestSource {
    fn from_reference(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Remote(reference.to_string())
        } else {
            Self::Local(PathBuf::from(reference))
        }
    }
}

fn read_manifest(path: &Path) -> CoreResult<Manifest> {
    let body = std::fs::read_to_string(path).map_err(|e| WrapperError::ManifestFetch {
        uri: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Manifest::parse(&body)
}

/// Same two-pass resolution the wrapper runs: a manifest failure keeps the URL configuration
async fn resolve(
    resolver: &ConfigResolver,
    params: &QueryParams,
    manifest: Option<&str>,
) -> Result<Configuration, CliError> {
    let initial = resolver.resolve_initial(params);
    let Some(reference) = manifest.or(params.manifest.as_deref()) else {
        return Ok(initial?);
    };

    let outcome = match ManifestSource::from_reference(reference) {
        ManifestSource::Remote(uri) => {
            let fetcher = HttpFetcher::new()?;
            resolver.resolve_manifest(&fetcher, params, &uri).await
        }
        ManifestSource::Local(path) => {
            let resolved = read_manifest(&path).and_then(|manifest| {
                let config = resolver.resolve_with_manifest(params, &manifest)?;
                Ok(ManifestOutcome::Resolved { config, manifest })
            });
            resolved.unwrap_or_else(|error| {
                warn!(path = %path.display(), error = %error, "Manifest unavailable; keeping URL configuration");
                ManifestOutcome::Degraded { error }
            })
        }
    };

    match outcome {
        ManifestOutcome::Resolved { config, .. } => Ok(config),
        ManifestOutcome::Degraded { error } => initial.map_err(|_| CliError::Wrapper(error)),
    }
}

fn load_options(path: Option<&Path>) -> Result<WrapperOptions, CliError> {
    let Some(path) = path else {
        return Ok(WrapperOptions::default());
    };
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(WrapperOptions::from_json(&json)?)
}

fn init_tracing(level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    // Stdout carries the command output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = load_options(cli.options.as_deref())?;
    init_tracing(options.log_level);

    match cli.command {
        Commands::Resolve { query, manifest } => {
            let params = QueryParams::parse(&query);
            let resolver = ConfigResolver::new(options.defaults.clone());
            let config = resolve(&resolver, &params, manifest.as_deref()).await?;
            info!(content_type = %config.content_type, src = %config.src, "Configuration resolved");
            print_json(&config)?;
        }
        Commands::Detect { src } => {
            println!("{}", detect_type(&src));
        }
        Commands::Classify { json } => {
            let value: Value = serde_json::from_str(&json).context("Message is not valid JSON")?;
            let message = InboundMessage::classify(&value);
            print_json(&serde_json::json!({
                "message": message,
                "requestsResize": message.requests_resize(),
            }))?;
        }
        Commands::Message { height } => {
            println!("{}", FrameMessage::resize(height).to_json());
        }
    }

    Ok(())
}
