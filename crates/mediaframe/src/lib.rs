//! Mediaframe Core Library
//!
//! Embeddable content wrapper for heterogeneous learning media.
//! This library contains the configuration resolver, the iframe resize
//! negotiation protocol, the content plugin registry, and the wrapper
//! lifecycle controller.
//!
//! ## Host Integration
//!
//! Every browser capability (DOM, layout measurement, cross-frame messaging,
//! media queries, fetch, script injection) is reached through the traits in
//! [`core::host`]. A browser binding implements those traits; the core never
//! touches the DOM directly.

pub mod core;

pub use crate::core::{
    config::{detect_type, ConfigResolver, Configuration, Manifest, QueryParams},
    controller::{LifecycleState, WrapperController, WrapperEnvironment},
    error::{CoreResult, ErrorKind, WrapperError},
    options::WrapperOptions,
    plugin::{ContentPlugin, PluginContext, PluginRegistry},
    resize::{FrameMessage, InboundMessage, ResizeNegotiator},
    types::{ContentType, Theme, ThemePreference},
};

#[cfg(feature = "http")]
pub use crate::core::fetch::HttpFetcher;
