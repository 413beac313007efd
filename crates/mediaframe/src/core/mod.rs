//! Mediaframe Core Engine
//!
//! Configuration resolution, resize negotiation, plugin dispatch and the
//! wrapper lifecycle.

pub mod config;
pub mod controller;
pub mod events;
#[cfg(feature = "http")]
pub mod fetch;
pub mod host;
pub mod options;
pub mod plugin;
pub mod resize;
pub mod theme;
pub mod ui;

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;
