//! Content Plugin System
//!
//! Content plugins render one content type into the wrapper's content root.
//! The core only defines the load contract, the handle plugins call back
//! into, and the registry that dispatches by content type.

pub mod capability;
pub mod context;
pub mod registry;

pub use capability::{Capability, CapabilityHandle, CapabilityLoader};
pub use context::PluginContext;
pub use registry::{Cleanup, ContentPlugin, PluginRegistry};
