//! Wrapper Controller
//!
//! Orchestrates initialization: shell, theme, resize negotiation,
//! configuration, content dispatch, and the manifest-dependent UI.

mod wrapper;
pub mod lifecycle;

pub use wrapper::{WrapperController, WrapperEnvironment};
pub use lifecycle::LifecycleState;
