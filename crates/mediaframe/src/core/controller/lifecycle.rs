//! Wrapper Lifecycle
//!
//! `uninitialized -> structure-built -> resize-armed -> (manifest-pending | config-final) -> ready -> destroyed`
//!
//! `error` is reachable from any live state and never proceeds to `ready`.

use std::fmt;

use crate::core::{CoreResult, WrapperError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    StructureBuilt,
    ResizeArmed,
    /// Interactive with URL-derived UI while the manifest fetch is in flight
    ManifestPending,
    ConfigFinal,
    Ready,
    Destroyed,
    Error,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::StructureBuilt => "structure-built",
            Self::ResizeArmed => "resize-armed",
            Self::ManifestPending => "manifest-pending",
            Self::ConfigFinal => "config-final",
            Self::Ready => "ready",
            Self::Destroyed => "destroyed",
            Self::Error => "error",
        }
    }

    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Uninitialized, StructureBuilt)
                | (StructureBuilt, ResizeArmed)
                | (ResizeArmed, ManifestPending)
                | (ResizeArmed, ConfigFinal)
                | (ManifestPending, ConfigFinal)
                | (ConfigFinal, Ready)
                | (Ready, Destroyed)
                | (Error, Destroyed)
        ) || (next == Error && !matches!(self, Destroyed | Error))
    }

    /// Validated transition
    pub fn transition(&mut self, next: LifecycleState) -> CoreResult<()> {
        if !self.can_transition_to(next) {
            return Err(WrapperError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
