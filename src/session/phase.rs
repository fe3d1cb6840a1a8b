//! Preview phase state machine.

use std::fmt;

/// Phase of a preview attempt. The single source of truth for the subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting on capability probes or hardware permission
    Requesting,
    /// Embedded model viewer shown
    ActiveModel,
    /// Immersive AR session running
    ActiveXr,
    /// Camera overlay running
    ActiveCamera,
    /// Camera refused or absent; needs a fresh user-initiated retry
    Denied,
}

impl Phase {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Phase::ActiveModel | Phase::ActiveXr | Phase::ActiveCamera
        )
    }

    /// Whether a new preview attempt may begin from this phase
    pub fn can_start(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Denied)
    }

    /// Transitions the state machine allows, excluding the unconditional stop
    pub fn can_transition_to(&self, next: Phase) -> bool {
        use Phase::*;
        match (self, next) {
            (Idle, Requesting) | (Denied, Requesting) => true,
            (Requesting, ActiveModel | ActiveXr | ActiveCamera | Denied) => true,
            (ActiveModel | ActiveXr | ActiveCamera | Denied, Idle) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Requesting => write!(f, "requesting"),
            Phase::ActiveModel => write!(f, "active-model"),
            Phase::ActiveXr => write!(f, "active-xr"),
            Phase::ActiveCamera => write!(f, "active-camera"),
            Phase::Denied => write!(f, "denied"),
        }
    }
}
