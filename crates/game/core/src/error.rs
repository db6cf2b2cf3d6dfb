//! Error types raised by world-state operations.
//!
//! Both errors are validation-class: the caller rejected the request and the
//! world is unchanged. Neither indicates corrupted state.

use thiserror::Error;

use crate::orb::OrbId;

/// Reasons an orb collection was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CollectError {
    #[error("orb {0} does not exist")]
    UnknownOrb(OrbId),

    #[error("orb {0} is already collected")]
    AlreadyCollected(OrbId),
}

/// Rejected world configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("world dimensions must be positive and finite (got {width}x{height})")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("entity radius {radius} leaves no room inside a {width}x{height} world")]
    InvalidRadius { radius: f64, width: f64, height: f64 },

    #[error("orb respawn delay must be greater than zero")]
    ZeroRespawnDelay,

    #[error("portal interaction radius must be non-negative and finite (got {0})")]
    InvalidPortalRadius(f64),
}
