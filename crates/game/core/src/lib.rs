//! Authoritative world rules and data types shared across the server.
//!
//! `game-core` defines the shared mutable world (the orb pool) and the static
//! tables around it (portals, zones), together with the geometry that keeps
//! every session inside the world bounds. Everything here is pure data plus
//! synchronous mutation; the runtime owns a [`WorldState`] instance and is
//! the only writer.
pub mod config;
pub mod error;
pub mod geometry;
pub mod orb;
pub mod portal;
pub mod world;
pub mod zone;

pub use config::WorldConfig;
pub use error::{CollectError, ConfigError};
pub use geometry::Position;
pub use orb::{Orb, OrbId, OrbPool};
pub use portal::{Portal, PortalId, PortalTable};
pub use world::{WorldLayout, WorldState};
pub use zone::{Zone, ZoneKind, ZoneTable};
