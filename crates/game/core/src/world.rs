//! Aggregate world state owned by the runtime.

use rand::Rng;

use crate::config::WorldConfig;
use crate::error::{CollectError, ConfigError};
use crate::geometry::Position;
use crate::orb::{Orb, OrbId, OrbPool};
use crate::portal::{Portal, PortalTable};
use crate::zone::{Zone, ZoneTable};

/// Static content that shapes the world: zones and portals.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldLayout {
    #[cfg_attr(feature = "serde", serde(default))]
    pub zones: Vec<Zone>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub portals: Vec<Portal>,
}

/// The shared world: tuning, the orb pool, and the static tables.
///
/// One instance exists per server process and is handed to the runtime's
/// world worker, which is its only writer.
#[derive(Clone, Debug)]
pub struct WorldState {
    config: WorldConfig,
    orbs: OrbPool,
    portals: PortalTable,
    zones: ZoneTable,
}

impl WorldState {
    /// Builds a world with a freshly generated orb pool.
    pub fn new<R: Rng + ?Sized>(
        config: WorldConfig,
        layout: WorldLayout,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let orbs = OrbPool::generate(config.orb_count, &config, rng);
        Ok(Self::with_orbs(config, layout, orbs))
    }

    /// Builds a world around an explicit orb pool (fixtures, replays).
    pub fn with_orbs(config: WorldConfig, layout: WorldLayout, orbs: OrbPool) -> Self {
        Self {
            config,
            orbs,
            portals: PortalTable::new(layout.portals),
            zones: ZoneTable::new(layout.zones),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn orbs(&self) -> &OrbPool {
        &self.orbs
    }

    pub fn portals(&self) -> &PortalTable {
        &self.portals
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn clamp(&self, position: Position) -> Position {
        self.config.clamp(position)
    }

    pub fn collect_orb(&mut self, id: OrbId) -> Result<Orb, CollectError> {
        self.orbs.collect(id)
    }

    pub fn respawn_orb<R: Rng + ?Sized>(&mut self, id: OrbId, rng: &mut R) -> Option<Orb> {
        self.orbs.respawn(id, &self.config, rng)
    }

    pub fn portal_near(&self, position: Position) -> Option<&Portal> {
        self.portals.first_within(position, self.config.portal_radius)
    }

    pub fn zone_at(&self, position: Position) -> Option<&Zone> {
        self.zones.zone_at(position)
    }
}
