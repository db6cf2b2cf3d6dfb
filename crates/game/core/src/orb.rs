//! Collectible orbs and the fixed-size pool that owns them.
//!
//! The pool is created once at startup and never shrinks. An orb moves
//! between two states only: available (`collected == false`) and collected.
//! [`OrbPool::collect`] is the single find-and-flip step for the first
//! transition; [`OrbPool::respawn`] is the only way back.

use rand::Rng;

use crate::config::WorldConfig;
use crate::error::CollectError;
use crate::geometry::Position;

pub type OrbId = u32;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orb {
    pub id: OrbId,
    pub x: f64,
    pub y: f64,
    pub collected: bool,
}

impl Orb {
    pub fn new(id: OrbId, position: Position) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            collected: false,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Every orb in the world, indexed by id.
///
/// Ids are dense (`0..len`), so lookups are a bounds-checked index.
#[derive(Clone, Debug, Default)]
pub struct OrbPool {
    orbs: Vec<Orb>,
}

impl OrbPool {
    /// Creates `count` available orbs at random positions inside the world.
    pub fn generate<R: Rng + ?Sized>(count: u32, config: &WorldConfig, rng: &mut R) -> Self {
        let orbs = (0..count)
            .map(|id| Orb::new(id, config.random_position(rng)))
            .collect();
        Self { orbs }
    }

    /// Builds a pool from explicit orbs, reassigning ids by position in the list.
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let orbs = positions
            .into_iter()
            .enumerate()
            .map(|(idx, pos)| Orb::new(idx as OrbId, pos))
            .collect();
        Self { orbs }
    }

    pub fn get(&self, id: OrbId) -> Option<&Orb> {
        self.orbs.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.orbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Orb> {
        self.orbs.iter()
    }

    pub fn uncollected(&self) -> impl Iterator<Item = &Orb> {
        self.orbs.iter().filter(|orb| !orb.collected)
    }

    /// Marks an available orb as collected and returns its state after the flip.
    ///
    /// Succeeds at most once per orb until [`respawn`](Self::respawn) runs.
    pub fn collect(&mut self, id: OrbId) -> Result<Orb, CollectError> {
        let orb = self
            .orbs
            .get_mut(id as usize)
            .ok_or(CollectError::UnknownOrb(id))?;

        if orb.collected {
            return Err(CollectError::AlreadyCollected(id));
        }

        orb.collected = true;
        Ok(orb.clone())
    }

    /// Returns a collected orb to play at a fresh random position.
    ///
    /// Returns `None` for unknown ids and for orbs that are not collected, so a
    /// stray timer can never move an orb that players can currently see.
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        id: OrbId,
        config: &WorldConfig,
        rng: &mut R,
    ) -> Option<Orb> {
        let orb = self.orbs.get_mut(id as usize)?;
        if !orb.collected {
            return None;
        }

        let position = config.random_position(rng);
        orb.x = position.x;
        orb.y = position.y;
        orb.collected = false;
        Some(orb.clone())
    }
}
