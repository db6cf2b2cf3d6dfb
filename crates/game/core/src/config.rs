use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;
use crate::geometry::Position;

/// World tuning constants and bounds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// World width in world units.
    pub width: f64,
    /// World height in world units.
    pub height: f64,
    /// Radius of a player body. Sessions never get closer than this to an edge.
    pub entity_radius: f64,
    /// Size of the orb pool created at startup.
    pub orb_count: u32,
    /// Score credited for collecting one orb.
    pub orb_reward: u64,
    /// Delay between an orb being collected and it reappearing.
    pub orb_respawn_delay_ms: u64,
    /// Maximum straight-line distance at which a portal can be used.
    pub portal_radius: f64,
}

impl WorldConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WIDTH: f64 = 2000.0;
    pub const DEFAULT_HEIGHT: f64 = 2000.0;
    pub const DEFAULT_ENTITY_RADIUS: f64 = 20.0;
    pub const DEFAULT_ORB_COUNT: u32 = 50;
    pub const DEFAULT_ORB_REWARD: u64 = 10;
    pub const DEFAULT_ORB_RESPAWN_DELAY_MS: u64 = 5000;
    pub const DEFAULT_PORTAL_RADIUS: f64 = 100.0;

    pub fn new() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            entity_radius: Self::DEFAULT_ENTITY_RADIUS,
            orb_count: Self::DEFAULT_ORB_COUNT,
            orb_reward: Self::DEFAULT_ORB_REWARD,
            orb_respawn_delay_ms: Self::DEFAULT_ORB_RESPAWN_DELAY_MS,
            portal_radius: Self::DEFAULT_PORTAL_RADIUS,
        }
    }

    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_orb_count(mut self, orb_count: u32) -> Self {
        self.orb_count = orb_count;
        self
    }

    /// Checks the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let r = self.entity_radius;
        if !r.is_finite() || r < 0.0 || 2.0 * r > self.width || 2.0 * r > self.height {
            return Err(ConfigError::InvalidRadius {
                radius: r,
                width: self.width,
                height: self.height,
            });
        }

        if self.orb_respawn_delay_ms == 0 {
            return Err(ConfigError::ZeroRespawnDelay);
        }

        if !self.portal_radius.is_finite() || self.portal_radius < 0.0 {
            return Err(ConfigError::InvalidPortalRadius(self.portal_radius));
        }

        Ok(())
    }

    pub fn orb_respawn_delay(&self) -> Duration {
        Duration::from_millis(self.orb_respawn_delay_ms)
    }

    /// Default spawn and respawn point.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamps a position so a body of `entity_radius` stays fully inside the world.
    ///
    /// Non-finite coordinates collapse to the lower bound of their axis.
    pub fn clamp(&self, position: Position) -> Position {
        let r = self.entity_radius;
        Position::new(
            clamp_axis(position.x, r, self.width - r),
            clamp_axis(position.y, r, self.height - r),
        )
    }

    pub fn contains(&self, position: Position) -> bool {
        let r = self.entity_radius;
        (r..=self.width - r).contains(&position.x) && (r..=self.height - r).contains(&position.y)
    }

    /// Uniformly random position inside the clamped bounds.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let r = self.entity_radius;
        Position::new(
            sample_axis(rng, r, self.width - r),
            sample_axis(rng, r, self.height - r),
        )
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min { rng.gen_range(min..=max) } else { min }
}
