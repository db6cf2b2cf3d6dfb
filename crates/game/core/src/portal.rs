//! Fixed portals that bind an account's respawn point to a town.

use crate::geometry::Position;

pub type PortalId = u32;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Portal {
    pub id: PortalId,
    pub name: String,
    pub town: String,
    pub x: f64,
    pub y: f64,
}

impl Portal {
    pub fn new(id: PortalId, name: impl Into<String>, town: impl Into<String>, at: Position) -> Self {
        Self {
            id,
            name: name.into(),
            town: town.into(),
            x: at.x,
            y: at.y,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Immutable portal list, kept in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortalTable {
    portals: Vec<Portal>,
}

impl PortalTable {
    pub fn new(portals: Vec<Portal>) -> Self {
        Self { portals }
    }

    /// First portal (in table order) whose centre lies within `radius` of `position`.
    pub fn first_within(&self, position: Position, radius: f64) -> Option<&Portal> {
        self.portals
            .iter()
            .find(|portal| portal.position().distance(position) <= radius)
    }

    pub fn as_slice(&self) -> &[Portal] {
        &self.portals
    }

    pub fn len(&self) -> usize {
        self.portals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }
}
