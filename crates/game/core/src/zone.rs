//! Static rectangular regions used for spatial classification.

use crate::geometry::Position;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ZoneKind {
    Town,
    Road,
    Wilderness,
    Dungeon,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ZoneKind,
    pub theme: String,
}

impl Zone {
    pub fn new(x: f64, y: f64, width: f64, height: f64, kind: ZoneKind, theme: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
            theme: theme.into(),
        }
    }

    /// Half-open containment: `[x, x + width) × [y, y + height)`.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x < self.x + self.width
            && position.y >= self.y
            && position.y < self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Immutable zone list. Earlier zones take priority where rectangles overlap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneTable {
    zones: Vec<Zone>,
}

impl ZoneTable {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    pub fn zone_at(&self, position: Position) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(position))
    }

    pub fn as_slice(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
