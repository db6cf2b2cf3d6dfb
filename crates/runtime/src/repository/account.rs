use serde::{Deserialize, Serialize};

use game_core::Position;

/// Durable per-username record.
///
/// Respawn coordinates may be absent in older records; readers substitute
/// the world centre via [`Account::respawn_point`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    #[serde(default)]
    pub score: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respawn_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respawn_y: Option<f64>,
}

impl Account {
    /// New account with zero score, respawning at `respawn`.
    pub fn new(username: impl Into<String>, respawn: Position) -> Self {
        Self {
            username: username.into(),
            score: 0,
            respawn_x: Some(respawn.x),
            respawn_y: Some(respawn.y),
        }
    }

    pub fn respawn_point(&self, default: Position) -> Position {
        Position::new(
            self.respawn_x.unwrap_or(default.x),
            self.respawn_y.unwrap_or(default.y),
        )
    }

    pub fn set_respawn(&mut self, position: Position) {
        self.respawn_x = Some(position.x);
        self.respawn_y = Some(position.y);
    }
}
