//! Outbound (server → client) events.

use serde::{Deserialize, Serialize};

use game_core::{Orb, OrbId, Portal, Zone};

/// Public view of a joined session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub username: String,
    pub x: f64,
    pub y: f64,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Full world snapshot, sent to a joining connection only.
    GameState {
        players: Vec<PlayerView>,
        orbs: Vec<Orb>,
        world_width: f64,
        world_height: f64,
        zones: Vec<Zone>,
        portals: Vec<Portal>,
    },
    PlayerJoined {
        username: String,
        x: f64,
        y: f64,
    },
    PlayerMove {
        username: String,
        x: f64,
        y: f64,
    },
    PlayerLeft {
        username: String,
    },
    OrbCollected {
        orb_id: OrbId,
        username: String,
        score: u64,
    },
    OrbRespawn {
        orb: Orb,
    },
    /// Confirmation of a portal binding, sent to the requester only.
    RespawnSet {
        portal: String,
        town: String,
        x: f64,
        y: f64,
    },
    Chat {
        username: String,
        message: String,
    },
}

impl ServerMessage {
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
