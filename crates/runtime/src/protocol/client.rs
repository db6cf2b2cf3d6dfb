//! Inbound (client → server) messages.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use game_core::OrbId;

/// Messages the runtime acts on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join {
        username: String,
        score: u64,
        #[serde(default)]
        respawn_x: Option<f64>,
        #[serde(default)]
        respawn_y: Option<f64>,
    },
    Move {
        x: f64,
        y: f64,
    },
    CollectOrb {
        orb_id: OrbId,
    },
    InteractPortal,
    Chat {
        message: String,
    },
    /// Accepted at the wire level; handled by subsystems outside the world core.
    #[serde(skip)]
    External { kind: ExternalKind },
}

/// Message kinds owned by other subsystems (combat, skills, inventory).
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum ExternalKind {
    UseSkill,
    AttackEnemy,
    EquipItem,
    UnequipItem,
    UseItem,
    DropItem,
}

const CORE_KINDS: [&str; 5] = ["join", "move", "collectOrb", "interactPortal", "chat"];

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("message has no string `type` field")]
    MissingType,

    #[error("unknown message type `{0}`")]
    UnknownKind(String),
}

impl ClientMessage {
    /// Wire name of this message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::Move { .. } => "move",
            ClientMessage::CollectOrb { .. } => "collectOrb",
            ClientMessage::InteractPortal => "interactPortal",
            ClientMessage::Chat { .. } => "chat",
            ClientMessage::External { .. } => "external",
        }
    }
}

/// Decodes one text frame.
pub fn decode(text: &str) -> Result<ClientMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_owned();

    if let Ok(kind) = kind.parse::<ExternalKind>() {
        return Ok(ClientMessage::External { kind });
    }
    if !CORE_KINDS.contains(&kind.as_str()) {
        return Err(ProtocolError::UnknownKind(kind));
    }

    serde_json::from_value::<ClientMessage>(value).map_err(ProtocolError::Malformed)
}
