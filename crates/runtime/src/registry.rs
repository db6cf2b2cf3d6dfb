//! Connection registry: which live connections exist and who they are.
//!
//! A connection moves through `Connected` (no session) to `Joined` (one
//! session). Removing it is terminal; a closed connection is simply absent
//! from the registry.

use std::collections::HashMap;

use thiserror::Error;

use game_core::{Position, WorldConfig};

use crate::protocol::PlayerView;
use crate::types::ConnectionId;

/// Ephemeral server-side record of one joined client.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub position: Position,
    /// Mirrors the account score at join time, then runs ahead of it until flushed.
    pub score: u64,
}

impl Session {
    pub fn view(&self) -> PlayerView {
        PlayerView {
            username: self.username.clone(),
            x: self.position.x,
            y: self.position.y,
            score: self.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionPhase {
    Connected,
    Joined(Session),
}

/// Parameters of a `join` request.
#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub username: String,
    pub score: u64,
    pub respawn_x: Option<f64>,
    pub respawn_y: Option<f64>,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct Joined {
    pub session: Session,
    /// Session this join displaced on the same connection, if any.
    pub replaced: Option<Session>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is not a live connection")]
    UnknownConnection(ConnectionId),
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionPhase>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly opened connection. Returns `false` if it was already known.
    pub fn connect(&mut self, connection: ConnectionId) -> bool {
        if self.connections.contains_key(&connection) {
            return false;
        }
        self.connections
            .insert(connection, ConnectionPhase::Connected);
        true
    }

    /// Creates (or replaces) the session of `connection`.
    ///
    /// The spawn point is the requested respawn point, each missing axis
    /// falling back to the world centre, clamped to the world bounds.
    pub fn join(
        &mut self,
        connection: ConnectionId,
        request: JoinRequest,
        config: &WorldConfig,
    ) -> Result<Joined, RegistryError> {
        let phase = self
            .connections
            .get_mut(&connection)
            .ok_or(RegistryError::UnknownConnection(connection))?;

        let center = config.center();
        let spawn = config.clamp(Position::new(
            request.respawn_x.unwrap_or(center.x),
            request.respawn_y.unwrap_or(center.y),
        ));
        let session = Session {
            username: request.username,
            position: spawn,
            score: request.score,
        };

        let previous = std::mem::replace(phase, ConnectionPhase::Joined(session.clone()));
        let replaced = match previous {
            ConnectionPhase::Joined(old) => Some(old),
            ConnectionPhase::Connected => None,
        };

        Ok(Joined { session, replaced })
    }

    /// Removes the connection. Returns its session if it had joined.
    ///
    /// Calling this for an unknown or never-joined connection is a no-op
    /// apart from forgetting the connection.
    pub fn leave(&mut self, connection: ConnectionId) -> Option<Session> {
        match self.connections.remove(&connection)? {
            ConnectionPhase::Joined(session) => Some(session),
            ConnectionPhase::Connected => None,
        }
    }

    pub fn phase(&self, connection: ConnectionId) -> Option<&ConnectionPhase> {
        self.connections.get(&connection)
    }

    pub fn session(&self, connection: ConnectionId) -> Option<&Session> {
        match self.connections.get(&connection)? {
            ConnectionPhase::Joined(session) => Some(session),
            ConnectionPhase::Connected => None,
        }
    }

    pub fn session_mut(&mut self, connection: ConnectionId) -> Option<&mut Session> {
        match self.connections.get_mut(&connection)? {
            ConnectionPhase::Joined(session) => Some(session),
            ConnectionPhase::Connected => None,
        }
    }

    /// All joined sessions, in no particular order.
    pub fn sessions(&self) -> impl Iterator<Item = (ConnectionId, &Session)> {
        self.connections.iter().filter_map(|(id, phase)| match phase {
            ConnectionPhase::Joined(session) => Some((*id, session)),
            ConnectionPhase::Connected => None,
        })
    }

    /// Whether another connection currently holds a session for `username`.
    pub fn username_in_use(&self, username: &str, except: ConnectionId) -> bool {
        self.sessions()
            .any(|(id, session)| id != except && session.username == username)
    }

    /// Number of live connections, joined or not.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
