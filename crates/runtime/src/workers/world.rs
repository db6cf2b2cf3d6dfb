//! World worker that owns the authoritative [`WorldState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), dispatches
//! decoded client messages against the world and the connection registry,
//! and publishes the resulting events on the [`EventBus`].
//!
//! Every handler here is synchronous. Storage side effects are handed to the
//! persistence worker as jobs, so no handler ever suspends between reading
//! and writing shared state. In particular an orb's collected flag flips in
//! the same step that credits the score.

use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, trace, warn};

use game_core::{Orb, OrbId, Position, WorldConfig, WorldState};

use crate::events::{EventBus, Topic};
use crate::protocol::{self, ClientMessage, PlayerView, ServerMessage};
use crate::registry::{ConnectionPhase, ConnectionRegistry, JoinRequest};
use crate::types::ConnectionId;
use crate::workers::{Expiry, PersistenceJob, Scheduler};

/// Longest chat line relayed, in characters. Longer lines are truncated.
pub const MAX_CHAT_CHARS: usize = 200;

/// Commands that can be sent to the world worker
pub enum Command {
    /// A transport accepted a new connection.
    Connect { connection: ConnectionId },
    /// One raw text frame received from a connection.
    Inbound {
        connection: ConnectionId,
        text: String,
    },
    /// The connection closed. Safe to send more than once.
    Disconnect { connection: ConnectionId },
    /// Read-only snapshot of the world and its sessions.
    QueryWorld { reply: oneshot::Sender<WorldSnapshot> },
    /// Resolves once every persistence job issued so far has been applied.
    FlushPersistence { reply: oneshot::Sender<()> },
    /// Cancel respawn timers and stop. Pending persistence jobs still drain.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Point-in-time copy of world state, for tests and diagnostics.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub config: WorldConfig,
    /// Every orb in the pool, collected or not, ordered by id.
    pub orbs: Vec<Orb>,
    /// Joined sessions ordered by connection id.
    pub players: Vec<PlayerView>,
    /// Live connections, joined or not.
    pub connections: usize,
    pub pending_respawns: usize,
}

impl WorldSnapshot {
    pub fn player(&self, username: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.username == username)
    }

    pub fn orb(&self, id: OrbId) -> Option<&Orb> {
        self.orbs.iter().find(|orb| orb.id == id)
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Background task that processes world commands one at a time.
pub struct WorldWorker {
    world: WorldState,
    registry: ConnectionRegistry,
    scheduler: Scheduler<OrbId>,
    expired_rx: mpsc::UnboundedReceiver<Expiry<OrbId>>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    persistence_tx: mpsc::UnboundedSender<PersistenceJob>,
    rng: StdRng,
}

impl WorldWorker {
    pub fn new(
        world: WorldState,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        persistence_tx: mpsc::UnboundedSender<PersistenceJob>,
        rng: StdRng,
    ) -> Self {
        let (scheduler, expired_rx) = Scheduler::new();

        info!(
            target: "runtime::world",
            "WorldWorker initialized with {} orbs, {} portals, {} zones",
            world.orbs().len(),
            world.portals().len(),
            world.zones().len()
        );

        Self {
            world,
            registry: ConnectionRegistry::new(),
            scheduler,
            expired_rx,
            command_rx,
            event_bus,
            persistence_tx,
            rng,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        debug!(target: "runtime::world", "Command channel closed");
                        break;
                    };
                    if let Flow::Stop = self.handle_command(cmd) {
                        break;
                    }
                }
                Some(expiry) = self.expired_rx.recv() => {
                    self.handle_expiry(expiry);
                }
            }
        }

        let cancelled = self.scheduler.cancel_all();
        info!(
            target: "runtime::world",
            cancelled_respawns = cancelled,
            "WorldWorker stopped"
        );
    }

    fn handle_command(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::Connect { connection } => {
                if !self.registry.connect(connection) {
                    warn!(target: "runtime::world", %connection, "Connection registered twice");
                }
            }
            Command::Inbound { connection, text } => self.handle_inbound(connection, &text),
            Command::Disconnect { connection } => self.handle_disconnect(connection),
            Command::QueryWorld { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!(target: "runtime::world", "QueryWorld reply channel closed (caller dropped)");
                }
            }
            Command::FlushPersistence { reply } => {
                if self
                    .persistence_tx
                    .send(PersistenceJob::Barrier { reply })
                    .is_err()
                {
                    error!(target: "runtime::world", "Persistence worker is gone");
                }
            }
            Command::Shutdown { reply } => {
                if reply.send(()).is_err() {
                    debug!(target: "runtime::world", "Shutdown reply channel closed (caller dropped)");
                }
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn handle_inbound(&mut self, connection: ConnectionId, text: &str) {
        let message = match protocol::decode(text) {
            Ok(message) => message,
            Err(error) => {
                warn!(target: "runtime::world", %connection, %error, "Dropping malformed message");
                return;
            }
        };

        let joined = match self.registry.phase(connection) {
            Some(ConnectionPhase::Joined(_)) => true,
            Some(ConnectionPhase::Connected) => false,
            None => {
                trace!(target: "runtime::world", %connection, "Message from unknown connection");
                return;
            }
        };

        match message {
            ClientMessage::Join {
                username,
                score,
                respawn_x,
                respawn_y,
            } => self.handle_join(
                connection,
                JoinRequest {
                    username,
                    score,
                    respawn_x,
                    respawn_y,
                },
            ),
            other if !joined => {
                debug!(
                    target: "runtime::world",
                    %connection,
                    kind = other.kind(),
                    "Ignoring message before join"
                );
            }
            ClientMessage::Move { x, y } => self.handle_move(connection, Position::new(x, y)),
            ClientMessage::CollectOrb { orb_id } => self.handle_collect(connection, orb_id),
            ClientMessage::InteractPortal => self.handle_portal(connection),
            ClientMessage::Chat { message } => self.handle_chat(connection, &message),
            ClientMessage::External { kind } => {
                trace!(target: "runtime::world", %connection, %kind, "Passing over external message");
            }
        }
    }

    fn handle_join(&mut self, connection: ConnectionId, request: JoinRequest) {
        if self.registry.username_in_use(&request.username, connection) {
            warn!(
                target: "runtime::world",
                %connection,
                username = %request.username,
                "Username already has a live session"
            );
        }

        let joined = match self
            .registry
            .join(connection, request, self.world.config())
        {
            Ok(joined) => joined,
            Err(error) => {
                warn!(target: "runtime::world", %error, "Join rejected");
                return;
            }
        };

        // A replaced session is swapped silently; peers only see the new playerJoined.
        if let Some(previous) = joined.replaced {
            debug!(
                target: "runtime::world",
                %connection,
                previous = %previous.username,
                "Session replaced on rejoin"
            );
        }

        let session = joined.session;
        info!(
            target: "runtime::world",
            %connection,
            username = %session.username,
            x = session.position.x,
            y = session.position.y,
            "Player joined"
        );

        self.event_bus.send_to(connection, &self.game_state());
        self.event_bus.publish(
            Topic::World,
            &ServerMessage::PlayerJoined {
                username: session.username,
                x: session.position.x,
                y: session.position.y,
            },
            Some(connection),
        );
    }

    fn handle_move(&mut self, connection: ConnectionId, target: Position) {
        let position = self.world.clamp(target);
        let Some(session) = self.registry.session_mut(connection) else {
            return;
        };
        session.position = position;

        let event = ServerMessage::PlayerMove {
            username: session.username.clone(),
            x: position.x,
            y: position.y,
        };
        self.event_bus
            .publish(Topic::World, &event, Some(connection));
    }

    fn handle_collect(&mut self, connection: ConnectionId, orb_id: OrbId) {
        let reward = self.world.config().orb_reward;
        let delay = self.world.config().orb_respawn_delay();

        if self.registry.session(connection).is_none() {
            return;
        }
        if let Err(error) = self.world.collect_orb(orb_id) {
            debug!(target: "runtime::world", %connection, %error, "Collect ignored");
            return;
        }
        let Some(session) = self.registry.session_mut(connection) else {
            return;
        };
        session.score = session.score.saturating_add(reward);
        let username = session.username.clone();
        let score = session.score;

        if !self.scheduler.schedule(orb_id, delay) {
            error!(target: "runtime::world", orb_id, "Collected orb already had a respawn timer");
        }

        debug!(target: "runtime::world", %connection, %username, orb_id, score, "Orb collected");
        self.event_bus.publish(
            Topic::World,
            &ServerMessage::OrbCollected {
                orb_id,
                username: username.clone(),
                score,
            },
            None,
        );
        self.enqueue(PersistenceJob::FlushScore { username, score });
    }

    fn handle_portal(&mut self, connection: ConnectionId) {
        let Some(session) = self.registry.session(connection) else {
            return;
        };
        let Some(portal) = self.world.portal_near(session.position) else {
            debug!(
                target: "runtime::world",
                %connection,
                x = session.position.x,
                y = session.position.y,
                "No portal in reach"
            );
            return;
        };

        let job = PersistenceJob::SetRespawn {
            connection,
            username: session.username.clone(),
            portal: portal.clone(),
        };
        self.enqueue(job);
    }

    fn handle_chat(&mut self, connection: ConnectionId, message: &str) {
        let Some(session) = self.registry.session(connection) else {
            return;
        };
        let message: String = message.trim().chars().take(MAX_CHAT_CHARS).collect();
        if message.is_empty() {
            return;
        }

        let event = ServerMessage::Chat {
            username: session.username.clone(),
            message,
        };
        self.event_bus.publish(Topic::World, &event, None);
    }

    fn handle_disconnect(&mut self, connection: ConnectionId) {
        self.event_bus.unsubscribe(connection);
        let Some(session) = self.registry.leave(connection) else {
            trace!(target: "runtime::world", %connection, "Closed without a session");
            return;
        };

        info!(target: "runtime::world", %connection, username = %session.username, "Player left");
        self.event_bus.publish(
            Topic::World,
            &ServerMessage::PlayerLeft {
                username: session.username,
            },
            None,
        );
    }

    fn handle_expiry(&mut self, expiry: Expiry<OrbId>) {
        if !self.scheduler.complete(&expiry) {
            trace!(target: "runtime::world", orb_id = expiry.key, "Stale respawn timer");
            return;
        }
        let Some(orb) = self.world.respawn_orb(expiry.key, &mut self.rng) else {
            warn!(target: "runtime::world", orb_id = expiry.key, "Respawn fired for an orb that is not collected");
            return;
        };

        debug!(target: "runtime::world", orb_id = orb.id, x = orb.x, y = orb.y, "Orb respawned");
        self.event_bus
            .publish(Topic::World, &ServerMessage::OrbRespawn { orb }, None);
    }

    fn enqueue(&self, job: PersistenceJob) {
        if self.persistence_tx.send(job).is_err() {
            error!(target: "runtime::world", "Persistence worker is gone, dropping job");
        }
    }

    fn players(&self) -> Vec<PlayerView> {
        let mut sessions: Vec<_> = self.registry.sessions().collect();
        sessions.sort_by_key(|(id, _)| *id);
        sessions
            .into_iter()
            .map(|(_, session)| session.view())
            .collect()
    }

    fn game_state(&self) -> ServerMessage {
        let config = self.world.config();
        ServerMessage::GameState {
            players: self.players(),
            orbs: self.world.orbs().uncollected().cloned().collect(),
            world_width: config.width,
            world_height: config.height,
            zones: self.world.zones().as_slice().to_vec(),
            portals: self.world.portals().as_slice().to_vec(),
        }
    }

    fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            config: self.world.config().clone(),
            orbs: self.world.orbs().iter().cloned().collect(),
            players: self.players(),
            connections: self.registry.len(),
            pending_respawns: self.scheduler.pending(),
        }
    }
}
