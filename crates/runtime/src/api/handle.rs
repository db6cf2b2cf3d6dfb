//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing: transports open a
//! [`Connection`], forward raw inbound text, and drain the connection's
//! outbound frames.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, Frame, Topic};
use crate::repository::AccountStore;
use crate::types::ConnectionId;
use crate::workers::{Command, WorldSnapshot};

/// One registered client connection.
///
/// `frames` yields every event addressed to this connection in publish
/// order. It ends once the connection is disconnected or the runtime stops.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub frames: mpsc::UnboundedReceiver<Frame>,
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    accounts: Arc<AccountStore>,
    next_connection: Arc<AtomicU64>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        accounts: Arc<AccountStore>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            accounts,
            next_connection: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a new connection and subscribe it to world broadcasts.
    pub async fn connect(&self) -> Result<Connection> {
        let id = ConnectionId(self.next_connection.fetch_add(1, Ordering::Relaxed));
        let frames = self.event_bus.subscribe(id, &[Topic::World]);

        if let Err(error) = self.send_command(Command::Connect { connection: id }).await {
            self.event_bus.unsubscribe(id);
            return Err(error);
        }

        Ok(Connection { id, frames })
    }

    /// Forward one inbound text frame. Frames from a connection are handled
    /// in the order they are sent here.
    pub async fn send(&self, connection: ConnectionId, text: impl Into<String>) -> Result<()> {
        self.send_command(Command::Inbound {
            connection,
            text: text.into(),
        })
        .await
    }

    /// Close a connection. Idempotent.
    pub async fn disconnect(&self, connection: ConnectionId) -> Result<()> {
        self.send_command(Command::Disconnect { connection }).await
    }

    /// Query a snapshot of the world after every command sent before it.
    pub async fn query_world(&self) -> Result<WorldSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(Command::QueryWorld { reply: reply_tx })
            .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Wait until every account update issued so far has been applied.
    pub async fn flush_persistence(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(Command::FlushPersistence { reply: reply_tx })
            .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Account store shared with the persistence worker.
    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) fn command_sender(&self) -> &mpsc::Sender<Command> {
        &self.command_tx
    }

    async fn send_command(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
