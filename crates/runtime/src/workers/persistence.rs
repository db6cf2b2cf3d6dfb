//! Persistence worker for account side effects of gameplay.
//!
//! The world worker never awaits storage. It enqueues [`PersistenceJob`]s
//! here instead, and this task applies them one at a time in arrival order
//! through [`AccountStore`], whose commit lock makes each read-modify-write
//! atomic.
//!
//! Failures are logged and abandoned: a failed score flush is superseded by
//! the next one, and a failed respawn update simply produces no reply.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use game_core::Portal;

use crate::events::EventBus;
use crate::protocol::ServerMessage;
use crate::repository::AccountStore;
use crate::types::ConnectionId;

/// Work items accepted by the persistence worker.
#[derive(Debug)]
pub enum PersistenceJob {
    /// Overwrite the stored score with the session's current score.
    FlushScore { username: String, score: u64 },

    /// Move the account's respawn point to `portal` and confirm to `connection`.
    SetRespawn {
        connection: ConnectionId,
        username: String,
        portal: Portal,
    },

    /// Resolves once every job queued before it has been applied.
    Barrier { reply: oneshot::Sender<()> },
}

pub struct PersistenceWorker {
    store: Arc<AccountStore>,
    event_bus: EventBus,
    job_rx: mpsc::UnboundedReceiver<PersistenceJob>,
}

impl PersistenceWorker {
    pub fn new(
        store: Arc<AccountStore>,
        event_bus: EventBus,
        job_rx: mpsc::UnboundedReceiver<PersistenceJob>,
    ) -> Self {
        Self {
            store,
            event_bus,
            job_rx,
        }
    }

    /// Runs until every sender is dropped and the queue is drained.
    pub async fn run(mut self) {
        while let Some(job) = self.job_rx.recv().await {
            self.handle_job(job).await;
        }
        info!(target: "runtime::persistence", "Persistence queue drained, worker stopping");
    }

    async fn handle_job(&self, job: PersistenceJob) {
        match job {
            PersistenceJob::FlushScore { username, score } => {
                self.flush_score(&username, score).await;
            }
            PersistenceJob::SetRespawn {
                connection,
                username,
                portal,
            } => {
                self.set_respawn(connection, &username, &portal).await;
            }
            PersistenceJob::Barrier { reply } => {
                if reply.send(()).is_err() {
                    debug!(target: "runtime::persistence", "Barrier reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn flush_score(&self, username: &str, score: u64) {
        match self.store.update_score(username, score).await {
            Ok(Some(_)) => {
                debug!(target: "runtime::persistence", username, score, "Score flushed");
            }
            Ok(None) => {
                debug!(
                    target: "runtime::persistence",
                    username,
                    "No account for session, score kept in memory only"
                );
            }
            Err(error) => {
                warn!(target: "runtime::persistence", username, %error, "Score flush failed");
            }
        }
    }

    async fn set_respawn(&self, connection: ConnectionId, username: &str, portal: &Portal) {
        match self
            .store
            .update_respawn(username, portal.position())
            .await
        {
            Ok(Some(_)) => {
                info!(
                    target: "runtime::persistence",
                    username,
                    portal = %portal.name,
                    "Respawn point set"
                );
                let reply = ServerMessage::RespawnSet {
                    portal: portal.name.clone(),
                    town: portal.town.clone(),
                    x: portal.x,
                    y: portal.y,
                };
                if !self.event_bus.send_to(connection, &reply) {
                    debug!(
                        target: "runtime::persistence",
                        %connection,
                        "Connection gone before respawn confirmation"
                    );
                }
            }
            Ok(None) => {
                warn!(
                    target: "runtime::persistence",
                    username,
                    "No account matches session, respawn update abandoned"
                );
            }
            Err(error) => {
                warn!(target: "runtime::persistence", username, %error, "Respawn update failed");
            }
        }
    }
}
