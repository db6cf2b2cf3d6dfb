//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command and job channels,
//! and exposes a builder-based API for transports to drive the world.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use game_content::builtin_layout;
use game_core::{WorldConfig, WorldLayout, WorldState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::{AccountRepository, AccountStore, InMemoryAccountRepository};
use crate::workers::{Command, PersistenceWorker, WorldWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub world: WorldConfig,
    /// Capacity of the world worker's command queue.
    pub command_buffer_size: usize,
    /// Fixed RNG seed for orb placement. Random when `None`.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            command_buffer_size: 256,
            seed: None,
        }
    }
}

/// Main runtime that hosts the shared world
///
/// Design: Runtime owns workers and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for transports.
pub struct Runtime {
    handle: RuntimeHandle,
    world_worker_handle: JoinHandle<()>,
    persistence_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across connections and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Cancels pending orb respawns, stops the world worker, then waits for
    /// the persistence queue to drain.
    pub async fn shutdown(self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        // A closed channel means the world worker already stopped.
        if self
            .handle
            .command_sender()
            .send(Command::Shutdown { reply: reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
        drop(self.handle);

        self.world_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.persistence_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        tracing::info!("Runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    layout: Option<WorldLayout>,
    world: Option<WorldState>,
    accounts: Option<Arc<dyn AccountRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            layout: None,
            world: None,
            accounts: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override world tuning only
    pub fn world_config(mut self, world: WorldConfig) -> Self {
        self.config.world = world;
        self
    }

    /// Zones and portals. Defaults to the built-in layout.
    pub fn layout(mut self, layout: WorldLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Use a fully built world instead of generating one.
    ///
    /// Its config replaces the configured world tuning, and any layout set
    /// on the builder is ignored.
    pub fn world(mut self, world: WorldState) -> Self {
        self.world = Some(world);
        self
    }

    /// Durable account storage. Defaults to an in-memory repository.
    pub fn accounts(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.accounts = Some(repo);
        self
    }

    /// Fix the RNG seed for reproducible orb placement.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build and spawn the runtime. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let world = match self.world {
            Some(world) => {
                world.config().validate()?;
                world
            }
            None => {
                let layout = self
                    .layout
                    .unwrap_or_else(|| builtin_layout(&self.config.world));
                WorldState::new(self.config.world.clone(), layout, &mut rng)?
            }
        };

        let repo = self
            .accounts
            .unwrap_or_else(|| Arc::new(InMemoryAccountRepository::new()));
        let accounts = Arc::new(AccountStore::new(repo, world.config().center()));

        let event_bus = EventBus::new();
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (job_tx, job_rx) = mpsc::unbounded_channel();

        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), Arc::clone(&accounts));

        let persistence_worker = PersistenceWorker::new(accounts, event_bus.clone(), job_rx);
        let persistence_worker_handle = tokio::spawn(async move {
            persistence_worker.run().await;
        });

        let world_worker = WorldWorker::new(world, command_rx, event_bus, job_tx, rng);
        let world_worker_handle = tokio::spawn(async move {
            world_worker.run().await;
        });

        Ok(Runtime {
            handle,
            world_worker_handle,
            persistence_worker_handle,
        })
    }
}
