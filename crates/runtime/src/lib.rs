//! Runtime orchestration for the shared real-time world.
//!
//! This crate wires together the wire protocol, the connection registry,
//! the broadcast bus, the account store and the worker tasks into a
//! cohesive runtime API. Transports embed [`Runtime`], open a [`Connection`]
//! per client through [`RuntimeHandle`], and relay frames in both
//! directions.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream transports interact with
//! - [`protocol`] defines the JSON messages exchanged with clients
//! - [`events`] provides the topic-based broadcast bus
//! - [`registry`] tracks live connections and their sessions
//! - [`repository`] provides durable account storage
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod protocol;
pub mod registry;
pub mod repository;
pub mod runtime;
pub mod types;

mod workers;

pub use api::{Connection, Result, RuntimeError, RuntimeHandle};
pub use events::{EventBus, Frame, Topic};
pub use protocol::{ClientMessage, ExternalKind, PlayerView, ProtocolError, ServerMessage};
pub use registry::{ConnectionPhase, ConnectionRegistry, JoinRequest, Session};
pub use repository::{
    Account, AccountRepository, AccountStore, FileAccountRepository, InMemoryAccountRepository,
    RepositoryError, StoreError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use types::ConnectionId;
pub use workers::{MAX_CHAT_CHARS, WorldSnapshot};
