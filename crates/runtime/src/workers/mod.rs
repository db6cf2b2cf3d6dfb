//! Worker tasks that back the runtime orchestration.
//!
//! The world worker executes client messages against the shared world,
//! while the persistence worker applies their account side effects off the
//! world's critical path.

mod persistence;
mod scheduler;
mod world;

pub use persistence::{PersistenceJob, PersistenceWorker};
pub use scheduler::{Expiry, Scheduler};
pub use world::{Command, MAX_CHAT_CHARS, WorldSnapshot, WorldWorker};
