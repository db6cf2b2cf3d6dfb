//! Repository layer for durable account data.
//!
//! Repositories handle data that must survive restarts: one account record
//! per username (score and respawn point). The world itself (orbs, portals,
//! zones) is rebuilt from content at startup and never stored here.
//!
//! [`AccountRepository`] is the raw whole-collection gateway;
//! [`AccountStore`] layers atomic per-key updates on top of it.

mod account;
mod error;
mod file;
mod memory;
mod store;
mod traits;

pub use account::Account;
pub use error::{RepositoryError, Result};
pub use file::FileAccountRepository;
pub use memory::InMemoryAccountRepository;
pub use store::{AccountStore, StoreError};
pub use traits::AccountRepository;
