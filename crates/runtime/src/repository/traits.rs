//! Repository contract for the durable account collection.

use async_trait::async_trait;

use super::{Account, Result};

/// Whole-collection access to the account store.
///
/// There is deliberately no per-record API: callers read everything, change
/// what they need in memory, and write everything back. Implementations do
/// not lock across a read and the following write; use
/// [`AccountStore`](super::AccountStore) for read-modify-write sequences.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Load every account record.
    async fn read_all(&self) -> Result<Vec<Account>>;

    /// Replace the stored collection with `accounts`.
    async fn write_all(&self, accounts: &[Account]) -> Result<()>;
}
