//! In-memory AccountRepository implementation for tests and local runs.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::repository::{Account, AccountRepository, RepositoryError, Result};

/// In-memory implementation of AccountRepository.
///
/// Can simulate slow storage (to widen interleaving windows in tests) and
/// outright failure (to exercise error paths).
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
    latency: Option<Duration>,
    failing: AtomicBool,
    writes: AtomicU64,
}

impl InMemoryAccountRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::with_accounts(Vec::new())
    }

    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: RwLock::new(accounts),
            latency: None,
            failing: AtomicBool::new(false),
            writes: AtomicU64::new(0),
        }
    }

    /// Delay every read and write by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent operation fail with [`RepositoryError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `write_all` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current contents, bypassing latency and failure injection.
    pub fn snapshot(&self) -> Vec<Account> {
        self.accounts
            .read()
            .map(|accounts| accounts.clone())
            .unwrap_or_default()
    }

    async fn simulate_io(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn read_all(&self) -> Result<Vec<Account>> {
        self.simulate_io().await?;
        let accounts = self
            .accounts
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(accounts.clone())
    }

    async fn write_all(&self, accounts: &[Account]) -> Result<()> {
        self.simulate_io().await?;
        let mut stored = self
            .accounts
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = accounts.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
