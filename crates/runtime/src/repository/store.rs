//! Atomic per-key account operations over a whole-collection repository.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use game_core::Position;

use super::{Account, AccountRepository, RepositoryError};

/// Longest username accepted at signup, in characters.
pub const MAX_USERNAME_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid username: {0}")]
    Validation(String),

    #[error("account {0} not found")]
    NotFound(String),

    #[error("username {0} is already taken")]
    Conflict(String),

    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Account store with serialized read-modify-write.
///
/// The underlying [`AccountRepository`] only exposes whole-collection reads
/// and writes. Every mutation here holds the commit lock from `read_all`
/// through `write_all`, so two concurrent updates can never both start from
/// the same snapshot and overwrite each other.
pub struct AccountStore {
    repo: Arc<dyn AccountRepository>,
    commit: Mutex<()>,
    default_respawn: Position,
}

impl AccountStore {
    pub fn new(repo: Arc<dyn AccountRepository>, default_respawn: Position) -> Self {
        Self {
            repo,
            commit: Mutex::new(()),
            default_respawn,
        }
    }

    /// Looks up an account. Missing respawn coordinates are filled with the default.
    pub async fn find(&self, username: &str) -> StoreResult<Option<Account>> {
        let accounts = self.repo.read_all().await?;
        Ok(accounts
            .into_iter()
            .find(|account| account.username == username)
            .map(|account| self.normalize(account)))
    }

    /// Registers a new account with zero score at the default respawn point.
    pub async fn create(&self, username: &str) -> StoreResult<Account> {
        validate_username(username)?;

        let _guard = self.commit.lock().await;
        let mut accounts = self.repo.read_all().await?;
        if accounts.iter().any(|account| account.username == username) {
            return Err(StoreError::Conflict(username.to_string()));
        }

        let account = Account::new(username, self.default_respawn);
        accounts.push(account.clone());
        self.repo.write_all(&accounts).await?;

        info!(target: "runtime::repository", username, "Account created");
        Ok(account)
    }

    /// Applies `mutate` to one account and writes the collection back.
    ///
    /// Returns `Ok(None)` without writing if no account matches.
    pub async fn update<F>(&self, username: &str, mutate: F) -> StoreResult<Option<Account>>
    where
        F: FnOnce(&mut Account) + Send,
    {
        let _guard = self.commit.lock().await;
        let mut accounts = self.repo.read_all().await?;
        let Some(account) = accounts
            .iter_mut()
            .find(|account| account.username == username)
        else {
            return Ok(None);
        };

        mutate(account);
        let updated = account.clone();
        self.repo.write_all(&accounts).await?;
        Ok(Some(self.normalize(updated)))
    }

    pub async fn update_score(&self, username: &str, score: u64) -> StoreResult<Option<Account>> {
        self.update(username, |account| account.score = score).await
    }

    pub async fn update_respawn(
        &self,
        username: &str,
        respawn: Position,
    ) -> StoreResult<Option<Account>> {
        self.update(username, |account| account.set_respawn(respawn))
            .await
    }

    fn normalize(&self, mut account: Account) -> Account {
        let respawn = account.respawn_point(self.default_respawn);
        account.set_respawn(respawn);
        account
    }
}

fn validate_username(username: &str) -> StoreResult<()> {
    if username.trim().is_empty() {
        return Err(StoreError::Validation("username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(StoreError::Validation(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}
