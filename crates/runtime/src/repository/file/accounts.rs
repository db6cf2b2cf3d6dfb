//! File-based AccountRepository implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::repository::{Account, AccountRepository, RepositoryError, Result};

/// Stores the whole account collection as one JSON array.
///
/// # File Format
///
/// ```json
/// [
///   { "username": "alice", "score": 30, "respawnX": 300.0, "respawnY": 375.0 }
/// ]
/// ```
///
/// A missing file reads as an empty collection. Writes go to a temp file
/// first and are renamed into place, so readers never observe a torn file.
pub struct FileAccountRepository {
    path: PathBuf,
}

impl FileAccountRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AccountRepository for FileAccountRepository {
    async fn read_all(&self) -> Result<Vec<Account>> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::Io(e)),
        };

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        let accounts: Vec<Account> =
            serde_json::from_str(&json).map_err(|e| RepositoryError::Json(e.to_string()))?;

        tracing::trace!(
            "Loaded {} accounts from {}",
            accounts.len(),
            self.path.display()
        );

        Ok(accounts)
    }

    async fn write_all(&self, accounts: &[Account]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(accounts)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).await?;

        // Atomic rename
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(
            "Saved {} accounts to {}",
            accounts.len(),
            self.path.display()
        );

        Ok(())
    }
}
