//! World configuration loader.

use std::path::Path;

use game_core::WorldConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for world tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load world config from a TOML file.
    ///
    /// Keys missing from the file keep their [`WorldConfig::default`] values.
    /// The result is validated before it is returned.
    pub fn load(path: &Path) -> LoadResult<WorldConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid world config {}: {}", path.display(), e))
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> LoadResult<WorldConfig> {
        let config: WorldConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}
