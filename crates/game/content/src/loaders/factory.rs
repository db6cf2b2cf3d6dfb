//! Content factory for building world inputs from data files.

use std::path::{Path, PathBuf};

use game_core::{WorldConfig, WorldLayout};

use crate::loaders::{ConfigLoader, LayoutLoader, LoadResult};
use crate::presets::builtin_layout;

/// Content factory that loads all world content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── world.toml
/// └── layout.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "world.toml";
    pub const LAYOUT_FILE: &'static str = "layout.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load world configuration from `world.toml`.
    pub fn load_config(&self) -> LoadResult<WorldConfig> {
        ConfigLoader::load(&self.data_dir.join(Self::CONFIG_FILE))
    }

    /// Load the zone and portal layout from `layout.ron`.
    pub fn load_layout(&self) -> LoadResult<WorldLayout> {
        LayoutLoader::load(&self.data_dir.join(Self::LAYOUT_FILE))
    }

    /// Like [`load_config`](Self::load_config) but falls back to defaults when
    /// the file does not exist. A file that exists and fails to parse is an error.
    pub fn load_config_or_default(&self) -> LoadResult<WorldConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(WorldConfig::default())
        }
    }

    /// Like [`load_layout`](Self::load_layout) but falls back to the built-in
    /// layout when the file does not exist.
    pub fn load_layout_or_default(&self, config: &WorldConfig) -> LoadResult<WorldLayout> {
        let path = self.data_dir.join(Self::LAYOUT_FILE);
        if path.exists() {
            LayoutLoader::load(&path)
        } else {
            Ok(builtin_layout(config))
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
