//! Zone and portal layout loader.

use std::collections::HashSet;
use std::path::Path;

use game_core::WorldLayout;

use crate::loaders::{LoadResult, read_file};

/// Loader for world layouts from RON files.
///
/// Example:
/// ```ron
/// (
///     zones: [
///         (x: 0.0, y: 0.0, width: 300.0, height: 300.0, type: town, theme: "harbor"),
///     ],
///     portals: [
///         (id: 1, name: "Harbor Portal", town: "Harbor", x: 150.0, y: 150.0),
///     ],
/// )
/// ```
pub struct LayoutLoader;

impl LayoutLoader {
    pub fn load(path: &Path) -> LoadResult<WorldLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid layout {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<WorldLayout> {
        let layout: WorldLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse layout RON: {}", e))?;

        let mut seen = HashSet::new();
        for portal in &layout.portals {
            if !seen.insert(portal.id) {
                anyhow::bail!("duplicate portal id {}", portal.id);
            }
        }

        Ok(layout)
    }
}
