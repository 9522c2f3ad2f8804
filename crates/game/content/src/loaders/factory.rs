//! Content factory for loading battle content from a data directory.

use std::path::{Path, PathBuf};

use hexcombat_core::CombatConfig;

use crate::loaders::{ConfigLoader, LoadResult, Roster, RosterLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── battles/
///     ├── skirmish.ron
///     └── siege.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `config.toml`, or the defaults when the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load a roster from `battles/{name}.ron`.
    pub fn load_roster(&self, name: &str) -> LoadResult<Roster> {
        let path = self.data_dir.join("battles").join(format!("{name}.ron"));
        RosterLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
