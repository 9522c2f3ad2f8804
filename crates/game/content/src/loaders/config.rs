//! Combat configuration loader.

use std::path::Path;

use anyhow::Context;
use hexcombat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
///
/// Every table and key is optional; anything left out keeps its default.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        if config.combo_threshold == 0 {
            tracing::warn!("combo_threshold 0 behaves like 1");
        }
        Ok(config)
    }
}
