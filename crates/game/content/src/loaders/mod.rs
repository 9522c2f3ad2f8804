//! Content loaders for reading battle data from files.
//!
//! TOML carries combat tuning, RON carries rosters. Every loader returns an
//! [`anyhow::Result`] whose context names the offending file.

pub mod config;
pub mod factory;
pub mod roster;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use roster::{AbilitySpec, PlayerSpec, Roster, RosterLoader, UnitSpec};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))
}
