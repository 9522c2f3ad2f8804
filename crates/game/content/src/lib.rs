//! Data-driven battle content and loaders.
//!
//! This crate turns data files into `hexcombat-core` values:
//! - Combat tuning (data-driven via TOML)
//! - Battle rosters: board layout, player seats and units (data-driven via RON)
//!
//! Content is consumed when a battle is set up and never appears in the
//! combat rules themselves.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilitySpec, ConfigLoader, ContentFactory, LoadResult, PlayerSpec, Roster, RosterLoader,
    UnitSpec,
};
