//! Combat resolution primitives.
//!
//! Everything here is pure: the damage calculator, target classification and
//! the outcome aggregator never touch battle state. The engine feeds them and
//! applies what they return.
//!
//! # Core Functions
//!
//! - `calculate`: per-type and total damage of one hit
//! - `relation_of`: myself / ally / enemy classification
//! - `CombatOutcome`: kill counting and combo detection per activation

pub mod damage;
pub mod outcome;
pub mod relation;

pub use damage::{Damage, DamageKey, DamageMap, DamageResult, calculate, damage_map};
pub use outcome::{ActivationReport, CombatOutcome, ScoreEvent, TargetOutcome};
pub use relation::{Relation, TeamFilter, relation_of};
