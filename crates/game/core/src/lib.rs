//! Deterministic hex-grid combat rules.
//!
//! `hexcombat-core` defines the canonical combat model (units, effects,
//! abilities, damage) and exposes pure APIs that can be reused by game
//! clients, replay tools and content pipelines alike. All state mutation
//! flows through [`engine::CombatEngine`]; supporting crates depend on the
//! types re-exported here.
mod ability;

pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod state;

pub use combat::{
    ActivationReport, CombatOutcome, Damage, DamageKey, DamageMap, DamageResult, Relation,
    ScoreEvent, TargetOutcome, TeamFilter, calculate, damage_map, relation_of,
};
pub use config::{AreaStrikeConfig, CombatConfig, KnockbackConfig, RibbonConfig, StatBuffConfig};
pub use engine::{
    AbilityPhase, AddEffect, BattleLog, Cancelled, CombatEngine, DamageOutcome, EventSink, Lane,
    MoveOptions, PendingQuery, ReturnTo, Selection, TakeDamage, TargetQuery,
};
pub use error::{CombatError, ErrorSeverity, GameError};
pub use grid::{Cell, Direction, GridDimensions, GridLayout, HexGrid, Pattern, hex_map, lane};
pub use state::{
    AbilityKind, AbilitySlot, AbilitySlots, Alterations, BattleState, Effect, EffectHook,
    EffectSet, Hex, Player, PlayerId, Round, StatKind, Stats, Trigger, Unit, UnitFlags, UnitId,
    Vitals,
};
