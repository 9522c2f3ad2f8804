//! Aggregated results of one ability activation.

use crate::state::{AbilityKind, Hex, UnitId};

use super::damage::DamageResult;
use super::relation::Relation;

/// Scoring event recorded against a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreEvent {
    /// An enemy unit was killed.
    Kill { victim: UnitId },
    /// An allied unit was finished off by its own side.
    Deny { victim: UnitId },
    /// One activation killed several units.
    Combo { kills: u32 },
}

/// Result of one hit on one target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: UnitId,
    pub relation: Relation,
    pub result: DamageResult,
    pub kill: bool,
}

/// Hits collected while an activation resolves, in resolution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    hits: Vec<TargetOutcome>,
}

impl CombatOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, hit: TargetOutcome) {
        self.hits.push(hit);
    }

    pub fn hits(&self) -> &[TargetOutcome] {
        &self.hits
    }

    pub fn kills(&self) -> u32 {
        self.hits.iter().filter(|hit| hit.kill).count() as u32
    }

    pub fn total_damage(&self) -> i32 {
        self.hits.iter().map(|hit| hit.result.total).sum()
    }

    /// Targets that were hit and are still standing.
    pub fn survivors(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.hits.iter().filter(|hit| !hit.kill).map(|hit| hit.target)
    }

    /// Combo event when at least `threshold` kills were scored.
    pub fn combo(&self, threshold: u32) -> Option<ScoreEvent> {
        let kills = self.kills();
        (kills >= threshold.max(1)).then_some(ScoreEvent::Combo { kills })
    }
}

/// What an activation did, returned to the caller of `confirm`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationReport {
    pub ability: AbilityKind,
    pub outcome: CombatOutcome,
    /// Unit displaced by the activation and its new head hex.
    pub moved: Option<(UnitId, Hex)>,
}

impl ActivationReport {
    pub fn new(ability: AbilityKind) -> Self {
        Self {
            ability,
            outcome: CombatOutcome::new(),
            moved: None,
        }
    }
}
