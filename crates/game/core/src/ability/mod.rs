//! Concrete ability behaviours.
//!
//! Each [`AbilityKind`] maps to one module here. The functions in this file
//! are the dispatch table the engine calls into; the per-ability modules hold
//! the targeting geometry and the activation rules.

mod area_strike;
mod knockback;
mod ribbon;
mod stat_buff;

use std::collections::BTreeMap;

use crate::combat::{ActivationReport, Relation, TeamFilter, relation_of};
use crate::engine::{CombatEngine, Selection, TargetQuery};
use crate::error::CombatError;
use crate::grid::Cell;
use crate::state::{AbilityKind, AbilitySlot, BattleState, Trigger, Unit, UnitId};

/// Ability-specific part of the requirement check.
pub(crate) fn require(state: &BattleState, caster: &Unit, ability: &AbilitySlot) -> bool {
    match ability.kind {
        AbilityKind::KnockbackStrike => knockback::require(state, caster),
        AbilityKind::StatBuff | AbilityKind::AreaStrike | AbilityKind::Ribbon => true,
    }
}

/// Candidate set of a queried ability. `None` for passives.
pub(crate) fn query(
    state: &BattleState,
    caster: &Unit,
    ability: &AbilitySlot,
) -> Option<TargetQuery> {
    match ability.kind {
        AbilityKind::StatBuff => None,
        AbilityKind::AreaStrike => Some(area_strike::query(state, caster)),
        AbilityKind::Ribbon => Some(ribbon::query(state, caster)),
        AbilityKind::KnockbackStrike => Some(knockback::query(state, caster)),
    }
}

/// Resolves a committed selection. The slot has already been spent.
pub(crate) fn activate(
    engine: &mut CombatEngine<'_>,
    caster: UnitId,
    slot: usize,
    selection: Selection,
) -> Result<ActivationReport, CombatError> {
    let ability = engine
        .state
        .unit(caster)
        .and_then(|u| u.ability(slot))
        .cloned()
        .ok_or(CombatError::AbilityNotFound { unit: caster, slot })?;

    match (ability.kind, selection) {
        (AbilityKind::AreaStrike, Selection::Hexes(cells)) => {
            area_strike::activate(engine, caster, &ability, &cells)
        }
        (AbilityKind::Ribbon, Selection::Hexes(cells)) => {
            ribbon::activate(engine, caster, &ability, &cells)
        }
        (AbilityKind::KnockbackStrike, Selection::Lane(lane)) => {
            knockback::activate(engine, caster, &ability, lane)
        }
        _ => Err(CombatError::InvalidSelection {
            index: 0,
            available: 0,
        }),
    }
}

/// Runs a passive slot for a lifecycle trigger.
pub(crate) fn on_trigger(
    engine: &mut CombatEngine<'_>,
    unit: UnitId,
    slot: usize,
    trigger: Trigger,
) -> Result<(), CombatError> {
    let kind = engine
        .state
        .unit(unit)
        .and_then(|u| u.ability(slot))
        .map(|a| a.kind)
        .ok_or(CombatError::AbilityNotFound { unit, slot })?;

    match kind {
        AbilityKind::StatBuff => stat_buff::refresh(engine, unit, slot, trigger),
        AbilityKind::AreaStrike | AbilityKind::Ribbon | AbilityKind::KnockbackStrike => Ok(()),
    }
}

/// Builds a choice query: empty candidates are dropped, the rest sorted
/// stably ascending by hex count.
fn choice_query(
    state: &BattleState,
    caster: &Unit,
    choices: Vec<Vec<Cell>>,
    team: TeamFilter,
    require_occupant: bool,
) -> TargetQuery {
    let mut choices: Vec<Vec<Cell>> = choices
        .into_iter()
        .filter(|choice| !choice.is_empty())
        .filter(|choice| {
            !require_occupant
                || choice
                    .iter()
                    .filter_map(|cell| cell.occupant)
                    .any(|id| relation(state, caster.id, id).is_some_and(|r| team.admits(r)))
        })
        .collect();
    choices.sort_by_key(Vec::len);

    TargetQuery::Choice {
        choices,
        team,
        require_occupant,
    }
}

/// Living units standing on `cells`, with how many of their hexes are
/// covered, ordered by unit id.
fn units_hit(state: &BattleState, cells: &[Cell]) -> Vec<(UnitId, u32)> {
    let mut hits: BTreeMap<UnitId, u32> = BTreeMap::new();
    for unit in cells.iter().filter_map(|cell| state.unit_at(cell.hex)) {
        *hits.entry(unit.id).or_insert(0) += 1;
    }
    hits.into_iter().collect()
}

fn relation(state: &BattleState, source: UnitId, target: UnitId) -> Option<Relation> {
    Some(relation_of(state.unit(source)?, state.unit(target)?))
}
