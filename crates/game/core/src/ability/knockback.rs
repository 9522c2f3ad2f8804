//! Lane strike that pushes its target one hex further along the lane.

use tracing::{debug, warn};

use crate::combat::{ActivationReport, Damage, DamageKey, Relation, TargetOutcome, TeamFilter};
use crate::engine::{CombatEngine, Lane, MoveOptions, TakeDamage, TargetQuery};
use crate::error::CombatError;
use crate::grid::{self, Direction, HexGrid};
use crate::state::{AbilityKind, AbilitySlot, BattleState, StatKind, Unit, UnitId};

const TEAM: TeamFilter = TeamFilter::Enemy;

/// Every non-empty lane around `caster`, cut after the first occupant.
///
/// Lanes start from whichever end of the caster faces their direction and
/// never include the caster's own hexes.
fn lanes(state: &BattleState, caster: &Unit) -> Vec<Lane> {
    let tail = caster
        .position
        .offset(-(i32::from(caster.size()) - 1), 0);

    Direction::ALL
        .into_iter()
        .filter_map(|direction| {
            let origin = if direction.is_rearward() != caster.flipped {
                tail
            } else {
                caster.position
            };
            let mut cells = Vec::new();
            for cell in grid::lane(state, origin, direction, caster.flipped) {
                match cell.occupant {
                    Some(id) if id == caster.id => continue,
                    Some(_) => {
                        cells.push(cell);
                        break;
                    }
                    None => cells.push(cell),
                }
            }
            (!cells.is_empty()).then_some(Lane { direction, cells })
        })
        .collect()
}

/// Lanes that run into a unit the strike may target.
fn targeted_lanes(state: &BattleState, caster: &Unit) -> Vec<Lane> {
    lanes(state, caster)
        .into_iter()
        .filter(|lane| {
            lane.target()
                .and_then(|target| super::relation(state, caster.id, target))
                .is_some_and(|relation| TEAM.admits(relation))
        })
        .collect()
}

pub(super) fn require(state: &BattleState, caster: &Unit) -> bool {
    !targeted_lanes(state, caster).is_empty()
}

pub(super) fn query(state: &BattleState, caster: &Unit) -> TargetQuery {
    TargetQuery::Direction {
        lanes: targeted_lanes(state, caster),
        team: TEAM,
        require_occupant: true,
    }
}

/// Unit the strike lands on.
///
/// Normally the occupant of the last lane hex; otherwise the first unit on
/// the lane that is not the caster.
fn resolve_target(state: &BattleState, caster: UnitId, lane: &Lane) -> Option<UnitId> {
    let last = lane
        .cells
        .last()
        .and_then(|cell| state.unit_at(cell.hex))
        .map(|u| u.id);
    if last.is_some() {
        return last;
    }
    let fallback = lane
        .cells
        .iter()
        .filter_map(|cell| state.unit_at(cell.hex))
        .map(|u| u.id)
        .find(|&id| id != caster);
    if let Some(target) = fallback {
        warn!(caster = %caster, target = %target, direction = %lane.direction, "lane end empty, using first occupant");
    }
    fallback
}

pub(super) fn activate(
    engine: &mut CombatEngine<'_>,
    caster: UnitId,
    ability: &AbilitySlot,
    lane: Lane,
) -> Result<ActivationReport, CombatError> {
    let mut report = ActivationReport::new(AbilityKind::KnockbackStrike);
    let Some(target) = resolve_target(engine.state, caster, &lane) else {
        debug!(caster = %caster, direction = %lane.direction, "no target on lane");
        return Ok(report);
    };

    let state: &BattleState = engine.state;
    let melee = lane
        .cells
        .first()
        .and_then(|cell| state.unit_at(cell.hex))
        .is_some_and(|u| u.id == target);
    let flipped = state
        .unit(caster)
        .map(|u| u.flipped)
        .ok_or(CombatError::UnitNotFound(caster))?;
    let victim = state.unit(target).ok_or(CombatError::UnitNotFound(target))?;

    // The push continues the chosen lane from the target's head.
    let push_lane = grid::lane(state, victim.position, lane.direction, flipped);
    let destination = push_lane
        .get(1)
        .map(|cell| cell.hex)
        .filter(|&hex| state.is_walkable(hex, victim.size(), target))
        .filter(|_| victim.stats().is_moveable());
    let relation = super::relation(state, caster, target).unwrap_or(Relation::Enemy);

    let config = &engine.config.knockback;
    let mut damages = if melee {
        config.melee.clone()
    } else {
        config.ranged.clone()
    };
    if ability.upgraded && destination.is_none() {
        *damages.entry(DamageKey::Stat(StatKind::Sonic)).or_insert(0) += config.blocked_bonus;
    }

    let outcome = engine.take_damage(
        target,
        Damage::new(caster, damages, 1),
        TakeDamage {
            ignore_retaliation: true,
        },
    )?;
    let kill = outcome.kill;
    if let Some(result) = outcome.result {
        report.outcome.record(TargetOutcome {
            target,
            relation,
            result,
            kill,
        });
    }

    if let (false, Some(hex)) = (kill, destination) {
        engine.move_to(target, hex, MoveOptions { pushed: true })?;
        report.moved = Some((target, hex));
    }
    Ok(report)
}
