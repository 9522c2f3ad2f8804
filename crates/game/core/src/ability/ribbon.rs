//! Heals allies or the caster itself; hinders enemies once upgraded.

use crate::combat::{ActivationReport, Damage, DamageMap, Relation, TargetOutcome, TeamFilter};
use crate::engine::{AddEffect, CombatEngine, TakeDamage, TargetQuery};
use crate::error::CombatError;
use crate::grid::{Cell, HexGrid, Pattern};
use crate::state::{
    AbilityKind, AbilitySlot, Alterations, BattleState, Effect, Hex, StatKind, Trigger, Unit,
    UnitId,
};

const SINGLE: Pattern = Pattern::new(&[&[1]]);
const PAIR: Pattern = Pattern::new(&[&[1, 1]]);
const SQUARE: Pattern = Pattern::new(&[&[1, 1], &[1, 1]]);
const STEP: Pattern = Pattern::new(&[&[1], &[1, 1]]);
const HOOK: Pattern = Pattern::new(&[&[1, 1], &[0, 1]]);

/// The six surrounding shapes plus the caster's own hex, last.
///
/// On odd rows the front pair is anchored on the caster itself, so picking
/// it heals the caster as a self-cast and the hex beside it as an ally.
fn shapes(position: Hex) -> [(Hex, Pattern); 7] {
    let dx = if position.is_odd_row() { -1 } else { 0 };
    let dy = -1;
    let Hex { x, y } = position;
    [
        (Hex::new(x + 1 + dx, y - 1 + dy), STEP),
        (Hex::new(x + 1 + dx, y + 1 + dy), PAIR),
        (Hex::new(x + 1 + dx, y + 2 + dy), SQUARE),
        (Hex::new(x - 1 + dx, y + 2 + dy), HOOK),
        (Hex::new(x - 2 + dx, y + 1 + dy), PAIR),
        (Hex::new(x - 1 + dx, y - 1 + dy), SQUARE),
        (position, SINGLE),
    ]
}

pub(super) fn query(state: &BattleState, caster: &Unit) -> TargetQuery {
    let choices = shapes(caster.position)
        .into_iter()
        .map(|(origin, pattern)| state.hex_map(origin, 0, false, &pattern))
        .collect();
    super::choice_query(state, caster, choices, TeamFilter::Both, false)
}

pub(super) fn activate(
    engine: &mut CombatEngine<'_>,
    caster: UnitId,
    ability: &AbilitySlot,
    cells: &[Cell],
) -> Result<ActivationReport, CombatError> {
    let position = engine
        .state
        .unit(caster)
        .map(|u| u.position)
        .ok_or(CombatError::UnitNotFound(caster))?;
    let config = engine.config.ribbon.clone();
    let mut report = ActivationReport::new(AbilityKind::Ribbon);

    if cells.first().is_some_and(|cell| cell.hex == position) {
        engine.heal(caster, config.heal, true, false)?;
        engine.restore_endurance(caster, config.endurance, false)?;
        engine.restore_regrowth(caster, config.regrowth, false)?;
    }

    for (target, _) in super::units_hit(engine.state, cells) {
        let Some(relation) = super::relation(engine.state, caster, target) else {
            continue;
        };
        match relation {
            // Self-healing is handled above, never twice.
            Relation::Myself => {}
            Relation::Ally => {
                engine.heal(target, config.heal, true, true)?;
                engine.restore_endurance(target, config.endurance, true)?;
                engine.restore_regrowth(target, config.regrowth, true)?;
            }
            Relation::Enemy if !ability.upgraded => {}
            Relation::Enemy if is_fuelled_core(engine.state, target) => {
                // Core units holding plasma shrug the debuff off and take a
                // token hit instead; an empty map floors to one point.
                let outcome = engine.take_damage(
                    target,
                    Damage::new(caster, DamageMap::new(), 1),
                    TakeDamage::default(),
                )?;
                if let Some(result) = outcome.result {
                    report.outcome.record(TargetOutcome {
                        target,
                        relation,
                        result,
                        kill: outcome.kill,
                    });
                }
            }
            Relation::Enemy => {
                let label = engine
                    .state
                    .unit(target)
                    .map(|u| u.label())
                    .ok_or(CombatError::UnitNotFound(target))?;
                let debuff = Effect::new(format!("{} Debuff", ability.title), caster)
                    .with_alterations(
                        Alterations::new().with(StatKind::Movement, config.movement_penalty),
                    )
                    .lasting(config.debuff_rounds)
                    .deleted_on(Trigger::OnStartOfRound);
                engine.add_effect(
                    target,
                    debuff,
                    AddEffect {
                        apply_message: Some(format!("{label} is weakened by {}", ability.title)),
                        resist_message: Some(format!("{label} resists {}", ability.title)),
                        quiet: false,
                        debuff: true,
                    },
                )?;
            }
        }
    }
    Ok(report)
}

fn is_fuelled_core(state: &BattleState, unit: UnitId) -> bool {
    state
        .unit(unit)
        .and_then(|u| state.core_unit_of(u.player))
        .filter(|core| core.id == unit)
        .and_then(|core| state.player(core.player))
        .is_some_and(|player| player.has_plasma())
}
