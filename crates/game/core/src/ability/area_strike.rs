//! Seven-hex blast at one of six fixed spots two hexes away.

use crate::combat::{ActivationReport, Damage, DamageMap, TargetOutcome, TeamFilter};
use crate::engine::{CombatEngine, TakeDamage, TargetQuery};
use crate::error::CombatError;
use crate::grid::{Cell, HexGrid, Pattern};
use crate::state::{AbilityKind, AbilitySlot, BattleState, Hex, Unit, UnitId};

const BLAST: Pattern = Pattern::new(&[&[1, 1], &[1, 1, 1], &[1, 1]]);

/// Top-left anchors of the six blasts, clockwise from up-right.
fn origins(position: Hex) -> [Hex; 6] {
    let dx = if position.is_odd_row() { -1 } else { 0 };
    let Hex { x, y } = position;
    [
        Hex::new(x + 1 + dx, y - 3),
        Hex::new(x + 2 + dx, y - 1),
        Hex::new(x + 1 + dx, y + 1),
        Hex::new(x - 1 + dx, y + 1),
        Hex::new(x - 2 + dx, y - 1),
        Hex::new(x - 1 + dx, y - 3),
    ]
}

pub(super) fn query(state: &BattleState, caster: &Unit) -> TargetQuery {
    let choices = origins(caster.position)
        .into_iter()
        .map(|origin| state.hex_map(origin, 0, false, &BLAST))
        .collect();
    super::choice_query(state, caster, choices, TeamFilter::Both, false)
}

pub(super) fn activate(
    engine: &mut CombatEngine<'_>,
    caster: UnitId,
    ability: &AbilitySlot,
    cells: &[Cell],
) -> Result<ActivationReport, CombatError> {
    let player = engine
        .state
        .unit(caster)
        .map(|u| u.player)
        .ok_or(CombatError::UnitNotFound(caster))?;

    let enemy_damages: DamageMap = if ability.upgraded {
        let multiplier = engine.config.area_strike.upgraded_enemy_multiplier;
        ability
            .damages
            .iter()
            .map(|(&key, &value)| (key, value * multiplier))
            .collect()
    } else {
        ability.damages.clone()
    };

    let mut report = ActivationReport::new(AbilityKind::AreaStrike);
    for (target, area) in super::units_hit(engine.state, cells) {
        let Some(relation) = super::relation(engine.state, caster, target) else {
            continue;
        };
        let damages = if relation.is_hostile() {
            enemy_damages.clone()
        } else {
            ability.damages.clone()
        };
        let outcome = engine.take_damage(
            target,
            Damage::new(caster, damages, area),
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

    if let Some(combo) = report.outcome.combo(engine.config.combo_threshold) {
        engine.sink.score(player, combo);
    }
    Ok(report)
}
