//! Passive: offensive masteries scale with remaining health.

use tracing::trace;

use crate::config::StatBuffConfig;
use crate::engine::CombatEngine;
use crate::error::CombatError;
use crate::state::{Alterations, Effect, EffectHook, StatKind, Trigger, UnitId};

const BUFFED: [StatKind; 3] = [StatKind::Pierce, StatKind::Slash, StatKind::Crush];

/// `floor(health * multiplier / divisor)`.
pub(super) fn bonus(health: i32, config: &StatBuffConfig, upgraded: bool) -> i32 {
    health.max(0) * config.multiplier / config.divisor_for(upgraded)
}

/// Recomputes the bonus and replaces the permanent self-effect.
///
/// The battle log only hears about it when the bonus moved since the last
/// refresh; the effect itself is rewritten every time.
pub(super) fn refresh(
    engine: &mut CombatEngine<'_>,
    unit: UnitId,
    slot: usize,
    trigger: Trigger,
) -> Result<(), CombatError> {
    let owner = engine
        .state
        .unit(unit)
        .ok_or(CombatError::UnitNotFound(unit))?;
    if owner.dead {
        return Ok(());
    }
    let ability = owner
        .ability(slot)
        .ok_or(CombatError::AbilityNotFound { unit, slot })?;

    let bonus = bonus(
        owner.vitals.health,
        &engine.config.stat_buff,
        ability.upgraded,
    );
    let changed = bonus != ability.last_bonus;
    let title = ability.title.clone();
    let label = owner.label();

    if let Some(ability) = engine
        .state
        .unit_mut(unit)
        .and_then(|u| u.abilities.get_mut(slot))
    {
        ability.last_bonus = bonus;
    }

    let alterations: Alterations = BUFFED.iter().map(|&kind| (kind, bonus)).collect();
    let effect = Effect::new(title, unit)
        .with_alterations(alterations)
        .on_apply(EffectHook::Trace);
    engine.replace_effect(unit, effect)?;
    trace!(unit = %unit, %trigger, bonus, changed, "stat buff refreshed");

    if changed {
        engine
            .sink
            .log(format!("{label} receives {bonus} pierce, slash and crush"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_uses_upgrade_divisor() {
        let config = StatBuffConfig::default();
        assert_eq!(bonus(70, &config, false), 30);
        assert_eq!(bonus(70, &config, true), 42);
        assert_eq!(bonus(10, &config, false), 4);
        assert_eq!(bonus(0, &config, false), 0);
    }
}
