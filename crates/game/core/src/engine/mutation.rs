//! Unit mutation: damage, healing, resource restoration, movement, effects.

use tracing::{debug, trace};

use crate::combat::{Damage, DamageResult, ScoreEvent, calculate, relation_of};
use crate::error::CombatError;
use crate::grid::HexGrid;
use crate::state::{Effect, EffectHook, Hex, StatKind, Trigger, UnitFlags, UnitId};

use super::CombatEngine;

/// Options for [`CombatEngine::add_effect`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddEffect {
    /// Battle-log line written when the effect attaches.
    pub apply_message: Option<String>,
    /// Battle-log line written when a debuff is resisted.
    pub resist_message: Option<String>,
    /// Suppresses both messages.
    pub quiet: bool,
    pub debuff: bool,
}

/// Options for [`CombatEngine::take_damage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TakeDamage {
    /// The hit does not fire the target's `OnDamage` reactions.
    pub ignore_retaliation: bool,
}

/// Options for [`CombatEngine::move_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOptions {
    /// Forced movement; announced in the battle log.
    pub pushed: bool,
}

/// What a hit did to its target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// `None` when nothing happened (dead target or zero amount).
    pub result: Option<DamageResult>,
    pub kill: bool,
}

impl CombatEngine<'_> {
    /// Applies `damage` to `target`.
    ///
    /// Health drops by the total (floored at 0) and, unless the target is
    /// fatigue immune, so does endurance. A kill marks the target dead and
    /// scores for the attacker's player; survivors get the damage effects and
    /// fire `OnDamage` unless retaliation is ignored.
    pub fn take_damage(
        &mut self,
        target: UnitId,
        damage: Damage,
        options: TakeDamage,
    ) -> Result<DamageOutcome, CombatError> {
        let attacker = self
            .state
            .unit(damage.attacker)
            .ok_or(CombatError::UnitNotFound(damage.attacker))?;
        let victim = self
            .state
            .unit(target)
            .ok_or(CombatError::UnitNotFound(target))?;
        if victim.dead {
            return Ok(DamageOutcome::default());
        }

        let relation = relation_of(attacker, victim);
        let scorer = attacker.player;
        let Some(result) = calculate(
            &attacker.stats(),
            &victim.stats(),
            &damage.damages,
            damage.area,
            damage.amount,
        ) else {
            return Ok(DamageOutcome::default());
        };

        let victim = self
            .state
            .unit_mut(target)
            .ok_or(CombatError::UnitNotFound(target))?;
        victim.vitals.health = (victim.vitals.health - result.total).max(0);
        if !victim.base_stats.flags.contains(UnitFlags::FATIGUE_IMMUNE) {
            victim.vitals.endurance = (victim.vitals.endurance - result.total).max(0);
        }
        let kill = victim.vitals.health == 0;
        victim.dead = kill;
        let label = victim.label();

        debug!(
            attacker = %damage.attacker,
            target = %target,
            total = result.total,
            kill,
            "damage applied"
        );
        self.sink
            .log(format!("{label} is hit for {} damage", result.total));

        if kill {
            self.sink.log(format!("{label} is dead"));
            let event = if relation.is_hostile() {
                ScoreEvent::Kill { victim: target }
            } else {
                ScoreEvent::Deny { victim: target }
            };
            self.sink.score(scorer, event);
        } else {
            for effect in damage.effects {
                self.add_effect(target, effect, AddEffect::default())?;
            }
            if !options.ignore_retaliation {
                self.dispatch(Trigger::OnDamage, target)?;
            }
        }

        Ok(DamageOutcome {
            result: Some(result),
            kill,
        })
    }

    /// Restores up to `amount` health, capped at the effective maximum.
    ///
    /// Returns the health actually gained. `OnHeal` fires for any positive
    /// amount, even when the unit was already at full health.
    pub fn heal(
        &mut self,
        target: UnitId,
        amount: i32,
        from_ability: bool,
        silent: bool,
    ) -> Result<i32, CombatError> {
        if amount <= 0 {
            return Ok(0);
        }
        let Some(gained) = self.restore(target, StatKind::Health, amount)? else {
            return Ok(0);
        };
        if !silent {
            let label = self.label(target)?;
            let verb = if from_ability { "recovers" } else { "regrows" };
            self.sink.log(format!("{label} {verb} {gained} health"));
        }
        self.dispatch(Trigger::OnHeal, target)?;
        Ok(gained)
    }

    pub fn restore_endurance(
        &mut self,
        target: UnitId,
        amount: i32,
        silent: bool,
    ) -> Result<i32, CombatError> {
        self.restore_logged(target, StatKind::Endurance, amount, silent)
    }

    pub fn restore_regrowth(
        &mut self,
        target: UnitId,
        amount: i32,
        silent: bool,
    ) -> Result<i32, CombatError> {
        self.restore_logged(target, StatKind::Regrowth, amount, silent)
    }

    /// Spends the regrowth pool on missing health.
    ///
    /// The pool shrinks by exactly the health regrown, so a unit at full
    /// health keeps its reserve.
    pub fn regrow(&mut self, target: UnitId) -> Result<i32, CombatError> {
        let unit = self
            .state
            .unit(target)
            .ok_or(CombatError::UnitNotFound(target))?;
        let missing = unit.stats().get(StatKind::Health) - unit.vitals.health;
        let amount = unit.vitals.regrowth.min(missing);
        if unit.dead || amount <= 0 {
            return Ok(0);
        }

        let gained = self.heal(target, amount, false, false)?;
        let unit = self
            .state
            .unit_mut(target)
            .ok_or(CombatError::UnitNotFound(target))?;
        unit.vitals.regrowth -= gained;
        trace!(unit = %target, gained, left = unit.vitals.regrowth, "regrowth spent");
        Ok(gained)
    }

    /// Relocates `unit` so its head stands on `hex`.
    pub fn move_to(
        &mut self,
        unit: UnitId,
        hex: Hex,
        options: MoveOptions,
    ) -> Result<(), CombatError> {
        let mover = self
            .state
            .unit(unit)
            .ok_or(CombatError::UnitNotFound(unit))?;
        if mover.dead || !self.state.is_walkable(hex, mover.size(), unit) {
            return Err(CombatError::Blocked { unit, hex });
        }

        let mover = self
            .state
            .unit_mut(unit)
            .ok_or(CombatError::UnitNotFound(unit))?;
        let from = mover.position;
        mover.position = hex;
        let label = mover.label();

        debug!(unit = %unit, %from, to = %hex, pushed = options.pushed, "unit moved");
        if options.pushed {
            self.sink.log(format!("{label} is pushed to {hex}"));
        }
        Ok(())
    }

    /// Attaches `effect` to `target`.
    ///
    /// Returns `false` when a non-stackable effect of the same name is
    /// already present, or when a debuff is resisted.
    pub fn add_effect(
        &mut self,
        target: UnitId,
        effect: Effect,
        options: AddEffect,
    ) -> Result<bool, CombatError> {
        let unit = self
            .state
            .unit_mut(target)
            .ok_or(CombatError::UnitNotFound(target))?;
        if !unit.effects.accepts(&effect) {
            trace!(unit = %target, effect = %effect.name, "duplicate effect rejected");
            return Ok(false);
        }
        if options.debuff && unit.base_stats.flags.contains(UnitFlags::DEBUFF_IMMUNE) {
            trace!(unit = %target, effect = %effect.name, "debuff resisted");
            if let (false, Some(message)) = (options.quiet, options.resist_message) {
                self.sink.log(message);
            }
            return Ok(false);
        }

        let name = effect.name.clone();
        let hook = effect.on_apply.clone();
        if !unit.effects.push(effect) {
            return Err(CombatError::EffectCapacity(target));
        }
        self.fire_hook(target, &name, hook);
        if let (false, Some(message)) = (options.quiet, options.apply_message) {
            self.sink.log(message);
        }
        Ok(true)
    }

    /// Attaches `effect`, overwriting a same-name non-stackable effect in
    /// place. The apply hook fires on every call.
    pub fn replace_effect(&mut self, target: UnitId, effect: Effect) -> Result<(), CombatError> {
        let unit = self
            .state
            .unit_mut(target)
            .ok_or(CombatError::UnitNotFound(target))?;
        let name = effect.name.clone();
        let hook = effect.on_apply.clone();
        if !unit.effects.replace(effect) {
            return Err(CombatError::EffectCapacity(target));
        }
        self.fire_hook(target, &name, hook);
        Ok(())
    }

    fn fire_hook(&mut self, target: UnitId, effect: &str, hook: Option<EffectHook>) {
        match hook {
            None => {}
            Some(EffectHook::Trace) => trace!(unit = %target, effect, "effect applied"),
            Some(EffectHook::Log(line)) => {
                trace!(unit = %target, effect, "effect applied");
                self.sink.log(line);
            }
        }
    }

    fn restore_logged(
        &mut self,
        target: UnitId,
        pool: StatKind,
        amount: i32,
        silent: bool,
    ) -> Result<i32, CombatError> {
        if amount <= 0 {
            return Ok(0);
        }
        let Some(gained) = self.restore(target, pool, amount)? else {
            return Ok(0);
        };
        if !silent {
            let label = self.label(target)?;
            self.sink.log(format!("{label} recovers {gained} {pool}"));
        }
        Ok(gained)
    }

    /// Raises a vitals pool towards its effective maximum.
    ///
    /// `None` for dead units and channels without a pool.
    fn restore(
        &mut self,
        target: UnitId,
        pool: StatKind,
        amount: i32,
    ) -> Result<Option<i32>, CombatError> {
        let unit = self
            .state
            .unit_mut(target)
            .ok_or(CombatError::UnitNotFound(target))?;
        if unit.dead {
            return Ok(None);
        }
        let max = unit.stats().get(pool);
        let Some(current) = unit.vitals.pool_mut(pool) else {
            return Ok(None);
        };
        let gained = amount.min(max - *current).max(0);
        *current += gained;
        Ok(Some(gained))
    }

    fn label(&self, unit: UnitId) -> Result<String, CombatError> {
        self.state
            .unit(unit)
            .map(|u| u.label())
            .ok_or(CombatError::UnitNotFound(unit))
    }
}
