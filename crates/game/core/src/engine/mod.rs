//! Ability activation protocol and unit mutation.
//!
//! The [`CombatEngine`] is the only writer of a [`BattleState`]. Queried
//! abilities go through `query` → `confirm`/`cancel`; passive abilities and
//! effect delete-triggers are driven by [`CombatEngine::dispatch`].
//!
//! ```text
//! Idle → RequirementCheck → Querying → Activating → Idle
//!                               └──── cancel ────────┘
//! ```

mod mutation;
mod query;
mod sink;

pub use mutation::{AddEffect, DamageOutcome, MoveOptions, TakeDamage};
pub use query::{Lane, PendingQuery, Selection, TargetQuery};
pub use sink::{BattleLog, EventSink};

use tracing::{debug, trace};

use crate::ability;
use crate::combat::ActivationReport;
use crate::config::CombatConfig;
use crate::error::CombatError;
use crate::state::{AbilitySlot, BattleState, Trigger, Unit, UnitId};

/// Stage of the activation protocol.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityPhase {
    Idle,
    RequirementCheck,
    Querying,
    Activating,
}

/// Where the input layer should resume after a cancelled query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReturnTo {
    MoveQuery,
}

/// Result of cancelling a pending query. Nothing was mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cancelled {
    pub phase: AbilityPhase,
    pub return_to: ReturnTo,
}

/// Combat engine bound to one battle.
///
/// All mutation borrows the engine mutably, so at most one activation is in
/// flight and it always runs to completion before anything else observes the
/// state.
pub struct CombatEngine<'a> {
    pub(crate) state: &'a mut BattleState,
    pub(crate) config: &'a CombatConfig,
    pub(crate) sink: &'a mut dyn EventSink,
}

impl<'a> CombatEngine<'a> {
    pub fn new(
        state: &'a mut BattleState,
        config: &'a CombatConfig,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            state,
            config,
            sink,
        }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn config(&self) -> &CombatConfig {
        self.config
    }

    /// Places a unit on the board and fires its summon trigger.
    pub fn summon(&mut self, unit: Unit) -> Result<UnitId, CombatError> {
        let id = self.state.add_unit(unit)?;
        debug!(unit = %id, "unit summoned");
        self.dispatch(Trigger::OnCreatureSummon, id)?;
        Ok(id)
    }

    /// Returns true if the ability in `slot` of `unit` can be used right now.
    ///
    /// Pure predicate: the unit is alive, the ability is unspent and
    /// affordable, and its own targeting constraints hold.
    pub fn require(&self, unit: UnitId, slot: usize) -> bool {
        let Some(caster) = self.state.unit(unit) else {
            return false;
        };
        let Some(ability) = caster.ability(slot) else {
            return false;
        };
        caster.is_alive()
            && !ability.used
            && caster.vitals.energy >= ability.cost
            && ability::require(self.state, caster, ability)
    }

    /// Builds the candidate set of a queried ability.
    pub fn query(&self, unit: UnitId, slot: usize) -> Result<PendingQuery, CombatError> {
        debug!(unit = %unit, slot, phase = %AbilityPhase::RequirementCheck, "query requested");
        let (caster, ability) = self.slot(unit, slot)?;
        if ability.used {
            return Err(CombatError::AbilityUsed { unit, slot });
        }
        if !self.require(unit, slot) {
            return Err(CombatError::RequirementsNotMet { unit, slot });
        }
        let query = ability::query(self.state, caster, ability)
            .ok_or(CombatError::RequirementsNotMet { unit, slot })?;

        debug!(
            unit = %unit,
            ability = %ability.kind,
            candidates = query.len(),
            phase = %AbilityPhase::Querying,
            "query ready"
        );
        Ok(PendingQuery {
            unit,
            slot,
            ability: ability.kind,
            query,
        })
    }

    /// Commits candidate `index` of `pending` and activates the ability.
    ///
    /// An out-of-range index consumes the query without mutating anything.
    pub fn confirm(
        &mut self,
        pending: PendingQuery,
        index: usize,
    ) -> Result<ActivationReport, CombatError> {
        let PendingQuery {
            unit, slot, query, ..
        } = pending;
        let selection = query.select(index)?;
        self.activate(unit, slot, selection)
    }

    /// Abandons `pending`; the input layer goes back to the move query.
    pub fn cancel(&self, pending: PendingQuery) -> Cancelled {
        debug!(unit = %pending.unit, slot = pending.slot, "query cancelled");
        Cancelled {
            phase: AbilityPhase::Idle,
            return_to: ReturnTo::MoveQuery,
        }
    }

    fn activate(
        &mut self,
        unit: UnitId,
        slot: usize,
        selection: Selection,
    ) -> Result<ActivationReport, CombatError> {
        let (_, ability) = self.slot(unit, slot)?;
        if ability.used {
            return Err(CombatError::AbilityUsed { unit, slot });
        }
        if !self.require(unit, slot) {
            return Err(CombatError::RequirementsNotMet { unit, slot });
        }
        let kind = ability.kind;

        // Spent before any target is touched.
        self.spend(unit, slot)?;
        debug!(unit = %unit, ability = %kind, phase = %AbilityPhase::Activating, "activating");

        let report = ability::activate(self, unit, slot, selection)?;
        debug!(
            unit = %unit,
            ability = %kind,
            hits = report.outcome.hits().len(),
            kills = report.outcome.kills(),
            phase = %AbilityPhase::Idle,
            "activation resolved"
        );
        Ok(report)
    }

    /// Fires `trigger` on `unit`.
    ///
    /// Effects deleted by the trigger go first, then every ability slot of
    /// the unit subscribed to it runs in slot order. `OnQuery` is driven by
    /// [`CombatEngine::query`] instead and is ignored here.
    pub fn dispatch(&mut self, trigger: Trigger, unit: UnitId) -> Result<(), CombatError> {
        if trigger == Trigger::OnQuery {
            return Ok(());
        }
        let owner = self
            .state
            .unit_mut(unit)
            .ok_or(CombatError::UnitNotFound(unit))?;
        for effect in owner.effects.remove_triggered(trigger) {
            trace!(unit = %unit, effect = %effect.name, %trigger, "effect deleted by trigger");
        }
        if owner.dead {
            return Ok(());
        }

        for slot in owner.abilities.subscribed(trigger) {
            ability::on_trigger(self, unit, slot, trigger)?;
        }
        Ok(())
    }

    /// Advances to the next round.
    ///
    /// Fires `OnStartOfRound` on every living unit and lets it regrow, then
    /// counts down effect lifetimes and makes every ability usable again.
    pub fn start_round(&mut self) -> Result<(), CombatError> {
        self.state.round = self.state.round.next();
        debug!(round = %self.state.round, "round started");

        let living: Vec<UnitId> = self.state.living_units().map(|u| u.id).collect();
        for id in living {
            self.dispatch(Trigger::OnStartOfRound, id)?;
            self.regrow(id)?;
        }

        for unit in self.state.units.iter_mut() {
            for effect in unit.effects.tick_lifetimes() {
                trace!(unit = %unit.id, effect = %effect.name, "effect expired");
            }
            for ability in unit.abilities.iter_mut() {
                ability.used = false;
            }
        }
        Ok(())
    }

    fn slot(&self, unit: UnitId, slot: usize) -> Result<(&Unit, &AbilitySlot), CombatError> {
        let caster = self
            .state
            .unit(unit)
            .ok_or(CombatError::UnitNotFound(unit))?;
        let ability = caster
            .ability(slot)
            .ok_or(CombatError::AbilityNotFound { unit, slot })?;
        Ok((caster, ability))
    }

    fn spend(&mut self, unit: UnitId, slot: usize) -> Result<(), CombatError> {
        let caster = self
            .state
            .unit_mut(unit)
            .ok_or(CombatError::UnitNotFound(unit))?;
        let ability = caster
            .abilities
            .get_mut(slot)
            .ok_or(CombatError::AbilityNotFound { unit, slot })?;
        ability.used = true;
        let cost = ability.cost;
        caster.vitals.energy -= cost;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLayout;
    use crate::state::{AbilityKind, Hex, Player, PlayerId, StatKind, Stats, Vitals};

    fn battle() -> BattleState {
        let mut state = BattleState::new(GridLayout::default());
        state.add_player(Player::new(PlayerId(0), 0));
        let caster = Unit::new(
            UnitId(1),
            "Caster",
            PlayerId(0),
            Hex::new(6, 4),
            Stats::new()
                .with(StatKind::Health, 40)
                .with(StatKind::Energy, 5),
        )
        .with_ability(AbilitySlot::new(AbilityKind::Ribbon, "Ribbon").with_cost(3));
        state.add_unit(caster).unwrap();
        state
    }

    #[test]
    fn activation_pays_energy_and_spends_the_slot() {
        let mut state = battle();
        let config = CombatConfig::default();
        let mut log = BattleLog::new();
        let mut engine = CombatEngine::new(&mut state, &config, &mut log);

        let pending = engine.query(UnitId(1), 0).unwrap();
        assert_eq!(pending.ability(), AbilityKind::Ribbon);
        let report = engine.confirm(pending, 0).unwrap();
        assert_eq!(report.ability, AbilityKind::Ribbon);

        let caster = engine.state().unit(UnitId(1)).unwrap();
        assert_eq!(caster.vitals.energy, 2);
        assert!(caster.ability(0).unwrap().used);

        // Two energy left: unaffordable even after the round resets the slot.
        engine.start_round().unwrap();
        assert!(!engine.require(UnitId(1), 0));
        assert_eq!(
            engine.query(UnitId(1), 0).unwrap_err(),
            CombatError::RequirementsNotMet {
                unit: UnitId(1),
                slot: 0
            }
        );
        assert_eq!(engine.state().round, crate::state::Round(2));
    }

    #[test]
    fn cancel_returns_to_the_move_query() {
        let mut state = battle();
        let config = CombatConfig::default();
        let mut log = BattleLog::new();
        let engine = CombatEngine::new(&mut state, &config, &mut log);

        let pending = engine.query(UnitId(1), 0).unwrap();
        assert_eq!(pending.unit(), UnitId(1));
        assert_eq!(
            engine.cancel(pending),
            Cancelled {
                phase: AbilityPhase::Idle,
                return_to: ReturnTo::MoveQuery,
            }
        );
        assert!(engine.require(UnitId(1), 0));
    }

    #[test]
    fn dead_or_unknown_units_cannot_act() {
        let mut state = battle();
        state.unit_mut(UnitId(1)).unwrap().dead = true;
        let config = CombatConfig::default();
        let mut log = BattleLog::new();
        let mut engine = CombatEngine::new(&mut state, &config, &mut log);

        assert!(!engine.require(UnitId(1), 0));
        assert!(!engine.require(UnitId(9), 0));
        assert_eq!(
            engine.query(UnitId(9), 0).unwrap_err(),
            CombatError::UnitNotFound(UnitId(9))
        );
        assert_eq!(
            engine.query(UnitId(1), 2).unwrap_err(),
            CombatError::AbilityNotFound {
                unit: UnitId(1),
                slot: 2
            }
        );
        // Lifecycle triggers on dead units are no-ops.
        engine.dispatch(Trigger::OnHeal, UnitId(1)).unwrap();
        engine.dispatch(Trigger::OnQuery, UnitId(9)).unwrap();
    }

    #[test]
    fn summon_runs_passives() {
        let mut state = battle();
        let config = CombatConfig::default();
        let mut log = BattleLog::new();
        let mut engine = CombatEngine::new(&mut state, &config, &mut log);

        let tank = Unit::new(
            UnitId(2),
            "Tank",
            PlayerId(0),
            Hex::new(2, 2),
            Stats::new().with(StatKind::Health, 35),
        )
        .with_vitals(Vitals::new(35, 0, 0, 0))
        .with_ability(AbilitySlot::new(AbilityKind::StatBuff, "Bulk").upgraded());
        engine.summon(tank).unwrap();

        let tank = engine.state().unit(UnitId(2)).unwrap();
        assert_eq!(tank.stats().get(StatKind::Slash), 21);
        assert_eq!(tank.ability(0).unwrap().last_bonus, 21);
    }
}
