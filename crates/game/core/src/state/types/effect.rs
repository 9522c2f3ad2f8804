//! Named stat-altering attachments owned by a unit.
//!
//! An effect lives on exactly one target unit. It may be permanent or last a
//! number of rounds, and it may name a [`Trigger`] that removes it early.
//!
//! # Stacking
//!
//! Non-stackable effects are unique by name on their owner: re-applying one
//! overwrites the existing entry in place. Stackable effects accumulate
//! independently until the set is full.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;

use super::abilities::Trigger;
use super::common::UnitId;
use super::stats::Alterations;

/// Side effect fired every time an effect is (re)applied.
///
/// Hooks are plain data so effects stay serializable and replayable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectHook {
    /// Emit a tracing event only.
    Trace,
    /// Append a line to the battle log.
    Log(String),
}

/// A single named modifier bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub name: String,
    pub caster: UnitId,
    pub alterations: Alterations,
    /// Remaining rounds. `None` means permanent.
    pub turn_lifetime: Option<u32>,
    /// Trigger that removes the effect immediately when fired on its owner.
    pub delete_trigger: Option<Trigger>,
    pub stackable: bool,
    pub on_apply: Option<EffectHook>,
}

impl Effect {
    /// Creates a permanent, non-stackable effect with no alterations.
    pub fn new(name: impl Into<String>, caster: UnitId) -> Self {
        Self {
            name: name.into(),
            caster,
            alterations: Alterations::new(),
            turn_lifetime: None,
            delete_trigger: None,
            stackable: false,
            on_apply: None,
        }
    }

    #[must_use]
    pub fn with_alterations(mut self, alterations: Alterations) -> Self {
        self.alterations = alterations;
        self
    }

    #[must_use]
    pub fn lasting(mut self, rounds: u32) -> Self {
        self.turn_lifetime = Some(rounds);
        self
    }

    #[must_use]
    pub fn deleted_on(mut self, trigger: Trigger) -> Self {
        self.delete_trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    #[must_use]
    pub fn on_apply(mut self, hook: EffectHook) -> Self {
        self.on_apply = Some(hook);
        self
    }
}

/// Bounded set of effects attached to one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSet {
    effects: ArrayVec<Effect, { CombatConfig::MAX_EFFECTS }>,
}

impl EffectSet {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// First effect with the given name.
    pub fn find(&self, name: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.name == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.effects.iter().filter(|e| e.name == name).count()
    }

    /// Returns true if `effect` may be attached without violating uniqueness.
    pub fn accepts(&self, effect: &Effect) -> bool {
        effect.stackable || self.find(&effect.name).is_none()
    }

    /// Appends an effect. Returns `false` if the set is full.
    pub fn push(&mut self, effect: Effect) -> bool {
        self.effects.try_push(effect).is_ok()
    }

    /// Overwrites a same-name non-stackable effect in place, or appends.
    ///
    /// Returns `false` only when appending into a full set.
    pub fn replace(&mut self, effect: Effect) -> bool {
        if !effect.stackable {
            if let Some(existing) = self.effects.iter_mut().find(|e| e.name == effect.name) {
                *existing = effect;
                return true;
            }
        }
        self.push(effect)
    }

    /// Removes and returns the effects whose delete trigger is `trigger`.
    pub fn remove_triggered(&mut self, trigger: Trigger) -> Vec<Effect> {
        self.drain_where(|e| e.delete_trigger == Some(trigger))
    }

    /// Counts one round off every finite lifetime and returns expired effects.
    pub fn tick_lifetimes(&mut self) -> Vec<Effect> {
        for effect in self.effects.iter_mut() {
            if let Some(remaining) = effect.turn_lifetime.as_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }
        self.drain_where(|e| e.turn_lifetime == Some(0))
    }

    /// Alteration maps of all attached effects, in attachment order.
    pub fn alterations(&self) -> impl Iterator<Item = &Alterations> {
        self.effects.iter().map(|e| &e.alterations)
    }

    fn drain_where(&mut self, pred: impl Fn(&Effect) -> bool) -> Vec<Effect> {
        let mut removed = Vec::new();
        let mut kept = ArrayVec::new();
        for effect in self.effects.drain(..) {
            if pred(&effect) {
                removed.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.effects = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::stats::StatKind;

    fn buff(bonus: i32) -> Effect {
        Effect::new("Bulwark", UnitId(1))
            .with_alterations(Alterations::new().with(StatKind::Crush, bonus))
    }

    #[test]
    fn replace_overwrites_non_stackable_in_place() {
        let mut set = EffectSet::empty();
        set.push(Effect::new("Other", UnitId(2)));
        assert!(set.replace(buff(10)));
        assert!(set.replace(buff(10)));
        assert!(set.replace(buff(25)));

        assert_eq!(set.count("Bulwark"), 1);
        assert_eq!(set.len(), 2);
        let stored = set.find("Bulwark").unwrap();
        assert_eq!(stored.alterations.get(StatKind::Crush), 25);
        // Position is kept: the first entry is still the unrelated effect.
        assert_eq!(set.iter().next().unwrap().name, "Other");
    }

    #[test]
    fn stackable_effects_accumulate() {
        let mut set = EffectSet::empty();
        let bleed = Effect::new("Bleed", UnitId(3)).stackable();
        assert!(set.accepts(&bleed));
        set.replace(bleed.clone());
        set.replace(bleed.clone());
        assert_eq!(set.count("Bleed"), 2);
        assert!(set.accepts(&bleed));
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut set = EffectSet::empty();
        for _ in 0..CombatConfig::MAX_EFFECTS {
            assert!(set.push(Effect::new("Stack", UnitId(1)).stackable()));
        }
        assert!(!set.push(Effect::new("Stack", UnitId(1)).stackable()));
        assert_eq!(set.len(), CombatConfig::MAX_EFFECTS);
    }

    #[test]
    fn lifetimes_expire_after_counted_rounds() {
        let mut set = EffectSet::empty();
        set.push(buff(5).lasting(2));
        set.push(Effect::new("Permanent", UnitId(1)));

        assert!(set.tick_lifetimes().is_empty());
        let expired = set.tick_lifetimes();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].name, "Bulwark");
        assert_eq!(set.len(), 1);
        assert!(set.find("Permanent").is_some());
    }

    #[test]
    fn delete_trigger_removes_regardless_of_lifetime() {
        let mut set = EffectSet::empty();
        set.push(buff(5).lasting(9).deleted_on(Trigger::OnStartOfRound));
        set.push(Effect::new("Sticky", UnitId(1)).deleted_on(Trigger::OnDamage));

        let removed = set.remove_triggered(Trigger::OnStartOfRound);
        assert_eq!(removed.len(), 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().name, "Sticky");
    }
}
