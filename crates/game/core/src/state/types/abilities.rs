//! Ability slots carried by units.
//!
//! A unit owns a fixed, indexed set of abilities. Each slot keeps its own
//! mutable bookkeeping (upgrade flag, spent flag, cached passive bonus) so the
//! whole state can be serialized and replayed.
//!
//! # Dispatch
//!
//! Lifecycle hooks are keyed by [`Trigger`]. [`AbilityKind::triggers`] is the
//! static subscription table consulted by the engine.

use arrayvec::ArrayVec;

use crate::combat::DamageMap;
use crate::config::CombatConfig;

/// Lifecycle events abilities and effects can subscribe to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Trigger {
    /// Player-initiated use through target selection.
    OnQuery,
    /// The owning unit entered the battlefield.
    OnCreatureSummon,
    /// The owning unit took damage and survived.
    OnDamage,
    /// The owning unit was healed.
    OnHeal,
    /// A new round began.
    OnStartOfRound,
}

/// Concrete ability behaviours known to the engine.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityKind {
    /// Passive: offensive masteries scale with remaining health.
    StatBuff,
    /// Seven-hex blast at one of six fixed spots two hexes away.
    AreaStrike,
    /// Heal allies or self, hinder enemies when upgraded.
    Ribbon,
    /// Lane strike that pushes the target one hex.
    KnockbackStrike,
}

impl AbilityKind {
    /// Triggers this ability subscribes to.
    pub const fn triggers(self) -> &'static [Trigger] {
        match self {
            AbilityKind::StatBuff => &[
                Trigger::OnCreatureSummon,
                Trigger::OnDamage,
                Trigger::OnHeal,
            ],
            AbilityKind::AreaStrike | AbilityKind::Ribbon | AbilityKind::KnockbackStrike => {
                &[Trigger::OnQuery]
            }
        }
    }

    pub fn listens_to(self, trigger: Trigger) -> bool {
        self.triggers().contains(&trigger)
    }

    pub fn is_passive(self) -> bool {
        !self.listens_to(Trigger::OnQuery)
    }
}

/// One ability of a unit together with its per-unit state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySlot {
    pub kind: AbilityKind,
    /// Display title; also names the effects this ability attaches.
    pub title: String,
    /// Base damage of the ability. Empty for non-damaging abilities.
    pub damages: DamageMap,
    /// Energy spent on activation.
    pub cost: i32,
    pub upgraded: bool,
    /// Spent for the current round.
    pub used: bool,
    /// Last bonus computed by a passive, used to suppress duplicate logs.
    pub last_bonus: i32,
}

impl AbilitySlot {
    pub fn new(kind: AbilityKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            damages: DamageMap::new(),
            cost: 0,
            upgraded: false,
            used: false,
            last_bonus: 0,
        }
    }

    #[must_use]
    pub fn with_damages(mut self, damages: DamageMap) -> Self {
        self.damages = damages;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn upgraded(mut self) -> Self {
        self.upgraded = true;
        self
    }
}

/// Indexed ability set of a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySlots {
    slots: ArrayVec<AbilitySlot, { CombatConfig::MAX_ABILITIES }>,
}

impl AbilitySlots {
    pub fn empty() -> Self {
        Self {
            slots: ArrayVec::new(),
        }
    }

    /// Appends a slot, returning its index, or `None` when all slots are taken.
    pub fn push(&mut self, slot: AbilitySlot) -> Option<usize> {
        let index = self.slots.len();
        self.slots.try_push(slot).ok().map(|_| index)
    }

    pub fn get(&self, index: usize) -> Option<&AbilitySlot> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut AbilitySlot> {
        self.slots.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilitySlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AbilitySlot> {
        self.slots.iter_mut()
    }

    /// Indices of the slots subscribed to `trigger`, in slot order.
    pub fn subscribed(&self, trigger: Trigger) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.kind.listens_to(trigger))
            .map(|(index, _)| index)
            .collect()
    }
}

impl FromIterator<AbilitySlot> for AbilitySlots {
    fn from_iter<I: IntoIterator<Item = AbilitySlot>>(iter: I) -> Self {
        let mut slots = Self::empty();
        for slot in iter {
            if slots.push(slot).is_none() {
                break;
            }
        }
        slots
    }
}
