//! Units (creatures) on the battlefield.

use crate::error::CombatError;

use super::abilities::{AbilitySlot, AbilitySlots};
use super::common::{Hex, PlayerId, UnitId};
use super::effect::EffectSet;
use super::stats::Stats;
use super::vitals::Vitals;

/// Complete state of one combat unit.
///
/// # Invariants
///
/// - `base_stats` never changes after summoning; effects only contribute
///   deltas, read back through [`Unit::stats`].
/// - `dead` is set exactly when health reaches zero and never cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub player: PlayerId,
    /// Head hex. Larger units extend towards lower `x` from here.
    pub position: Hex,
    /// Side the unit faces; mirrors patterns horizontally.
    pub flipped: bool,

    pub base_stats: Stats,
    pub vitals: Vitals,
    pub effects: EffectSet,
    pub abilities: AbilitySlots,

    /// Designated core unit of its player.
    pub core: bool,
    pub dead: bool,
}

impl Unit {
    /// Creates a living unit with full vitals and no abilities.
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        player: PlayerId,
        position: Hex,
        base_stats: Stats,
    ) -> Self {
        let vitals = Vitals::full(&base_stats);
        Self {
            id,
            name: name.into(),
            player,
            position,
            flipped: false,
            base_stats,
            vitals,
            effects: EffectSet::empty(),
            abilities: AbilitySlots::empty(),
            core: false,
            dead: false,
        }
    }

    /// Appends `slot` to the kit.
    ///
    /// Kits hold at most `CombatConfig::MAX_ABILITIES` slots; use
    /// [`Unit::try_with_ability`] when the kit comes from untrusted data.
    #[must_use]
    pub fn with_ability(mut self, slot: AbilitySlot) -> Self {
        let pushed = self.abilities.push(slot);
        debug_assert!(pushed.is_some(), "ability kit of unit {} is full", self.id);
        self
    }

    pub fn try_with_ability(mut self, slot: AbilitySlot) -> Result<Self, CombatError> {
        match self.abilities.push(slot) {
            Some(_) => Ok(self),
            None => Err(CombatError::AbilityCapacity(self.id)),
        }
    }

    #[must_use]
    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = vitals;
        self
    }

    #[must_use]
    pub fn facing(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    #[must_use]
    pub fn as_core(mut self) -> Self {
        self.core = true;
        self
    }

    /// Effective stats: base stats with every effect alteration folded in.
    pub fn stats(&self) -> Stats {
        self.base_stats.altered(self.effects.alterations())
    }

    /// Name and id as written to the battle log.
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.id)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn size(&self) -> u8 {
        self.base_stats.size
    }

    /// Hexes covered by the unit, head first.
    pub fn footprint(&self) -> impl Iterator<Item = Hex> + '_ {
        (0..i32::from(self.size())).map(|i| self.position.offset(-i, 0))
    }

    pub fn occupies(&self, hex: Hex) -> bool {
        self.footprint().any(|cell| cell == hex)
    }

    pub fn ability(&self, slot: usize) -> Option<&AbilitySlot> {
        self.abilities.get(slot)
    }
}
