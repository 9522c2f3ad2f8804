//! Numeric stat channels of a unit.
//!
//! Base stats are immutable for the lifetime of a unit. Effects contribute
//! [`Alterations`] (additive deltas) that are folded in on demand by
//! [`Stats::altered`], so removing an effect reverses its contribution exactly.

use std::collections::BTreeMap;

use bitflags::bitflags;

/// Closed set of numeric stat channels.
///
/// Vitals maxima come first, then the offense/defense pair and movement,
/// then the nine damage masteries. Masteries double as damage-type keys.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    // ========================================================================
    // Vitals
    // ========================================================================
    Health = 0,
    Regrowth = 1,
    Endurance = 2,
    Energy = 3,
    Meditation = 4,
    Initiative = 5,

    // ========================================================================
    // Combat
    // ========================================================================
    Offense = 6,
    Defense = 7,
    Movement = 8,

    // ========================================================================
    // Masteries
    // ========================================================================
    Pierce = 9,
    Slash = 10,
    Crush = 11,
    Shock = 12,
    Burn = 13,
    Frost = 14,
    Poison = 15,
    Sonic = 16,
    Mental = 17,
}

impl StatKind {
    /// Total number of stat channels.
    pub const COUNT: usize = 18;

    /// Returns all stat kinds in order.
    pub const fn all() -> [StatKind; Self::COUNT] {
        [
            StatKind::Health,
            StatKind::Regrowth,
            StatKind::Endurance,
            StatKind::Energy,
            StatKind::Meditation,
            StatKind::Initiative,
            StatKind::Offense,
            StatKind::Defense,
            StatKind::Movement,
            StatKind::Pierce,
            StatKind::Slash,
            StatKind::Crush,
            StatKind::Shock,
            StatKind::Burn,
            StatKind::Frost,
            StatKind::Poison,
            StatKind::Sonic,
            StatKind::Mental,
        ]
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// Returns true for the nine damage masteries.
    #[inline]
    pub const fn is_mastery(self) -> bool {
        self.as_index() >= StatKind::Pierce.as_index()
    }
}

bitflags! {
    /// Capability flags carried alongside the numeric stats.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitFlags: u8 {
        /// Can be displaced by knockback.
        const MOVEABLE       = 1 << 0;
        /// Damage does not drain endurance.
        const FATIGUE_IMMUNE = 1 << 1;
        /// Debuff effects are resisted.
        const DEBUFF_IMMUNE  = 1 << 2;
    }
}

/// Sparse additive stat deltas carried by an effect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alterations(BTreeMap<StatKind, i32>);

impl Alterations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to `kind` (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: StatKind, delta: i32) -> Self {
        *self.0.entry(kind).or_insert(0) += delta;
        self
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, i32)> + '_ {
        self.0.iter().map(|(kind, delta)| (*kind, *delta))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(StatKind, i32)> for Alterations {
    fn from_iter<I: IntoIterator<Item = (StatKind, i32)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (kind, delta)| acc.with(kind, delta))
    }
}

/// Dense stat table of a unit plus its capability flags and footprint.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    values: [i32; StatKind::COUNT],
    pub flags: UnitFlags,
    /// Number of hexes the unit occupies along its row (1..=3).
    pub size: u8,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            values: [0; StatKind::COUNT],
            flags: UnitFlags::MOVEABLE,
            size: 1,
        }
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, kind: StatKind) -> i32 {
        self.values[kind.as_index()]
    }

    #[inline]
    pub fn set(&mut self, kind: StatKind, value: i32) {
        self.values[kind.as_index()] = value;
    }

    #[must_use]
    pub fn with(mut self, kind: StatKind, value: i32) -> Self {
        self.set(kind, value);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: UnitFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u8) -> Self {
        self.size = size.clamp(1, 3);
        self
    }

    pub fn is_moveable(&self) -> bool {
        self.flags.contains(UnitFlags::MOVEABLE)
    }

    /// Returns a copy with every alteration folded in additively.
    pub fn altered<'a, I>(&self, alterations: I) -> Stats
    where
        I: IntoIterator<Item = &'a Alterations>,
    {
        let mut stats = self.clone();
        for alteration in alterations {
            for (kind, delta) in alteration.iter() {
                stats.values[kind.as_index()] += delta;
            }
        }
        stats
    }
}
