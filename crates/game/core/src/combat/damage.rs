//! Damage calculation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::state::{Effect, StatKind, Stats, UnitId};

// ============================================================================
// Damage Keys
// ============================================================================

/// Damage channel of a damage map entry.
///
/// `Pure` bypasses every stat; any other key is scaled by the attacker's and
/// target's matching mastery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DamageKey {
    Pure,
    Stat(StatKind),
}

impl fmt::Display for DamageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageKey::Pure => f.write_str("pure"),
            DamageKey::Stat(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for DamageKey {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pure") {
            Ok(DamageKey::Pure)
        } else {
            s.parse().map(DamageKey::Stat)
        }
    }
}

impl From<StatKind> for DamageKey {
    fn from(kind: StatKind) -> Self {
        DamageKey::Stat(kind)
    }
}

// Keys travel as plain strings so damage maps stay valid TOML/RON tables.
#[cfg(feature = "serde")]
impl serde::Serialize for DamageKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DamageKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown damage type `{raw}`")))
    }
}

/// Per-type damage values. Ordered so iteration (and therefore rounding and
/// logging) is deterministic.
pub type DamageMap = BTreeMap<DamageKey, i32>;

/// Builds a damage map from `(key, value)` pairs.
pub fn damage_map<K, I>(entries: I) -> DamageMap
where
    K: Into<DamageKey>,
    I: IntoIterator<Item = (K, i32)>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .collect()
}

// ============================================================================
// Damage Result
// ============================================================================

/// Resolved damage of one hit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    /// One entry per key of the input map. Negative values are kept as is.
    pub per_type: DamageMap,
    /// Sum of `per_type`, never below 1.
    pub total: i32,
}

// ============================================================================
// Damage Instance
// ============================================================================

/// One pending hit, consumed by the target it is applied to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Damage {
    pub attacker: UnitId,
    pub damages: DamageMap,
    /// Number of the target's hexes caught by the attack (1..=3).
    pub area: u32,
    /// Effects attached to the target when the hit lands.
    pub effects: Vec<Effect>,
    /// Zero cancels the hit entirely.
    pub amount: i32,
}

impl Damage {
    pub fn new(attacker: UnitId, damages: DamageMap, area: u32) -> Self {
        Self {
            attacker,
            damages,
            area,
            effects: Vec::new(),
            amount: 1,
        }
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Calculate the damage a hit deals.
///
/// # Formula
///
/// ```text
/// pure:    result = value
/// typed:   result = round(value * (1 + (offense - defense / area + (atk[t] - trg[t])) / 100))
/// total  = max(sum(result), 1)
/// ```
///
/// `area` dilutes the target's defense when an attack spreads over several of
/// its hexes and is treated as at least 1. Rounding is half-up.
///
/// # Returns
///
/// `None` when `amount` is zero: the hit does not happen at all and callers
/// must neither log nor apply anything.
pub fn calculate(
    attacker: &Stats,
    target: &Stats,
    damages: &DamageMap,
    area: u32,
    amount: i32,
) -> Option<DamageResult> {
    if amount == 0 {
        return None;
    }

    let area = f64::from(area.max(1));
    let offense = f64::from(attacker.get(StatKind::Offense));
    let defense = f64::from(target.get(StatKind::Defense));

    let per_type: DamageMap = damages
        .iter()
        .map(|(&key, &value)| {
            let result = match key {
                DamageKey::Pure => value,
                DamageKey::Stat(kind) => {
                    let affinity = f64::from(attacker.get(kind) - target.get(kind));
                    let scale = 1.0 + (offense - defense / area + affinity) / 100.0;
                    round_half_up(f64::from(value) * scale)
                }
            };
            (key, result)
        })
        .collect();

    let sum: i32 = per_type.values().sum();
    Some(DamageResult {
        per_type,
        total: sum.max(1),
    })
}

fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
