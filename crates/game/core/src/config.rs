use crate::combat::{DamageMap, damage_map};
use crate::state::StatKind;

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub stat_buff: StatBuffConfig,
    pub area_strike: AreaStrikeConfig,
    pub ribbon: RibbonConfig,
    pub knockback: KnockbackConfig,
    /// Kills in one activation needed to score a combo.
    pub combo_threshold: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_EFFECTS: usize = 16;
    pub const MAX_ABILITIES: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COMBO_THRESHOLD: u32 = 2;

    pub fn new() -> Self {
        Self {
            stat_buff: StatBuffConfig::default(),
            area_strike: AreaStrikeConfig::default(),
            ribbon: RibbonConfig::default(),
            knockback: KnockbackConfig::default(),
            combo_threshold: Self::DEFAULT_COMBO_THRESHOLD,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Health-scaled passive: `bonus = health * multiplier / divisor`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBuffConfig {
    pub multiplier: i32,
    pub divisor: i32,
    pub upgraded_divisor: i32,
}

impl StatBuffConfig {
    /// Divisor for the given upgrade state, never below 1.
    pub fn divisor_for(&self, upgraded: bool) -> i32 {
        let divisor = if upgraded {
            self.upgraded_divisor
        } else {
            self.divisor
        };
        divisor.max(1)
    }
}

impl Default for StatBuffConfig {
    fn default() -> Self {
        Self {
            multiplier: 3,
            divisor: 7,
            upgraded_divisor: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AreaStrikeConfig {
    /// Damage multiplier against enemies once upgraded.
    pub upgraded_enemy_multiplier: i32,
}

impl Default for AreaStrikeConfig {
    fn default() -> Self {
        Self {
            upgraded_enemy_multiplier: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RibbonConfig {
    pub heal: i32,
    pub endurance: i32,
    pub regrowth: i32,
    /// Movement delta of the debuff placed on enemies once upgraded.
    pub movement_penalty: i32,
    pub debuff_rounds: u32,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            heal: 20,
            endurance: 2,
            regrowth: 2,
            movement_penalty: -2,
            debuff_rounds: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KnockbackConfig {
    /// Damage when the target stands on the first lane hex.
    pub melee: DamageMap,
    pub ranged: DamageMap,
    /// Sonic damage added when an upgraded strike cannot push.
    pub blocked_bonus: i32,
}

impl Default for KnockbackConfig {
    fn default() -> Self {
        Self {
            melee: damage_map([(StatKind::Sonic, 20), (StatKind::Crush, 10)]),
            ranged: damage_map([(StatKind::Sonic, 20)]),
            blocked_bonus: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageKey;

    #[test]
    fn defaults_match_tuning_table() {
        let config = CombatConfig::default();
        assert_eq!(config.stat_buff.divisor_for(false), 7);
        assert_eq!(config.stat_buff.divisor_for(true), 5);
        assert_eq!(config.ribbon.heal, 20);
        assert_eq!(config.combo_threshold, 2);
        assert_eq!(
            config.knockback.melee.get(&DamageKey::Stat(StatKind::Crush)),
            Some(&10)
        );
        assert_eq!(config.knockback.ranged.len(), 1);
    }

    #[test]
    fn zero_divisor_is_clamped() {
        let config = StatBuffConfig {
            divisor: 0,
            ..StatBuffConfig::default()
        };
        assert_eq!(config.divisor_for(false), 1);
    }
}
