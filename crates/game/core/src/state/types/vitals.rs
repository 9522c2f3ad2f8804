use super::stats::{StatKind, Stats};

/// Current resource pools of a unit. Maxima live in [`Stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub health: i32,
    pub endurance: i32,
    pub energy: i32,
    pub regrowth: i32,
}

impl Vitals {
    pub const fn new(health: i32, endurance: i32, energy: i32, regrowth: i32) -> Self {
        Self {
            health,
            endurance,
            energy,
            regrowth,
        }
    }

    /// Every pool filled to the maximum given by `stats`.
    pub fn full(stats: &Stats) -> Self {
        Self {
            health: stats.get(StatKind::Health),
            endurance: stats.get(StatKind::Endurance),
            energy: stats.get(StatKind::Energy),
            regrowth: stats.get(StatKind::Regrowth),
        }
    }

    pub fn pool_mut(&mut self, kind: StatKind) -> Option<&mut i32> {
        match kind {
            StatKind::Health => Some(&mut self.health),
            StatKind::Endurance => Some(&mut self.endurance),
            StatKind::Energy => Some(&mut self.energy),
            StatKind::Regrowth => Some(&mut self.regrowth),
            _ => None,
        }
    }
}
