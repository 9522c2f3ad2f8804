//! Source/target classification.

use crate::state::Unit;

/// How a target relates to the unit acting on it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Relation {
    Myself,
    Ally,
    Enemy,
}

impl Relation {
    pub fn is_hostile(self) -> bool {
        self == Relation::Enemy
    }
}

/// Which targets a selection accepts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TeamFilter {
    Both,
    Ally,
    Enemy,
}

impl TeamFilter {
    /// Returns true if a target of `relation` passes the filter.
    ///
    /// The source itself counts as an ally.
    pub fn admits(self, relation: Relation) -> bool {
        match self {
            TeamFilter::Both => true,
            TeamFilter::Ally => relation != Relation::Enemy,
            TeamFilter::Enemy => relation == Relation::Enemy,
        }
    }
}

/// Classifies `target` from the point of view of `source`.
pub fn relation_of(source: &Unit, target: &Unit) -> Relation {
    if source.id == target.id {
        Relation::Myself
    } else if source.player.team() == target.player.team() {
        Relation::Ally
    } else {
        Relation::Enemy
    }
}
