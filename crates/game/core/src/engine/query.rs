//! Target-selection candidates handed to the input layer.
//!
//! A [`PendingQuery`] is the only way to reach activation for a queried
//! ability. It is not `Clone`: confirming or cancelling consumes it, so a
//! selection can be committed at most once.

use crate::combat::TeamFilter;
use crate::error::CombatError;
use crate::grid::{Cell, Direction};
use crate::state::{AbilityKind, UnitId};

/// One selectable lane of a direction query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lane {
    pub direction: Direction,
    /// Cells from the caster outward, ending on the first occupant if any.
    pub cells: Vec<Cell>,
}

impl Lane {
    /// Occupant of the last cell, i.e. the unit the lane runs into.
    pub fn target(&self) -> Option<UnitId> {
        self.cells.last().and_then(|cell| cell.occupant)
    }
}

/// Candidate set presented for selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetQuery {
    /// Pick one hex group. Sorted ascending by hex count.
    Choice {
        choices: Vec<Vec<Cell>>,
        team: TeamFilter,
        require_occupant: bool,
    },
    /// Pick one lane.
    Direction {
        lanes: Vec<Lane>,
        team: TeamFilter,
        require_occupant: bool,
    },
}

impl TargetQuery {
    pub fn len(&self) -> usize {
        match self {
            TargetQuery::Choice { choices, .. } => choices.len(),
            TargetQuery::Direction { lanes, .. } => lanes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the candidate at `index` out of the query.
    pub fn select(self, index: usize) -> Result<Selection, CombatError> {
        let available = self.len();
        let invalid = CombatError::InvalidSelection { index, available };
        match self {
            TargetQuery::Choice { mut choices, .. } => {
                if index >= choices.len() {
                    return Err(invalid);
                }
                Ok(Selection::Hexes(choices.swap_remove(index)))
            }
            TargetQuery::Direction { mut lanes, .. } => {
                if index >= lanes.len() {
                    return Err(invalid);
                }
                Ok(Selection::Lane(lanes.swap_remove(index)))
            }
        }
    }
}

/// A committed selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Hexes(Vec<Cell>),
    Lane(Lane),
}

/// An ability waiting for its target to be chosen.
#[derive(Debug)]
#[must_use = "a pending query must be confirmed or cancelled"]
pub struct PendingQuery {
    pub(super) unit: UnitId,
    pub(super) slot: usize,
    pub(super) ability: AbilityKind,
    pub(super) query: TargetQuery,
}

impl PendingQuery {
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn ability(&self) -> AbilityKind {
        self.ability
    }

    pub fn query(&self) -> &TargetQuery {
        &self.query
    }
}
