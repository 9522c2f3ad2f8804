//! The six lane directions and their geometric lookup table.

use crate::state::Hex;

use super::pattern::{DIAGONAL_DOWN, DIAGONAL_UP, Pattern, STRAIGHT_ROW};
use super::{Cell, HexGrid};

/// Lane direction relative to a unit facing right.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    UpRight = 0,
    Forward = 1,
    DownRight = 2,
    DownLeft = 3,
    Backward = 4,
    UpLeft = 5,
}

/// How one direction is laid onto the board.
struct LaneSpec {
    /// Vertical shift of the pattern origin.
    dy: i32,
    row_offset: i32,
    /// Mirror relative to the unit's own facing.
    mirror: bool,
    pattern: Pattern,
    /// Patterns drawn bottom-up are reversed so lanes start at the origin.
    reversed: bool,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::UpRight,
        Direction::Forward,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::Backward,
        Direction::UpLeft,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// True for the three directions pointing behind a right-facing unit.
    pub const fn is_rearward(self) -> bool {
        matches!(
            self,
            Direction::DownLeft | Direction::Backward | Direction::UpLeft
        )
    }

    // The up/down pairs are deliberately asymmetric: the upward lanes anchor
    // eight rows above and are reversed, the left lanes shift four columns.
    const fn spec(self) -> LaneSpec {
        match self {
            Direction::UpRight => LaneSpec {
                dy: -8,
                row_offset: 0,
                mirror: false,
                pattern: DIAGONAL_UP,
                reversed: true,
            },
            Direction::Forward => LaneSpec {
                dy: 0,
                row_offset: 0,
                mirror: false,
                pattern: STRAIGHT_ROW,
                reversed: false,
            },
            Direction::DownRight => LaneSpec {
                dy: 0,
                row_offset: 0,
                mirror: false,
                pattern: DIAGONAL_DOWN,
                reversed: false,
            },
            Direction::DownLeft => LaneSpec {
                dy: 0,
                row_offset: -4,
                mirror: false,
                pattern: DIAGONAL_UP,
                reversed: false,
            },
            Direction::Backward => LaneSpec {
                dy: 0,
                row_offset: 0,
                mirror: true,
                pattern: STRAIGHT_ROW,
                reversed: false,
            },
            Direction::UpLeft => LaneSpec {
                dy: -8,
                row_offset: -4,
                mirror: false,
                pattern: DIAGONAL_DOWN,
                reversed: true,
            },
        }
    }
}

/// Full lane in `direction` starting at `origin`, including `origin` itself.
pub fn lane<G>(grid: &G, origin: Hex, direction: Direction, flipped: bool) -> Vec<Cell>
where
    G: HexGrid + ?Sized,
{
    let spec = direction.spec();
    let mut cells = grid.hex_map(
        origin.offset(0, spec.dy),
        spec.row_offset,
        flipped != spec.mirror,
        &spec.pattern,
    );
    if spec.reversed {
        cells.reverse();
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDimensions;

    struct Open;

    impl HexGrid for Open {
        fn dimensions(&self) -> GridDimensions {
            GridDimensions::default()
        }

        fn cell(&self, hex: Hex) -> Option<Cell> {
            self.dimensions().contains(hex).then_some(Cell {
                hex,
                occupant: None,
                obstacle: false,
            })
        }
    }

    fn hexes(cells: &[Cell]) -> Vec<Hex> {
        cells.iter().map(|cell| cell.hex).collect()
    }

    #[test]
    fn forward_and_backward_lanes_start_at_origin() {
        let origin = Hex::new(6, 4);
        let forward = hexes(&lane(&Open, origin, Direction::Forward, false));
        assert_eq!(&forward[..3], &[origin, Hex::new(7, 4), Hex::new(8, 4)]);

        let backward = hexes(&lane(&Open, origin, Direction::Backward, false));
        assert_eq!(&backward[..3], &[origin, Hex::new(5, 4), Hex::new(4, 4)]);

        // Facing left swaps the two.
        let mirrored = hexes(&lane(&Open, origin, Direction::Forward, true));
        assert_eq!(mirrored, backward);
    }

    #[test]
    fn diagonal_lanes_start_at_origin_and_change_rows() {
        let origin = Hex::new(6, 8);
        for direction in [Direction::UpRight, Direction::UpLeft] {
            let cells = hexes(&lane(&Open, origin, direction, false));
            assert_eq!(cells[0], origin, "{direction}");
            assert!(cells.windows(2).all(|w| w[1].y == w[0].y - 1), "{direction}");
        }

        let origin = Hex::new(6, 0);
        for direction in [Direction::DownRight, Direction::DownLeft] {
            let cells = hexes(&lane(&Open, origin, direction, false));
            assert_eq!(cells[0], origin, "{direction}");
            assert!(cells.windows(2).all(|w| w[1].y == w[0].y + 1), "{direction}");
        }
    }

    #[test]
    fn index_round_trip() {
        for (index, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(direction.as_index(), index);
            assert_eq!(Direction::from_index(index), Some(*direction));
        }
        assert_eq!(Direction::from_index(6), None);
        assert!(Direction::Backward.is_rearward());
        assert!(!Direction::DownRight.is_rearward());
    }
}
