//! Hex-grid geometry.
//!
//! The grid uses offset coordinates with odd rows shifted half a cell. Area
//! shapes are described by [`Pattern`] matrices and resolved against an
//! origin by [`hex_map`]. Occupancy comes from whoever implements [`HexGrid`];
//! the battle state is the canonical implementation.
mod direction;
mod pattern;

pub use direction::{Direction, lane};
pub use pattern::{DIAGONAL_DOWN, DIAGONAL_UP, Pattern, STRAIGHT_ROW};

use std::collections::BTreeSet;

use crate::state::{Hex, UnitId};

/// Board size in hexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, hex: Hex) -> bool {
        hex.x >= 0 && hex.y >= 0 && hex.x < self.width as i32 && hex.y < self.height as i32
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(16, 9)
    }
}

/// Static board layout: dimensions plus impassable cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    pub dimensions: GridDimensions,
    pub obstacles: BTreeSet<Hex>,
}

impl GridLayout {
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            obstacles: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_obstacle(mut self, hex: Hex) -> Self {
        self.obstacles.insert(hex);
        self
    }

    pub fn is_obstacle(&self, hex: Hex) -> bool {
        self.obstacles.contains(&hex)
    }
}

/// A resolved grid cell with its occupant, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub hex: Hex,
    pub occupant: Option<UnitId>,
    pub obstacle: bool,
}

/// Geometry provider consumed by abilities.
pub trait HexGrid {
    fn dimensions(&self) -> GridDimensions;

    /// Resolves one hex. `None` when outside the board.
    fn cell(&self, hex: Hex) -> Option<Cell>;

    /// Cells matched by `pattern` anchored at `origin`. See [`hex_map`].
    fn hex_map(&self, origin: Hex, row_offset: i32, flipped: bool, pattern: &Pattern) -> Vec<Cell> {
        hex_map(self.dimensions(), origin, row_offset, flipped, pattern)
            .into_iter()
            .filter_map(|hex| self.cell(hex))
            .collect()
    }

    /// True if a unit of `size` could stand with its head on `hex`.
    ///
    /// Every covered cell must exist, be free of obstacles, and be empty or
    /// occupied by `ignore` itself.
    fn is_walkable(&self, hex: Hex, size: u8, ignore: UnitId) -> bool {
        (0..i32::from(size)).all(|i| match self.cell(hex.offset(-i, 0)) {
            Some(cell) => !cell.obstacle && cell.occupant.is_none_or(|id| id == ignore),
            None => false,
        })
    }
}

/// Resolves `pattern` at `origin` into board hexes, dropping off-board cells.
///
/// `row_offset` shifts the pattern along the row; `flipped` mirrors it for
/// units facing left. Odd pattern rows are realigned when the origin sits on
/// an odd board row so shapes keep their form on the staggered grid.
pub fn hex_map(
    dimensions: GridDimensions,
    origin: Hex,
    row_offset: i32,
    flipped: bool,
    pattern: &Pattern,
) -> Vec<Hex> {
    let width = pattern.width() as i32;
    if pattern.height() == 0 {
        return Vec::new();
    }

    let origin_x = if flipped {
        origin.x + 1 - width - row_offset
    } else {
        origin.x - 1 + row_offset
    };
    let odd_origin = origin.is_odd_row();

    let mut hexes = Vec::new();
    for (dy, row) in pattern.rows().iter().enumerate() {
        let odd_row = dy % 2 != 0;

        let mut cells = Vec::with_capacity(row.len() + 2);
        cells.push(0u8);
        cells.extend_from_slice(row);
        if flipped && odd_row {
            cells.push(0);
        }
        if odd_origin && odd_row {
            if flipped {
                cells.pop();
            } else {
                cells.remove(0);
            }
        }

        let len = cells.len();
        for (x, &included) in cells.iter().enumerate() {
            if included == 0 {
                continue;
            }
            // Flipped patterns are read backwards.
            let column = if flipped { len - 1 - x } else { x };
            let hex = Hex::new(origin_x + column as i32, origin.y + dy as i32);
            if dimensions.contains(hex) {
                hexes.push(hex);
            }
        }
    }
    hexes
}
