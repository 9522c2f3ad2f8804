//! Occupancy matrices describing which offsets from an origin are included.
//!
//! Rows may have different lengths. A `1` includes the cell, a `0` skips it.

/// Static footprint pattern used by [`super::hex_map`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    rows: &'static [&'static [u8]],
}

impl Pattern {
    pub const fn new(rows: &'static [&'static [u8]]) -> Self {
        Self { rows }
    }

    pub const fn rows(&self) -> &'static [&'static [u8]] {
        self.rows
    }

    pub const fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the first row, which anchors the origin column.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// Number of included cells.
    pub fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell != 0).count())
            .sum()
    }
}

/// Nine-row diagonal climbing from bottom-left to top-right.
pub const DIAGONAL_UP: Pattern = Pattern::new(&[
    &[0, 0, 0, 0, 1],
    &[0, 0, 0, 0, 1],
    &[0, 0, 0, 1, 0],
    &[0, 0, 0, 1, 0],
    &[0, 0, 1, 0, 0],
    &[0, 0, 1, 0, 0],
    &[0, 1, 0, 0, 0],
    &[0, 1, 0, 0, 0],
    &[1, 0, 0, 0, 0],
]);

/// Nine-row diagonal descending from top-left to bottom-right.
pub const DIAGONAL_DOWN: Pattern = Pattern::new(&[
    &[1, 0, 0, 0, 0],
    &[0, 1, 0, 0, 0],
    &[0, 1, 0, 0, 0],
    &[0, 0, 1, 0, 0],
    &[0, 0, 1, 0, 0],
    &[0, 0, 0, 1, 0],
    &[0, 0, 0, 1, 0],
    &[0, 0, 0, 0, 1],
    &[0, 0, 0, 0, 1],
]);

/// A full row of sixteen cells.
pub const STRAIGHT_ROW: Pattern =
    Pattern::new(&[&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]]);
