//! Grid coordinates.
//!
//! The original formulation of this model addressed cells by composing
//! string keys at runtime.  Here a cell is a plain `(row, col)` value type
//! with structural equality and hashing, so it can key path caches and
//! index row-major matrices without any parsing.

use std::fmt;

/// A cell on the rectangular building grid.
///
/// `row` grows downward ("below" = `row + 1`), `col` grows rightward
/// ("right" = `col + 1`).  `u16` per axis bounds the grid at 65,535 cells
/// per side — far beyond any building layout this model targets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: u16,
    pub col: u16,
}

impl Cell {
    #[inline]
    pub const fn new(row: u16, col: u16) -> Self {
        Cell { row, col }
    }

    /// Row-major index into a matrix with `cols` columns.
    #[inline(always)]
    pub fn index(self, cols: usize) -> usize {
        self.row as usize * cols + self.col as usize
    }

    /// The cell below (`row + 1`), without bounds checking.
    #[inline]
    pub fn below(self) -> Cell {
        Cell::new(self.row + 1, self.col)
    }

    /// The cell to the right (`col + 1`), without bounds checking.
    #[inline]
    pub fn right(self) -> Cell {
        Cell::new(self.row, self.col + 1)
    }
}

impl From<(u16, u16)> for Cell {
    #[inline]
    fn from((row, col): (u16, u16)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
