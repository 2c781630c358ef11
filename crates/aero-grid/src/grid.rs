//! The coded obstruction grid.
//!
//! Each cell carries one small integer describing the walls on its lower
//! and right faces, or marking the whole cell as a solid block:
//!
//! | Code | Meaning                                  |
//! |------|------------------------------------------|
//! | 0    | open — no wall below or right            |
//! | 1    | wall below the cell                      |
//! | 2    | wall right of the cell                   |
//! | 3    | walls below and right                    |
//! | 4    | solid block — removed from the graph     |
//!
//! Out-of-range codes are a configuration error and are rejected at load,
//! not silently treated as open at runtime.

use aero_core::Cell;

use crate::{GridError, GridResult};

/// Obstruction code constants.
pub mod code {
    pub const OPEN: u8 = 0;
    pub const WALL_BELOW: u8 = 1;
    pub const WALL_RIGHT: u8 = 2;
    pub const WALL_BOTH: u8 = 3;
    pub const SOLID: u8 = 4;
}

/// An immutable rectangular grid of obstruction codes.
#[derive(Clone, Debug)]
pub struct ObstructionGrid {
    rows: usize,
    cols: usize,
    codes: Vec<u8>, // row-major
}

impl ObstructionGrid {
    /// Build a grid from row-major nested rows, validating shape and codes.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> GridResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if height == 0 || width == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(GridError::MalformedLayout);
        }
        let mut codes = Vec::with_capacity(height * width);
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v > code::SOLID {
                    return Err(GridError::BadCode {
                        cell: Cell::new(r as u16, c as u16),
                        code: v,
                    });
                }
                codes.push(v);
            }
        }
        Ok(Self { rows: height, cols: width, codes })
    }

    /// An all-open grid (every code 0).  Handy for tests and open-plan layouts.
    pub fn open(rows: usize, cols: usize) -> GridResult<Self> {
        Self::from_rows(vec![vec![code::OPEN; cols]; rows])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (cell.row as usize) < self.rows && (cell.col as usize) < self.cols
    }

    /// Obstruction code at `cell`.
    ///
    /// # Panics
    /// Panics if `cell` is out of bounds; callers iterate grid dimensions.
    #[inline]
    pub fn code(&self, cell: Cell) -> u8 {
        self.codes[cell.index(self.cols)]
    }

    #[inline]
    pub fn code_at(&self, row: usize, col: usize) -> u8 {
        self.codes[row * self.cols + col]
    }

    /// `true` if a wall closes the face between `cell` and the cell below it.
    #[inline]
    pub fn blocks_below(&self, cell: Cell) -> bool {
        matches!(self.code(cell), code::WALL_BELOW | code::WALL_BOTH)
    }

    /// `true` if a wall closes the face between `cell` and the cell right of it.
    #[inline]
    pub fn blocks_right(&self, cell: Cell) -> bool {
        matches!(self.code(cell), code::WALL_RIGHT | code::WALL_BOTH)
    }

    #[inline]
    pub fn is_solid(&self, cell: Cell) -> bool {
        self.code(cell) == code::SOLID
    }

    /// Iterator over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).map(move |c| Cell::new(r as u16, c as u16))
        })
    }
}
