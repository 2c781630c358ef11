//! Grid-subsystem error type.

use thiserror::Error;

use aero_core::Cell;

/// Errors produced by `aero-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("no path from {from} to {to}")]
    NoPath { from: Cell, to: Cell },

    #[error("cell {0} is not on the navigation graph")]
    NotInGraph(Cell),

    #[error("obstruction code {code} at {cell} out of range (expected 0..=4)")]
    BadCode { cell: Cell, code: u8 },

    #[error("layout must be rectangular and non-empty")]
    MalformedLayout,
}

pub type GridResult<T> = Result<T, GridError>;
