//! Model-level errors.

use aero_core::CoreError;
use aero_grid::GridError;

/// Errors surfaced while building or configuring a model.
///
/// Stepping itself is infallible: unreachable destinations are handled
/// inside the agent state machine (fall back to staying in place), and
/// every sampled value comes from a bounded support validated at
/// construction.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
