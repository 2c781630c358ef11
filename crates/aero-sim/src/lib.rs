//! `aero-sim` — the top-level simulation model.
//!
//! [`Model`] owns the navigation graph, the quanta field, the crew, and
//! the clock, and advances them together one fixed time step at a time.
//! Each tick it runs, in order: scheduled test rounds, the shift-end time
//! warp, either day-boundary bookkeeping or the physical field update,
//! gathering dispatch, shift arrivals/departures, and every active
//! agent's step.
//!
//! | Module        | Contents                                        |
//! |---------------|-------------------------------------------------|
//! | [`config`]    | `ModelConfig`, `CrewSpec`                       |
//! | [`model`]     | `Model` — the scheduler itself                  |
//! | [`gathering`] | `Gathering`                                     |
//! | [`report`]    | `DailyReport`                                   |
//! | [`error`]     | `SimError`, `SimResult`                         |

pub mod config;
pub mod error;
pub mod gathering;
pub mod model;
pub mod report;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CrewSpec, ModelConfig};
pub use error::{SimError, SimResult};
pub use gathering::Gathering;
pub use model::Model;
pub use report::DailyReport;
