//! `aero-core` — foundational types for the `aero_abm` indoor-spread simulator.
//!
//! This crate is a dependency of every other `aero-*` crate.  It intentionally
//! has no `aero-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`cell`]   | `Cell` — integer grid coordinate                      |
//! | [`ids`]    | `AgentId`                                             |
//! | [`time`]   | `SimDate`, `SimClock` (calendar-aware stepping)       |
//! | [`rng`]    | `SimRng` (seeded, threaded through all sampling)      |
//! | [`dist`]   | `UniformRange` — validated bounded sampling           |
//! | [`error`]  | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cell;
pub mod dist;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::Cell;
pub use dist::UniformRange;
pub use error::{CoreError, CoreResult};
pub use ids::AgentId;
pub use rng::SimRng;
pub use time::{SECS_PER_DAY, SimClock, SimDate};
