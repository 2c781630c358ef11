//! `aero-agent` — the per-entity task/state machine.
//!
//! An [`Agent`] owns its position, weighted task list, shift window,
//! cached paths, and epidemic state.  Movement runs over the shared
//! navigation graph; emission and inhalation run against the shared
//! quanta field through a [`StepCtx`] handed in by the scheduler each
//! tick.  The scheduler alone flips agents active/inactive via
//! [`Agent::arrive`] / [`Agent::leave`].
//!
//! | Module    | Contents                                            |
//! |-----------|-----------------------------------------------------|
//! | [`task`]  | `Task`, `ShiftWindow`                               |
//! | [`agent`] | `Agent`, `EpidemicState`, `TaskState`, `StepCtx`    |

pub mod agent;
pub mod task;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Agent, EpidemicState, StepCtx, TaskState};
pub use task::{ShiftWindow, Task};
