//! `aero-field` — the airborne quanta field.
//!
//! Owns the 4-channel quanta matrix over the building grid and the
//! cumulative exposure matrices derived from it.
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`field`] | `QuantaField` — decay + four-directional spread           |
//! | [`accum`] | `CumulativeMatrices` — running exposure/infection sums    |

pub mod accum;
pub mod field;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use accum::CumulativeMatrices;
pub use field::{AirflowParams, CHANNELS, DecayParams, QuantaField};
