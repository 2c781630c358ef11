//! `aero-epi` — the stochastic infection model.
//!
//! Stateless formulas and parameter tables for airborne-quanta emission,
//! inhalation dosing, and Wells-Riley infection probability, plus the
//! tagged intervention records (mask / test / isolation / vaccine).
//!
//! | Module           | Contents                                         |
//! |------------------|--------------------------------------------------|
//! | [`disease`]      | `DiseaseParams`, `FaceActivity`, viral-load table |
//! | [`infection`]    | emission / inhalation / Wells-Riley formulas      |
//! | [`intervention`] | `Interventions` and the four policy records       |

pub mod disease;
pub mod infection;
pub mod intervention;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use disease::{DiseaseParams, FaceActivity, ViralLoadBucket};
pub use infection::{emitted_quanta, infection_probability, inhaled_dose, mask_attenuation};
pub use intervention::{
    Interventions, IsolationPolicy, MaskPolicy, TestPolicy, VaccinePolicy,
};
