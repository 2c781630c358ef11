//! Stateless Wells-Riley emission / inhalation / infection formulas.
//!
//! Kept free of agent or scheduler state so every formula is unit-testable
//! in isolation; callers supply sampled inputs and an RNG handle.

use aero_core::SimRng;
use aero_field::CHANNELS;

use crate::disease::{DiseaseParams, FaceActivity};

/// Effective mask attenuation for one event.
///
/// The compliance draw decides whether the mask is worn at all this event;
/// if worn, the model-level sampled efficacy applies in full.
#[inline]
pub fn mask_attenuation(efficiency: f64, compliance: f64, rng: &mut SimRng) -> f64 {
    if rng.chance(compliance) { efficiency } else { 0.0 }
}

/// Quanta emitted into the carrier's current cell for one time step, per
/// droplet-size channel.
///
/// `quanta[ch] = viral_load · ci · IR · (N[ch] · activity_factor) · V[ch]
///               · (1 - mask_attenuation)`
pub fn emitted_quanta(
    disease: &DiseaseParams,
    viral_load: f64,
    activity: FaceActivity,
    inhalation_rate_m3: f64,
    mask_attenuation: f64,
    rng: &mut SimRng,
) -> [f64; CHANNELS] {
    let ci = disease.conversion_factor.sample(rng);
    let activity_factor = disease.activity_factor(activity).sample(rng);
    let scale = viral_load * ci * inhalation_rate_m3 * activity_factor * (1.0 - mask_attenuation);
    std::array::from_fn(|ch| scale * disease.droplet_count[ch] * disease.droplet_volume[ch])
}

/// Dose inhaled from a cell concentration over one time step.
#[inline]
pub fn inhaled_dose(inhalation_rate_m3: f64, cell_quanta: f64, mask_attenuation: f64) -> f64 {
    inhalation_rate_m3 * cell_quanta * (1.0 - mask_attenuation)
}

/// Wells-Riley dose-response: probability of infection after inhaling
/// `dose` quanta.  Always in `[0, 1)` for finite non-negative doses.
#[inline]
pub fn infection_probability(dose: f64) -> f64 {
    1.0 - (-dose.max(0.0)).exp()
}
