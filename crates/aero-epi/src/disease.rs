//! Disease parameter tables.
//!
//! All defaults reproduce the SARS-CoV-2 literature values the model was
//! calibrated against: quanta conversion factor 0.01–0.1, adult inhalation
//! rates 1.38–3.3 m³/h, bimodal droplet size buckets for breathing, a
//! day-since-infection bucketed viral-load table, and a 4.78-fold shedding
//! reduction for vaccinated carriers.  Every stochastic parameter is a
//! validated [`UniformRange`] sampled through the run's explicit RNG.

use aero_core::{CoreResult, SimRng, UniformRange};
use aero_field::CHANNELS;

// ── FaceActivity ──────────────────────────────────────────────────────────────

/// What an agent's face is doing, which scales how many droplets it emits.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaceActivity {
    #[default]
    Breathing,
    Talking,
    Singing,
    Sneezing,
}

// ── Viral load table ──────────────────────────────────────────────────────────

/// One row of the day-bucketed viral-load table: applies on days
/// `from_day <= d < to_day` since infection.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViralLoadBucket {
    pub from_day: u32,
    pub to_day: u32,
    pub load: UniformRange,
}

// ── DiseaseParams ─────────────────────────────────────────────────────────────

/// The full parameter set of the infection model.  Constructed once per
/// run; read-only thereafter.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiseaseParams {
    /// Quanta-per-RNA-copy conversion factor (`ci`).
    pub conversion_factor: UniformRange,
    /// Breathing rate in m³/h; shared by emission and inhalation.
    pub inhalation_rate_m3h: UniformRange,
    /// Droplet count per channel while breathing (cm⁻³).
    pub droplet_count: [f64; CHANNELS],
    /// Droplet volume per channel (cm³).
    pub droplet_volume: [f64; CHANNELS],
    /// Droplet-count multiplier per face activity, indexed by
    /// [`FaceActivity`] discriminant order.
    pub activity_factor: [UniformRange; 4],
    /// Probability per simulated second of a sneeze.
    pub sneeze_prob_per_sec: f64,
    /// Shedding intensity by days since infection; past the last bucket
    /// the carrier is considered recovered.
    pub viral_load: Vec<ViralLoadBucket>,
    /// Multiplier on sampled viral load for vaccinated carriers.
    pub vaccinated_shedding_factor: f64,
    /// Days from infection to symptom onset.
    pub symptom_onset_days: UniformRange,
}

impl DiseaseParams {
    /// Literature-calibrated SARS-CoV-2 defaults.
    pub fn covid() -> CoreResult<Self> {
        let u = UniformRange::new;
        Ok(Self {
            conversion_factor: u(0.01, 0.11)?,
            inhalation_rate_m3h: u(1.38, 3.3)?,
            droplet_count: [0.084, 0.009, 0.003, 0.002],
            droplet_volume: [2.14e-8, 24.42e-8, 179.59e-8, 696.91e-8],
            activity_factor: [
                UniformRange::fixed(1.0)?, // breathing (baseline)
                u(1.5, 3.4)?,              // talking
                u(20.0, 30.0)?,            // singing / loud vocalisation
                u(20.0, 30.0)?,            // sneezing (no better bound known)
            ],
            sneeze_prob_per_sec: 4.3e-6,
            viral_load: vec![
                ViralLoadBucket { from_day: 0, to_day: 1, load: u(1e2, 5e4)? },
                ViralLoadBucket { from_day: 1, to_day: 2, load: u(5e4, 1e7)? },
                ViralLoadBucket { from_day: 2, to_day: 4, load: u(2e7, 2.5e8)? },
                ViralLoadBucket { from_day: 4, to_day: 6, load: u(5e4, 2e7)? },
                ViralLoadBucket { from_day: 6, to_day: 10, load: u(1e2, 1e6 + 1e2)? },
                ViralLoadBucket { from_day: 10, to_day: 14, load: u(1e1, 1e4 + 1e1)? },
            ],
            vaccinated_shedding_factor: 1.0 / 4.78,
            symptom_onset_days: u(2.0, 8.0)?,
        })
    }

    /// Droplet-count multiplier distribution for `activity`.
    #[inline]
    pub fn activity_factor(&self, activity: FaceActivity) -> UniformRange {
        self.activity_factor[activity as usize]
    }

    /// Sample a shedding intensity for a carrier infected `days` ago.
    ///
    /// Returns `None` once `days` falls past the last bucket — the carrier
    /// has cleared the infection.
    pub fn shedding(&self, days: i64, vaccinated: bool, rng: &mut SimRng) -> Option<f64> {
        if days < 0 {
            return None;
        }
        let bucket = self
            .viral_load
            .iter()
            .find(|b| (b.from_day as i64) <= days && days < (b.to_day as i64))?;
        let load = bucket.load.sample(rng);
        Some(if vaccinated {
            load * self.vaccinated_shedding_factor
        } else {
            load
        })
    }

    /// Sample an inhalation rate for one time step, in m³ per step.
    #[inline]
    pub fn inhalation_rate(&self, time_step_secs: u32, rng: &mut SimRng) -> f64 {
        self.inhalation_rate_m3h.sample(rng) * time_step_secs as f64 / 3_600.0
    }

    /// Sample the next face activity for one time step.
    ///
    /// Sneezes are rare events scaled by the step length; otherwise the
    /// face splits 25% singing, then 50/50 talking vs. quiet breathing.
    pub fn sample_face_activity(&self, time_step_secs: u32, rng: &mut SimRng) -> FaceActivity {
        if rng.chance(self.sneeze_prob_per_sec * time_step_secs as f64) {
            FaceActivity::Sneezing
        } else if rng.chance(0.25) {
            FaceActivity::Singing
        } else if rng.chance(0.5) {
            FaceActivity::Talking
        } else {
            FaceActivity::Breathing
        }
    }
}
