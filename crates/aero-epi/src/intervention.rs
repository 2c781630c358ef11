//! Intervention configuration.
//!
//! The original formulation passed interventions as a loosely-shaped
//! dictionary and probed key presence at runtime; here each intervention
//! is an explicit tagged record validated once at model construction.
//! `None` disables the corresponding intervention.

use aero_core::{CoreError, CoreResult, UniformRange};

// ── Policies ──────────────────────────────────────────────────────────────────

/// Mask wearing: efficacy is sampled once per run, compliance is drawn
/// per emission/inhalation event.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskPolicy {
    /// Filtration efficacy in percent (sampled once at run start).
    pub efficacy_pct: UniformRange,
    /// Share of events at which the mask is actually worn, percent.
    pub compliance_pct: f64,
}

/// Periodic testing of the whole non-isolated crew.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestPolicy {
    /// Days between test rounds.
    pub interval_days: u32,
    /// Probability (percent) that a carrier tests positive.
    pub accuracy_pct: f64,
    /// Isolation length imposed on a positive test, days.
    pub isolation_days: u32,
    /// Wall-clock time one test round consumes, charged to the simulation
    /// clock once per round (not per agent).
    pub time_cost_secs: u32,
}

/// Isolation behaviour for symptomatic carriers.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsolationPolicy {
    /// Days of self-isolation, sampled per event.
    pub duration_days: UniformRange,
    /// Whether symptom onset by itself sends an agent into isolation at
    /// the next day boundary.
    pub symptom_triggered: bool,
}

/// Vaccination: immunity is drawn once per agent at crew assembly.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VaccinePolicy {
    /// Immunity granted when vaccinated, percent.
    pub efficacy_pct: UniformRange,
    /// Share of agents that take the vaccine, percent.
    pub compliance_pct: f64,
}

// ── Interventions ─────────────────────────────────────────────────────────────

/// The enabled intervention set.  Absent entries disable the intervention.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interventions {
    pub mask: Option<MaskPolicy>,
    pub test: Option<TestPolicy>,
    pub isolation: Option<IsolationPolicy>,
    pub vaccine: Option<VaccinePolicy>,
}

impl Interventions {
    /// No interventions at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Validate percentages and intervals; called at model construction.
    pub fn validate(&self) -> CoreResult<()> {
        fn pct(name: &str, v: f64) -> CoreResult<()> {
            if (0.0..=100.0).contains(&v) {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be in 0..=100, got {v}")))
            }
        }
        if let Some(mask) = &self.mask {
            pct("mask compliance", mask.compliance_pct)?;
            pct("mask efficacy upper bound", mask.efficacy_pct.hi())?;
        }
        if let Some(test) = &self.test {
            pct("test accuracy", test.accuracy_pct)?;
            if test.interval_days == 0 {
                return Err(CoreError::Config("test interval must be >= 1 day".into()));
            }
        }
        if let Some(vaccine) = &self.vaccine {
            pct("vaccine compliance", vaccine.compliance_pct)?;
            pct("vaccine efficacy upper bound", vaccine.efficacy_pct.hi())?;
        }
        Ok(())
    }
}
