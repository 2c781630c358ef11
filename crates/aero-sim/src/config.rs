//! Run configuration and crew specifications.

use aero_agent::{ShiftWindow, Task};
use aero_core::{Cell, SECS_PER_DAY};

use crate::{SimError, SimResult};

/// Top-level run parameters.
///
/// Calendar arithmetic relies on seconds-of-day equality, so the time
/// step must divide both the day and the workday span; [`validate`]
/// (called by `Model::new`) enforces this along with the value ranges.
///
/// [`validate`]: ModelConfig::validate
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    /// Unix timestamp at which the run starts.  Its time-of-day anchors
    /// day-boundary detection for the whole run.
    pub start_unix_secs: i64,
    /// Simulated seconds per tick.
    pub time_step_secs: u32,
    /// Workdays per week, Monday-anchored (5 = Mon–Fri).
    pub workdays_per_week: u8,
    /// Simulated work hours per day; the scheduler warps over the rest.
    pub workhours_per_day: u32,
    /// Fresh-air exchange intensity; 0 disables quanta spread entirely.
    pub ventilation_efficiency: f64,
    /// Physical edge length of one grid cell, metres.
    pub cell_size_m: f64,
    /// Probability that a freshly assembled agent starts infected.
    pub infection_rate: f64,
    /// Daily background (off-site) infection probability, applied at each
    /// day boundary scaled by `1 - immunity`.
    pub offsite_infection_rate: f64,
    /// Where isolated agents are parked; defaults to the bottom-right
    /// grid cell.
    pub isolation_cell: Option<Cell>,
    /// Rate constant of the zone-risk heatmap, per second of exposure.
    pub zone_risk_rate_per_sec: f64,
    /// RNG seed; two runs with identical seed and inputs are identical.
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            // Monday 2022-01-03 00:00 UTC.
            start_unix_secs: 1_641_168_000,
            time_step_secs: 60,
            workdays_per_week: 5,
            workhours_per_day: 8,
            ventilation_efficiency: 1.0,
            cell_size_m: 1.5,
            infection_rate: 0.0,
            offsite_infection_rate: 0.0,
            isolation_cell: None,
            zone_risk_rate_per_sec: 2.0 / 3_600.0,
            seed: 0,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> SimResult<()> {
        let err = |msg: String| Err(SimError::Config(msg));
        let dt = self.time_step_secs;
        if dt == 0 {
            return err("time step must be at least 1 second".into());
        }
        if SECS_PER_DAY % i64::from(dt) != 0 {
            return err(format!("time step {dt}s must divide the 86400s day"));
        }
        if !(1..=7).contains(&self.workdays_per_week) {
            return err(format!(
                "workdays per week must be in 1..=7, got {}",
                self.workdays_per_week
            ));
        }
        if !(1..=24).contains(&self.workhours_per_day) {
            return err(format!(
                "work hours per day must be in 1..=24, got {}",
                self.workhours_per_day
            ));
        }
        let workday_secs = self.workhours_per_day * 3_600;
        if workday_secs % dt != 0 {
            return err(format!("time step {dt}s must divide the {workday_secs}s workday"));
        }
        let start_sod = self.start_unix_secs.rem_euclid(SECS_PER_DAY) as u32;
        if start_sod + workday_secs > SECS_PER_DAY as u32 {
            return err("workday must not cross midnight".into());
        }
        for (name, v) in [
            ("initial infection rate", self.infection_rate),
            ("off-site infection rate", self.offsite_infection_rate),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return err(format!("{name} must be in 0..=1, got {v}"));
            }
        }
        if !self.ventilation_efficiency.is_finite() || self.ventilation_efficiency < 0.0 {
            return err(format!(
                "ventilation efficiency must be finite and non-negative, got {}",
                self.ventilation_efficiency
            ));
        }
        if !self.cell_size_m.is_finite() || self.cell_size_m <= 0.0 {
            return err(format!("cell size must be positive, got {}", self.cell_size_m));
        }
        if !self.zone_risk_rate_per_sec.is_finite() || self.zone_risk_rate_per_sec < 0.0 {
            return err(format!(
                "zone risk rate must be non-negative, got {}",
                self.zone_risk_rate_per_sec
            ));
        }
        Ok(())
    }
}

/// One crew: `size` identical agents sharing a task list and shift.
/// Marker, color, and speed are optional per-crew overrides.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrewSpec {
    pub size: u32,
    pub tasks: Vec<Task>,
    pub shift: ShiftWindow,
    pub marker: Option<char>,
    pub color: Option<char>,
    pub speed: Option<f32>,
}

impl CrewSpec {
    pub fn new(size: u32, tasks: Vec<Task>, shift: ShiftWindow) -> Self {
        Self { size, tasks, shift, marker: None, color: None, speed: None }
    }

    /// Check the crew against the model's tick length: the shift must fit
    /// inside one day and align to whole time steps.
    pub(crate) fn validate(&self, time_step_secs: u32) -> SimResult<()> {
        if self.tasks.is_empty() {
            return Err(SimError::Config("crew has an empty task list".into()));
        }
        let shift = self.shift;
        if i64::from(shift.end_secs()) > SECS_PER_DAY {
            return Err(SimError::Config(format!(
                "shift ends at {}s, past the end of the day",
                shift.end_secs()
            )));
        }
        if shift.start_offset_secs % time_step_secs != 0
            || shift.duration_secs % time_step_secs != 0
        {
            return Err(SimError::Config(format!(
                "shift offsets ({}s + {}s) must be multiples of the {time_step_secs}s time step",
                shift.start_offset_secs, shift.duration_secs
            )));
        }
        Ok(())
    }
}
