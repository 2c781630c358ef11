//! The agent state machine.
//!
//! # States
//!
//! - `Traveling` — advancing along a cached shortest path by `speed`
//!   cells per tick.
//! - `Staying` — counting down a stay duration at the current cell; at
//!   zero the agent draws its next task.
//! - `Isolating` — parked at the designated isolation cell, inactive,
//!   until the day-boundary check releases it.
//! - `Testing` — transient freeze while a test round runs.
//!
//! Every physical tick an active infected agent emits quanta into its
//! current cell; an active healthy agent inhales from it and accumulates
//! dose.  The dose is rolled into an infection chance at the next day
//! boundary, then reset.

use aero_core::{AgentId, Cell, CoreError, CoreResult, SimDate, SimRng};
use aero_epi::disease::DiseaseParams;
use aero_epi::infection::{emitted_quanta, infection_probability, inhaled_dose, mask_attenuation};
use aero_field::{CumulativeMatrices, QuantaField};
use aero_grid::{NavGraph, PathCache};

use crate::task::{ShiftWindow, Task};

// ── TaskState ─────────────────────────────────────────────────────────────────

/// What the agent is currently doing.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskState {
    Traveling,
    Staying,
    Isolating,
    Testing,
}

// ── EpidemicState ─────────────────────────────────────────────────────────────

/// Per-agent health state, kept as a plain value object separate from the
/// movement machinery.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpidemicState {
    pub healthy: bool,
    pub symptomatic: bool,
    /// Immunity fraction in `[0, 1]`; scales every infection roll.
    pub immunity: f64,
    pub vaccinated: bool,
    /// Most recent infection date, if ever infected.
    pub infection_date: Option<SimDate>,
    /// Every infection date over the run, in order.
    pub infection_history: Vec<SimDate>,
    /// Date past which the current infection turns symptomatic.
    pub symptom_onset: Option<SimDate>,
    /// Quanta inhaled since the last day-boundary infection roll.
    pub inhaled: f64,
    /// Start date of the current isolation, if any.
    pub isolation_started: Option<SimDate>,
    pub isolation_days: u32,
    pub isolation_finished: bool,
}

impl EpidemicState {
    pub fn new(immunity: f64, vaccinated: bool) -> Self {
        Self {
            healthy: true,
            symptomatic: false,
            immunity,
            vaccinated,
            infection_date: None,
            infection_history: Vec::new(),
            symptom_onset: None,
            inhaled: 0.0,
            isolation_started: None,
            isolation_days: 0,
            isolation_finished: false,
        }
    }
}

// ── StepCtx ───────────────────────────────────────────────────────────────────

/// Shared state an agent touches during one tick, borrowed from the model
/// field-by-field so agents never hold the whole scheduler.
pub struct StepCtx<'a> {
    pub graph: &'a NavGraph,
    pub field: &'a mut QuantaField,
    pub accum: &'a mut CumulativeMatrices,
    pub disease: &'a DiseaseParams,
    /// Run-level sampled mask efficacy, as a fraction.
    pub mask_efficiency: f64,
    /// Per-event mask compliance, as a fraction.
    pub mask_compliance: f64,
    pub time_step_secs: u32,
    pub today: SimDate,
    pub rng: &'a mut SimRng,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One mobile entity: position, task list, shift, cached paths, and
/// epidemic state.  Created once at crew assembly.
pub struct Agent {
    id: AgentId,
    cell: Cell,
    tasks: Vec<Task>,
    shift: ShiftWindow,
    /// Cells advanced per tick while traveling.
    pub speed: f32,
    /// Display passthroughs for external renderers; unused by the engine.
    pub marker: char,
    pub color: char,

    state: TaskState,
    active: bool,
    is_leaving: bool,
    stay_remaining: u32,
    /// Pending gathering stay, consumed (once) on arrival.
    gathering_remaining: u32,
    path: Vec<Cell>,
    path_pos: f32,
    cache: PathCache,

    epi: EpidemicState,
}

impl Agent {
    /// Create an agent parked (inactive) at its primary task location.
    pub fn new(
        id: AgentId,
        tasks: Vec<Task>,
        shift: ShiftWindow,
        immunity: f64,
        vaccinated: bool,
    ) -> CoreResult<Self> {
        let Some(primary) = tasks.first() else {
            return Err(CoreError::Config(format!("agent {id} has an empty task list")));
        };
        Ok(Self {
            id,
            cell: primary.location,
            tasks,
            shift,
            speed: 1.0,
            marker: 'o',
            color: 'g',
            state: TaskState::Staying,
            active: false,
            is_leaving: false,
            stay_remaining: 0,
            gathering_remaining: 0,
            path: Vec::new(),
            path_pos: 0.0,
            cache: PathCache::new(),
            epi: EpidemicState::new(immunity, vaccinated),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn shift(&self) -> ShiftWindow {
        self.shift
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_leaving(&self) -> bool {
        self.is_leaving
    }

    pub fn is_isolating(&self) -> bool {
        self.state == TaskState::Isolating
    }

    pub fn epi(&self) -> &EpidemicState {
        &self.epi
    }

    pub fn epi_mut(&mut self) -> &mut EpidemicState {
        &mut self.epi
    }

    // ── Scheduler-driven transitions ──────────────────────────────────────

    /// Shift start: place the agent at its primary station and activate it.
    pub fn arrive(&mut self) {
        let primary = self.tasks[0];
        self.is_leaving = false;
        self.active = true;
        self.cell = primary.location;
        self.stay_remaining = primary.duration_ticks;
        self.state = TaskState::Staying;
        self.path.clear();
        self.path_pos = 0.0;
    }

    /// Shift end: route back to the primary station; on arrival the agent
    /// deactivates until its next shift.
    pub fn leave(&mut self, graph: &NavGraph) {
        self.is_leaving = true;
        self.state = TaskState::Traveling;
        let home = self.tasks[0].location;
        match self.cache.path(graph, self.cell, home).map(<[Cell]>::to_vec) {
            Ok(p) => {
                self.path = p;
                self.path_pos = 0.0;
            }
            // No route home: nothing left to walk, deactivate in place.
            Err(_) => {
                self.active = false;
                self.is_leaving = false;
                self.state = TaskState::Staying;
            }
        }
    }

    /// Redirect to a random cell of the gathering's location group for
    /// `duration_ticks`.  An unreachable gathering is skipped.
    pub fn go_to_gathering(
        &mut self,
        graph: &NavGraph,
        locations: &[Cell],
        duration_ticks: u32,
        rng: &mut SimRng,
    ) {
        let Some(&dest) = rng.choose(locations) else {
            return;
        };
        if let Ok(p) = self.cache.path(graph, self.cell, dest).map(<[Cell]>::to_vec) {
            self.gathering_remaining = duration_ticks;
            self.path = p;
            self.path_pos = 0.0;
            self.state = TaskState::Traveling;
        }
    }

    /// Park the agent at the isolation cell for `duration_days`.
    pub fn isolate(&mut self, duration_days: u32, isolation_cell: Cell, today: SimDate) {
        self.cell = isolation_cell;
        self.state = TaskState::Isolating;
        self.epi.isolation_started = Some(today);
        self.epi.isolation_days = duration_days;
        self.active = false;
    }

    /// Freeze the agent for a test round; returns the state to restore on
    /// a negative result.
    pub fn freeze_for_test(&mut self) -> TaskState {
        std::mem::replace(&mut self.state, TaskState::Testing)
    }

    /// Restore the pre-test state after a negative result.
    pub fn resume_after_test(&mut self, prior: TaskState) {
        self.state = prior;
    }

    // ── Per-tick step ─────────────────────────────────────────────────────

    /// One physical tick: movement/stay bookkeeping, then emission or
    /// inhalation at the (possibly new) current cell.
    pub fn step(&mut self, ctx: &mut StepCtx<'_>) {
        match self.state {
            TaskState::Isolating | TaskState::Testing => return,
            TaskState::Staying => {
                if self.stay_remaining > 0 {
                    self.stay_remaining -= 1;
                } else if self.is_leaving {
                    self.active = false;
                    self.is_leaving = false;
                } else {
                    self.start_new_task(ctx.graph, ctx.rng);
                }
            }
            TaskState::Traveling => {
                if self.is_arrived() {
                    if self.is_leaving {
                        self.active = false;
                        self.is_leaving = false;
                        self.state = TaskState::Staying;
                    } else {
                        self.state = TaskState::Staying;
                        self.stay_remaining = self.stay_duration_for(self.cell);
                    }
                } else {
                    self.walk();
                }
            }
        }
        if !self.active {
            return;
        }
        if self.epi.healthy {
            self.inhale(ctx);
        } else {
            self.emit(ctx);
        }
    }

    /// Cumulative-probability draw over the task list.  Falls back to
    /// staying in place when the draw exceeds all weights, when the drawn
    /// destination equals the current cell, or when it is unreachable.
    fn start_new_task(&mut self, graph: &NavGraph, rng: &mut SimRng) {
        let r: f64 = rng.random();
        let mut cum = 0.0;
        let mut drawn = None;
        for t in &self.tasks {
            cum += t.probability;
            if r < cum {
                drawn = Some(t.location);
                break;
            }
        }
        let dest = match drawn {
            Some(d) if d != self.cell => d,
            _ => return self.stay_here(),
        };
        match self.cache.path(graph, self.cell, dest).map(<[Cell]>::to_vec) {
            Ok(p) => {
                self.path = p;
                self.path_pos = 0.0;
                self.state = TaskState::Traveling;
            }
            Err(_) => self.stay_here(),
        }
    }

    fn stay_here(&mut self) {
        self.state = TaskState::Staying;
        self.stay_remaining = self.stay_duration_for(self.cell);
    }

    /// Advance along the cached path by `speed` cells, clamped at the end.
    fn walk(&mut self) {
        if self.path.is_empty() {
            self.path.push(self.cell);
        }
        let last = (self.path.len() - 1) as f32;
        self.path_pos = (self.path_pos + self.speed).min(last);
        self.cell = self.path[self.path_pos as usize];
    }

    /// Whether the agent sits on the final cell of its assigned path.
    fn is_arrived(&self) -> bool {
        self.path.last().is_none_or(|&end| end == self.cell)
    }

    /// Stay duration at `cell`: a pending gathering duration takes
    /// priority (and is consumed); otherwise the matching task's duration,
    /// or 0 if no task lives there.
    fn stay_duration_for(&mut self, cell: Cell) -> u32 {
        if self.gathering_remaining > 0 {
            return std::mem::take(&mut self.gathering_remaining);
        }
        self.tasks
            .iter()
            .find(|t| t.location == cell)
            .map_or(0, |t| t.duration_ticks)
    }

    // ── Emission / inhalation ─────────────────────────────────────────────

    fn emit(&mut self, ctx: &mut StepCtx<'_>) {
        let Some(infected_on) = self.epi.infection_date else {
            return;
        };
        let days = ctx.today.days_since(infected_on);
        let Some(load) = ctx.disease.shedding(days, self.epi.vaccinated, ctx.rng) else {
            // Past the last viral-load bucket: the infection has cleared.
            self.recover();
            return;
        };
        let activity = ctx.disease.sample_face_activity(ctx.time_step_secs, ctx.rng);
        let ir = ctx.disease.inhalation_rate(ctx.time_step_secs, ctx.rng);
        let att = mask_attenuation(ctx.mask_efficiency, ctx.mask_compliance, ctx.rng);
        let quanta = emitted_quanta(ctx.disease, load, activity, ir, att, ctx.rng);
        ctx.field.add_quanta(self.cell, quanta);
    }

    fn inhale(&mut self, ctx: &mut StepCtx<'_>) {
        let concentration = ctx.field.total_at(self.cell);
        let ir = ctx.disease.inhalation_rate(ctx.time_step_secs, ctx.rng);
        let att = mask_attenuation(ctx.mask_efficiency, ctx.mask_compliance, ctx.rng);
        let dose = inhaled_dose(ir, concentration, att);
        self.epi.inhaled += dose;
        if dose > 0.0 {
            ctx.accum.record_inhaled(self.cell, dose);
        }
    }

    // ── Day-boundary health transitions ───────────────────────────────────

    /// Mark the agent infected as of `date` and sample its symptom onset.
    pub fn infect(&mut self, date: SimDate, disease: &DiseaseParams, rng: &mut SimRng) {
        self.epi.healthy = false;
        self.epi.infection_date = Some(date);
        self.epi.infection_history.push(date);
        let onset_days = disease.symptom_onset_days.sample(rng).ceil() as i64;
        self.epi.symptom_onset = Some(SimDate(date.0 + onset_days));
        self.epi.isolation_finished = false;
        self.color = 'r';
    }

    fn recover(&mut self) {
        self.epi.healthy = true;
        self.epi.symptomatic = false;
        self.epi.symptom_onset = None;
        self.color = 'g';
    }

    /// Roll the accumulated dose (and the off-site background rate) into
    /// an infection chance, both scaled by `1 - immunity`.  The dose
    /// resets regardless of outcome.  Returns `true` on a new infection,
    /// recorded as of `infection_on` (the previous day — exposure happened
    /// before this boundary).
    pub fn roll_daily_infection(
        &mut self,
        offsite_rate: f64,
        infection_on: SimDate,
        disease: &DiseaseParams,
        rng: &mut SimRng,
    ) -> bool {
        let dose = std::mem::take(&mut self.epi.inhaled);
        let susceptibility = 1.0 - self.epi.immunity;
        if rng.chance(infection_probability(dose) * susceptibility)
            || rng.chance(offsite_rate * susceptibility)
        {
            self.infect(infection_on, disease, rng);
            return true;
        }
        false
    }

    /// Flip symptomatic once the sampled onset date has been reached.
    pub fn check_symptom_start(&mut self, today: SimDate) {
        if self.epi.symptomatic {
            return;
        }
        if let Some(onset) = self.epi.symptom_onset
            && today.days_since(onset) >= 0
        {
            self.epi.symptomatic = true;
        }
    }

    /// Release the agent from isolation once its sampled duration has
    /// elapsed; it re-arrives at its next shift start.
    pub fn check_finish_isolation(&mut self, today: SimDate) {
        if let Some(started) = self.epi.isolation_started
            && today.days_since(started) >= self.epi.isolation_days as i64
        {
            self.epi.isolation_finished = true;
            self.state = TaskState::Traveling;
        }
    }
}
