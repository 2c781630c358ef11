//! The scheduler.
//!
//! # Tick order
//!
//! Every call to [`Model::step`] runs, in this fixed order:
//!
//! 1. Scheduled test rounds (day-interval match, before anything else).
//! 2. The shift-end time warp: once the workday span has elapsed, jump
//!    to the next day's shift start instead of simulating idle hours.
//! 3. Either day-boundary bookkeeping (daily report rollover, per-agent
//!    health/isolation/symptom checks, weekend skip, field reset,
//!    gathering reset, symptom-triggered self-isolation) *or*, on an
//!    ordinary tick, the physical field update: decay, spread, exposure
//!    accumulation.
//! 4. Gathering dispatch.
//! 5. Shift arrivals and departures.
//! 6. Every active agent's step, in stable crew order.
//! 7. Clock advance by exactly one time step.
//!
//! Single-threaded by design: all shared state is touched sequentially
//! within one tick, and every random draw flows through the one seeded
//! RNG, so a run is a pure function of seed + inputs.

use aero_agent::{Agent, StepCtx};
use aero_core::{AgentId, Cell, SECS_PER_DAY, SimClock, SimDate, SimRng};
use aero_epi::disease::DiseaseParams;
use aero_epi::intervention::{Interventions, TestPolicy};
use aero_field::{AirflowParams, CumulativeMatrices, DecayParams, QuantaField};
use aero_grid::{NavGraph, ObstructionGrid};

use crate::config::{CrewSpec, ModelConfig};
use crate::gathering::Gathering;
use crate::report::DailyReport;
use crate::{SimError, SimResult};

/// The whole simulation: building, field, crew, clock, and interventions.
pub struct Model {
    config: ModelConfig,
    graph: NavGraph,
    field: QuantaField,
    accum: CumulativeMatrices,
    clock: SimClock,
    rng: SimRng,
    disease: DiseaseParams,
    interventions: Interventions,
    /// Run-level sampled mask efficacy / compliance, as fractions.
    mask_efficiency: f64,
    mask_compliance: f64,
    isolation_cell: Cell,
    agents: Vec<Agent>,
    gatherings: Vec<Gathering>,
    report: DailyReport,
}

impl Model {
    /// Build a model with the default (SARS-CoV-2) disease parameters.
    pub fn new(
        grid: &ObstructionGrid,
        config: ModelConfig,
        interventions: Interventions,
    ) -> SimResult<Self> {
        let disease = DiseaseParams::covid()?;
        Self::with_disease(grid, config, interventions, disease)
    }

    pub fn with_disease(
        grid: &ObstructionGrid,
        config: ModelConfig,
        interventions: Interventions,
        disease: DiseaseParams,
    ) -> SimResult<Self> {
        config.validate()?;
        interventions.validate()?;
        // Day-boundary and test-round detection compare seconds-of-day for
        // exact equality, so every clock jump must preserve step alignment.
        if let Some(test) = &interventions.test
            && test.time_cost_secs % config.time_step_secs != 0
        {
            return Err(SimError::Config(format!(
                "test time cost {}s must be a multiple of the {}s time step",
                test.time_cost_secs, config.time_step_secs
            )));
        }

        let mut rng = SimRng::new(config.seed);
        // Mask efficacy is one draw per run; compliance is rolled per event.
        let (mask_efficiency, mask_compliance) = match &interventions.mask {
            Some(m) => (m.efficacy_pct.sample(&mut rng) / 100.0, m.compliance_pct / 100.0),
            None => (0.0, 0.0),
        };

        let isolation_cell = config.isolation_cell.unwrap_or(Cell::new(
            (grid.rows() - 1) as u16,
            (grid.cols() - 1) as u16,
        ));
        if !grid.in_bounds(isolation_cell) {
            return Err(SimError::Config(format!(
                "isolation cell {isolation_cell} is outside the {}x{} grid",
                grid.rows(),
                grid.cols()
            )));
        }

        let airflow = AirflowParams {
            ventilation_efficiency: config.ventilation_efficiency,
            cell_size_m: config.cell_size_m,
        };
        let field = QuantaField::new(grid, airflow, DecayParams::default(), config.time_step_secs);
        let clock = SimClock::new(config.start_unix_secs, config.time_step_secs);
        let mut report = DailyReport::new();
        report.begin_day(clock.start_date());

        Ok(Self {
            graph: NavGraph::build(grid),
            field,
            accum: CumulativeMatrices::new(grid.rows(), grid.cols()),
            clock,
            rng,
            disease,
            interventions,
            mask_efficiency,
            mask_compliance,
            isolation_cell,
            agents: Vec::new(),
            gatherings: Vec::new(),
            report,
            config,
        })
    }

    // ── Assembly ──────────────────────────────────────────────────────────

    /// Add one crew of agents.  Vaccination and initial-infection draws
    /// happen here, once per agent, in crew order.
    pub fn add_crew(&mut self, crew: &CrewSpec) -> SimResult<Vec<AgentId>> {
        crew.validate(self.config.time_step_secs)?;
        let start_date = self.clock.start_date();
        let mut ids = Vec::with_capacity(crew.size as usize);
        for _ in 0..crew.size {
            let id = AgentId(self.agents.len() as u32);
            let immunity = match &self.interventions.vaccine {
                Some(v) if self.rng.chance(v.compliance_pct / 100.0) => {
                    v.efficacy_pct.sample(&mut self.rng) / 100.0
                }
                _ => 0.0,
            };
            let mut agent =
                Agent::new(id, crew.tasks.clone(), crew.shift, immunity, immunity > 0.0)?;
            if let Some(marker) = crew.marker {
                agent.marker = marker;
            }
            if let Some(color) = crew.color {
                agent.color = color;
            }
            if let Some(speed) = crew.speed {
                agent.speed = speed;
            }
            if self.rng.chance(self.config.infection_rate) {
                agent.infect(start_date, &self.disease, &mut self.rng);
                self.report.record(start_date);
            }
            self.agents.push(agent);
            ids.push(id);
        }
        Ok(ids)
    }

    pub fn add_gathering(&mut self, gathering: Gathering) -> SimResult<()> {
        if gathering.locations.is_empty() {
            return Err(SimError::Config("gathering has no locations".into()));
        }
        self.gatherings.push(gathering);
        Ok(())
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        let dt = self.config.time_step_secs;

        if let Some(test) = self.interventions.test {
            let at_day_start = self.clock.secs_of_day() == self.clock.start_secs_of_day();
            let days = self.clock.date().days_since(self.clock.start_date());
            if at_day_start && days.rem_euclid(i64::from(test.interval_days)) == 0 {
                self.run_test_round(&test);
            }
        }

        // Shift-end warp: the tick that crosses the workday span jumps to
        // one step before the next day's shift start; the advance at the
        // bottom of this tick lands exactly on it.
        let shift_end = self.clock.start_secs_of_day() + self.config.workhours_per_day * 3_600;
        let sod = self.clock.secs_of_day();
        if (shift_end..shift_end + dt).contains(&sod) {
            let workday = i64::from(self.config.workhours_per_day) * 3_600;
            self.clock.warp(SECS_PER_DAY - workday - i64::from(dt));
        }

        let day_boundary = self.clock.secs_of_day() == self.clock.start_secs_of_day()
            && self.clock.date() != self.clock.start_date();
        if day_boundary {
            self.end_of_day();
        } else {
            self.field.decay();
            self.field.spread();
            self.accum.accumulate_field(&self.field);
        }

        self.process_gatherings();
        self.update_shifts();
        self.step_agents();
        self.clock.advance();
    }

    /// Step until the clock passes `end_unix_secs`.
    pub fn run_until(&mut self, end_unix_secs: i64) {
        while self.clock.now_unix_secs < end_unix_secs {
            self.step();
        }
    }

    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    /// Test every non-isolated agent; a positive (accuracy roll against an
    /// actual carrier) goes straight into isolation.  The round's wall
    /// time is charged to the clock once, not per agent.
    fn run_test_round(&mut self, test: &TestPolicy) {
        let today = self.clock.date();
        let accuracy = test.accuracy_pct / 100.0;
        let isolation_cell = self.isolation_cell;
        let rng = &mut self.rng;
        for agent in &mut self.agents {
            if agent.is_isolating() {
                continue;
            }
            let prior = agent.freeze_for_test();
            if !agent.epi().healthy && rng.chance(accuracy) {
                agent.isolate(test.isolation_days, isolation_cell, today);
            } else {
                agent.resume_after_test(prior);
            }
        }
        self.clock.warp(i64::from(test.time_cost_secs));
    }

    /// Day-boundary bookkeeping; replaces the physical update on this tick.
    fn end_of_day(&mut self) {
        let today = self.clock.date();
        self.report.begin_day(today);

        // Exposure happened before this boundary, so new infections are
        // dated to the previous day.
        let yesterday = SimDate(today.0 - 1);
        let offsite = self.config.offsite_infection_rate;
        {
            let disease = &self.disease;
            let rng = &mut self.rng;
            let report = &mut self.report;
            for agent in &mut self.agents {
                if agent.epi().healthy {
                    if agent.roll_daily_infection(offsite, yesterday, disease, rng) {
                        report.record(yesterday);
                    }
                } else if agent.is_isolating() {
                    agent.check_finish_isolation(today);
                } else if !agent.epi().symptomatic {
                    agent.check_symptom_start(today);
                }
            }
        }

        // Skip non-workdays; the loop is bounded even if the validated
        // workdays range were ever widened.
        let mut skipped = 0;
        while self.clock.date().weekday() >= self.config.workdays_per_week && skipped < 7 {
            self.clock.warp(SECS_PER_DAY);
            self.report.begin_day(self.clock.date());
            skipped += 1;
        }

        self.field.reset();
        for gathering in &mut self.gatherings {
            gathering.reset_day();
        }

        if let Some(iso) = self.interventions.isolation
            && iso.symptom_triggered
        {
            let today = self.clock.date();
            let isolation_cell = self.isolation_cell;
            let rng = &mut self.rng;
            for agent in &mut self.agents {
                let epi = agent.epi();
                if !epi.healthy
                    && epi.symptomatic
                    && !agent.is_isolating()
                    && !epi.isolation_finished
                {
                    let days = iso.duration_days.sample(rng).round() as u32;
                    agent.isolate(days, isolation_cell, today);
                    agent.check_finish_isolation(today);
                }
            }
        }
    }

    /// Fire every due, not-yet-fired gathering and redirect a random
    /// subset of the active crew to it.
    fn process_gatherings(&mut self) {
        let sod = self.clock.secs_of_day();
        for gi in 0..self.gatherings.len() {
            if self.gatherings[gi].happened() || self.gatherings[gi].start_secs_of_day > sod {
                continue;
            }
            self.gatherings[gi].mark_happened();
            let locations = self.gatherings[gi].locations.clone();
            let duration = self.gatherings[gi].duration_ticks;
            let size = self.gatherings[gi].size;

            // Agents already routed home are off-shift in all but position;
            // redirecting them would strand them at the gathering cell.
            let mut attendees: Vec<usize> = (0..self.agents.len())
                .filter(|&i| self.agents[i].is_active() && !self.agents[i].is_leaving())
                .collect();
            self.rng.shuffle(&mut attendees);
            attendees.truncate(size.min(attendees.len()));

            let graph = &self.graph;
            let rng = &mut self.rng;
            for i in attendees {
                self.agents[i].go_to_gathering(graph, &locations, duration, rng);
            }
        }
    }

    /// The scheduler alone flips agents active/inactive, from the shift
    /// window test against the current weekday and time-of-day.
    fn update_shifts(&mut self) {
        let on_workday = self.clock.date().weekday() < self.config.workdays_per_week;
        let sod = self.clock.secs_of_day();
        let graph = &self.graph;
        for agent in &mut self.agents {
            let due = on_workday && agent.shift().contains(sod) && !agent.is_isolating();
            if due {
                if !agent.is_active() {
                    agent.arrive();
                }
            } else if agent.is_active() && !agent.is_leaving() {
                agent.leave(graph);
            }
        }
    }

    fn step_agents(&mut self) {
        let mut ctx = StepCtx {
            graph: &self.graph,
            field: &mut self.field,
            accum: &mut self.accum,
            disease: &self.disease,
            mask_efficiency: self.mask_efficiency,
            mask_compliance: self.mask_compliance,
            time_step_secs: self.config.time_step_secs,
            today: self.clock.date(),
            rng: &mut self.rng,
        };
        for agent in &mut self.agents {
            if agent.is_active() {
                agent.step(&mut ctx);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn field(&self) -> &QuantaField {
        &self.field
    }

    /// The cumulative exposure matrices backing the reporting surface.
    pub fn exposure(&self) -> &CumulativeMatrices {
        &self.accum
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn gatherings(&self) -> &[Gathering] {
        &self.gatherings
    }

    pub fn isolation_cell(&self) -> Cell {
        self.isolation_cell
    }

    pub fn daily_report(&self) -> &DailyReport {
        &self.report
    }

    /// Attack rate as a percentage, with the date/count series behind it.
    pub fn attack_rate(&self) -> (f64, Vec<SimDate>, Vec<u32>) {
        self.report.attack_rate(self.agents.len())
    }

    /// Zone risk heatmap over the whole run, `1 - exp(-k * total_quanta)`.
    pub fn zone_infection_probability(&self) -> Vec<f64> {
        self.accum
            .zone_infection_probability(self.config.zone_risk_rate_per_sec)
    }

    /// Realized risk heatmap from actually-inhaled doses.
    pub fn effective_infection_probability(&self) -> Vec<f64> {
        self.accum.effective_infection_probability()
    }
}
