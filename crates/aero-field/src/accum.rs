//! Cumulative exposure matrices.
//!
//! Three monotonically non-decreasing per-cell accumulators persist for
//! the whole run and back the reporting surface:
//!
//! - `total_quanta` — running sum of the field over time, accumulated once
//!   per physical tick after decay + spread.
//! - `total_inhaled` — quanta actually inhaled by healthy agents per cell.
//! - `infection` — expected-infection accumulator,
//!   `Σ 1 - exp(-dose_increment)`.
//!
//! The derived probability matrices are pure functions of these and safe
//! to compute on demand.

use aero_core::Cell;

use crate::field::QuantaField;

/// Per-cell exposure accumulators for the whole run.
#[derive(Clone, Debug)]
pub struct CumulativeMatrices {
    rows: usize,
    cols: usize,
    total_quanta: Vec<f64>,
    total_inhaled: Vec<f64>,
    infection: Vec<f64>,
}

impl CumulativeMatrices {
    pub fn new(rows: usize, cols: usize) -> Self {
        let n = rows * cols;
        Self {
            rows,
            cols,
            total_quanta: vec![0.0; n],
            total_inhaled: vec![0.0; n],
            infection: vec![0.0; n],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    // ── Accumulation ──────────────────────────────────────────────────────

    /// Add the field's current all-channel totals into `total_quanta`.
    pub fn accumulate_field(&mut self, field: &QuantaField) {
        debug_assert_eq!(field.rows() * field.cols(), self.total_quanta.len());
        for (acc, v) in self.total_quanta.iter_mut().zip(field.total_grid()) {
            *acc += v;
        }
    }

    /// Record one inhalation event of `dose` quanta at `cell`.
    pub fn record_inhaled(&mut self, cell: Cell, dose: f64) {
        let i = cell.index(self.cols);
        self.total_inhaled[i] += dose;
        self.infection[i] += 1.0 - (-dose).exp();
    }

    // ── Raw matrices ──────────────────────────────────────────────────────

    pub fn total_quanta(&self) -> &[f64] {
        &self.total_quanta
    }

    pub fn total_inhaled(&self) -> &[f64] {
        &self.total_inhaled
    }

    pub fn infection(&self) -> &[f64] {
        &self.infection
    }

    #[inline]
    pub fn total_quanta_at(&self, cell: Cell) -> f64 {
        self.total_quanta[cell.index(self.cols)]
    }

    #[inline]
    pub fn total_inhaled_at(&self, cell: Cell) -> f64 {
        self.total_inhaled[cell.index(self.cols)]
    }

    // ── Derived probability matrices ──────────────────────────────────────

    /// Zone risk heatmap: `1 - exp(-k * total_quanta)` per cell.
    ///
    /// `k` folds the presumed occupant inhalation rate into the exposure
    /// window; every value lies in `[0, 1)`.
    pub fn zone_infection_probability(&self, k: f64) -> Vec<f64> {
        self.total_quanta
            .iter()
            .map(|&q| 1.0 - (-k * q).exp())
            .collect()
    }

    /// Realized risk heatmap from actually-inhaled doses:
    /// `1 - exp(-total_inhaled)` per cell.
    pub fn effective_infection_probability(&self) -> Vec<f64> {
        self.total_inhaled
            .iter()
            .map(|&d| 1.0 - (-d).exp())
            .collect()
    }
}
