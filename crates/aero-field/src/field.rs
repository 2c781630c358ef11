//! The 4-channel quanta matrix and its per-step update.
//!
//! # Update model
//!
//! Each non-boundary tick applies, in order:
//!
//! 1. `decay()` — per-channel multiplication by
//!    `inactivation^dt * settling[ch]^dt`.  Both rates are
//!    pre-exponentiated by the time-step length at construction, so one
//!    call is always exactly one step's decay regardless of granularity.
//! 2. `spread()` — a Jacobi-style nearest-neighbour exchange.  Four
//!    directional outflows are computed from the frozen pre-spread values
//!    (`outflow_dir = q * coefficient_dir`), then applied as
//!    cell-to-neighbour transfers.
//!
//! The directional coefficients are static per cell, derived once from
//! ventilation efficiency, grid cell size, and the obstruction codes: a
//! wall on a face zeroes the coefficient through that face.  Grid edges
//! are *open* boundaries — outflow through an unwalled edge face is lost,
//! not reflected, while inflow only ever comes from in-grid neighbours.
//! Interior mass is therefore conserved by `spread()` alone.
//!
//! This is a simplified exchange model, not a CFD solver; its virtue is
//! that one update is O(cells) and mass-accounting is exact.

use aero_grid::ObstructionGrid;
use aero_core::Cell;

/// Number of droplet-size channels.
pub const CHANNELS: usize = 4;

/// Volume exchange rate through one open cell face, per second, before
/// scaling by ventilation efficiency and cell size.
const BASE_EXCHANGE_RATE: f64 = 8e-4;

// ── Parameters ────────────────────────────────────────────────────────────────

/// Airflow configuration for spread-coefficient construction.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirflowParams {
    /// Fresh-air exchange intensity; 0 disables spread entirely.
    pub ventilation_efficiency: f64,
    /// Physical edge length of one grid cell, metres.
    pub cell_size_m: f64,
}

impl Default for AirflowParams {
    fn default() -> Self {
        Self { ventilation_efficiency: 1.0, cell_size_m: 1.5 }
    }
}

/// Per-second decay rates of airborne quanta.
///
/// Channel order matches the droplet-size buckets used for emission; the
/// larger the droplet, the faster it settles out of the air.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecayParams {
    /// Viral inactivation survival fraction per second (channel-independent).
    pub inactivation_per_sec: f64,
    /// Gravitational settling survival fraction per second, per channel.
    pub settling_per_sec: [f64; CHANNELS],
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            inactivation_per_sec: 0.999824978151303,
            settling_per_sec: [0.9999658, 0.99984729, 0.99944496, 0.99866597],
        }
    }
}

// ── QuantaField ───────────────────────────────────────────────────────────────

/// The mutable 4-channel quanta matrix plus its static update coefficients.
pub struct QuantaField {
    rows: usize,
    cols: usize,
    /// Channel values, row-major.
    q: [Vec<f64>; CHANNELS],
    /// Per-step survival factor per channel (`inactivation^dt * settling^dt`).
    decay_factor: [f64; CHANNELS],
    // Static directional outflow coefficients per cell.  "down" = row+1,
    // "right" = col+1.  A wall on the face zeroes the coefficient; an
    // unwalled grid-edge face keeps it (open boundary, mass is lost).
    pub(crate) out_up: Vec<f64>,
    pub(crate) out_down: Vec<f64>,
    pub(crate) out_left: Vec<f64>,
    pub(crate) out_right: Vec<f64>,
    /// Scratch buffers for the four directional outflows of one channel.
    flow: [Vec<f64>; 4],
}

impl QuantaField {
    /// Construct a zeroed field for `grid` with coefficients baked for the
    /// given airflow, decay rates, and time step.
    pub fn new(
        grid: &ObstructionGrid,
        airflow: AirflowParams,
        decay: DecayParams,
        time_step_secs: u32,
    ) -> Self {
        let rows = grid.rows();
        let cols = grid.cols();
        let n = rows * cols;
        let dt = time_step_secs as f64;

        let decay_factor = std::array::from_fn(|ch| {
            decay.inactivation_per_sec.powf(dt) * decay.settling_per_sec[ch].powf(dt)
        });

        // One quarter of the face exchange volume goes to each direction.
        let base = BASE_EXCHANGE_RATE / airflow.cell_size_m
            * airflow.ventilation_efficiency
            / 4.0
            * dt;

        let mut out_up = vec![0.0; n];
        let mut out_down = vec![0.0; n];
        let mut out_left = vec![0.0; n];
        let mut out_right = vec![0.0; n];
        for cell in grid.cells() {
            let i = cell.index(cols);
            let r = cell.row as usize;
            let c = cell.col as usize;
            out_down[i] = if grid.blocks_below(cell) { 0.0 } else { base };
            out_right[i] = if grid.blocks_right(cell) { 0.0 } else { base };
            // Upward/leftward flow passes the neighbour's lower/right face.
            out_up[i] = if r > 0 && grid.blocks_below(Cell::new(cell.row - 1, cell.col)) {
                0.0
            } else {
                base
            };
            out_left[i] = if c > 0 && grid.blocks_right(Cell::new(cell.row, cell.col - 1)) {
                0.0
            } else {
                base
            };
        }

        Self {
            rows,
            cols,
            q: std::array::from_fn(|_| vec![0.0; n]),
            decay_factor,
            out_up,
            out_down,
            out_left,
            out_right,
            flow: std::array::from_fn(|_| vec![0.0; n]),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Value of one channel at `cell`.
    #[inline]
    pub fn channel_at(&self, cell: Cell, ch: usize) -> f64 {
        self.q[ch][cell.index(self.cols)]
    }

    /// Sum of all channels at `cell` — the inhalable concentration there.
    #[inline]
    pub fn total_at(&self, cell: Cell) -> f64 {
        let i = cell.index(self.cols);
        self.q.iter().map(|ch| ch[i]).sum()
    }

    /// Sum of all channels over the whole grid.
    pub fn total_mass(&self) -> f64 {
        self.q.iter().map(|ch| ch.iter().sum::<f64>()).sum()
    }

    /// All-channel totals per cell, row-major.
    pub fn total_grid(&self) -> Vec<f64> {
        let mut out = self.q[0].clone();
        for ch in &self.q[1..] {
            for (o, v) in out.iter_mut().zip(ch) {
                *o += v;
            }
        }
        out
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Deposit emitted quanta into `cell`, one value per channel.
    #[inline]
    pub fn add_quanta(&mut self, cell: Cell, quanta: [f64; CHANNELS]) {
        let i = cell.index(self.cols);
        for (ch, v) in self.q.iter_mut().zip(quanta) {
            ch[i] += v;
        }
    }

    /// Apply one step of inactivation + settling decay to every cell.
    ///
    /// Strictly non-increasing and never negative on non-negative input.
    pub fn decay(&mut self) {
        for (ch, &f) in self.q.iter_mut().zip(&self.decay_factor) {
            for v in ch.iter_mut() {
                *v *= f;
            }
        }
    }

    /// Apply one step of four-directional spread to every channel.
    ///
    /// Must run after [`decay`](Self::decay) within the same tick.
    pub fn spread(&mut self) {
        let (rows, cols) = (self.rows, self.cols);
        for ch in &mut self.q {
            // Directional outflows from the frozen pre-spread values.
            let [fu, fd, fl, fr] = &mut self.flow;
            for i in 0..ch.len() {
                fu[i] = ch[i] * self.out_up[i];
                fd[i] = ch[i] * self.out_down[i];
                fl[i] = ch[i] * self.out_left[i];
                fr[i] = ch[i] * self.out_right[i];
            }
            for r in 0..rows {
                for c in 0..cols {
                    let i = r * cols + c;
                    let mut v = ch[i] - (fu[i] + fd[i] + fl[i] + fr[i]);
                    if r > 0 {
                        v += fd[i - cols]; // from the cell above, flowing down
                    }
                    if r + 1 < rows {
                        v += fu[i + cols]; // from the cell below, flowing up
                    }
                    if c > 0 {
                        v += fr[i - 1]; // from the left neighbour, flowing right
                    }
                    if c + 1 < cols {
                        v += fl[i + 1]; // from the right neighbour, flowing left
                    }
                    // Rounding must not drive concentrations negative.
                    ch[i] = v.max(0.0);
                }
            }
        }
    }

    /// Zero every channel — called at each simulated-day start.
    pub fn reset(&mut self) {
        for ch in &mut self.q {
            ch.fill(0.0);
        }
    }
}
