//! Navigation graph construction.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format over row-major
//! cell indices.  Given a cell with flat index `n`, its incident edges
//! occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Every undirected edge is stored twice (once per direction), so the
//! structure doubles as a symmetric adjacency list and iteration over a
//! cell's neighbours is a contiguous memory scan — ideal for Dijkstra's
//! inner loop.
//!
//! # Edge weights
//!
//! Orthogonal moves weigh 1 and diagonal moves √2, stored as fixed-point
//! "milli-steps" (1000 / 1414) so costs stay in integers and heap ordering
//! is total without floating-point comparators.
//!
//! # Corner rule
//!
//! A diagonal edge is only added when the cut does not clip a wall corner.
//! The rule is deliberately asymmetric between the two flanking cells (one
//! may keep its wall-below, the other its wall-right); it is pinned by
//! tests rather than simplified, because route shapes — and therefore
//! exposure times — depend on it.

use aero_core::Cell;

use crate::grid::{ObstructionGrid, code};

/// Weight of an orthogonal step, in milli-steps.
pub const ORTHO_MILLI: u32 = 1_000;
/// Weight of a diagonal step (√2), in milli-steps.
pub const DIAG_MILLI: u32 = 1_414;

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Undirected weighted graph over the traversable cells of a grid.
///
/// Built once per grid via [`NavGraph::build`]; immutable thereafter and
/// used read-only by pathfinding.  Cells coded solid are absent from the
/// graph entirely — no node, no incident edges.
#[derive(Clone, Debug)]
pub struct NavGraph {
    rows: usize,
    cols: usize,
    /// `false` for solid-blocked cells (flat row-major index).
    present: Vec<bool>,
    /// CSR row pointer.  Length = `rows * cols + 1`.
    node_out_start: Vec<u32>,
    /// Flat destination index of each directed half-edge.
    edge_to: Vec<u32>,
    /// Milli-step weight of each half-edge (parallel to `edge_to`).
    edge_weight: Vec<u32>,
}

impl NavGraph {
    /// Build the navigation graph for `grid`.
    ///
    /// Never fails: a fully obstructed layout simply yields an edge-free
    /// graph, and pathfinding then fails explicitly per query.
    pub fn build(grid: &ObstructionGrid) -> Self {
        let rows = grid.rows();
        let cols = grid.cols();
        let node_count = rows * cols;

        let present: Vec<bool> = (0..node_count)
            .map(|n| grid.code_at(n / cols, n % cols) != code::SOLID)
            .collect();

        // Collect both directions of every undirected edge; edges touching
        // a solid cell are dropped here, which is equivalent to removing
        // the solid node (and its edges) after construction.
        let mut raw: Vec<(u32, u32, u32)> = Vec::new();
        let mut link = |a: usize, b: usize, w: u32| {
            if present[a] && present[b] {
                raw.push((a as u32, b as u32, w));
                raw.push((b as u32, a as u32, w));
            }
        };

        for r in 0..rows {
            for c in 0..cols {
                let n = r * cols + c;
                let v = grid.code_at(r, c);

                // Orthogonal faces: code 1 closes the face below, code 2
                // the face right, code 3 both.
                if r + 1 < rows && !matches!(v, code::WALL_BELOW | code::WALL_BOTH) {
                    link(n, n + cols, ORTHO_MILLI);
                }
                if c + 1 < cols && !matches!(v, code::WALL_RIGHT | code::WALL_BOTH) {
                    link(n, n + 1, ORTHO_MILLI);
                }

                // Diagonal ↘ from (r, c) to (r+1, c+1): the cell itself must
                // be fully open, the right flank may keep a wall-below, the
                // lower flank may keep a wall-right.
                if r + 1 < rows && c + 1 < cols {
                    let right = grid.code_at(r, c + 1);
                    let below = grid.code_at(r + 1, c);
                    if v == code::OPEN
                        && matches!(right, code::OPEN | code::WALL_BELOW)
                        && matches!(below, code::OPEN | code::WALL_RIGHT)
                    {
                        link(n, n + cols + 1, DIAG_MILLI);
                    }
                }

                // Diagonal ↙ from (r, c) to (r+1, c-1): mirrored flanks, and
                // additionally vetoed when the cell directly below is solid
                // (the cut would clip its corner).
                if r + 1 < rows && c > 0 {
                    let left = grid.code_at(r, c - 1);
                    let below_left = grid.code_at(r + 1, c - 1);
                    let below = grid.code_at(r + 1, c);
                    if left == code::OPEN
                        && matches!(v, code::OPEN | code::WALL_BELOW)
                        && matches!(below_left, code::OPEN | code::WALL_RIGHT)
                        && below != code::SOLID
                    {
                        link(n, n + cols - 1, DIAG_MILLI);
                    }
                }
            }
        }

        // CSR construction: sort half-edges by source, then prefix-sum the
        // per-node counts into the row pointer.
        raw.sort_unstable_by_key(|e| (e.0, e.1));

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.0 as usize + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let edge_to: Vec<u32> = raw.iter().map(|e| e.1).collect();
        let edge_weight: Vec<u32> = raw.iter().map(|e| e.2).collect();
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        NavGraph { rows, cols, present, node_out_start, edge_to, edge_weight }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of traversable (non-solid) cells.
    pub fn node_count(&self) -> usize {
        self.present.iter().filter(|&&p| p).count()
    }

    /// Number of directed half-edges (twice the undirected edge count).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    // ── Cell/index mapping ────────────────────────────────────────────────

    #[inline]
    pub(crate) fn flat(&self, cell: Cell) -> usize {
        cell.index(self.cols)
    }

    #[inline]
    pub(crate) fn unflat(&self, n: u32) -> Cell {
        Cell::new((n as usize / self.cols) as u16, (n as usize % self.cols) as u16)
    }

    /// `true` if `cell` is in bounds and not solid-blocked.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
            && self.present[self.flat(cell)]
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Half-edges leaving `cell` as `(index range into edge arrays)`.
    #[inline]
    pub(crate) fn out_range(&self, n: usize) -> std::ops::Range<usize> {
        self.node_out_start[n] as usize..self.node_out_start[n + 1] as usize
    }

    #[inline]
    pub(crate) fn edge_to(&self, i: usize) -> u32 {
        self.edge_to[i]
    }

    #[inline]
    pub(crate) fn edge_weight(&self, i: usize) -> u32 {
        self.edge_weight[i]
    }

    /// Iterator over the neighbours of `cell` with milli-step edge weights.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Cell, u32)> + '_ {
        let range = if self.contains(cell) {
            self.out_range(self.flat(cell))
        } else {
            0..0
        };
        range.map(|i| (self.unflat(self.edge_to[i]), self.edge_weight[i]))
    }

    /// Degree of `cell` (0 for absent cells).
    pub fn degree(&self, cell: Cell) -> usize {
        if self.contains(cell) {
            self.out_range(self.flat(cell)).len()
        } else {
            0
        }
    }

    /// `true` if an edge joins `a` and `b` (direction-independent by
    /// construction).
    pub fn has_edge(&self, a: Cell, b: Cell) -> bool {
        self.neighbors(a).any(|(n, _)| n == b)
    }

    /// Weight of the edge `a`–`b` in milli-steps, if present.
    pub fn edge_weight_between(&self, a: Cell, b: Cell) -> Option<u32> {
        self.neighbors(a).find(|&(n, _)| n == b).map(|(_, w)| w)
    }
}
