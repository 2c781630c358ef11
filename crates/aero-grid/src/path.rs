//! Shortest paths and the per-agent path cache.
//!
//! # Cost units
//!
//! Dijkstra runs on the graph's integer milli-step weights; ties are broken
//! by flat cell index so the chosen path is deterministic regardless of
//! heap internals.
//!
//! # Cache scope
//!
//! Each agent owns a `PathCache`.  Paths do not depend on agent identity,
//! so this is a memory/time tradeoff rather than a correctness requirement:
//! an agent revisits the same handful of (origin, destination) pairs for
//! the whole run, and a small private map keeps the hot lookup contention-
//! and borrow-free.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use aero_core::Cell;

use crate::graph::NavGraph;
use crate::{GridError, GridResult};

/// Sentinel for "no predecessor" in the Dijkstra back-pointers.
const NO_PREV: u32 = u32::MAX;

// ── shortest_path ─────────────────────────────────────────────────────────────

/// Compute the shortest path from `from` to `to` as an ordered cell
/// sequence including both endpoints.
///
/// `from == to` yields the single-cell path.  A destination in a
/// disconnected region signals [`GridError::NoPath`]; callers fall back to
/// staying in place.
pub fn shortest_path(graph: &NavGraph, from: Cell, to: Cell) -> GridResult<Vec<Cell>> {
    if !graph.contains(from) {
        return Err(GridError::NotInGraph(from));
    }
    if !graph.contains(to) {
        return Err(GridError::NotInGraph(to));
    }
    if from == to {
        return Ok(vec![from]);
    }

    let n = graph.rows() * graph.cols();
    let src = graph.flat(from) as u32;
    let dst = graph.flat(to) as u32;

    // dist[v] = best known cost (milli-steps) to reach v.
    let mut dist = vec![u64::MAX; n];
    let mut prev = vec![NO_PREV; n];
    dist[src as usize] = 0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key = flat index for deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, u32)>> = BinaryHeap::new();
    heap.push(Reverse((0, src)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == dst {
            return Ok(reconstruct(graph, &prev, src, dst));
        }
        // Skip stale heap entries.
        if cost > dist[node as usize] {
            continue;
        }
        for i in graph.out_range(node as usize) {
            let next = graph.edge_to(i);
            let new_cost = cost + graph.edge_weight(i) as u64;
            if new_cost < dist[next as usize] {
                dist[next as usize] = new_cost;
                prev[next as usize] = node;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(GridError::NoPath { from, to })
}

fn reconstruct(graph: &NavGraph, prev: &[u32], src: u32, dst: u32) -> Vec<Cell> {
    let mut cells = vec![graph.unflat(dst)];
    let mut cur = dst;
    while cur != src {
        cur = prev[cur as usize];
        cells.push(graph.unflat(cur));
    }
    cells.reverse();
    cells
}

// ── PathCache ─────────────────────────────────────────────────────────────────

/// Memoized shortest paths keyed by ordered `(origin, destination)` pairs.
#[derive(Default)]
pub struct PathCache {
    paths: FxHashMap<(Cell, Cell), Vec<Cell>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry count.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Look up (or compute and cache) the shortest path `from` → `to`.
    ///
    /// Two calls with the same arguments on an unchanged graph return the
    /// identical sequence.
    pub fn path(&mut self, graph: &NavGraph, from: Cell, to: Cell) -> GridResult<&[Cell]> {
        match self.paths.entry((from, to)) {
            Entry::Occupied(e) => Ok(e.into_mut().as_slice()),
            Entry::Vacant(v) => {
                let p = shortest_path(graph, from, to)?;
                Ok(v.insert(p).as_slice())
            }
        }
    }
}
