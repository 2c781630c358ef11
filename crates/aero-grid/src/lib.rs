//! `aero-grid` — building layout and agent movement graph.
//!
//! Converts a coded 2D obstruction grid into an undirected weighted graph
//! of traversable cells, and provides cached Dijkstra shortest paths over
//! that graph.
//!
//! | Module    | Contents                                             |
//! |-----------|------------------------------------------------------|
//! | [`grid`]  | `ObstructionGrid` — validated wall/block codes       |
//! | [`graph`] | `NavGraph` — CSR adjacency built from the grid       |
//! | [`path`]  | `shortest_path`, per-agent `PathCache`               |
//! | [`error`] | `GridError`, `GridResult`                            |

pub mod error;
pub mod graph;
pub mod grid;
pub mod path;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GridError, GridResult};
pub use graph::NavGraph;
pub use grid::{ObstructionGrid, code};
pub use path::{PathCache, shortest_path};
