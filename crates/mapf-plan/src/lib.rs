//! `mapf-plan` — grid path search.
//!
//! Three planners share one [`Planner`] trait:
//!
//! | Module       | Planner           | Cost model                             |
//! |--------------|-------------------|----------------------------------------|
//! | [`astar`]    | [`AStarPlanner`]  | cell costs, Manhattan heuristic        |
//! | [`bfs`]      | [`BfsPlanner`]    | hop count, ignores cell costs          |
//! | [`dijkstra`] | [`DijkstraPlanner`] | cell costs, no heuristic, no ceiling |
//!
//! A* and BFS refuse to enter cells whose cost exceeds a configured ceiling;
//! Dijkstra traverses anything unblocked.  [`PlannerSet`] chains the three in
//! a fixed preference order so a failed search falls back to the next
//! algorithm instead of stranding the agent.
//!
//! # Determinism
//!
//! All tie-breaks are explicit.  The priority-queue planners key their heaps
//! on `(cost, insertion-seq, position)`, and BFS expands neighbors in the
//! grid's fixed offset order, so identical inputs always yield the identical
//! path.

pub mod astar;
pub mod bfs;
pub mod dijkstra;
pub mod error;
pub mod fallback;
pub mod planner;


pub use astar::AStarPlanner;
pub use bfs::BfsPlanner;
pub use dijkstra::DijkstraPlanner;
pub use error::{PlanError, PlanResult};
pub use fallback::{PlanOutcome, PlannerSet};
pub use planner::{Path, Planner};
