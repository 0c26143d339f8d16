//! Ordered planner fallback: try the preferred algorithm, then the rest.

use rustc_hash::FxHashSet;

use mapf_core::{Algorithm, GridPos};
use mapf_grid::Grid;

use crate::astar::AStarPlanner;
use crate::bfs::BfsPlanner;
use crate::dijkstra::DijkstraPlanner;
use crate::error::PlanResult;
use crate::planner::{Path, Planner};

/// Result of a fallback search: the path, the algorithm that produced it, and
/// how many algorithms failed before it.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub path: Path,
    pub algorithm: Algorithm,
    pub switches: u32,
}

/// All three planners sharing one cost ceiling.
///
/// [`plan`](Self::plan) runs the preferred algorithm first; on failure the
/// remaining algorithms are tried in the fixed [`Algorithm::ALL`] order.
/// Dijkstra carries no ceiling, so a fully failed chain means the goal is
/// unreachable on the current grid, not merely priced out.
pub struct PlannerSet {
    astar:    AStarPlanner,
    bfs:      BfsPlanner,
    dijkstra: DijkstraPlanner,
}

impl PlannerSet {
    pub fn new(cost_ceiling: f32) -> Self {
        Self {
            astar:    AStarPlanner::new(cost_ceiling),
            bfs:      BfsPlanner::new(cost_ceiling),
            dijkstra: DijkstraPlanner,
        }
    }

    fn planner(&self, algorithm: Algorithm) -> &dyn Planner {
        match algorithm {
            Algorithm::AStar    => &self.astar,
            Algorithm::Bfs      => &self.bfs,
            Algorithm::Dijkstra => &self.dijkstra,
        }
    }

    /// Search with `preferred` first, falling back through the remaining
    /// algorithms in fixed order.  Returns the first success, or the final
    /// planner's error once every algorithm has failed.
    pub fn plan(
        &self,
        preferred: Algorithm,
        grid: &Grid,
        start: GridPos,
        goal: GridPos,
        avoid: &FxHashSet<GridPos>,
    ) -> PlanResult<PlanOutcome> {
        let chain = std::iter::once(preferred)
            .chain(Algorithm::ALL.into_iter().filter(|&a| a != preferred));

        let mut last_err = None;
        for (tried, algorithm) in chain.enumerate() {
            match self.planner(algorithm).plan(grid, start, goal, avoid) {
                Ok(path) => {
                    return Ok(PlanOutcome { path, algorithm, switches: tried as u32 });
                }
                Err(e) => last_err = Some(e),
            }
        }
        // The chain is never empty, so an error was always recorded.
        Err(last_err.unwrap_or_else(|| unreachable!()))
    }
}
