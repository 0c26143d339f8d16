//! Breadth-first search: fewest hops, blind to cell costs.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use mapf_core::{Algorithm, GridPos};
use mapf_grid::Grid;

use crate::error::{PlanError, PlanResult};
use crate::planner::{check_endpoints, passable, reconstruct, Path, Planner};

/// Hop-count search.  Ignores how expensive a cell is to cross, but still
/// refuses cells priced above `cost_ceiling` — it finds short detours A*
/// would also take, just without weighing them.
pub struct BfsPlanner {
    cost_ceiling: f32,
}

impl BfsPlanner {
    pub fn new(cost_ceiling: f32) -> Self {
        Self { cost_ceiling }
    }
}

impl Planner for BfsPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Bfs
    }

    fn plan(
        &self,
        grid: &Grid,
        start: GridPos,
        goal: GridPos,
        avoid: &FxHashSet<GridPos>,
    ) -> PlanResult<Path> {
        check_endpoints(grid, start, goal)?;
        if start == goal {
            return Ok(Path::empty());
        }

        let mut frontier = VecDeque::new();
        let mut came_from: FxHashMap<GridPos, GridPos> = FxHashMap::default();
        let mut seen: FxHashSet<GridPos> = FxHashSet::default();

        frontier.push_back(start);
        seen.insert(start);

        // Expansion follows the grid's fixed neighbor order, so among
        // equal-length paths the same one wins every run.
        while let Some(pos) = frontier.pop_front() {
            for next in grid.neighbors(pos) {
                if seen.contains(&next) {
                    continue;
                }
                if !passable(grid, next, goal, avoid, Some(self.cost_ceiling)) {
                    continue;
                }
                seen.insert(next);
                came_from.insert(next, pos);
                if next == goal {
                    return Ok(reconstruct(&came_from, grid, start, goal));
                }
                frontier.push_back(next);
            }
        }

        Err(PlanError::NoPathFound { from: start, to: goal })
    }
}
