//! A* search over cell costs with a Manhattan-distance heuristic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use mapf_core::{Algorithm, GridPos};
use mapf_grid::Grid;

use crate::error::{PlanError, PlanResult};
use crate::planner::{check_endpoints, milli, passable, reconstruct, Path, Planner};

/// Cost-aware informed search.  Refuses cells priced above `cost_ceiling`,
/// which is what lets the fallback chain demote an agent to Dijkstra when the
/// cheap routes dry up.
pub struct AStarPlanner {
    cost_ceiling: f32,
}

impl AStarPlanner {
    pub fn new(cost_ceiling: f32) -> Self {
        Self { cost_ceiling }
    }
}

impl Planner for AStarPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
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

        // Manhattan distance times the minimum cell cost (1.0, in milli
        // units) is admissible, so the first pop of the goal is optimal.
        let h = |p: GridPos| p.manhattan(goal) * 1000;

        // Heap keys are (f, g, seq, pos): ties on f broken by g, then by
        // insertion order, then row-major position.  Fully deterministic.
        let mut open: BinaryHeap<Reverse<(u32, u32, u32, GridPos)>> = BinaryHeap::new();
        let mut g_score: FxHashMap<GridPos, u32> = FxHashMap::default();
        let mut came_from: FxHashMap<GridPos, GridPos> = FxHashMap::default();
        let mut seq = 0u32;

        g_score.insert(start, 0);
        open.push(Reverse((h(start), 0, seq, start)));

        while let Some(Reverse((_, g, _, pos))) = open.pop() {
            if pos == goal {
                return Ok(reconstruct(&came_from, grid, start, goal));
            }
            // Stale entry: a cheaper route to `pos` was found after this
            // one was pushed.
            if g > g_score[&pos] {
                continue;
            }
            for next in grid.neighbors(pos) {
                if !passable(grid, next, goal, avoid, Some(self.cost_ceiling)) {
                    continue;
                }
                let tentative = g + milli(grid.cost(next));
                if g_score.get(&next).is_none_or(|&best| tentative < best) {
                    g_score.insert(next, tentative);
                    came_from.insert(next, pos);
                    seq += 1;
                    open.push(Reverse((tentative + h(next), tentative, seq, next)));
                }
            }
        }

        Err(PlanError::NoPathFound { from: start, to: goal })
    }
}
