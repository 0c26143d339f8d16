//! Uniform-cost search with no cost ceiling: the fallback of last resort.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use mapf_core::{Algorithm, GridPos};
use mapf_grid::Grid;

use crate::error::{PlanError, PlanResult};
use crate::planner::{check_endpoints, milli, passable, reconstruct, Path, Planner};

/// Cheapest-route search that will pay any cell cost.  The only planner with
/// no ceiling, so if Dijkstra fails the goal is genuinely unreachable.
pub struct DijkstraPlanner;

impl Planner for DijkstraPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dijkstra
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

        let mut open: BinaryHeap<Reverse<(u32, u32, GridPos)>> = BinaryHeap::new();
        let mut dist: FxHashMap<GridPos, u32> = FxHashMap::default();
        let mut came_from: FxHashMap<GridPos, GridPos> = FxHashMap::default();
        let mut seq = 0u32;

        dist.insert(start, 0);
        open.push(Reverse((0, seq, start)));

        while let Some(Reverse((d, _, pos))) = open.pop() {
            if pos == goal {
                return Ok(reconstruct(&came_from, grid, start, goal));
            }
            if d > dist[&pos] {
                continue;
            }
            for next in grid.neighbors(pos) {
                if !passable(grid, next, goal, avoid, None) {
                    continue;
                }
                let tentative = d + milli(grid.cost(next));
                if dist.get(&next).is_none_or(|&best| tentative < best) {
                    dist.insert(next, tentative);
                    came_from.insert(next, pos);
                    seq += 1;
                    open.push(Reverse((tentative, seq, next)));
                }
            }
        }

        Err(PlanError::NoPathFound { from: start, to: goal })
    }
}
