//! The [`Planner`] trait, the [`Path`] result type, and helpers shared by the
//! three search implementations.

use rustc_hash::{FxHashMap, FxHashSet};

use mapf_core::{Algorithm, GridPos};
use mapf_grid::Grid;

use crate::error::{PlanError, PlanResult};

/// A route across the grid.
///
/// Holds every cell to step through, *excluding* the start and *including*
/// the goal; a path whose start equals its goal is empty.  `total_cost` is
/// the sum of the entered cells' traversal costs.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    cells: Vec<GridPos>,
    total_cost: f32,
}

impl Path {
    pub(crate) fn new(cells: Vec<GridPos>, total_cost: f32) -> Self {
        Self { cells, total_cost }
    }

    pub fn empty() -> Self {
        Self { cells: Vec::new(), total_cost: 0.0 }
    }

    #[inline]
    pub fn cells(&self) -> &[GridPos] {
        &self.cells
    }

    #[inline]
    pub fn into_cells(self) -> Vec<GridPos> {
        self.cells
    }

    /// Number of steps remaining.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The next cell to step onto.
    #[inline]
    pub fn first(&self) -> Option<GridPos> {
        self.cells.first().copied()
    }

    #[inline]
    pub fn total_cost(&self) -> f32 {
        self.total_cost
    }
}

/// A single-shot grid path search.
///
/// `avoid` is the caller's dynamic exclusion set (occupied cells, cells
/// claimed by higher-priority broadcasts).  Planners never enter an avoided
/// cell, with one exception: the goal itself is exempt from both the avoid
/// set and any cost ceiling, since a route that cannot end at the goal is no
/// route at all.  A blocked goal fails up front with
/// [`PlanError::GoalBlocked`].
pub trait Planner {
    fn algorithm(&self) -> Algorithm;

    fn plan(
        &self,
        grid: &Grid,
        start: GridPos,
        goal: GridPos,
        avoid: &FxHashSet<GridPos>,
    ) -> PlanResult<Path>;
}

// ── Shared search plumbing ───────────────────────────────────────────────────

/// Integer cost unit used in heap keys: thousandths of a cost point.  Keeps
/// the priority queue free of float comparisons; `.max(1)` guarantees strict
/// progress even if a cost rounds to zero.
#[inline]
pub(crate) fn milli(cost: f32) -> u32 {
    (cost * 1000.0).round().max(1.0) as u32
}

/// Bounds-check both endpoints and reject a blocked goal.
pub(crate) fn check_endpoints(grid: &Grid, start: GridPos, goal: GridPos) -> PlanResult<()> {
    if !grid.in_bounds(start) {
        return Err(PlanError::OutOfBounds(start));
    }
    if !grid.in_bounds(goal) {
        return Err(PlanError::OutOfBounds(goal));
    }
    if grid.is_blocked(goal) {
        return Err(PlanError::GoalBlocked(goal));
    }
    Ok(())
}

/// Whether a search may step onto `pos`.
///
/// The goal bypasses the ceiling and the avoid set; everything else must be
/// unblocked, affordable (when a ceiling applies), and un-avoided.
#[inline]
pub(crate) fn passable(
    grid: &Grid,
    pos: GridPos,
    goal: GridPos,
    avoid: &FxHashSet<GridPos>,
    ceiling: Option<f32>,
) -> bool {
    if grid.is_blocked(pos) {
        return false;
    }
    if pos == goal {
        return true;
    }
    if let Some(ceiling) = ceiling {
        if grid.cost(pos) > ceiling {
            return false;
        }
    }
    !avoid.contains(&pos)
}

/// Walk predecessor links from `goal` back to `start` and price the route.
pub(crate) fn reconstruct(
    came_from: &FxHashMap<GridPos, GridPos>,
    grid: &Grid,
    start: GridPos,
    goal: GridPos,
) -> Path {
    let mut cells = Vec::new();
    let mut cur = goal;
    while cur != start {
        cells.push(cur);
        cur = came_from[&cur];
    }
    cells.reverse();
    let total_cost = cells.iter().map(|&p| grid.cost(p)).sum();
    Path::new(cells, total_cost)
}
