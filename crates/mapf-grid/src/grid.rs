//! Grid representation and builder.
//!
//! # Data layout
//!
//! Cell attributes live in flat row-major SoA arrays indexed by
//! `row * cols + col`:
//!
//! ```text
//! cost[idx]    — traversal cost, always >= 1.0
//! blocked[idx] — obstacle flag
//! ```
//!
//! Iteration over a cell's orthogonal neighbors is allocation-free.  The
//! target zone is a centered square; its cells are never blocked, neither at
//! generation time nor by drift.

use mapf_core::{GridPos, SimRng};

use crate::error::{GridError, GridResult};
use crate::Occupancy;

/// Orthogonal step offsets in fixed order: up, down, left, right.
///
/// The order is load-bearing: BFS visits neighbors in this order, so path
/// shape is deterministic across runs.
const OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// ── Grid ─────────────────────────────────────────────────────────────────────

/// The shared 2-D environment: per-cell traversal costs, obstacle flags, and
/// a designated target region.
///
/// Mutated only by the coordinator between ticks; agents read it through an
/// immutable per-tick snapshot.  Do not construct directly; use
/// [`GridBuilder`].
pub struct Grid {
    rows: u16,
    cols: u16,

    /// Traversal cost per cell.  Positive, default 1.0.
    cost: Vec<f32>,

    /// Obstacle flag per cell.  A blocked cell is never a valid path node.
    blocked: Vec<bool>,

    /// Top-left corner of the centered square target zone.
    zone_origin: GridPos,
    zone_size: u16,
}

impl Grid {
    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u16 {
        self.cols
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    fn idx(&self, pos: GridPos) -> usize {
        pos.row as usize * self.cols as usize + pos.col as usize
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    /// Traversal cost of `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is out of bounds — planners must bounds-check via
    /// [`neighbors`][Self::neighbors] before querying.
    #[inline]
    pub fn cost(&self, pos: GridPos) -> f32 {
        self.cost[self.idx(pos)]
    }

    #[inline]
    pub fn is_blocked(&self, pos: GridPos) -> bool {
        self.blocked[self.idx(pos)]
    }

    /// Iterator over the in-bounds orthogonal neighbors of `pos`, in the
    /// fixed up/down/left/right order.  Blocked cells are *included* — the
    /// caller decides what counts as passable.
    #[inline]
    pub fn neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        OFFSETS.into_iter().filter_map(move |(dr, dc)| {
            let r = pos.row as i32 + dr;
            let c = pos.col as i32 + dc;
            (r >= 0 && c >= 0 && r < self.rows as i32 && c < self.cols as i32)
                .then(|| GridPos::new(r as u16, c as u16))
        })
    }

    // ── Target zone ───────────────────────────────────────────────────────

    #[inline]
    pub fn in_target_zone(&self, pos: GridPos) -> bool {
        pos.row >= self.zone_origin.row
            && pos.row < self.zone_origin.row + self.zone_size
            && pos.col >= self.zone_origin.col
            && pos.col < self.zone_origin.col + self.zone_size
    }

    /// All cells of the target zone in row-major order.
    pub fn target_cells(&self) -> Vec<GridPos> {
        let mut cells = Vec::with_capacity(self.zone_size as usize * self.zone_size as usize);
        for r in self.zone_origin.row..self.zone_origin.row + self.zone_size {
            for c in self.zone_origin.col..self.zone_origin.col + self.zone_size {
                cells.push(GridPos::new(r, c));
            }
        }
        cells
    }

    /// All blocked cells in row-major order (drift uses this to pick an
    /// obstacle to remove).
    pub fn blocked_cells(&self) -> Vec<GridPos> {
        let mut cells = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let pos = GridPos::new(r, c);
                if self.blocked[self.idx(pos)] {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    // ── Coordinator-only mutation (between ticks) ─────────────────────────

    /// Place an obstacle at `pos`.
    ///
    /// Rejected for out-of-bounds, occupied, target-zone, or already-blocked
    /// cells.  No obstacle is ever placed under an agent.
    pub fn add_obstacle(&mut self, pos: GridPos, occupancy: &Occupancy) -> GridResult<()> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        if occupancy.occupant(pos).is_some() {
            return Err(GridError::CellOccupied(pos));
        }
        if self.in_target_zone(pos) {
            return Err(GridError::InTargetZone(pos));
        }
        let idx = self.idx(pos);
        if self.blocked[idx] {
            return Err(GridError::CellBlocked(pos));
        }
        self.blocked[idx] = true;
        Ok(())
    }

    /// Remove the obstacle at `pos`.
    pub fn remove_obstacle(&mut self, pos: GridPos) -> GridResult<()> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        let idx = self.idx(pos);
        if !self.blocked[idx] {
            return Err(GridError::NotAnObstacle(pos));
        }
        self.blocked[idx] = false;
        Ok(())
    }

    /// Raise the traversal cost of `pos` by `delta`.
    ///
    /// Rejected for occupied or blocked cells; cost escalation under an agent
    /// would retroactively change the price of a committed move.
    pub fn raise_cost(&mut self, pos: GridPos, delta: f32, occupancy: &Occupancy) -> GridResult<()> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        if occupancy.occupant(pos).is_some() {
            return Err(GridError::CellOccupied(pos));
        }
        let idx = self.idx(pos);
        if self.blocked[idx] {
            return Err(GridError::CellBlocked(pos));
        }
        debug_assert!(delta >= 0.0);
        self.cost[idx] += delta;
        Ok(())
    }
}

// ── GridBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Grid`] incrementally, then call [`build`](Self::build).
///
/// Defaults produce an open grid: uniform cost 1.0, no obstacles.  Obstacle
/// scatter and cost randomization are driven by the caller's [`SimRng`] so a
/// seed fully determines the generated environment.
///
/// # Example
///
/// ```
/// use mapf_core::SimRng;
/// use mapf_grid::GridBuilder;
///
/// let mut rng = SimRng::new(42);
/// let grid = GridBuilder::new(20, 20)
///     .target_zone(4)
///     .obstacle_density(0.1)
///     .cost_range(1.0, 3.0)
///     .build(&mut rng)
///     .unwrap();
/// assert_eq!(grid.cell_count(), 400);
/// ```
pub struct GridBuilder {
    rows: u16,
    cols: u16,
    zone_size: u16,
    obstacle_density: f64,
    cost_min: f32,
    cost_max: f32,
}

impl GridBuilder {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            zone_size: 1,
            obstacle_density: 0.0,
            cost_min: 1.0,
            cost_max: 1.0,
        }
    }

    /// Side length of the centered square target zone.  Default: 1.
    pub fn target_zone(mut self, size: u16) -> Self {
        self.zone_size = size;
        self
    }

    /// Fraction of cells to block with obstacles, in `[0, 1)`.  Default: 0.
    pub fn obstacle_density(mut self, density: f64) -> Self {
        self.obstacle_density = density;
        self
    }

    /// Initial cost range; each cell's cost is drawn uniformly from
    /// `[min, max]`.  Default: `[1.0, 1.0]`.
    pub fn cost_range(mut self, min: f32, max: f32) -> Self {
        self.cost_min = min;
        self.cost_max = max;
        self
    }

    /// Validate, scatter obstacles, randomize costs, and produce a [`Grid`].
    pub fn build(self, rng: &mut SimRng) -> GridResult<Grid> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::Config("grid dimensions must be non-zero".into()));
        }
        if self.zone_size == 0 || self.zone_size > self.rows || self.zone_size > self.cols {
            return Err(GridError::Config(format!(
                "target zone {0}x{0} does not fit a {1}x{2} grid",
                self.zone_size, self.rows, self.cols
            )));
        }
        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(GridError::Config("obstacle density must be in [0, 1)".into()));
        }
        if !(self.cost_min >= 1.0 && self.cost_min <= self.cost_max) {
            return Err(GridError::Config(
                "cost range must satisfy 1.0 <= min <= max".into(),
            ));
        }

        let cells = self.rows as usize * self.cols as usize;
        let zone_origin = GridPos::new(
            (self.rows - self.zone_size) / 2,
            (self.cols - self.zone_size) / 2,
        );

        let mut grid = Grid {
            rows: self.rows,
            cols: self.cols,
            cost: vec![1.0; cells],
            blocked: vec![false; cells],
            zone_origin,
            zone_size: self.zone_size,
        };

        if self.cost_max > self.cost_min {
            for c in grid.cost.iter_mut() {
                *c = rng.gen_range(self.cost_min..=self.cost_max);
            }
        } else if self.cost_min > 1.0 {
            grid.cost.fill(self.cost_min);
        }

        // Rejection-sample obstacle positions, skipping the target zone and
        // already-blocked cells.  Bounded attempts keep generation total even
        // on dense grids; a handful of unplaced obstacles is acceptable.
        let obstacle_count = (self.obstacle_density * cells as f64) as usize;
        for _ in 0..obstacle_count {
            for _attempt in 0..100 {
                let pos = GridPos::new(
                    rng.gen_range(0..self.rows),
                    rng.gen_range(0..self.cols),
                );
                let idx = grid.idx(pos);
                if !grid.blocked[idx] && !grid.in_target_zone(pos) {
                    grid.blocked[idx] = true;
                    break;
                }
            }
        }

        Ok(grid)
    }
}
