//! Top-level simulation configuration.
//!
//! Configuration *loading* (files, CLI) is an external collaborator's
//! concern; the core consumes a fully-populated `SimConfig` and validates it
//! once, up front.  Violations are fatal at initialization — the simulation
//! never silently truncates the agent count or shrinks the target zone.

use crate::error::{CoreError, CoreResult};
use crate::Tick;

/// All tunable parameters of a simulation run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    // ── Grid ──────────────────────────────────────────────────────────────
    pub rows: u16,
    pub cols: u16,

    /// Side length of the centered square goal region.
    pub target_zone_size: u16,

    /// Fraction of cells initially blocked by obstacles, in `[0, 1)`.
    /// Obstacles are never placed inside the target zone.
    pub obstacle_density: f64,

    /// Per-tick probability of one environment drift operation (obstacle
    /// add/remove or cost raise).
    pub drift_probability: f64,

    /// Initial per-cell traversal cost is drawn uniformly from
    /// `[cost_min, cost_max]`.  Must satisfy `1.0 <= cost_min <= cost_max`
    /// (the A* heuristic assumes a unit lower bound).
    pub cost_min: f32,
    pub cost_max: f32,

    /// Cells costlier than this are impassable to A* and BFS; only Dijkstra
    /// will route through them.  This is what gives the fallback chain teeth.
    pub cost_ceiling: f32,

    // ── Agents ────────────────────────────────────────────────────────────
    pub agent_count: usize,

    /// How many of the first `agent_count` agents are Leaders, then
    /// Followers; the rest are Normal.
    pub leader_count: usize,
    pub follower_count: usize,

    // ── Learning ──────────────────────────────────────────────────────────
    /// Initial exploration probability for the epsilon-greedy selector.
    pub epsilon: f32,

    /// Q-value learning rate.
    pub alpha: f32,

    /// Multiplicative epsilon decay applied to every agent on each finish.
    /// Must be in `(0, 1]` so epsilon never increases.
    pub epsilon_decay: f32,

    // ── Coordination ──────────────────────────────────────────────────────
    /// A Follower finishing within this many ticks of its Leader earns a
    /// synergy bonus.
    pub synergy_window_ticks: u64,

    /// Agents rebroadcast their planned path every N ticks (staggered by
    /// agent ID).  0 disables broadcasts.
    pub broadcast_interval_ticks: u64,

    // ── Run control ───────────────────────────────────────────────────────
    /// Tick budget.  The run also ends early once every agent is Finished.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for the parallel decide phase.  `None` uses all
    /// logical cores.  Ignored without the `parallel` feature.
    pub num_threads: Option<usize>,

    /// Emit an observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[inline]
    pub fn target_cell_count(&self) -> usize {
        self.target_zone_size as usize * self.target_zone_size as usize
    }

    /// Fail-fast validation of everything checkable before the grid exists.
    ///
    /// The builder performs a second, exact free-cell check after obstacle
    /// placement; this pass rejects configurations that cannot possibly fit.
    pub fn validate(&self) -> CoreResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(CoreError::Config("grid dimensions must be non-zero".into()));
        }
        if self.target_zone_size == 0 {
            return Err(CoreError::Config("target zone size must be non-zero".into()));
        }
        if self.target_zone_size > self.rows || self.target_zone_size > self.cols {
            return Err(CoreError::Config(format!(
                "target zone {0}x{0} does not fit a {1}x{2} grid",
                self.target_zone_size, self.rows, self.cols
            )));
        }
        if self.agent_count == 0 {
            return Err(CoreError::Config("agent count must be non-zero".into()));
        }
        if self.agent_count > self.target_cell_count() {
            return Err(CoreError::Config(format!(
                "{} agents need {} distinct target cells but the zone has only {}",
                self.agent_count,
                self.agent_count,
                self.target_cell_count()
            )));
        }
        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(CoreError::Config("obstacle density must be in [0, 1)".into()));
        }
        if !(0.0..=1.0).contains(&self.drift_probability) {
            return Err(CoreError::Config("drift probability must be in [0, 1]".into()));
        }
        let estimated_obstacles = (self.obstacle_density * self.cell_count() as f64) as usize;
        let free = self
            .cell_count()
            .saturating_sub(self.target_cell_count())
            .saturating_sub(estimated_obstacles);
        if self.agent_count > free {
            return Err(CoreError::Config(format!(
                "{} agents exceed the ~{} free start cells",
                self.agent_count, free
            )));
        }
        if self.leader_count + self.follower_count > self.agent_count {
            return Err(CoreError::Config(
                "leader_count + follower_count exceeds agent_count".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(CoreError::Config("epsilon must be in [0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(CoreError::Config("alpha must be in [0, 1]".into()));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(CoreError::Config("epsilon decay must be in (0, 1]".into()));
        }
        if !(self.cost_min >= 1.0 && self.cost_min <= self.cost_max) {
            return Err(CoreError::Config(
                "cost range must satisfy 1.0 <= cost_min <= cost_max".into(),
            ));
        }
        if self.cost_ceiling < self.cost_min {
            return Err(CoreError::Config(
                "cost ceiling below cost_min would make every cell impassable to A*/BFS".into(),
            ));
        }
        if self.total_ticks == 0 {
            return Err(CoreError::Config("tick budget must be non-zero".into()));
        }
        Ok(())
    }
}
