//! Fluent builder for constructing a [`Sim`].

use rustc_hash::FxHashSet;

use mapf_agent::AgentStoreBuilder;
use mapf_behavior::BehaviorModel;
use mapf_core::{AgentId, GridPos, Role, SimConfig, SimRng};
use mapf_grid::{Grid, GridBuilder, Occupancy};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<B>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — grid shape, agent counts, learning rates, seed, …
/// - `B: BehaviorModel` — the behavior implementation (usually
///   [`Navigator`][mapf_behavior::Navigator])
///
/// # Optional inputs (seeded defaults)
///
/// | Method        | Default                                                |
/// |---------------|--------------------------------------------------------|
/// | `.grid(g)`    | Generated from config (density, cost range, zone)      |
/// | `.starts(v)`  | Uniform draw from free cells outside the target zone   |
/// | `.targets(v)` | Uniform draw of distinct target-zone cells             |
/// | `.roles(v)`   | Leaders first, then followers, then normals by id      |
///
/// All defaults come from the config seed, so a config fully determines the
/// generated scenario.  Followers are paired with leaders round-robin in
/// either case.
///
/// # Example
///
/// ```rust,ignore
/// let behavior = Navigator::new(config.cost_ceiling, config.broadcast_interval_ticks);
/// let mut sim = SimBuilder::new(config, behavior).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<B: BehaviorModel> {
    config:   SimConfig,
    behavior: B,
    grid:     Option<Grid>,
    starts:   Option<Vec<GridPos>>,
    targets:  Option<Vec<GridPos>>,
    roles:    Option<Vec<Role>>,
}

impl<B: BehaviorModel> SimBuilder<B> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, behavior: B) -> Self {
        Self {
            config,
            behavior,
            grid:    None,
            starts:  None,
            targets: None,
            roles:   None,
        }
    }

    /// Supply a pre-built grid instead of generating one from the config.
    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Supply explicit spawn cells (must be length `agent_count`, distinct,
    /// unblocked).
    pub fn starts(mut self, starts: Vec<GridPos>) -> Self {
        self.starts = Some(starts);
        self
    }

    /// Supply explicit target cells (must be length `agent_count`, distinct,
    /// unblocked).
    pub fn targets(mut self, targets: Vec<GridPos>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Supply explicit roles (must be length `agent_count`).  Overrides the
    /// config's leader/follower counts.
    pub fn roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Validate the config, generate whatever was not supplied, place every
    /// agent, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<B>> {
        self.config.validate()?;
        let n = self.config.agent_count;
        let mut env_rng = SimRng::new(self.config.seed);

        // ── Grid ──────────────────────────────────────────────────────────
        let grid = match self.grid {
            Some(g) => g,
            None => GridBuilder::new(self.config.rows, self.config.cols)
                .target_zone(self.config.target_zone_size)
                .obstacle_density(self.config.obstacle_density)
                .cost_range(self.config.cost_min, self.config.cost_max)
                .build(&mut env_rng)?,
        };

        // ── Targets: distinct cells inside the zone ───────────────────────
        let targets = match self.targets {
            Some(t) => {
                check_cells(&grid, &t, n, "targets")?;
                t
            }
            None => {
                let mut pool = grid.target_cells();
                if pool.len() < n {
                    return Err(SimError::Config(format!(
                        "target zone has {} cells for {} agents",
                        pool.len(),
                        n
                    )));
                }
                draw(&mut pool, n, &mut env_rng)
            }
        };

        // ── Starts: distinct free cells outside the zone ──────────────────
        let starts = match self.starts {
            Some(s) => {
                check_cells(&grid, &s, n, "starts")?;
                s
            }
            None => {
                let mut pool: Vec<GridPos> = Vec::new();
                for r in 0..grid.rows() {
                    for c in 0..grid.cols() {
                        let pos = GridPos::new(r, c);
                        if !grid.is_blocked(pos) && !grid.in_target_zone(pos) {
                            pool.push(pos);
                        }
                    }
                }
                if pool.len() < n {
                    return Err(SimError::Config(format!(
                        "only {} free spawn cells for {} agents",
                        pool.len(),
                        n
                    )));
                }
                draw(&mut pool, n, &mut env_rng)
            }
        };

        // ── Roles and leader pairing ──────────────────────────────────────
        let roles = match self.roles {
            Some(r) => {
                if r.len() != n {
                    return Err(SimError::AgentCountMismatch {
                        expected: n,
                        got:      r.len(),
                        what:     "roles",
                    });
                }
                r
            }
            None => {
                let mut roles = vec![Role::Normal; n];
                for role in roles.iter_mut().take(self.config.leader_count) {
                    *role = Role::Leader;
                }
                for role in roles
                    .iter_mut()
                    .skip(self.config.leader_count)
                    .take(self.config.follower_count)
                {
                    *role = Role::Follower;
                }
                roles
            }
        };

        let leaders: Vec<AgentId> = (0..n as u32)
            .map(AgentId)
            .filter(|a| roles[a.index()] == Role::Leader)
            .collect();

        // ── Agent store ───────────────────────────────────────────────────
        let (mut agents, rngs) = AgentStoreBuilder::new(n, self.config.seed)
            .initial_epsilon(self.config.epsilon)
            .build();
        let mut occupancy = Occupancy::new(grid.rows(), grid.cols());

        let mut follower_slot = 0usize;
        for i in 0..n {
            let agent = AgentId(i as u32);
            agents.position[i] = starts[i];
            agents.target[i] = targets[i];
            agents.role[i] = roles[i];
            agents.trail[i].push(starts[i]);
            occupancy.place(agent, starts[i])?;

            if roles[i] == Role::Follower && !leaders.is_empty() {
                agents.leader[i] = leaders[follower_slot % leaders.len()];
                follower_slot += 1;
            }
        }

        Ok(Sim::new(
            self.config,
            grid,
            occupancy,
            agents,
            rngs,
            self.behavior,
            env_rng,
        ))
    }
}

/// Validate a caller-supplied placement list: right length, in bounds,
/// unblocked, pairwise distinct.
fn check_cells(grid: &Grid, cells: &[GridPos], n: usize, what: &'static str) -> SimResult<()> {
    if cells.len() != n {
        return Err(SimError::AgentCountMismatch { expected: n, got: cells.len(), what });
    }
    let mut seen = FxHashSet::default();
    for &cell in cells {
        if !grid.in_bounds(cell) {
            return Err(SimError::Config(format!("{what}: cell {cell} is out of bounds")));
        }
        if grid.is_blocked(cell) {
            return Err(SimError::Config(format!("{what}: cell {cell} is blocked")));
        }
        if !seen.insert(cell) {
            return Err(SimError::Config(format!("{what}: cell {cell} appears twice")));
        }
    }
    Ok(())
}

/// Draw `n` distinct elements from `pool` by swap-remove, consuming the
/// chosen slots.  Deterministic for a given RNG state.
fn draw(pool: &mut Vec<GridPos>, n: usize, rng: &mut SimRng) -> Vec<GridPos> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let idx = rng.gen_range(0..pool.len());
        out.push(pool.swap_remove(idx));
    }
    out
}
