//! Read-only simulation state passed to every behavior callback.

use mapf_agent::AgentStore;
use mapf_core::{GridPos, Tick};
use mapf_grid::{Grid, Occupancy};

/// A read-only snapshot of the simulation state passed to every
/// [`BehaviorModel`][crate::BehaviorModel] callback.
///
/// `SimContext` is built once per tick by mapf-sim and shared (immutably)
/// across all agent callbacks during the decide phase.
///
/// # Lifetimes
///
/// All borrows live for the duration of one tick's decide phase.  mapf-sim
/// never allows mutable access to these structures while `SimContext` is
/// live.
pub struct SimContext<'a> {
    /// Current simulation tick.
    pub tick: Tick,

    /// The environment: costs, obstacles, target zone.
    pub grid: &'a Grid,

    /// Who stands where, as of the start of this tick.
    pub occupancy: &'a Occupancy,

    /// Read-only view of every agent's SoA state arrays.
    pub agents: &'a AgentStore,

    /// Most recently broadcast path per agent, indexed by `AgentId`.  An
    /// empty slice means the agent has never broadcast (or has nothing
    /// left to share).
    pub broadcasts: &'a [Vec<GridPos>],
}

impl<'a> SimContext<'a> {
    /// Build a new context for a single tick.
    #[inline]
    pub fn new(
        tick:       Tick,
        grid:       &'a Grid,
        occupancy:  &'a Occupancy,
        agents:     &'a AgentStore,
        broadcasts: &'a [Vec<GridPos>],
    ) -> Self {
        Self { tick, grid, occupancy, agents, broadcasts }
    }
}
