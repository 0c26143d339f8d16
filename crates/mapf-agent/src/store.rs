//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The parallel decide phase needs `&mut AgentRngs` (exclusive mutable access
//! to each agent's RNG) and `&AgentStore` (shared read access to world state)
//! simultaneously.  Rust's borrow checker forbids this if both live inside a
//! single struct.  Keeping RNGs in a separate `AgentRngs` struct resolves the
//! conflict cleanly:
//!
//! ```ignore
//! // mapf-sim tick loop (simplified):
//! let store: &AgentStore = &sim.agents;
//! let decisions = rng_refs
//!     .into_par_iter()
//!     .zip(&awake)
//!     .map(|(rng, &agent)| behavior.decide(agent, &ctx, rng))
//!     .collect::<Vec<_>>();
//! ```

use std::collections::VecDeque;

use mapf_core::{AgentId, AgentRng, Algorithm, GridPos, Role, Tick};

use crate::selector::Selector;

// ── AgentStatus ───────────────────────────────────────────────────────────────

/// Lifecycle state of one agent.
///
/// `Waiting` and `Stuck` are both "did not move this tick", but differ in
/// prognosis: a waiting agent lost an arbitration or yielded and will retry;
/// a stuck agent exhausted every planner and stays put until the environment
/// changes.  `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentStatus {
    #[default]
    Active,
    Waiting,
    Finished,
    Stuck,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Active   => "active",
            AgentStatus::Waiting  => "waiting",
            AgentStatus::Finished => "finished",
            AgentStatus::Stuck    => "stuck",
        }
    }
}

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] to enable
/// simultaneous `&mut AgentRngs` + `&AgentStore` borrows in the decide phase.
///
/// `AgentRngs` is `Send` (the inner `SmallRng` is `Send`) but intentionally
/// not `Sync` — per-agent RNG state must never be shared between threads.
/// Rayon's per-element exclusive access pattern handles the rest.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Return mutable references to the RNGs for a set of agents.
    ///
    /// Used by mapf-sim's decide phase: the awake-agent list is zipped with
    /// the returned refs and processed in parallel.
    ///
    /// # Precondition (enforced by caller)
    ///
    /// `agents` must contain no duplicate `AgentId`s and all indices must be
    /// in-bounds.  Both invariants hold for the awake list because it is
    /// built from one ascending pass over the store.
    pub fn get_many_mut(&mut self, agents: &[AgentId]) -> Vec<&mut AgentRng> {
        let ptr = self.inner.as_mut_ptr();
        // SAFETY: Every `AgentId` in `agents` is unique (caller invariant) and
        // within bounds (simulation invariant).  Each pointer therefore aliases
        // a distinct element of `self.inner`, so no two references overlap.
        agents
            .iter()
            .map(|a| unsafe { &mut *ptr.add(a.index()) })
            .collect()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let pos = store.position[agent.index()];  // O(1), cache-friendly
/// ```
///
/// The coordinator is the only writer; behaviors read the store through a
/// shared reference inside the per-tick context.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Identity ──────────────────────────────────────────────────────────
    /// Arbitration role.  Fixed at construction.
    pub role: Vec<Role>,

    /// The leader a follower is paired with, `AgentId::INVALID` for
    /// non-followers.  Synergy bonuses are scored against this pairing.
    pub leader: Vec<AgentId>,

    // ── Spatial state ─────────────────────────────────────────────────────
    /// Current cell.  Always consistent with the occupancy map.
    pub position: Vec<GridPos>,

    /// Destination cell inside the target zone.  Unique per agent.
    pub target: Vec<GridPos>,

    /// Remaining planned route, front = next step.  Empty when no plan is
    /// held.
    pub path: Vec<VecDeque<GridPos>>,

    /// Every cell visited so far, in visit order, starting with the spawn
    /// cell.
    pub trail: Vec<Vec<GridPos>>,

    // ── Lifecycle ─────────────────────────────────────────────────────────
    pub status: Vec<AgentStatus>,

    /// Tick at which the agent reached its target, once finished.
    pub finish_tick: Vec<Option<Tick>>,

    // ── Learning state ────────────────────────────────────────────────────
    /// Algorithm the last successful plan was produced with; the preferred
    /// choice is re-drawn from `selector` on each replan.
    pub algorithm: Vec<Algorithm>,

    /// Per-agent epsilon-greedy selector over the three algorithms.
    pub selector: Vec<Selector>,
}

impl AgentStore {
    pub(crate) fn new(count: usize, initial_epsilon: f32) -> Self {
        Self {
            count,
            role:        vec![Role::default(); count],
            leader:      vec![AgentId::INVALID; count],
            position:    vec![GridPos::default(); count],
            target:      vec![GridPos::default(); count],
            path:        vec![VecDeque::new(); count],
            trail:       vec![Vec::new(); count],
            status:      vec![AgentStatus::default(); count],
            finish_tick: vec![None; count],
            algorithm:   vec![Algorithm::default(); count],
            selector:    vec![Selector::new(initial_epsilon); count],
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    #[inline]
    pub fn is_finished(&self, agent: AgentId) -> bool {
        self.status[agent.index()] == AgentStatus::Finished
    }

    /// `true` once every agent has reached its target.
    pub fn all_finished(&self) -> bool {
        self.status.iter().all(|&s| s == AgentStatus::Finished)
    }

    pub fn count_with_status(&self, status: AgentStatus) -> usize {
        self.status.iter().filter(|&&s| s == status).count()
    }
}
