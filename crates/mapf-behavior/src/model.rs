//! The `BehaviorModel` trait — the main extension point for user code.

use std::collections::VecDeque;

use mapf_core::{AgentId, AgentRng, Algorithm, GridPos};

use crate::{Message, SimContext};

/// Why an agent chose not to move this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    /// Next cell is taken; a yield request is in flight and the agent will
    /// retry.
    YieldWait,

    /// Every planner failed.  The agent stays put until the environment
    /// changes.  `switches` is how many non-preferred algorithms the failed
    /// fallback chain burned through, so the attempt still shows up in the
    /// run totals.
    Stuck { switches: u32 },
}

/// What the agent does with its feet this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Step onto the (adjacent) cell — subject to arbitration.
    Move(GridPos),
    Hold(HoldReason),
}

/// A freshly computed route, to be installed in the store during the apply
/// phase.
#[derive(Debug, Clone)]
pub struct NewPlan {
    /// Remaining route, front = next step.  Excludes the current cell.
    pub cells: VecDeque<GridPos>,

    /// Algorithm that produced the route.
    pub algorithm: Algorithm,

    /// How many algorithms failed before this one succeeded.
    pub switches: u32,
}

/// Everything one agent decided in one tick.
#[derive(Debug, Clone)]
pub struct Decision {
    /// Replacement route, if the agent replanned.
    pub new_plan: Option<NewPlan>,

    pub action: Action,

    /// Mailbox traffic: yield requests and path broadcasts.
    pub messages: Vec<Message>,
}

impl Decision {
    /// Stand still, no plan change, no messages.
    pub fn hold(reason: HoldReason) -> Self {
        Self { new_plan: None, action: Action::Hold(reason), messages: Vec::new() }
    }
}

/// Pluggable agent behavior.
///
/// Implement this trait to define how agents decide what to do each tick.
/// All methods receive a read-only [`SimContext`] and a mutable per-agent
/// [`AgentRng`] so behavior is deterministic regardless of thread ordering.
///
/// # Thread safety
///
/// The simulation loop may call `decide` for many agents in parallel, so
/// implementations must be `Send + Sync`.  State that varies per agent must
/// live in `AgentStore` (accessed read-only through `ctx.agents`), not in
/// the model itself.
pub trait BehaviorModel: Send + Sync + 'static {
    /// Called once per non-finished agent per tick.
    ///
    /// The returned [`Decision`] is pure intent: the coordinator applies the
    /// plan change, delivers the messages, and arbitrates the move against
    /// everyone else's.
    fn decide(
        &self,
        agent: AgentId,
        ctx:   &SimContext<'_>,
        rng:   &mut AgentRng,
    ) -> Decision;
}
