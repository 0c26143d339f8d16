//! Move intents and the per-tick mailbox message types.

use mapf_core::{AgentId, GridPos};

/// One agent's claim on a destination cell for the current tick.
///
/// Built by the coordinator from each mover's [`Decision`][crate::Decision];
/// when several intents claim the same cell, arbitration picks exactly one
/// winner by `(priority desc, agent asc)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub agent: AgentId,
    pub from:  GridPos,
    pub to:    GridPos,

    /// Role-derived arbitration rank; higher wins.
    pub priority: u8,

    /// Whether this agent backs off rather than contests when it loses.
    /// Losing unwilling agents are counted as near-collisions.
    pub yield_willing: bool,
}

/// Why an agent asks another to move aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldReason {
    /// The requester's next path cell is under the recipient.
    CellOccupied,
}

/// A message posted to the per-tick mailbox during the decide phase and
/// delivered by the coordinator before arbitration.
///
/// Messages never act at a distance: a yield request only nudges the
/// recipient's bookkeeping, and a broadcast only becomes visible in the
/// *next* tick's [`SimContext::broadcasts`][crate::SimContext::broadcasts].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `from` wants `to` to vacate the cell it is standing on.
    YieldRequest {
        from:   AgentId,
        to:     AgentId,
        reason: YieldReason,
    },

    /// `from` shares its remaining route so lower-priority agents can plan
    /// around it.
    PathBroadcast {
        from: AgentId,
        path: Vec<GridPos>,
    },
}
