//! Plain data row types written by output backends.

/// Sentinel for "no agent" in an [`EventRow`].
pub const NO_AGENT: u32 = u32::MAX;

/// Sentinel for "no cell" in an [`EventRow`].
pub const NO_CELL: i32 = -1;

/// A snapshot of one agent's state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub row:      u16,
    pub col:      u16,
    pub role:     &'static str,
    pub status:   &'static str,
    /// Steps remaining on the current plan.
    pub path_len: u64,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:     u64,
    pub active:   u64,
    pub waiting:  u64,
    pub finished: u64,
    pub stuck:    u64,
    /// Coordination events the tick produced.
    pub events:   u64,
}

/// One coordination event, flattened for tabular output.
///
/// `agent_b` is [`NO_AGENT`] for single-agent events; `row`/`col` are
/// [`NO_CELL`] for events without a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    pub tick:    u64,
    pub kind:    &'static str,
    pub agent_a: u32,
    pub agent_b: u32,
    pub row:     i32,
    pub col:     i32,
}
