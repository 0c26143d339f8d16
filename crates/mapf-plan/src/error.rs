//! Path-search error type.

use thiserror::Error;

use mapf_core::GridPos;

#[derive(Debug, Clone, Error)]
pub enum PlanError {
    /// The searched region contains no unblocked route from `from` to `to`.
    /// For ceiling-limited planners this includes routes priced out by
    /// expensive cells.
    #[error("no path found from {from} to {to}")]
    NoPathFound { from: GridPos, to: GridPos },

    /// Start or goal lies outside the grid.
    #[error("endpoint {0} is out of bounds")]
    OutOfBounds(GridPos),

    /// The goal cell itself is blocked; no planner can succeed.
    #[error("goal {0} is blocked by an obstacle")]
    GoalBlocked(GridPos),
}

pub type PlanResult<T> = Result<T, PlanError>;
