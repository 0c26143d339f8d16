//! Grid-subsystem error type.

use thiserror::Error;

use mapf_core::{AgentId, GridPos};

/// Errors produced by `mapf-grid`.
///
/// The mutation-rejection variants (`CellOccupied`, `InTargetZone`, …) are
/// expected during environment drift and are logged rather than propagated as
/// failures by the coordinator.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell {0} is out of bounds")]
    OutOfBounds(GridPos),

    #[error("cell {0} is occupied by an agent")]
    CellOccupied(GridPos),

    #[error("cell {0} is blocked by an obstacle")]
    CellBlocked(GridPos),

    #[error("cell {0} has no obstacle to remove")]
    NotAnObstacle(GridPos),

    #[error("cell {0} is inside the target zone")]
    InTargetZone(GridPos),

    #[error("agent {0} is not at cell {1}")]
    WrongOccupant(AgentId, GridPos),

    #[error("grid configuration error: {0}")]
    Config(String),
}

pub type GridResult<T> = Result<T, GridError>;
