//! Per-tick coordination events, surfaced to observers and output writers.

use mapf_core::{AgentId, Algorithm, GridPos};

/// Which kind of environment drift an operation attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    ObstacleAdded,
    ObstacleRemoved,
    CostRaised,
}

impl DriftKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DriftKind::ObstacleAdded   => "obstacle_added",
            DriftKind::ObstacleRemoved => "obstacle_removed",
            DriftKind::CostRaised      => "cost_raised",
        }
    }
}

/// Something noteworthy that happened during one tick.
///
/// Events are accumulated by the coordinator while processing a tick and
/// handed to [`SimObserver::on_tick_end`][crate::SimObserver::on_tick_end]
/// as a batch.  Within one tick they appear in processing order, which is
/// itself deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Two move intents claimed `cell`; arbitration let `winner` through and
    /// made `loser` wait.
    CollisionAvoided {
        winner: AgentId,
        loser:  AgentId,
        cell:   GridPos,
    },

    /// A contested claim where the loser matched the winner's priority or
    /// refused to yield — the close calls worth watching separately.
    NearCollision {
        winner: AgentId,
        loser:  AgentId,
        cell:   GridPos,
    },

    /// `to` agreed to vacate for `from` and will replan.
    YieldHonored { from: AgentId, to: AgentId },

    /// `to` declined to move for `from` (rank or unwillingness).
    YieldIgnored { from: AgentId, to: AgentId },

    /// Agent stepped onto its target cell.
    AgentFinished { agent: AgentId },

    /// Every planner failed for this agent; it stays put until the
    /// environment changes.
    AgentStuck { agent: AgentId },

    /// A replan succeeded only after `switches` preferred algorithms failed.
    AlgorithmSwitch {
        agent:    AgentId,
        to:       Algorithm,
        switches: u32,
    },

    /// A leader/follower pair finished within the synergy window.
    SynergyBonus {
        leader:   AgentId,
        follower: AgentId,
    },

    /// Environment drift mutated the grid.
    DriftApplied { kind: DriftKind, cell: GridPos },

    /// Environment drift targeted an ineligible cell and was dropped.
    DriftRejected { kind: DriftKind, cell: GridPos },
}

impl SimEvent {
    /// Stable label for output rows and logs.
    pub fn kind_str(&self) -> &'static str {
        match self {
            SimEvent::CollisionAvoided { .. } => "collision_avoided",
            SimEvent::NearCollision { .. }    => "near_collision",
            SimEvent::YieldHonored { .. }     => "yield_honored",
            SimEvent::YieldIgnored { .. }     => "yield_ignored",
            SimEvent::AgentFinished { .. }    => "agent_finished",
            SimEvent::AgentStuck { .. }       => "agent_stuck",
            SimEvent::AlgorithmSwitch { .. }  => "algorithm_switch",
            SimEvent::SynergyBonus { .. }     => "synergy_bonus",
            SimEvent::DriftApplied { .. }     => "drift_applied",
            SimEvent::DriftRejected { .. }    => "drift_rejected",
        }
    }
}
