//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use mapf_agent::{AgentStatus, AgentStore};
use mapf_core::Tick;
use mapf_grid::Grid;
use mapf_sim::{DriftKind, SimEvent, SimObserver};

use crate::row::{AgentSnapshotRow, EventRow, TickSummaryRow, NO_AGENT, NO_CELL};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes agent snapshots, tick summaries, and events
/// to any [`OutputWriter`] backend (CSV, SQLite).
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer: W,
    /// Event count of the current tick; the tick-end hook fires before the
    /// snapshot hook, so the summary row can include it.
    tick_events: u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            tick_events: 0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, events: &[SimEvent]) {
        self.tick_events = events.len() as u64;
        if events.is_empty() {
            return;
        }
        let rows: Vec<EventRow> = events.iter().map(|e| event_row(tick, e)).collect();
        let result = self.writer.write_events(&rows);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore, _grid: &Grid) {
        let rows: Vec<AgentSnapshotRow> = (0..agents.count)
            .map(|i| AgentSnapshotRow {
                agent_id: i as u32,
                tick:     tick.0,
                row:      agents.position[i].row,
                col:      agents.position[i].col,
                role:     agents.role[i].as_str(),
                status:   agents.status[i].as_str(),
                path_len: agents.path[i].len() as u64,
            })
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }

        let summary = TickSummaryRow {
            tick:     tick.0,
            active:   agents.count_with_status(AgentStatus::Active) as u64,
            waiting:  agents.count_with_status(AgentStatus::Waiting) as u64,
            finished: agents.count_with_status(AgentStatus::Finished) as u64,
            stuck:    agents.count_with_status(AgentStatus::Stuck) as u64,
            events:   self.tick_events,
        };
        let result = self.writer.write_tick_summary(&summary);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _metrics: &mapf_sim::Metrics) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

/// Flatten one event into a tabular row.
fn event_row(tick: Tick, event: &SimEvent) -> EventRow {
    let mut row = EventRow {
        tick:    tick.0,
        kind:    event.kind_str(),
        agent_a: NO_AGENT,
        agent_b: NO_AGENT,
        row:     NO_CELL,
        col:     NO_CELL,
    };
    match *event {
        SimEvent::CollisionAvoided { winner, loser, cell }
        | SimEvent::NearCollision { winner, loser, cell } => {
            row.agent_a = winner.0;
            row.agent_b = loser.0;
            row.row = cell.row as i32;
            row.col = cell.col as i32;
        }
        SimEvent::YieldHonored { from, to } | SimEvent::YieldIgnored { from, to } => {
            row.agent_a = from.0;
            row.agent_b = to.0;
        }
        SimEvent::AgentFinished { agent }
        | SimEvent::AgentStuck { agent }
        | SimEvent::AlgorithmSwitch { agent, .. } => {
            row.agent_a = agent.0;
        }
        SimEvent::SynergyBonus { leader, follower } => {
            row.agent_a = leader.0;
            row.agent_b = follower.0;
        }
        SimEvent::DriftApplied { kind, cell } => {
            row.kind = drift_kind_str(kind, true);
            row.row = cell.row as i32;
            row.col = cell.col as i32;
        }
        SimEvent::DriftRejected { kind, cell } => {
            row.kind = drift_kind_str(kind, false);
            row.row = cell.row as i32;
            row.col = cell.col as i32;
        }
    }
    row
}

fn drift_kind_str(kind: DriftKind, applied: bool) -> &'static str {
    match (kind, applied) {
        (DriftKind::ObstacleAdded, true)    => "drift_obstacle_added",
        (DriftKind::ObstacleAdded, false)   => "drift_obstacle_add_rejected",
        (DriftKind::ObstacleRemoved, true)  => "drift_obstacle_removed",
        (DriftKind::ObstacleRemoved, false) => "drift_obstacle_remove_rejected",
        (DriftKind::CostRaised, true)       => "drift_cost_raised",
        (DriftKind::CostRaised, false)      => "drift_cost_raise_rejected",
    }
}
