//! Run-level counters accumulated by the coordinator.

/// Totals for one simulation run.
///
/// Most counters track a matching [`SimEvent`][crate::SimEvent] one-to-one;
/// `yields_sent` aggregates the honored/ignored split, and
/// `algorithm_switches` also counts exhausted fallback chains that emit no
/// switch event.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Contested-cell arbitrations resolved (one per losing intent).
    pub collisions_avoided: u64,

    /// Subset of arbitrations where the loser matched the winner's priority
    /// or refused to yield.
    pub near_collisions: u64,

    /// Yield requests delivered (= honored + ignored).
    pub yields_sent: u64,
    pub yields_honored: u64,
    pub yields_ignored: u64,
    pub path_broadcasts: u64,

    /// Successful replans (plan installs), including initial planning.
    pub replans: u64,

    /// Total algorithms skipped over by fallback, counting both successful
    /// replans and exhausted chains that left the agent stuck.
    pub algorithm_switches: u64,

    pub finished: u64,

    /// Transitions into the stuck state (not stuck-ticks).
    pub stuck_transitions: u64,

    pub synergy_bonuses: u64,
    pub drift_applied: u64,
    pub drift_rejected: u64,

    /// Ticks actually processed (may stop early when everyone finishes).
    pub ticks_run: u64,

    /// Sum of finish ticks, for the average.
    pub finish_tick_sum: u64,
}

impl Metrics {
    /// Mean finish tick over finished agents, or `None` if nobody finished.
    pub fn average_finish_tick(&self) -> Option<f64> {
        (self.finished > 0).then(|| self.finish_tick_sum as f64 / self.finished as f64)
    }
}
