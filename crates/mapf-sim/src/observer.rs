//! Simulation observer trait for progress reporting and data collection.

use mapf_agent::AgentStore;
use mapf_core::Tick;
use mapf_grid::Grid;

use crate::{Metrics, SimEvent};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — collision printer
///
/// ```rust,ignore
/// struct CollisionPrinter;
///
/// impl SimObserver for CollisionPrinter {
///     fn on_tick_end(&mut self, tick: Tick, events: &[SimEvent]) {
///         for e in events {
///             if let SimEvent::CollisionAvoided { winner, loser, cell } = e {
///                 println!("{tick}: {winner} beat {loser} at {cell}");
///             }
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with every event the tick produced.
    fn on_tick_end(&mut self, _tick: Tick, _events: &[SimEvent]) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks).
    ///
    /// Provides read-only access to the full agent and grid state so that
    /// output writers can record a position snapshot without the sim needing
    /// to know about any specific output format.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentStore, _grid: &Grid) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _metrics: &Metrics) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
