//! `mapf-sim` — tick loop coordinator for the rust_mapf simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks (or until everyone finishes):
//!   ① Decide    — BehaviorModel::decide for every non-finished agent,
//!                 against a read-only world snapshot (parallel with the
//!                 `parallel` feature).
//!   ② Apply     — install new plans; gather messages; Move → Intent.
//!   ③ Mailbox   — yield requests resolved; broadcasts published for the
//!                 next tick.
//!   ④ Arbitrate — one winner per contested cell: (priority desc, id asc).
//!   ⑤ Commit    — winners move (chain-aware passes); arrivals finish,
//!                 reward their algorithm, decay exploration fleet-wide,
//!                 and score synergy pairs.
//!   ⑥ Drift     — maybe add/remove an obstacle or raise a cost.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the decide phase on Rayon's thread pool.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mapf_behavior::Navigator;
//! use mapf_sim::{NoopObserver, SimBuilder};
//!
//! let behavior = Navigator::new(config.cost_ceiling, config.broadcast_interval_ticks);
//! let mut sim = SimBuilder::new(config, behavior).build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("finished: {}", sim.metrics.finished);
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod metrics;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event::{DriftKind, SimEvent};
pub use metrics::Metrics;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
