//! `mapf-core` — foundational types for the `rust_mapf` multi-agent
//! pathfinding simulation.
//!
//! This crate is a dependency of every other `mapf-*` crate.  It intentionally
//! has no `mapf-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `AgentId`                                             |
//! | [`pos`]       | `GridPos`, Manhattan distance                         |
//! | [`time`]      | `Tick`                                                |
//! | [`config`]    | `SimConfig` and fail-fast validation                  |
//! | [`rng`]       | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`role`]      | `Role` enum and priority derivation                   |
//! | [`algorithm`] | `Algorithm` enum (A*, BFS, Dijkstra)                  |
//! | [`error`]     | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod algorithm;
pub mod config;
pub mod error;
pub mod ids;
pub mod pos;
pub mod rng;
pub mod role;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use algorithm::Algorithm;
pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use ids::AgentId;
pub use pos::GridPos;
pub use rng::{AgentRng, SimRng};
pub use role::Role;
pub use time::Tick;
