//! `mapf-grid` — the shared environment: terrain costs, obstacles, the goal
//! region, and the cell-occupancy map.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`grid`]      | `Grid` (SoA cost/obstacle arrays), `GridBuilder`       |
//! | [`occupancy`] | `Occupancy` — cell → occupant map, one agent per cell  |
//! | [`error`]     | `GridError`, `GridResult<T>`                           |
//!
//! # Single-writer discipline
//!
//! Only the coordinator mutates a `Grid` or `Occupancy`, and only between
//! ticks.  Agents see both exclusively through shared references inside the
//! per-tick context, so there is nothing to lock.

pub mod error;
pub mod grid;
pub mod occupancy;

#[cfg(test)]
mod tests;

pub use error::{GridError, GridResult};
pub use grid::{Grid, GridBuilder};
pub use occupancy::Occupancy;
