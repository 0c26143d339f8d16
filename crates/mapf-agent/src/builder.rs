//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use mapf_agent::AgentStoreBuilder;
//!
//! let (store, rngs) = AgentStoreBuilder::new(16, /*seed=*/ 42)
//!     .initial_epsilon(0.2)
//!     .build();
//!
//! assert_eq!(store.count, 16);
//! assert_eq!(rngs.len(),  16);
//!
//! // Fill in positions, targets, and roles after building.
//! // (All arrays start at sentinel / default values.)
//! ```

use crate::{AgentRngs, AgentStore};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// All arrays are pre-allocated at construction time so later field writes
/// (from the simulation builder's placement pass) are simple indexed
/// assignments, not pushes.
pub struct AgentStoreBuilder {
    count: usize,
    seed: u64,
    initial_epsilon: f32,
}

impl AgentStoreBuilder {
    /// Create a builder for `count` agents using `seed` as the global RNG
    /// seed.
    pub fn new(count: usize, seed: u64) -> Self {
        Self { count, seed, initial_epsilon: 0.0 }
    }

    /// Starting exploration rate for every agent's selector.  Default: 0
    /// (pure exploitation).
    pub fn initial_epsilon(mut self, epsilon: f32) -> Self {
        self.initial_epsilon = epsilon;
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.
    ///
    /// All SoA arrays are allocated and filled with sentinel / default
    /// values; the simulation builder writes actual positions, targets, and
    /// roles directly to the `pub` fields afterwards.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let store = AgentStore::new(self.count, self.initial_epsilon);
        let rngs = AgentRngs::new(self.count, self.seed);
        (store, rngs)
    }
}
