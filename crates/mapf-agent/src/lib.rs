//! `mapf-agent` — agent state storage and the learning algorithm selector.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`store`]    | `AgentStore` (SoA data), `AgentStatus`, `AgentRngs`       |
//! | [`builder`]  | `AgentStoreBuilder` — allocate store + RNGs in one step   |
//! | [`selector`] | `Selector` — epsilon-greedy Q-value algorithm choice      |
//!
//! Agent state is stored structure-of-arrays: every field is a `Vec` indexed
//! by `AgentId`, so the per-tick loops touch flat memory.  RNGs live in a
//! separate [`AgentRngs`] struct so the decide phase can hold `&AgentStore`
//! and `&mut AgentRngs` at the same time.

pub mod builder;
pub mod selector;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::AgentStoreBuilder;
pub use selector::{Selector, REWARD_COLLISION, REWARD_FINISH};
pub use store::{AgentRngs, AgentStatus, AgentStore};
