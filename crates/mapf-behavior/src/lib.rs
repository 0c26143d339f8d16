//! `mapf-behavior` — how agents decide what to do each tick.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`model`]     | `BehaviorModel` trait, `Decision`, `Action`, `NewPlan`   |
//! | [`context`]   | `SimContext` — read-only per-tick world snapshot         |
//! | [`intent`]    | `Intent` (move claims), `Message` (yields, broadcasts)   |
//! | [`navigator`] | `Navigator` — plan, follow, yield, replan                |
//! | [`hold`]      | `HoldBehavior` — stand still (testing baseline)          |
//!
//! Behaviors are pure with respect to world state: they read a shared
//! [`SimContext`] and their own [`AgentRng`](mapf_core::AgentRng), and return
//! a [`Decision`].  All mutation happens later, in the coordinator's apply
//! phase, so the decide phase can fan out across threads.

pub mod context;
pub mod hold;
pub mod intent;
pub mod model;
pub mod navigator;


pub use context::SimContext;
pub use hold::HoldBehavior;
pub use intent::{Intent, Message, YieldReason};
pub use model::{Action, BehaviorModel, Decision, HoldReason, NewPlan};
pub use navigator::Navigator;
