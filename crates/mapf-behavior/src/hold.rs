//! A behavior that never moves.  Useful as a test fixture and as the
//! simplest possible `BehaviorModel` implementation.

use mapf_core::{AgentId, AgentRng};

use crate::model::{BehaviorModel, Decision, HoldReason};
use crate::SimContext;

/// Stands still forever.
pub struct HoldBehavior;

impl BehaviorModel for HoldBehavior {
    fn decide(&self, _agent: AgentId, _ctx: &SimContext<'_>, _rng: &mut AgentRng) -> Decision {
        Decision::hold(HoldReason::YieldWait)
    }
}
