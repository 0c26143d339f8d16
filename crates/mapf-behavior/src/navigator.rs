//! The standard behavior: plan a route, follow it, yield and replan when the
//! world gets in the way.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use mapf_agent::AgentStatus;
use mapf_core::{AgentId, AgentRng, Algorithm, GridPos};
use mapf_plan::PlannerSet;

use crate::intent::{Message, YieldReason};
use crate::model::{Action, BehaviorModel, Decision, HoldReason, NewPlan};
use crate::SimContext;

/// Plan-and-follow navigation with cooperative avoidance.
///
/// Per tick, for one agent:
///
/// 1. **Replan** if the agent holds no route, the next cell became blocked or
///    is parked on by a finished agent, or the agent spent last tick waiting.
///    The preferred algorithm is drawn from the agent's selector; failures
///    fall through the fixed algorithm order.
/// 2. **Broadcast** the remaining route on the agent's staggered slot
///    (`(tick + id) % interval == 0`), so others can plan around it next
///    tick.  An interval of 0 disables broadcasting.
/// 3. **Act**: step onto the next cell if free; otherwise ask the occupant to
///    yield and hold.  If no planner found any route, report stuck.
///
/// Replanning is two-stage: first around every currently occupied cell and
/// every higher-priority broadcast route, then — if that over-constrains the
/// search — around static obstacles only.  Occupied cells are transient, so
/// a route through one is still worth holding.
pub struct Navigator {
    planners: PlannerSet,
    broadcast_interval: u64,
}

impl Navigator {
    /// `broadcast_interval_ticks == 0` disables path broadcasts entirely.
    pub fn new(cost_ceiling: f32, broadcast_interval_ticks: u64) -> Self {
        Self {
            planners: PlannerSet::new(cost_ceiling),
            broadcast_interval: broadcast_interval_ticks,
        }
    }

    /// Cells to route around: everything occupied right now, plus the
    /// broadcast routes of strictly higher-priority agents.  The agent's own
    /// cell and target are always planable.
    fn avoid_set(&self, agent: AgentId, ctx: &SimContext<'_>) -> FxHashSet<GridPos> {
        let i = agent.index();
        let my_priority = ctx.agents.role[i].priority();

        let mut avoid: FxHashSet<GridPos> =
            ctx.occupancy.occupied_cells().map(|(pos, _)| pos).collect();

        for other in ctx.agents.agent_ids() {
            if other == agent {
                continue;
            }
            if ctx.agents.role[other.index()].priority() > my_priority {
                avoid.extend(ctx.broadcasts[other.index()].iter().copied());
            }
        }

        avoid.remove(&ctx.agents.position[i]);
        avoid.remove(&ctx.agents.target[i]);
        avoid
    }

    fn replan(&self, agent: AgentId, ctx: &SimContext<'_>, rng: &mut AgentRng) -> Option<NewPlan> {
        let i = agent.index();
        let start = ctx.agents.position[i];
        let goal = ctx.agents.target[i];
        let preferred = ctx.agents.selector[i].choose(rng);

        let avoid = self.avoid_set(agent, ctx);
        let outcome = self
            .planners
            .plan(preferred, ctx.grid, start, goal, &avoid)
            .or_else(|_| {
                // Cooperative avoidance over-constrained the search; fall
                // back to static obstacles only.
                self.planners
                    .plan(preferred, ctx.grid, start, goal, &FxHashSet::default())
            })
            .ok()?;

        Some(NewPlan {
            cells:     outcome.path.into_cells().into_iter().collect::<VecDeque<_>>(),
            algorithm: outcome.algorithm,
            switches:  outcome.switches,
        })
    }
}

impl BehaviorModel for Navigator {
    fn decide(&self, agent: AgentId, ctx: &SimContext<'_>, rng: &mut AgentRng) -> Decision {
        let i = agent.index();
        let path = &ctx.agents.path[i];
        let next = path.front().copied();

        // A waiting agent lost arbitration or yielded last tick; replanning
        // around the blockage beats retrying the same contested cell.
        let stalled = ctx.agents.status[i] == AgentStatus::Waiting;
        let next_unusable = match next {
            None => true,
            Some(n) => {
                ctx.grid.is_blocked(n)
                    || ctx
                        .occupancy
                        .occupant(n)
                        .is_some_and(|o| ctx.agents.is_finished(o))
            }
        };

        let mut new_plan = None;
        let mut route_next = next;
        if next_unusable || stalled {
            match self.replan(agent, ctx, rng) {
                Some(plan) => {
                    route_next = plan.cells.front().copied();
                    new_plan = Some(plan);
                }
                // Exhausting the chain still burned through the non-preferred
                // algorithms; report that alongside the hold.
                None => {
                    return Decision::hold(HoldReason::Stuck {
                        switches: Algorithm::ALL.len() as u32 - 1,
                    });
                }
            }
        }

        let mut messages = Vec::new();

        // Staggered by id so the whole fleet doesn't broadcast on one tick.
        if self.broadcast_interval > 0
            && (ctx.tick.0 + agent.0 as u64) % self.broadcast_interval == 0
        {
            let remaining: Vec<GridPos> = match &new_plan {
                Some(plan) => plan.cells.iter().copied().collect(),
                None => path.iter().copied().collect(),
            };
            if !remaining.is_empty() {
                messages.push(Message::PathBroadcast { from: agent, path: remaining });
            }
        }

        let action = match route_next {
            Some(n) => match ctx.occupancy.occupant(n) {
                None => Action::Move(n),
                Some(blocker) => {
                    messages.push(Message::YieldRequest {
                        from:   agent,
                        to:     blocker,
                        reason: YieldReason::CellOccupied,
                    });
                    Action::Hold(HoldReason::YieldWait)
                }
            },
            // Empty route with the agent not at its target cannot happen;
            // at the target the coordinator has already finished it.
            None => Action::Hold(HoldReason::YieldWait),
        };

        Decision { new_plan, action, messages }
    }
}
