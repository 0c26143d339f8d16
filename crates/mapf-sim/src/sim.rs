//! The `Sim` struct and its tick loop.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;

use mapf_agent::{AgentRngs, AgentStatus, AgentStore, REWARD_COLLISION, REWARD_FINISH};
use mapf_behavior::{Action, BehaviorModel, Decision, HoldReason, Intent, Message, SimContext};
use mapf_core::{AgentId, GridPos, SimConfig, SimRng, Tick};
use mapf_grid::{Grid, Occupancy};

use crate::event::{DriftKind, SimEvent};
use crate::{Metrics, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<B>` holds all simulation state and drives the tick loop:
///
/// 1. **Decide** (optionally parallel with the `parallel` feature): call
///    [`BehaviorModel::decide`] for every non-finished agent against a
///    read-only snapshot of the world.
/// 2. **Apply** (sequential, ascending `AgentId` for determinism): install
///    new plans, collect mailbox messages, and turn `Move` actions into
///    [`Intent`]s.
/// 3. **Mailbox**: deliver yield requests (the honoring recipient drops its
///    plan and replans next tick) and publish path broadcasts for the *next*
///    tick's context.
/// 4. **Arbitrate**: group intents by destination cell; exactly one winner
///    per cell by `(priority desc, AgentId asc)`.  Losers wait and their
///    active algorithm takes a penalty.
/// 5. **Commit**: move winners, repeating passes so that chains of agents
///    vacating cells for each other resolve regardless of id order.  Agents
///    reaching their target finish, score a reward, decay everyone's
///    exploration rate, and are checked for a synergy bonus.
/// 6. **Drift**: with configured probability, mutate one grid cell (add or
///    remove an obstacle, or raise a cost).  Ineligible cells reject the
///    drift rather than redrawing.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BehaviorModel> {
    /// Global configuration (grid size, counts, learning rates, …).
    pub config: SimConfig,

    /// Current tick.
    pub tick: Tick,

    /// The environment.  Mutated only by drift, between agent phases.
    pub grid: Grid,

    /// Who stands where.  The commit phase is its only writer.
    pub occupancy: Occupancy,

    /// Agent state (SoA arrays).  Behavior models access this read-only
    /// through `SimContext`.
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// The behavior model.  Called once per non-finished agent per tick.
    pub behavior: B,

    /// Latest broadcast route per agent, indexed by `AgentId`.  Written by
    /// the mailbox phase, read by the *next* tick's decide phase.
    pub broadcasts: Vec<Vec<GridPos>>,

    /// Run totals.
    pub metrics: Metrics,

    /// Environment RNG: drift rolls, independent of every agent stream.
    pub env_rng: SimRng,

    /// Events accumulated during the current tick.
    events: Vec<SimEvent>,
}

impl<B: BehaviorModel> Sim<B> {
    // ── Public API ────────────────────────────────────────────────────────

    pub(crate) fn new(
        config:    SimConfig,
        grid:      Grid,
        occupancy: Occupancy,
        agents:    AgentStore,
        rngs:      AgentRngs,
        behavior:  B,
        env_rng:   SimRng,
    ) -> Self {
        let broadcasts = vec![Vec::new(); agents.count];
        Self {
            config,
            tick: Tick::ZERO,
            grid,
            occupancy,
            agents,
            rngs,
            behavior,
            broadcasts,
            metrics: Metrics::default(),
            env_rng,
            events: Vec::new(),
        }
    }

    /// Run from the current tick until `config.end_tick()`, or earlier if
    /// every agent finishes.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.tick < self.config.end_tick() && !self.agents.all_finished() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.tick, &self.metrics);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`
    /// and early finish).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.tick;
        observer.on_tick_start(now);
        self.process_tick(now)?;

        let events = std::mem::take(&mut self.events);
        observer.on_tick_end(now, &events);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.agents, &self.grid);
        }

        self.metrics.ticks_run += 1;
        self.tick = now + 1;
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<()> {
        // ── Phase 1: decide (read-only world, per-agent RNG) ──────────────
        let awake: Vec<AgentId> = self
            .agents
            .agent_ids()
            .filter(|&a| !self.agents.is_finished(a))
            .collect();
        if awake.is_empty() {
            self.drift(now)?;
            return Ok(());
        }
        let decisions = self.compute_decisions(now, &awake);

        // ── Phase 2: apply plans, collect mail, build intents ─────────────
        //
        // Sequential in ascending AgentId (the order `awake` was built in),
        // so results are deterministic even when deciding ran in parallel.
        let mut mailbox: Vec<Message> = Vec::new();
        let mut intents: Vec<Intent> = Vec::new();
        let mut holds: Vec<(AgentId, HoldReason)> = Vec::new();

        for (&agent, decision) in awake.iter().zip(decisions) {
            let i = agent.index();
            let Decision { new_plan, action, messages } = decision;

            if let Some(plan) = new_plan {
                self.metrics.replans += 1;
                if plan.switches > 0 {
                    self.metrics.algorithm_switches += plan.switches as u64;
                    self.events.push(SimEvent::AlgorithmSwitch {
                        agent,
                        to:       plan.algorithm,
                        switches: plan.switches,
                    });
                }
                self.agents.algorithm[i] = plan.algorithm;
                self.agents.path[i] = plan.cells;
            }

            mailbox.extend(messages);

            match action {
                Action::Move(to) => intents.push(Intent {
                    agent,
                    from: self.agents.position[i],
                    to,
                    priority:      self.agents.role[i].priority(),
                    yield_willing: self.agents.role[i].yield_willing(),
                }),
                Action::Hold(reason) => holds.push((agent, reason)),
            }
        }

        // ── Phase 3: mailbox ──────────────────────────────────────────────
        self.deliver_mailbox(mailbox);

        // ── Phase 4 + 5: arbitration and commit ───────────────────────────
        let winners = self.arbitrate(&intents);
        self.commit_moves(now, winners);

        // ── Holds: waiting and stuck bookkeeping ──────────────────────────
        for (agent, reason) in holds {
            let i = agent.index();
            if self.agents.status[i] == AgentStatus::Finished {
                continue;
            }
            match reason {
                HoldReason::YieldWait => self.agents.status[i] = AgentStatus::Waiting,
                HoldReason::Stuck { switches } => {
                    // Every failed chain counts its fallback attempts, even
                    // when the agent was already stuck.
                    self.metrics.algorithm_switches += switches as u64;
                    // Penalize and log the transition once; staying stuck is
                    // not news.
                    if self.agents.status[i] != AgentStatus::Stuck {
                        self.agents.status[i] = AgentStatus::Stuck;
                        self.metrics.stuck_transitions += 1;
                        self.events.push(SimEvent::AgentStuck { agent });
                        let alg = self.agents.algorithm[i];
                        self.agents.selector[i].update(alg, REWARD_COLLISION, self.config.alpha);
                    }
                }
            }
        }

        // ── Phase 6: environment drift ────────────────────────────────────
        self.drift(now)?;

        Ok(())
    }

    /// Call the behavior for every awake agent.
    ///
    /// With the `parallel` Cargo feature the calls run on Rayon's thread
    /// pool; the split borrow (`&AgentStore` + disjoint `&mut AgentRng`s)
    /// keeps the phase side-effect-free either way.
    fn compute_decisions(&mut self, now: Tick, awake: &[AgentId]) -> Vec<Decision> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let agents     = &self.agents;
        let grid       = &self.grid;
        let occupancy  = &self.occupancy;
        let broadcasts = self.broadcasts.as_slice();
        let behavior   = &self.behavior;
        let rngs       = &mut self.rngs;

        let ctx = SimContext::new(now, grid, occupancy, agents, broadcasts);

        #[cfg(not(feature = "parallel"))]
        {
            awake
                .iter()
                .map(|&agent| behavior.decide(agent, &ctx, rngs.get_mut(agent)))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // `get_many_mut` returns disjoint &mut refs indexed by unique
            // AgentIds; `awake` is built from one ascending pass.
            let rng_refs = rngs.get_many_mut(awake);

            awake
                .par_iter()
                .zip(rng_refs.into_par_iter())
                .map(|(&agent, rng)| behavior.decide(agent, &ctx, rng))
                .collect()
        }
    }

    /// Deliver yield requests and publish path broadcasts.
    ///
    /// A yield is honored when the requester outranks a willing, unfinished
    /// recipient; honoring drops the recipient's plan so it routes around
    /// the contention next tick.  Broadcasts overwrite the sender's slot and
    /// become visible in the next tick's context.
    fn deliver_mailbox(&mut self, mailbox: Vec<Message>) {
        for message in mailbox {
            match message {
                Message::YieldRequest { from, to, reason: _ } => {
                    let fi = from.index();
                    let ti = to.index();
                    self.metrics.yields_sent += 1;
                    let honored = !self.agents.is_finished(to)
                        && self.agents.role[ti].yield_willing()
                        && self.agents.role[fi].priority() > self.agents.role[ti].priority();
                    if honored {
                        self.agents.path[ti].clear();
                        self.metrics.yields_honored += 1;
                        self.events.push(SimEvent::YieldHonored { from, to });
                    } else {
                        self.metrics.yields_ignored += 1;
                        self.events.push(SimEvent::YieldIgnored { from, to });
                    }
                }
                Message::PathBroadcast { from, path } => {
                    self.metrics.path_broadcasts += 1;
                    self.broadcasts[from.index()] = path;
                }
            }
        }
    }

    /// Pick one winner per contested cell; losers wait and take a penalty.
    ///
    /// Returns the winning intents in ascending destination-cell order.
    fn arbitrate(&mut self, intents: &[Intent]) -> Vec<Intent> {
        let mut by_cell: FxHashMap<GridPos, Vec<Intent>> = FxHashMap::default();
        for &intent in intents {
            by_cell.entry(intent.to).or_default().push(intent);
        }

        let mut cells: Vec<GridPos> = by_cell.keys().copied().collect();
        cells.sort_unstable();

        let mut winners = Vec::with_capacity(cells.len());
        for cell in cells {
            let mut group = by_cell.remove(&cell).unwrap_or_default();
            group.sort_unstable_by_key(|intent| (Reverse(intent.priority), intent.agent));
            let mut group = group.into_iter();
            let Some(winner) = group.next() else { continue };

            for loser in group {
                let li = loser.agent.index();
                self.agents.status[li] = AgentStatus::Waiting;
                self.metrics.collisions_avoided += 1;
                self.events.push(SimEvent::CollisionAvoided {
                    winner: winner.agent,
                    loser:  loser.agent,
                    cell,
                });
                // A matched-rank contest or an unwilling loser came closer
                // to an actual collision than a clean arbitration.
                if loser.priority == winner.priority || !loser.yield_willing {
                    self.metrics.near_collisions += 1;
                    self.events.push(SimEvent::NearCollision {
                        winner: winner.agent,
                        loser:  loser.agent,
                        cell,
                    });
                }
                let alg = self.agents.algorithm[li];
                self.agents.selector[li].update(alg, REWARD_COLLISION, self.config.alpha);
            }
            winners.push(winner);
        }
        winners
    }

    /// Move the arbitration winners.
    ///
    /// Repeated ascending-id passes let chains of agents vacate cells for
    /// each other regardless of id order; whoever still faces an occupied
    /// destination after a full pass without progress (a cycle, or a
    /// stationary blocker) waits instead.
    fn commit_moves(&mut self, now: Tick, mut winners: Vec<Intent>) {
        loop {
            let mut progressed = false;
            let mut deferred = Vec::new();

            for intent in winners {
                let i = intent.agent.index();
                if self.grid.is_blocked(intent.to) || !self.occupancy.is_free(intent.to) {
                    deferred.push(intent);
                    continue;
                }
                // Destination verified free and in bounds above.
                if self
                    .occupancy
                    .relocate(intent.agent, intent.from, intent.to)
                    .is_err()
                {
                    deferred.push(intent);
                    continue;
                }
                progressed = true;

                self.agents.position[i] = intent.to;
                self.agents.trail[i].push(intent.to);
                self.agents.status[i] = AgentStatus::Active;
                if self.agents.path[i].front() == Some(&intent.to) {
                    self.agents.path[i].pop_front();
                }

                if intent.to == self.agents.target[i] {
                    self.finish_agent(intent.agent, now);
                }
            }

            if deferred.is_empty() {
                return;
            }
            if !progressed {
                // Whatever is left is blocked for this tick.
                for intent in deferred {
                    self.agents.status[intent.agent.index()] = AgentStatus::Waiting;
                }
                return;
            }
            winners = deferred;
        }
    }

    /// Terminal bookkeeping for an agent that just stepped onto its target.
    fn finish_agent(&mut self, agent: AgentId, now: Tick) {
        let i = agent.index();
        self.agents.status[i] = AgentStatus::Finished;
        self.agents.finish_tick[i] = Some(now);
        self.agents.path[i].clear();
        self.broadcasts[i].clear();

        self.metrics.finished += 1;
        self.metrics.finish_tick_sum += now.0;
        self.events.push(SimEvent::AgentFinished { agent });

        let alg = self.agents.algorithm[i];
        self.agents.selector[i].update(alg, REWARD_FINISH, self.config.alpha);

        // Any finish is shared progress: the whole fleet shifts a step from
        // exploration toward exploitation.
        for selector in self.agents.selector.iter_mut() {
            selector.decay_epsilon(self.config.epsilon_decay);
        }

        self.check_synergy(agent, now);
    }

    /// Credit a synergy bonus when both halves of a leader/follower pair
    /// have finished within the configured window.
    ///
    /// Only the later finisher's check sees a finished partner (the earlier
    /// one ran while the partner was still unfinished), so each pair counts
    /// at most once per follower — including same-tick finishes, where
    /// commit order decides which side scores.
    fn check_synergy(&mut self, agent: AgentId, now: Tick) {
        let i = agent.index();
        let window = self.config.synergy_window_ticks;

        // Follower finishing after (or with) its leader.
        let leader = self.agents.leader[i];
        if leader != AgentId::INVALID {
            if let Some(leader_tick) = self.agents.finish_tick[leader.index()] {
                if now.abs_diff(leader_tick) <= window {
                    self.metrics.synergy_bonuses += 1;
                    self.events.push(SimEvent::SynergyBonus { leader, follower: agent });
                }
            }
        }

        // Leader finishing after one of its followers.
        for follower in self.agents.agent_ids() {
            if follower == agent || self.agents.leader[follower.index()] != agent {
                continue;
            }
            if let Some(follower_tick) = self.agents.finish_tick[follower.index()] {
                if now.abs_diff(follower_tick) <= window {
                    self.metrics.synergy_bonuses += 1;
                    self.events.push(SimEvent::SynergyBonus { leader: agent, follower });
                }
            }
        }
    }

    /// Roll for one grid mutation.
    ///
    /// The cell (or obstacle) is drawn first and the operation then stands
    /// or falls on that draw — rejections are recorded, not retried, so
    /// drift pressure is independent of how crowded the grid is.
    fn drift(&mut self, _now: Tick) -> SimResult<()> {
        if self.config.drift_probability <= 0.0
            || !self.env_rng.gen_bool(self.config.drift_probability)
        {
            return Ok(());
        }

        match self.env_rng.gen_range(0..3u8) {
            0 => {
                let cell = self.random_cell();
                match self.grid.add_obstacle(cell, &self.occupancy) {
                    Ok(()) => self.record_drift(DriftKind::ObstacleAdded, cell, true),
                    Err(_) => self.record_drift(DriftKind::ObstacleAdded, cell, false),
                }
            }
            1 => {
                let blocked = self.grid.blocked_cells();
                if blocked.is_empty() {
                    return Ok(());
                }
                let cell = blocked[self.env_rng.gen_range(0..blocked.len())];
                self.grid.remove_obstacle(cell)?;
                self.record_drift(DriftKind::ObstacleRemoved, cell, true);
            }
            _ => {
                let cell = self.random_cell();
                match self.grid.raise_cost(cell, 1.0, &self.occupancy) {
                    Ok(()) => self.record_drift(DriftKind::CostRaised, cell, true),
                    Err(_) => self.record_drift(DriftKind::CostRaised, cell, false),
                }
            }
        }
        Ok(())
    }

    fn random_cell(&mut self) -> GridPos {
        GridPos::new(
            self.env_rng.gen_range(0..self.grid.rows()),
            self.env_rng.gen_range(0..self.grid.cols()),
        )
    }

    fn record_drift(&mut self, kind: DriftKind, cell: GridPos, applied: bool) {
        if applied {
            self.metrics.drift_applied += 1;
            self.events.push(SimEvent::DriftApplied { kind, cell });
        } else {
            self.metrics.drift_rejected += 1;
            self.events.push(SimEvent::DriftRejected { kind, cell });
        }
    }
}
