//! Integration-style tests for the coordinator: arbitration, yields,
//! synergy, drift, and determinism.

use rustc_hash::FxHashSet;

use mapf_agent::{AgentStatus, AgentStore};
use mapf_behavior::Navigator;
use mapf_core::{AgentId, GridPos, Role, SimConfig, SimRng, Tick};
use mapf_grid::{Grid, GridBuilder, Occupancy};

use crate::{NoopObserver, SimBuilder, SimError, SimEvent, SimObserver};

fn config(rows: u16, cols: u16, zone: u16, agents: usize) -> SimConfig {
    SimConfig {
        rows,
        cols,
        target_zone_size: zone,
        obstacle_density: 0.0,
        drift_probability: 0.0,
        cost_min: 1.0,
        cost_max: 1.0,
        cost_ceiling: 10.0,
        agent_count: agents,
        leader_count: 0,
        follower_count: 0,
        epsilon: 0.0,
        alpha: 0.1,
        epsilon_decay: 0.95,
        synergy_window_ticks: 10,
        broadcast_interval_ticks: 5,
        total_ticks: 200,
        seed: 7,
        num_threads: None,
        output_interval_ticks: 1,
    }
}

fn navigator(cfg: &SimConfig) -> Navigator {
    Navigator::new(cfg.cost_ceiling, cfg.broadcast_interval_ticks)
}

fn pos(r: u16, c: u16) -> GridPos {
    GridPos::new(r, c)
}

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn default_build_places_everyone() {
        let mut cfg = config(12, 12, 4, 8);
        cfg.leader_count = 2;
        cfg.follower_count = 3;
        cfg.obstacle_density = 0.1;
        let sim = SimBuilder::new(cfg, navigator(&config(12, 12, 4, 8)))
            .build()
            .unwrap();

        assert_eq!(sim.occupancy.occupied_count(), 8);
        let mut targets = FxHashSet::default();
        for a in sim.agents.agent_ids() {
            let i = a.index();
            let p = sim.agents.position[i];
            assert_eq!(sim.occupancy.occupant(p), Some(a));
            assert!(!sim.grid.is_blocked(p));
            assert!(!sim.grid.in_target_zone(p));
            assert!(sim.grid.in_target_zone(sim.agents.target[i]));
            assert!(targets.insert(sim.agents.target[i]));
            assert_eq!(sim.agents.trail[i], vec![p]);
        }
        assert_eq!(sim.agents.role.iter().filter(|&&r| r == Role::Leader).count(), 2);
        assert_eq!(sim.agents.role.iter().filter(|&&r| r == Role::Follower).count(), 3);
        // Every follower is paired with some leader.
        for a in sim.agents.agent_ids() {
            let i = a.index();
            if sim.agents.role[i] == Role::Follower {
                let l = sim.agents.leader[i];
                assert_ne!(l, AgentId::INVALID);
                assert_eq!(sim.agents.role[l.index()], Role::Leader);
            } else {
                assert_eq!(sim.agents.leader[i], AgentId::INVALID);
            }
        }
    }

    #[test]
    fn same_seed_same_scenario() {
        let build = || {
            let mut cfg = config(10, 10, 3, 6);
            cfg.obstacle_density = 0.15;
            SimBuilder::new(cfg.clone(), navigator(&cfg)).build().unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.agents.position, b.agents.position);
        assert_eq!(a.agents.target, b.agents.target);
        assert_eq!(a.grid.blocked_cells(), b.grid.blocked_cells());
    }

    #[test]
    fn wrong_length_starts_rejected() {
        let cfg = config(6, 6, 2, 2);
        let result = SimBuilder::new(cfg.clone(), navigator(&cfg))
            .starts(vec![pos(0, 0)])
            .build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { .. })));
    }

    #[test]
    fn duplicate_targets_rejected() {
        let cfg = config(6, 6, 2, 2);
        let result = SimBuilder::new(cfg.clone(), navigator(&cfg))
            .targets(vec![pos(2, 2), pos(2, 2)])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = config(6, 6, 2, 2);
        cfg.epsilon = 2.0;
        assert!(SimBuilder::new(cfg.clone(), navigator(&cfg)).build().is_err());
    }
}

#[cfg(test)]
mod arbitration {
    use super::*;

    /// Two unique shortest paths cross at (2,2); the leader passes first.
    fn contested() -> crate::Sim<Navigator> {
        let mut cfg = config(5, 5, 2, 2);
        cfg.leader_count = 1;
        SimBuilder::new(cfg.clone(), navigator(&cfg))
            .starts(vec![pos(2, 1), pos(1, 2)])
            .targets(vec![pos(2, 3), pos(3, 2)])
            .build()
            .unwrap()
    }

    #[test]
    fn leader_wins_contested_cell() {
        let mut sim = contested();
        let mut events: Vec<SimEvent> = Vec::new();
        struct Collect<'a>(&'a mut Vec<SimEvent>);
        impl SimObserver for Collect<'_> {
            fn on_tick_end(&mut self, _tick: Tick, events: &[SimEvent]) {
                self.0.extend_from_slice(events);
            }
        }
        sim.run_ticks(1, &mut Collect(&mut events)).unwrap();

        assert_eq!(sim.agents.position[0], pos(2, 2));
        assert_eq!(sim.agents.position[1], pos(1, 2));
        assert_eq!(sim.agents.status[1], AgentStatus::Waiting);
        assert_eq!(sim.metrics.collisions_avoided, 1);
        assert_eq!(sim.metrics.near_collisions, 0);
        assert!(events.contains(&SimEvent::CollisionAvoided {
            winner: AgentId(0),
            loser:  AgentId(1),
            cell:   pos(2, 2),
        }));
    }

    #[test]
    fn equal_priority_counts_near_collision() {
        let cfg = config(5, 5, 2, 2); // both Normal
        let mut sim = SimBuilder::new(cfg.clone(), navigator(&cfg))
            .starts(vec![pos(2, 1), pos(1, 2)])
            .targets(vec![pos(2, 3), pos(3, 2)])
            .build()
            .unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();

        // Tie broken by ascending id.
        assert_eq!(sim.agents.position[0], pos(2, 2));
        assert_eq!(sim.metrics.collisions_avoided, 1);
        assert_eq!(sim.metrics.near_collisions, 1);
    }

    #[test]
    fn loser_reroutes_and_everyone_finishes() {
        let mut sim = contested();
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.metrics.finished, 2);
        assert!(sim.agents.all_finished());
        assert_eq!(sim.agents.position[0], pos(2, 3));
        assert_eq!(sim.agents.position[1], pos(3, 2));
        assert!(sim.metrics.collisions_avoided >= 1);
        // Early exit: nowhere near the 200-tick budget.
        assert!(sim.metrics.ticks_run < 20);
    }
}

#[cfg(test)]
mod yields {
    use super::*;

    #[test]
    fn blocked_leader_gets_a_yield() {
        // Head-on corridor meeting with a second row to detour through.
        let mut cfg = config(2, 5, 2, 2);
        cfg.leader_count = 1;
        let mut sim = SimBuilder::new(cfg.clone(), navigator(&cfg))
            .starts(vec![pos(0, 0), pos(0, 2)])
            .targets(vec![pos(0, 4), pos(1, 0)])
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.metrics.finished, 2);
        assert!(sim.metrics.yields_honored >= 1);
    }
}

#[cfg(test)]
mod synergy {
    use super::*;

    fn paired(window: u64, follower_start: GridPos) -> crate::Sim<Navigator> {
        let mut cfg = config(5, 5, 2, 2);
        cfg.leader_count = 1;
        cfg.follower_count = 1;
        cfg.synergy_window_ticks = window;
        SimBuilder::new(cfg.clone(), navigator(&cfg))
            .starts(vec![pos(0, 0), follower_start])
            .targets(vec![pos(1, 1), pos(2, 2)])
            .build()
            .unwrap()
    }

    #[test]
    fn pair_finishing_inside_window_scores_once() {
        let mut sim = paired(10, pos(4, 4));
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.metrics.finished, 2);
        assert_eq!(sim.agents.leader[1], AgentId(0));
        assert_eq!(sim.metrics.synergy_bonuses, 1);
    }

    #[test]
    fn same_tick_pair_scores_once() {
        // Disjoint two-step routes: both halves of the pair arrive on the
        // same tick, the follower committing first (lower target cell).
        let mut cfg = config(5, 5, 2, 2);
        cfg.leader_count = 1;
        cfg.follower_count = 1;
        let mut sim = SimBuilder::new(cfg.clone(), navigator(&cfg))
            .starts(vec![pos(4, 2), pos(1, 3)])
            .targets(vec![pos(2, 2), pos(1, 1)])
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.metrics.finished, 2);
        assert_eq!(sim.agents.finish_tick[0], sim.agents.finish_tick[1]);
        assert_eq!(sim.metrics.synergy_bonuses, 1);
    }

    #[test]
    fn finish_gap_beyond_window_scores_nothing() {
        let mut sim = paired(1, pos(4, 4));
        sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.metrics.finished, 2);
        // Leader needs 2 steps, follower 4; the gap exceeds a 1-tick window.
        assert_eq!(sim.metrics.synergy_bonuses, 0);
    }
}

#[cfg(test)]
mod stuck {
    use super::*;

    #[test]
    fn walled_in_agent_goes_stuck_once() {
        let mut rng = SimRng::new(1);
        let mut grid = GridBuilder::new(3, 3).build(&mut rng).unwrap();
        let empty = Occupancy::new(3, 3);
        grid.add_obstacle(pos(0, 1), &empty).unwrap();
        grid.add_obstacle(pos(1, 0), &empty).unwrap();

        let cfg = config(3, 3, 1, 1);
        let mut sim = SimBuilder::new(cfg.clone(), navigator(&cfg))
            .grid(grid)
            .starts(vec![pos(0, 0)])
            .targets(vec![pos(2, 2)])
            .build()
            .unwrap();
        sim.run_ticks(3, &mut NoopObserver).unwrap();

        assert_eq!(sim.agents.status[0], AgentStatus::Stuck);
        assert_eq!(sim.metrics.stuck_transitions, 1);
        assert_eq!(sim.agents.position[0], pos(0, 0));
        // Each tick exhausts the planner chain: two fallback attempts apiece.
        assert_eq!(sim.metrics.algorithm_switches, 6);
    }
}

#[cfg(test)]
mod drift {
    use super::*;

    #[test]
    fn drift_mutates_but_never_the_zone_or_agents() {
        let mut cfg = config(10, 10, 3, 4);
        cfg.drift_probability = 1.0;
        cfg.obstacle_density = 0.1;
        let mut sim = SimBuilder::new(cfg.clone(), navigator(&cfg)).build().unwrap();
        sim.run_ticks(30, &mut NoopObserver).unwrap();

        assert!(sim.metrics.drift_applied + sim.metrics.drift_rejected >= 1);
        for cell in sim.grid.target_cells() {
            assert!(!sim.grid.is_blocked(cell));
        }
        for a in sim.agents.agent_ids() {
            assert!(!sim.grid.is_blocked(sim.agents.position[a.index()]));
        }
    }
}

#[cfg(test)]
mod determinism {
    use super::*;

    /// Checks structural invariants at every snapshot: distinct, in-bounds,
    /// unblocked positions and a trail that ends where the agent stands.
    struct InvariantChecker;

    impl SimObserver for InvariantChecker {
        fn on_snapshot(&mut self, _tick: Tick, agents: &AgentStore, grid: &Grid) {
            let mut seen = FxHashSet::default();
            for a in agents.agent_ids() {
                let i = a.index();
                let p = agents.position[i];
                assert!(grid.in_bounds(p));
                assert!(!grid.is_blocked(p));
                assert!(seen.insert(p), "two agents share {p}");
                assert_eq!(agents.trail[i].last(), Some(&p));
            }
        }
    }

    fn busy_config() -> SimConfig {
        let mut cfg = config(10, 10, 3, 6);
        cfg.leader_count = 2;
        cfg.follower_count = 2;
        cfg.obstacle_density = 0.1;
        cfg.drift_probability = 0.2;
        cfg.epsilon = 0.4;
        cfg.seed = 99;
        cfg
    }

    #[test]
    fn invariants_hold_under_load() {
        let cfg = busy_config();
        let mut sim = SimBuilder::new(cfg.clone(), navigator(&cfg)).build().unwrap();
        sim.run(&mut InvariantChecker).unwrap();
    }

    #[test]
    fn identical_seeds_identical_runs() {
        let run = || {
            let cfg = busy_config();
            let mut sim = SimBuilder::new(cfg.clone(), navigator(&cfg)).build().unwrap();
            sim.run(&mut NoopObserver).unwrap();
            (
                sim.agents.position.clone(),
                sim.agents.finish_tick.clone(),
                sim.metrics.finished,
                sim.metrics.collisions_avoided,
                sim.metrics.replans,
                sim.metrics.drift_applied,
                sim.metrics.ticks_run,
            )
        };
        assert_eq!(run(), run());
    }
}
