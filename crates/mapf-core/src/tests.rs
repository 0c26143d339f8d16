//! Unit tests for mapf-core primitives.

#[cfg(test)]
mod ids {
    use crate::AgentId;

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod pos {
    use crate::GridPos;

    #[test]
    fn manhattan_distance() {
        let a = GridPos::new(2, 3);
        let b = GridPos::new(5, 1);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(b.manhattan(a), 5);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn neighbor_check() {
        let c = GridPos::new(4, 4);
        assert!(c.is_neighbor(GridPos::new(3, 4)));
        assert!(c.is_neighbor(GridPos::new(4, 5)));
        assert!(!c.is_neighbor(GridPos::new(3, 3))); // diagonal
        assert!(!c.is_neighbor(c));
    }

    #[test]
    fn row_major_ordering() {
        assert!(GridPos::new(0, 9) < GridPos::new(1, 0));
        assert!(GridPos::new(3, 2) < GridPos::new(3, 5));
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), 5);
    }

    #[test]
    fn abs_diff_is_symmetric() {
        assert_eq!(Tick(40).abs_diff(Tick(46)), 6);
        assert_eq!(Tick(46).abs_diff(Tick(40)), 6);
    }
}

#[cfg(test)]
mod role {
    use crate::Role;

    #[test]
    fn priority_ordering() {
        assert!(Role::Leader.priority() > Role::Follower.priority());
        assert!(Role::Follower.priority() > Role::Normal.priority());
    }

    #[test]
    fn leaders_never_yield() {
        assert!(!Role::Leader.yield_willing());
        assert!(Role::Follower.yield_willing());
        assert!(Role::Normal.yield_willing());
    }
}

#[cfg(test)]
mod algorithm {
    use crate::Algorithm;

    #[test]
    fn fixed_preference_order() {
        assert_eq!(
            Algorithm::ALL,
            [Algorithm::AStar, Algorithm::Bfs, Algorithm::Dijkstra]
        );
    }

    #[test]
    fn indices_are_dense() {
        for (i, a) in Algorithm::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
        }
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = AgentRng::new(42, AgentId(3));
        let mut b = AgentRng::new(42, AgentId(3));
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1_000_000u32), b.gen_range(0..1_000_000u32));
        }
    }

    #[test]
    fn different_agents_diverge() {
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(1));
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }
}

#[cfg(test)]
mod config {
    use crate::SimConfig;

    fn valid() -> SimConfig {
        SimConfig {
            rows: 20,
            cols: 20,
            target_zone_size: 4,
            obstacle_density: 0.1,
            drift_probability: 0.01,
            cost_min: 1.0,
            cost_max: 3.0,
            cost_ceiling: 10.0,
            agent_count: 8,
            leader_count: 2,
            follower_count: 2,
            epsilon: 0.2,
            alpha: 0.1,
            epsilon_decay: 0.95,
            synergy_window_ticks: 10,
            broadcast_interval_ticks: 5,
            total_ticks: 500,
            seed: 42,
            num_threads: Some(1),
            output_interval_ticks: 1,
        }
    }

    #[test]
    fn valid_config_passes() {
        valid().validate().unwrap();
    }

    #[test]
    fn zone_larger_than_grid_rejected() {
        let mut c = valid();
        c.target_zone_size = 25;
        assert!(c.validate().is_err());
    }

    #[test]
    fn more_agents_than_target_cells_rejected() {
        let mut c = valid();
        c.agent_count = 17; // zone is 4x4 = 16 cells
        assert!(c.validate().is_err());
    }

    #[test]
    fn more_agents_than_free_cells_rejected() {
        let mut c = valid();
        c.rows = 4;
        c.cols = 4;
        c.target_zone_size = 3;
        c.agent_count = 9;
        assert!(c.validate().is_err());
    }

    #[test]
    fn role_counts_must_fit() {
        let mut c = valid();
        c.leader_count = 5;
        c.follower_count = 5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn learning_rates_bounded() {
        let mut c = valid();
        c.epsilon = 1.5;
        assert!(c.validate().is_err());

        let mut c = valid();
        c.alpha = -0.1;
        assert!(c.validate().is_err());

        let mut c = valid();
        c.epsilon_decay = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn cost_range_must_be_sane() {
        let mut c = valid();
        c.cost_min = 0.5;
        assert!(c.validate().is_err());

        let mut c = valid();
        c.cost_min = 3.0;
        c.cost_max = 2.0;
        assert!(c.validate().is_err());

        let mut c = valid();
        c.cost_ceiling = 0.5;
        assert!(c.validate().is_err());
    }
}
