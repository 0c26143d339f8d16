//! Unit tests for the grid and occupancy map.

#[cfg(test)]
mod grid {
    use mapf_core::{GridPos, SimRng};

    use crate::{GridBuilder, GridError, Occupancy};

    fn open_grid(rows: u16, cols: u16) -> crate::Grid {
        let mut rng = SimRng::new(1);
        GridBuilder::new(rows, cols).build(&mut rng).unwrap()
    }

    #[test]
    fn neighbors_interior_cell() {
        let g = open_grid(5, 5);
        let n: Vec<GridPos> = g.neighbors(GridPos::new(2, 2)).collect();
        assert_eq!(
            n,
            vec![
                GridPos::new(1, 2),
                GridPos::new(3, 2),
                GridPos::new(2, 1),
                GridPos::new(2, 3),
            ]
        );
    }

    #[test]
    fn neighbors_clipped_at_corner() {
        let g = open_grid(5, 5);
        let n: Vec<GridPos> = g.neighbors(GridPos::new(0, 0)).collect();
        assert_eq!(n, vec![GridPos::new(1, 0), GridPos::new(0, 1)]);

        let n: Vec<GridPos> = g.neighbors(GridPos::new(4, 4)).collect();
        assert_eq!(n, vec![GridPos::new(3, 4), GridPos::new(4, 3)]);
    }

    #[test]
    fn target_zone_is_centered() {
        let mut rng = SimRng::new(1);
        let g = GridBuilder::new(10, 10)
            .target_zone(2)
            .build(&mut rng)
            .unwrap();
        let cells = g.target_cells();
        assert_eq!(
            cells,
            vec![
                GridPos::new(4, 4),
                GridPos::new(4, 5),
                GridPos::new(5, 4),
                GridPos::new(5, 5),
            ]
        );
        assert!(g.in_target_zone(GridPos::new(4, 5)));
        assert!(!g.in_target_zone(GridPos::new(3, 5)));
    }

    #[test]
    fn obstacles_never_in_target_zone() {
        let mut rng = SimRng::new(7);
        let g = GridBuilder::new(8, 8)
            .target_zone(4)
            .obstacle_density(0.4)
            .build(&mut rng)
            .unwrap();
        for pos in g.target_cells() {
            assert!(!g.is_blocked(pos));
        }
        assert!(!g.blocked_cells().is_empty());
    }

    #[test]
    fn obstacle_count_matches_density() {
        let mut rng = SimRng::new(9);
        let g = GridBuilder::new(20, 20)
            .obstacle_density(0.1)
            .build(&mut rng)
            .unwrap();
        assert_eq!(g.blocked_cells().len(), 40);
    }

    #[test]
    fn same_seed_same_grid() {
        let build = |seed| {
            let mut rng = SimRng::new(seed);
            GridBuilder::new(12, 12)
                .obstacle_density(0.2)
                .cost_range(1.0, 3.0)
                .build(&mut rng)
                .unwrap()
        };
        let a = build(42);
        let b = build(42);
        assert_eq!(a.blocked_cells(), b.blocked_cells());
        for r in 0..12 {
            for c in 0..12 {
                let p = GridPos::new(r, c);
                assert_eq!(a.cost(p), b.cost(p));
            }
        }
    }

    #[test]
    fn cost_range_respected() {
        let mut rng = SimRng::new(3);
        let g = GridBuilder::new(10, 10)
            .cost_range(1.5, 4.0)
            .build(&mut rng)
            .unwrap();
        for r in 0..10 {
            for c in 0..10 {
                let cost = g.cost(GridPos::new(r, c));
                assert!((1.5..=4.0).contains(&cost));
            }
        }
    }

    #[test]
    fn add_obstacle_rejections() {
        let mut rng = SimRng::new(1);
        let mut g = GridBuilder::new(6, 6)
            .target_zone(2)
            .build(&mut rng)
            .unwrap();
        let mut occ = Occupancy::new(6, 6);
        occ.place(mapf_core::AgentId(0), GridPos::new(0, 0)).unwrap();

        assert!(matches!(
            g.add_obstacle(GridPos::new(0, 0), &occ),
            Err(GridError::CellOccupied(_))
        ));
        assert!(matches!(
            g.add_obstacle(GridPos::new(2, 2), &occ),
            Err(GridError::InTargetZone(_))
        ));
        assert!(matches!(
            g.add_obstacle(GridPos::new(9, 9), &occ),
            Err(GridError::OutOfBounds(_))
        ));

        g.add_obstacle(GridPos::new(5, 5), &occ).unwrap();
        assert!(g.is_blocked(GridPos::new(5, 5)));
        assert!(matches!(
            g.add_obstacle(GridPos::new(5, 5), &occ),
            Err(GridError::CellBlocked(_))
        ));
    }

    #[test]
    fn remove_obstacle() {
        let mut rng = SimRng::new(1);
        let mut g = GridBuilder::new(4, 4).build(&mut rng).unwrap();
        let occ = Occupancy::new(4, 4);
        assert!(matches!(
            g.remove_obstacle(GridPos::new(2, 2)),
            Err(GridError::NotAnObstacle(_))
        ));
        g.add_obstacle(GridPos::new(2, 2), &occ).unwrap();
        g.remove_obstacle(GridPos::new(2, 2)).unwrap();
        assert!(!g.is_blocked(GridPos::new(2, 2)));
    }

    #[test]
    fn raise_cost() {
        let mut rng = SimRng::new(1);
        let mut g = GridBuilder::new(4, 4).build(&mut rng).unwrap();
        let mut occ = Occupancy::new(4, 4);
        g.raise_cost(GridPos::new(0, 1), 1.0, &occ).unwrap();
        assert_eq!(g.cost(GridPos::new(0, 1)), 2.0);

        occ.place(mapf_core::AgentId(3), GridPos::new(0, 1)).unwrap();
        assert!(matches!(
            g.raise_cost(GridPos::new(0, 1), 1.0, &occ),
            Err(GridError::CellOccupied(_))
        ));
    }

    #[test]
    fn builder_rejects_bad_config() {
        let mut rng = SimRng::new(1);
        assert!(GridBuilder::new(0, 5).build(&mut rng).is_err());
        assert!(GridBuilder::new(5, 5).target_zone(6).build(&mut rng).is_err());
        assert!(GridBuilder::new(5, 5).obstacle_density(1.0).build(&mut rng).is_err());
        assert!(GridBuilder::new(5, 5).cost_range(0.5, 2.0).build(&mut rng).is_err());
        assert!(GridBuilder::new(5, 5).cost_range(3.0, 2.0).build(&mut rng).is_err());
    }
}

#[cfg(test)]
mod occupancy {
    use mapf_core::{AgentId, GridPos};

    use crate::{GridError, Occupancy};

    #[test]
    fn place_and_query() {
        let mut occ = Occupancy::new(4, 4);
        let p = GridPos::new(1, 2);
        assert!(occ.is_free(p));
        occ.place(AgentId(5), p).unwrap();
        assert_eq!(occ.occupant(p), Some(AgentId(5)));
        assert!(!occ.is_free(p));
    }

    #[test]
    fn double_place_rejected() {
        let mut occ = Occupancy::new(4, 4);
        let p = GridPos::new(0, 0);
        occ.place(AgentId(1), p).unwrap();
        assert!(matches!(
            occ.place(AgentId(2), p),
            Err(GridError::CellOccupied(_))
        ));
        assert_eq!(occ.occupant(p), Some(AgentId(1)));
    }

    #[test]
    fn vacate_checks_occupant() {
        let mut occ = Occupancy::new(4, 4);
        let p = GridPos::new(2, 2);
        occ.place(AgentId(1), p).unwrap();
        assert!(matches!(
            occ.vacate(AgentId(2), p),
            Err(GridError::WrongOccupant(AgentId(2), _))
        ));
        occ.vacate(AgentId(1), p).unwrap();
        assert!(occ.is_free(p));
    }

    #[test]
    fn relocate_is_atomic() {
        let mut occ = Occupancy::new(4, 4);
        let from = GridPos::new(0, 0);
        let to = GridPos::new(0, 1);
        occ.place(AgentId(0), from).unwrap();
        occ.place(AgentId(1), to).unwrap();

        // Destination taken: source untouched.
        assert!(occ.relocate(AgentId(0), from, to).is_err());
        assert_eq!(occ.occupant(from), Some(AgentId(0)));

        occ.vacate(AgentId(1), to).unwrap();
        occ.relocate(AgentId(0), from, to).unwrap();
        assert!(occ.is_free(from));
        assert_eq!(occ.occupant(to), Some(AgentId(0)));
    }

    #[test]
    fn occupied_cells_row_major() {
        let mut occ = Occupancy::new(3, 3);
        occ.place(AgentId(2), GridPos::new(2, 0)).unwrap();
        occ.place(AgentId(1), GridPos::new(0, 1)).unwrap();
        let cells: Vec<_> = occ.occupied_cells().collect();
        assert_eq!(
            cells,
            vec![
                (GridPos::new(0, 1), AgentId(1)),
                (GridPos::new(2, 0), AgentId(2)),
            ]
        );
        assert_eq!(occ.occupied_count(), 2);
    }
}
