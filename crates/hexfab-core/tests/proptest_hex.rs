//! Property-based tests for hex coordinates and grid occupancy.

use hexfab_core::factory::{Factory, FactoryKind};
use hexfab_core::grid::{GridError, HexGrid};
use hexfab_core::hex::{AxialCoord, CubeCoord};
use hexfab_core::layout::HexLayout;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_axial() -> impl Strategy<Value = AxialCoord> {
    (-50..=50i32, -50..=50i32).prop_map(|(q, r)| AxialCoord::new(q, r))
}

fn arb_kind() -> impl Strategy<Value = FactoryKind> {
    prop_oneof![
        Just(FactoryKind::Extractor),
        Just(FactoryKind::Converter),
        Just(FactoryKind::Assembler),
    ]
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn axial_cube_round_trip(a in arb_axial()) {
        prop_assert_eq!(a.to_cube().to_axial(), a);
        prop_assert_eq!(AxialCoord::from(CubeCoord::from(a)), a);
    }

    #[test]
    fn cubes_sum_to_zero(a in arb_axial()) {
        let c = a.to_cube();
        prop_assert!(c.is_valid());
        prop_assert_eq!(c.x + c.y + c.z, 0);
    }

    #[test]
    fn distance_is_symmetric_with_zero_identity(a in arb_axial(), b in arb_axial()) {
        prop_assert_eq!(a.distance(b), b.distance(a));
        prop_assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn distance_obeys_triangle_inequality(a in arb_axial(), b in arb_axial(), c in arb_axial()) {
        prop_assert!(a.distance(c) <= a.distance(b) + b.distance(c));
    }

    #[test]
    fn six_neighbors_at_distance_one(a in arb_axial()) {
        let neighbors = a.neighbors();
        prop_assert_eq!(neighbors.len(), 6);
        for n in neighbors {
            prop_assert_eq!(a.distance(n), 1);
        }
        let mut unique = neighbors.to_vec();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), 6);
    }

    #[test]
    fn layout_inverts_cell_centers(a in arb_axial(), radius in 0.1f64..100.0) {
        let layout = HexLayout::new(radius).unwrap();
        prop_assert_eq!(layout.to_axial(layout.to_world(a)), a);
    }

    #[test]
    fn occupancy_is_exclusive(c in arb_axial(), first in arb_kind(), second in arb_kind()) {
        let mut grid = HexGrid::new();
        prop_assert!(grid.place(c, Factory::new(first)).is_ok());
        prop_assert_eq!(
            grid.place(c, Factory::new(second)).unwrap_err(),
            GridError::Occupied(c)
        );
        prop_assert_eq!(grid.get(c).map(Factory::kind), Some(first));
        prop_assert_eq!(grid.len(), 1);
    }

    #[test]
    fn placements_and_removals_keep_one_factory_per_cell(
        ops in proptest::collection::vec((arb_axial(), any::<bool>()), 1..100)
    ) {
        let mut grid = HexGrid::new();
        let mut expected = std::collections::BTreeSet::new();
        for (c, place) in ops {
            if place {
                let ok = grid.place(c, Factory::new(FactoryKind::Extractor)).is_ok();
                prop_assert_eq!(ok, expected.insert(c));
            } else {
                let ok = grid.remove(c).is_ok();
                prop_assert_eq!(ok, expected.remove(&c));
            }
        }
        let cells: Vec<AxialCoord> = grid.iter().map(|(c, _)| c).collect();
        let expected: Vec<AxialCoord> = expected.into_iter().collect();
        prop_assert_eq!(cells, expected);
    }
}
