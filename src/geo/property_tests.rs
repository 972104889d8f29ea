//! Property-Based Tests for the Geo Module
//!
//! Compares grid queries against a brute-force scan of every entity.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::geo::{GeoGrid, Point};

const KINDS: [&str; 3] = ["Unit", "Static", "Track"];

fn coord_strategy() -> impl Strategy<Value = f64> {
    // Whole and half units land on cell boundaries often
    (-20_000i32..20_000).prop_map(|v| f64::from(v) / 2.0)
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (coord_strategy(), coord_strategy()).prop_map(|(x, z)| Point::new(x, z))
}

#[derive(Debug, Clone)]
enum GridOp {
    Add { id: u16, kind: usize, at: Point },
    Move { id: u16, to: Point },
    Retype { id: u16, kind: usize },
    Remove { id: u16 },
}

fn grid_op_strategy() -> impl Strategy<Value = GridOp> {
    prop_oneof![
        (0u16..40, 0usize..3, point_strategy()).prop_map(|(id, kind, at)| GridOp::Add { id, kind, at }),
        (0u16..40, point_strategy()).prop_map(|(id, to)| GridOp::Move { id, to }),
        (0u16..40, 0usize..3).prop_map(|(id, kind)| GridOp::Retype { id, kind }),
        (0u16..40).prop_map(|id| GridOp::Remove { id }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    // After any sequence of edits, radius queries return exactly what a
    // linear scan over all entities would.
    #[test]
    fn prop_query_matches_linear_scan(
        cell_size in prop_oneof![Just(1.0), Just(250.0), Just(2000.0), 10.0f64..5000.0],
        ops in prop::collection::vec(grid_op_strategy(), 1..120),
        center in point_strategy(),
        radius in 0.0f64..6000.0
    ) {
        let mut grid: GeoGrid<u16> = GeoGrid::new(cell_size, KINDS).unwrap();
        let mut model: HashMap<u16, (usize, Point)> = HashMap::new();

        for op in ops {
            match op {
                GridOp::Add { id, kind, at } => {
                    let added = grid.add(KINDS[kind], id, at).is_ok();
                    prop_assert_eq!(added, !model.contains_key(&id));
                    model.entry(id).or_insert((kind, at));
                }
                GridOp::Move { id, to } => {
                    let moved = grid.update_position(&id, to).is_ok();
                    prop_assert_eq!(moved, model.contains_key(&id));
                    if let Some(entry) = model.get_mut(&id) {
                        entry.1 = to;
                    }
                }
                GridOp::Retype { id, kind } => {
                    let changed = grid.change_type(&id, KINDS[kind]).is_ok();
                    prop_assert_eq!(changed, model.contains_key(&id));
                    if let Some(entry) = model.get_mut(&id) {
                        entry.0 = kind;
                    }
                }
                GridOp::Remove { id } => {
                    prop_assert_eq!(grid.remove(&id), model.remove(&id).is_some());
                }
            }
            prop_assert_eq!(grid.size(), model.len());
        }

        grid.assert_consistent();

        let result = grid.query_radius(center, radius, &KINDS);
        for (kind_index, kind) in KINDS.iter().enumerate() {
            let expected: HashSet<u16> = model
                .iter()
                .filter(|(_, (k, p))| *k == kind_index && p.distance_squared(&center) <= radius * radius)
                .map(|(id, _)| *id)
                .collect();
            prop_assert_eq!(result.ids(kind), Some(&expected), "kind {}", kind);
        }
    }
}
