//! Randomized checks of the compositor's guarantees.
//!
//! Each property runs over [`common::CASES`] seeded random snapshots, so a
//! failure names its case index and reproduces exactly.

mod common;

use std::collections::{BTreeMap, BTreeSet};

use common::{CASES, example_map, random_map, random_robot, rng};
use khoj_grid::{
    CellState, Compositor, Coordinate, GridConfig, GridView, MapState, Rectangle, RobotState,
    compose, normalize_image_path,
};

fn random_case(seed: u64) -> impl Iterator<Item = (usize, MapState, RobotState)> {
    let mut rng = rng(seed);
    (0..CASES).map(move |i| {
        let map = random_map(&mut rng, 4, 12);
        let robot = random_robot(&mut rng, 4);
        (i, map, robot)
    })
}

#[test]
fn test_images_only_on_visited_cells() {
    for (i, map, robot) in random_case(1) {
        let view = compose(&map, &robot);
        for coord in view.images.keys() {
            let state = view.state_at(*coord);
            assert!(
                matches!(
                    state,
                    CellState::Human
                        | CellState::Visited
                        | CellState::HumanCurrent
                        | CellState::VisitedCurrent
                ),
                "case {}: image on {} in state {:?}",
                i,
                coord,
                state
            );
        }
    }
}

#[test]
fn test_visited_dominates_planned() {
    for (i, map, robot) in random_case(2) {
        let view = compose(&map, &robot);
        let visited: BTreeSet<Coordinate> = map.visited.iter().map(|v| v.coordinate).collect();

        for planned in &map.planned {
            if visited.contains(&planned.coordinate) {
                let state = view.state_at(planned.coordinate);
                assert!(state.is_visited(), "case {}: {:?}", i, state);
            }
        }
    }
}

#[test]
fn test_images_follow_last_visit_regardless_of_robot() {
    for (i, map, robot) in random_case(3) {
        let mut expected = BTreeMap::new();
        for visit in &map.visited {
            match &visit.image_path {
                Some(path) => expected.insert(visit.coordinate, normalize_image_path(path)),
                None => expected.remove(&visit.coordinate),
            };
        }

        let with_robot = compose(&map, &robot);
        assert_eq!(with_robot.images, expected, "case {}", i);

        // Moving the robot onto any image cell keeps every image
        for coord in expected.keys() {
            let moved = RobotState::new(*coord, robot.is_running);
            assert_eq!(compose(&map, &moved).images, expected, "case {}", i);
        }
    }
}

#[test]
fn test_compose_is_deterministic() {
    let compositor = Compositor::default();
    for (i, map, robot) in random_case(4) {
        let first = compositor.compose(&map, &robot);
        let second = compositor.compose(&map.clone(), &robot.clone());
        assert_eq!(first, second, "case {}", i);
    }
}

#[test]
fn test_bounds_contain_every_cell() {
    for padding in [0, 1, 3] {
        let compositor = Compositor::new(GridConfig {
            padding,
            ..Default::default()
        });
        for (i, map, robot) in random_case(5 + padding as u64) {
            let view = compositor.compose(&map, &robot);
            for coord in view.cells.keys() {
                assert!(
                    view.bounds.contains(*coord),
                    "case {}: {} outside {:?}",
                    i,
                    coord,
                    view.bounds
                );
            }
            assert!(view.bounds.min_x <= view.bounds.max_x);
            assert!(view.bounds.min_y <= view.bounds.max_y);
        }
    }
}

#[test]
fn test_exactly_one_robot_cell() {
    for (i, map, robot) in random_case(9) {
        let view = compose(&map, &robot);
        let robots: Vec<_> = view.cells.iter().filter(|(_, s)| s.has_robot()).collect();
        assert_eq!(robots.len(), 1, "case {}", i);
        assert_eq!(*robots[0].0, robot.coordinate, "case {}", i);
    }
}

#[test]
fn test_cells_are_exactly_touched_coordinates() {
    for (i, map, robot) in random_case(10) {
        let view = compose(&map, &robot);

        let mut touched: BTreeSet<Coordinate> = BTreeSet::new();
        touched.extend(map.visited.iter().map(|v| v.coordinate));
        touched.extend(map.planned.iter().map(|p| p.coordinate));
        touched.insert(robot.coordinate);

        let keys: BTreeSet<Coordinate> = view.cells.keys().copied().collect();
        assert_eq!(keys, touched, "case {}", i);
        assert!(!view.cells.values().any(|s| *s == CellState::Empty));
    }
}

#[test]
fn test_input_order_does_not_change_bounds() {
    for (i, map, robot) in random_case(11) {
        let mut reversed = map.clone();
        reversed.planned.reverse();
        assert_eq!(
            compose(&map, &robot).bounds,
            compose(&reversed, &robot).bounds,
            "case {}",
            i
        );
    }
}

#[test]
fn test_empty_input() {
    let view = compose(&MapState::default(), &RobotState::new(Coordinate::ORIGIN, false));

    let expected: BTreeMap<Coordinate, CellState> =
        [(Coordinate::ORIGIN, CellState::Current)].into();
    assert_eq!(view.cells, expected);
    assert!(view.images.is_empty());
    assert_eq!(view.bounds, Rectangle::new(-1, 1, -1, 1));
}

#[test]
fn test_worked_example_robot_on_human_cell() {
    let view = compose(&example_map(), &RobotState::new(Coordinate::new(1, 0), true));

    let expected = GridView {
        cells: [
            (Coordinate::new(0, 0), CellState::Visited),
            (Coordinate::new(1, 0), CellState::HumanCurrent),
            (Coordinate::new(2, 0), CellState::Planned),
        ]
        .into(),
        images: [(Coordinate::new(1, 0), "a.jpg".to_string())].into(),
        bounds: Rectangle::new(-1, 3, -1, 1),
    };
    assert_eq!(view, expected);
}

#[test]
fn test_worked_example_robot_on_planned_cell() {
    let view = compose(&example_map(), &RobotState::new(Coordinate::new(2, 0), true));
    assert_eq!(view.state_at(Coordinate::new(2, 0)), CellState::Current);
    assert_eq!(view.state_at(Coordinate::new(1, 0)), CellState::Human);
}

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize_image_path("uploads/x/y.png"), "x/y.png");
    assert_eq!(normalize_image_path("y.png"), "y.png");
}

#[test]
fn test_coordinate_keys_round_trip_in_json() {
    let mut rng = rng(12);
    for i in 0..CASES {
        let map = random_map(&mut rng, 1_000, 6);
        let robot = random_robot(&mut rng, 1_000);
        let view = compose(&map, &robot);

        let json = serde_json::to_string(&view).unwrap();
        let back: GridView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view, "case {}", i);
    }
}
