//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use khoj_grid::{Coordinate, MapState, PlannedPosition, RobotState, VisitedPosition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of random cases per property.
pub const CASES: usize = 256;

/// Seeded generator so failures reproduce.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Coordinate in a small window so collisions between layers are common.
pub fn random_coord(rng: &mut StdRng, extent: i32) -> Coordinate {
    Coordinate::new(
        rng.random_range(-extent..=extent),
        rng.random_range(-extent..=extent),
    )
}

/// Random visit record; about half carry an image.
pub fn random_visit(rng: &mut StdRng, extent: i32) -> VisitedPosition {
    let coord = random_coord(rng, extent);
    let visit = VisitedPosition::new(coord, rng.random_bool(0.3));
    if rng.random_bool(0.5) {
        let prefix = if rng.random_bool(0.8) { "uploads/" } else { "" };
        visit.with_image(format!("{}pos_{}_{}.jpg", prefix, coord.x, coord.y))
    } else {
        visit
    }
}

/// Random map snapshot with up to `max_len` entries per list.
pub fn random_map(rng: &mut StdRng, extent: i32, max_len: usize) -> MapState {
    let visited_len = rng.random_range(0..=max_len);
    let planned_len = rng.random_range(0..=max_len);

    let visited = (0..visited_len)
        .map(|_| random_visit(rng, extent))
        .collect();
    let planned = (0..planned_len)
        .map(|_| PlannedPosition::new(random_coord(rng, extent)))
        .collect();
    MapState::new(visited, planned)
}

/// Random robot snapshot, sometimes outside the map window.
pub fn random_robot(rng: &mut StdRng, extent: i32) -> RobotState {
    let reach = if rng.random_bool(0.2) { extent * 3 } else { extent };
    let mut robot = RobotState::new(random_coord(rng, reach), rng.random_bool(0.5));
    robot.waiting_for_image = rng.random_bool(0.2);
    robot
}

/// The two-visit, one-planned map used by the worked examples.
pub fn example_map() -> MapState {
    MapState::new(
        vec![
            VisitedPosition::new(Coordinate::new(0, 0), false),
            VisitedPosition::new(Coordinate::new(1, 0), true).with_image("uploads/a.jpg"),
        ],
        vec![PlannedPosition::new(Coordinate::new(2, 0))],
    )
}
