//! The sparse-grid compositor.
//!
//! Merges one map feed snapshot and one robot feed snapshot into a
//! [`GridView`]: a cell state per touched coordinate, an image reference per
//! image-bearing cell, and the viewport that encloses them.
//!
//! The view is recomputed from scratch every cycle. Nothing is cached between
//! calls, so identical inputs always give identical views and a bad cycle
//! cannot leak into the next one.
//!
//! ```rust
//! use khoj_grid::{compose, CellState, Coordinate, MapState, PlannedPosition, RobotState, VisitedPosition};
//!
//! let map = MapState::new(
//!     vec![
//!         VisitedPosition::new(Coordinate::new(0, 0), false),
//!         VisitedPosition::new(Coordinate::new(1, 0), true).with_image("uploads/a.jpg"),
//!     ],
//!     vec![PlannedPosition::new(Coordinate::new(2, 0))],
//! );
//! let robot = RobotState::new(Coordinate::new(1, 0), true);
//!
//! let view = compose(&map, &robot);
//! assert_eq!(view.state_at(Coordinate::new(1, 0)), CellState::HumanCurrent);
//! assert_eq!(view.image_at(Coordinate::new(1, 0)), Some("a.jpg"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GridConfig;
use crate::core::{CellState, Coordinate, Layer, MapState, Rectangle, RobotState};
use crate::image::ImagePathNormalizer;

/// Result of one composition.
///
/// Deserializing checks the invariants [`Compositor::compose`] guarantees,
/// so a view read back from JSON is one the compositor could have produced.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "GridViewRecord")]
pub struct GridView {
    /// State of every touched coordinate
    pub cells: BTreeMap<Coordinate, CellState>,
    /// Normalized image reference per image-bearing cell
    pub images: BTreeMap<Coordinate, String>,
    /// Viewport enclosing all cells
    pub bounds: Rectangle,
}

impl GridView {
    /// State at a coordinate (`Empty` if untouched).
    #[inline]
    pub fn state_at(&self, coord: Coordinate) -> CellState {
        self.cells.get(&coord).copied().unwrap_or_default()
    }

    /// Image reference at a coordinate.
    #[inline]
    pub fn image_at(&self, coord: Coordinate) -> Option<&str> {
        self.images.get(&coord).map(String::as_str)
    }

    /// Count cells in each state.
    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for state in self.cells.values() {
            match state.base() {
                CellState::Planned => counts.planned += 1,
                CellState::Visited => counts.visited += 1,
                CellState::Human => counts.human += 1,
                _ => {}
            }
        }
        counts
    }

    /// Where the robot overlay landed.
    pub fn robot_cell(&self) -> Option<Coordinate> {
        self.cells
            .iter()
            .find(|(_, state)| state.has_robot())
            .map(|(coord, _)| *coord)
    }
}

/// A deserialized view that breaks a composition invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidGridView {
    /// A cell lies outside the view bounds.
    #[error("cell {0} lies outside the view bounds")]
    CellOutOfBounds(Coordinate),

    /// An image is attached to a cell that was never visited.
    #[error("image on unvisited cell {0}")]
    ImageOnUnvisitedCell(Coordinate),

    /// The robot overlay must land on exactly one cell.
    #[error("expected one robot cell, found {0}")]
    RobotCells(usize),
}

#[derive(Deserialize)]
struct GridViewRecord {
    cells: BTreeMap<Coordinate, CellState>,
    images: BTreeMap<Coordinate, String>,
    bounds: Rectangle,
}

impl TryFrom<GridViewRecord> for GridView {
    type Error = InvalidGridView;

    fn try_from(record: GridViewRecord) -> Result<Self, Self::Error> {
        if let Some(coord) = record.cells.keys().find(|c| !record.bounds.contains(**c)) {
            return Err(InvalidGridView::CellOutOfBounds(*coord));
        }

        let robot_cells = record.cells.values().filter(|s| s.has_robot()).count();
        if robot_cells != 1 {
            return Err(InvalidGridView::RobotCells(robot_cells));
        }

        let state_at = |c: &Coordinate| record.cells.get(c).copied().unwrap_or_default();
        if let Some(coord) = record.images.keys().find(|c| !state_at(*c).carries_image()) {
            return Err(InvalidGridView::ImageOnUnvisitedCell(*coord));
        }

        Ok(GridView {
            cells: record.cells,
            images: record.images,
            bounds: record.bounds,
        })
    }
}

/// Cell counts by base state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    /// Planned cells
    pub planned: usize,
    /// Visited cells without detection
    pub visited: usize,
    /// Visited cells with a human detection
    pub human: usize,
}

/// Merges map and robot snapshots into a [`GridView`].
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    config: GridConfig,
    normalizer: ImagePathNormalizer,
}

impl Compositor {
    /// Create a compositor
    pub fn new(config: GridConfig) -> Self {
        let normalizer = config.normalizer();
        Self { config, normalizer }
    }

    /// Compose one view.
    ///
    /// Layers are merged in a fixed order (see [`CellState::merge`]):
    /// 1. Visited records: `Human` or `Visited`, image normalized and kept;
    ///    a later record for the same cell replaces the earlier one
    /// 2. Planned records: only where no cell exists yet
    /// 3. Robot overlay: `Current`, `VisitedCurrent` or `HumanCurrent`
    pub fn compose(&self, map: &MapState, robot: &RobotState) -> GridView {
        let mut cells: BTreeMap<Coordinate, CellState> = BTreeMap::new();
        let mut images: BTreeMap<Coordinate, String> = BTreeMap::new();

        for visit in &map.visited {
            let coord = visit.coordinate;
            let layer = if visit.human_detected {
                Layer::Human
            } else {
                Layer::Visited
            };
            let state = CellState::merge(cells.get(&coord).copied(), layer);
            cells.insert(coord, state);

            match &visit.image_path {
                Some(path) => {
                    images.insert(coord, self.normalizer.normalize(path));
                }
                None => {
                    images.remove(&coord);
                }
            }
        }

        for planned in &map.planned {
            let coord = planned.coordinate;
            let state = CellState::merge(cells.get(&coord).copied(), Layer::Planned);
            cells.insert(coord, state);
        }

        let robot_coord = robot.coordinate;
        let state = CellState::merge(cells.get(&robot_coord).copied(), Layer::Robot);
        cells.insert(robot_coord, state);

        // cells keys are exactly visited ∪ planned ∪ robot
        let bounds = Rectangle::enclosing_or(
            cells.keys().copied(),
            self.config.padding,
            self.config.default_bounds(),
        );

        log::trace!(
            "Composed {} cells ({} images) within x[{}, {}] y[{}, {}]",
            cells.len(),
            images.len(),
            bounds.min_x,
            bounds.max_x,
            bounds.min_y,
            bounds.max_y
        );

        GridView {
            cells,
            images,
            bounds,
        }
    }

    /// Compose and bundle the inputs for renderers that show a summary.
    pub fn frame(&self, map: MapState, robot: RobotState) -> GridFrame {
        let view = self.compose(&map, &robot);
        GridFrame { view, map, robot }
    }
}

/// Compose with the default configuration.
pub fn compose(map: &MapState, robot: &RobotState) -> GridView {
    Compositor::default().compose(map, robot)
}

/// A composed view together with the snapshots it came from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridFrame {
    /// Composed grid
    pub view: GridView,
    /// Map snapshot (pass-through)
    pub map: MapState,
    /// Robot snapshot (pass-through)
    pub robot: RobotState,
}

/// Status-line numbers for a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSummary {
    /// Robot cell
    pub robot: Coordinate,
    /// Exploration run active
    pub is_running: bool,
    /// Robot is waiting to upload the image for its cell
    pub waiting_for_image: bool,
    /// Visit records in the map feed
    pub visited: usize,
    /// Exploration stack depth
    pub planned: usize,
    /// Cells with a human detection
    pub humans: usize,
    /// Next cell the explorer will head to (top of the exploration stack)
    pub next_target: Option<Coordinate>,
}

impl GridFrame {
    /// Summary numbers for a status line.
    pub fn summary(&self) -> FrameSummary {
        let counts = self.view.counts();
        FrameSummary {
            robot: self.robot.coordinate,
            is_running: self.robot.is_running,
            waiting_for_image: self.robot.waiting_for_image,
            visited: self.map.visited.len(),
            planned: self.map.planned.len(),
            humans: counts.human,
            next_target: self.map.stack_top(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlannedPosition, VisitedPosition};

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn example_map() -> MapState {
        MapState::new(
            vec![
                VisitedPosition::new(c(0, 0), false),
                VisitedPosition::new(c(1, 0), true).with_image("uploads/a.jpg"),
            ],
            vec![PlannedPosition::new(c(2, 0))],
        )
    }

    #[test]
    fn test_empty_input() {
        let view = compose(&MapState::default(), &RobotState::default());

        assert_eq!(view.cells.len(), 1);
        assert_eq!(view.state_at(c(0, 0)), CellState::Current);
        assert!(view.images.is_empty());
        assert_eq!(view.bounds, Rectangle::new(-1, 1, -1, 1));
        assert!(view.bounds.contains(c(0, 0)));
    }

    #[test]
    fn test_robot_on_human_cell() {
        let view = compose(&example_map(), &RobotState::new(c(1, 0), true));

        assert_eq!(view.state_at(c(0, 0)), CellState::Visited);
        assert_eq!(view.state_at(c(1, 0)), CellState::HumanCurrent);
        assert_eq!(view.state_at(c(2, 0)), CellState::Planned);
        assert_eq!(view.cells.len(), 3);

        let expected: BTreeMap<Coordinate, String> = [(c(1, 0), "a.jpg".to_string())].into();
        assert_eq!(view.images, expected);
        assert_eq!(view.bounds, Rectangle::new(-1, 3, -1, 1));
    }

    #[test]
    fn test_robot_on_planned_cell() {
        let view = compose(&example_map(), &RobotState::new(c(2, 0), true));

        assert_eq!(view.state_at(c(2, 0)), CellState::Current);
        assert_eq!(view.state_at(c(1, 0)), CellState::Human);
        assert_eq!(view.image_at(c(1, 0)), Some("a.jpg"));
    }

    #[test]
    fn test_robot_on_visited_cell() {
        let view = compose(&example_map(), &RobotState::new(c(0, 0), false));
        assert_eq!(view.state_at(c(0, 0)), CellState::VisitedCurrent);
        assert_eq!(view.robot_cell(), Some(c(0, 0)));
    }

    #[test]
    fn test_robot_outside_map_extends_bounds() {
        // Robot feed ahead of the map feed
        let view = compose(&example_map(), &RobotState::new(c(5, 5), true));
        assert_eq!(view.state_at(c(5, 5)), CellState::Current);
        assert_eq!(view.bounds, Rectangle::new(-1, 6, -1, 6));
    }

    #[test]
    fn test_visited_dominates_planned() {
        let map = MapState::new(
            vec![VisitedPosition::new(c(3, 3), false)],
            vec![PlannedPosition::new(c(3, 3)), PlannedPosition::new(c(4, 3))],
        );
        let view = compose(&map, &RobotState::default());
        assert_eq!(view.state_at(c(3, 3)), CellState::Visited);
        assert_eq!(view.state_at(c(4, 3)), CellState::Planned);
    }

    #[test]
    fn test_duplicate_visit_last_write_wins() {
        let map = MapState::new(
            vec![
                VisitedPosition::new(c(1, 1), true).with_image("uploads/old.jpg"),
                VisitedPosition::new(c(1, 1), false),
                VisitedPosition::new(c(2, 1), false).with_image("uploads/first.jpg"),
                VisitedPosition::new(c(2, 1), true).with_image("uploads/second.jpg"),
            ],
            vec![],
        );
        let view = compose(&map, &RobotState::default());

        assert_eq!(view.state_at(c(1, 1)), CellState::Visited);
        assert_eq!(view.image_at(c(1, 1)), None);
        assert_eq!(view.state_at(c(2, 1)), CellState::Human);
        assert_eq!(view.image_at(c(2, 1)), Some("second.jpg"));
    }

    #[test]
    fn test_visit_without_detection_keeps_image() {
        let map = MapState::new(
            vec![VisitedPosition::new(c(0, 1), false).with_image("uploads/pos_0_1.jpg")],
            vec![],
        );
        let view = compose(&map, &RobotState::new(c(0, 1), true));
        assert_eq!(view.state_at(c(0, 1)), CellState::VisitedCurrent);
        assert_eq!(view.image_at(c(0, 1)), Some("pos_0_1.jpg"));
    }

    #[test]
    fn test_compose_is_pure() {
        let compositor = Compositor::default();
        let robot = RobotState::new(c(1, 0), true);
        let first = compositor.compose(&example_map(), &robot);
        let second = compositor.compose(&example_map(), &robot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_config() {
        let compositor = Compositor::new(GridConfig {
            padding: 0,
            default_half_extent: 4,
            storage_roots: vec!["data/img".to_string()],
        });
        let map = MapState::new(
            vec![VisitedPosition::new(c(2, 2), true).with_image("data/img/x.jpg")],
            vec![],
        );
        let view = compositor.compose(&map, &RobotState::new(c(2, 2), true));
        assert_eq!(view.bounds, Rectangle::new(2, 2, 2, 2));
        assert_eq!(view.image_at(c(2, 2)), Some("x.jpg"));
    }

    #[test]
    fn test_frame_summary() {
        let mut map = example_map();
        // The explorer pops the top even when that cell is already visited
        map.planned.push(PlannedPosition::new(c(0, 0)));

        let frame = Compositor::default().frame(map, RobotState::new(c(1, 0), true));
        let summary = frame.summary();

        assert_eq!(summary.robot, c(1, 0));
        assert!(summary.is_running);
        assert_eq!(summary.visited, 2);
        assert_eq!(summary.planned, 2);
        assert_eq!(summary.humans, 1);
        assert_eq!(summary.next_target, Some(c(0, 0)));
    }

    #[test]
    fn test_counts() {
        let view = compose(&example_map(), &RobotState::new(c(1, 0), true));
        let counts = view.counts();
        assert_eq!(counts.visited, 1);
        assert_eq!(counts.human, 1);
        assert_eq!(counts.planned, 1);
    }

    #[test]
    fn test_view_json_uses_coordinate_keys() {
        let view = compose(&example_map(), &RobotState::new(c(1, 0), true));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["cells"]["1,0"], "humanCurrent");
        assert_eq!(json["images"]["1,0"], "a.jpg");
        assert_eq!(json["bounds"]["minX"], -1);

        let back: GridView = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn test_view_json_rejects_broken_invariants() {
        let image_on_planned = r#"{
            "cells": {"0,0": "current", "5,5": "planned"},
            "images": {"5,5": "a.jpg"},
            "bounds": {"minX": -1, "maxX": 6, "minY": -1, "maxY": 6}
        }"#;
        let err = serde_json::from_str::<GridView>(image_on_planned).unwrap_err();
        assert!(err.to_string().contains("unvisited cell 5,5"));

        let outside = r#"{
            "cells": {"0,0": "current", "9,9": "visited"},
            "images": {},
            "bounds": {"minX": -1, "maxX": 1, "minY": -1, "maxY": 1}
        }"#;
        let err = serde_json::from_str::<GridView>(outside).unwrap_err();
        assert!(err.to_string().contains("outside the view bounds"));

        let no_robot = r#"{
            "cells": {"0,0": "visited"},
            "images": {},
            "bounds": {"minX": -1, "maxX": 1, "minY": -1, "maxY": 1}
        }"#;
        assert!(serde_json::from_str::<GridView>(no_robot).is_err());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_compositor_is_shareable() {
        assert_send_sync::<Compositor>();
        assert_send_sync::<GridView>();
        assert_send_sync::<GridFrame>();
    }

    #[test]
    fn test_concurrent_compose_agrees() {
        let compositor = Compositor::default();
        let map = example_map();
        let robot = RobotState::new(c(1, 0), true);
        let expected = compositor.compose(&map, &robot);

        // Shared borrows only, no locking
        let views: Vec<GridView> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| compositor.compose(&map, &robot)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(views.len(), 8);
        for view in views {
            assert_eq!(view, expected);
        }
    }
}
