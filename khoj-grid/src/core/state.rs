//! Per-cycle snapshots of the two feeds.
//!
//! These are the well-typed inputs of the compositor. They are built fresh
//! from each poll's payload and dropped after the cycle.

use serde::{Deserialize, Serialize};

use super::coord::Coordinate;

/// A cell the robot has physically occupied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisitedPosition {
    /// Where the robot was
    pub coordinate: Coordinate,
    /// Did the detector find a human in the image taken here?
    pub human_detected: bool,
    /// Storage path of the image taken here, if any
    pub image_path: Option<String>,
    /// Feed timestamp (seconds since epoch), informational only
    pub timestamp: Option<f64>,
}

impl VisitedPosition {
    /// Visit record without an image.
    pub fn new(coordinate: Coordinate, human_detected: bool) -> Self {
        Self {
            coordinate,
            human_detected,
            image_path: None,
            timestamp: None,
        }
    }

    /// Attach the storage path of the image taken at this cell.
    pub fn with_image(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }
}

/// A cell queued on the exploration stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPosition {
    /// Queued cell
    pub coordinate: Coordinate,
}

impl PlannedPosition {
    /// Create a planned position
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

/// Map feed snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    /// Visit records in feed order
    pub visited: Vec<VisitedPosition>,
    /// Exploration stack, bottom first (the last entry is explored next)
    pub planned: Vec<PlannedPosition>,
}

impl MapState {
    /// Create a snapshot from its two lists
    pub fn new(visited: Vec<VisitedPosition>, planned: Vec<PlannedPosition>) -> Self {
        Self { visited, planned }
    }

    /// Is the snapshot empty (nothing visited, nothing planned)?
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty() && self.planned.is_empty()
    }

    /// Top of the exploration stack.
    pub fn stack_top(&self) -> Option<Coordinate> {
        self.planned.last().map(|p| p.coordinate)
    }
}

/// Robot feed snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotState {
    /// Current cell
    pub coordinate: Coordinate,
    /// Is the exploration run active?
    pub is_running: bool,
    /// Has the robot moved and not yet uploaded the image for its cell?
    pub waiting_for_image: bool,
}

impl RobotState {
    /// Create a robot snapshot
    pub fn new(coordinate: Coordinate, is_running: bool) -> Self {
        Self {
            coordinate,
            is_running,
            waiting_for_image: false,
        }
    }
}
