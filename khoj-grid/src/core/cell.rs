//! Cell states for the exploration grid.
//!
//! A cell's state is a base (what the map feed says about the cell) plus an
//! optional robot overlay (the robot feed says the robot is standing on it).
//! The overlay is a modifier: it never erases what the base recorded.

use serde::{Deserialize, Serialize};

/// Merged state of a single grid cell.
///
/// The state hierarchy:
/// - `Empty` - Never touched by either feed (only seen by renderers)
/// - `Planned` - Queued on the exploration stack, not yet visited
/// - `Visited` - Robot has occupied the cell, nobody detected
/// - `Human` - Robot has occupied the cell and a human was detected
/// - `Current` / `VisitedCurrent` / `HumanCurrent` - the above with the robot on it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellState {
    /// Not present in either feed
    #[default]
    Empty,
    /// Exploration stack entry
    Planned,
    /// Visited, no detection
    Visited,
    /// Visited with a human detection
    Human,
    /// Robot is here, cell has no visit record
    Current,
    /// Robot is on a visited cell
    VisitedCurrent,
    /// Robot is on a cell with a human detection
    HumanCurrent,
}

/// One layer of the compositor's merge, applied in this order:
/// visited records, then planned records, then the robot overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    /// Visit record without detection
    Visited,
    /// Visit record with a human detection
    Human,
    /// Exploration stack entry
    Planned,
    /// Live robot position
    Robot,
}

impl CellState {
    /// Merge a layer into the current state of a cell.
    ///
    /// Precedence:
    /// 1. A visit record replaces any earlier visit record (last write wins)
    /// 2. Planned only fills cells nobody else has claimed
    /// 3. The robot overlay upgrades, never erases: Visited -> VisitedCurrent,
    ///    Human -> HumanCurrent, anything else -> Current
    ///
    /// A base layer landing on an overlaid cell keeps the overlay, so the
    /// result does not depend on when the robot layer was applied.
    pub fn merge(existing: Option<CellState>, layer: Layer) -> CellState {
        let existing = existing.unwrap_or(CellState::Empty);
        let robot_here = existing.has_robot();

        match (layer, robot_here) {
            (Layer::Visited, false) => CellState::Visited,
            (Layer::Visited, true) => CellState::VisitedCurrent,
            (Layer::Human, false) => CellState::Human,
            (Layer::Human, true) => CellState::HumanCurrent,

            // Visited strictly dominates planned; a cell never regresses
            (Layer::Planned, _) => match existing {
                CellState::Empty => CellState::Planned,
                other => other,
            },

            (Layer::Robot, _) => existing.with_robot(),
        }
    }

    /// Apply the robot overlay to this state.
    #[inline]
    pub fn with_robot(self) -> CellState {
        match self {
            CellState::Empty | CellState::Planned | CellState::Current => CellState::Current,
            CellState::Visited | CellState::VisitedCurrent => CellState::VisitedCurrent,
            CellState::Human | CellState::HumanCurrent => CellState::HumanCurrent,
        }
    }

    /// The state without the robot overlay.
    #[inline]
    pub fn base(self) -> CellState {
        match self {
            CellState::Current => CellState::Empty,
            CellState::VisitedCurrent => CellState::Visited,
            CellState::HumanCurrent => CellState::Human,
            other => other,
        }
    }

    /// Is the robot standing on this cell?
    #[inline]
    pub fn has_robot(self) -> bool {
        matches!(
            self,
            CellState::Current | CellState::VisitedCurrent | CellState::HumanCurrent
        )
    }

    /// Has the robot physically occupied this cell at some point?
    #[inline]
    pub fn is_visited(self) -> bool {
        matches!(
            self,
            CellState::Visited
                | CellState::Human
                | CellState::VisitedCurrent
                | CellState::HumanCurrent
        )
    }

    /// Was a human detected on this cell?
    #[inline]
    pub fn has_human(self) -> bool {
        matches!(self, CellState::Human | CellState::HumanCurrent)
    }

    /// May this cell carry an image reference?
    #[inline]
    pub fn carries_image(self) -> bool {
        self.is_visited()
    }

    /// Single character representation for text rendering
    pub fn as_char(self) -> char {
        match self {
            CellState::Empty => ' ',
            CellState::Planned => 'o',
            CellState::Visited => '.',
            CellState::Human => 'H',
            CellState::Current => 'R',
            CellState::VisitedCurrent => 'r',
            CellState::HumanCurrent => '@',
        }
    }

    /// Space separated class names (base class first, then `current`).
    pub fn css_classes(self) -> &'static str {
        match self {
            CellState::Empty => "empty",
            CellState::Planned => "planned",
            CellState::Visited => "visited",
            CellState::Human => "human",
            CellState::Current => "current",
            CellState::VisitedCurrent => "visited current",
            CellState::HumanCurrent => "human current",
        }
    }
}
