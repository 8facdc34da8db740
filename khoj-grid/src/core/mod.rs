//! Core types for the exploration grid.
//!
//! ## Type Categories
//!
//! ### Coordinates
//! - [`Coordinate`]: Integer lattice cell with a reversible `"x,y"` key
//! - [`Rectangle`]: Inclusive cell range a renderer draws
//!
//! ### Cells
//! - [`CellState`]: Merged state of a cell (base state plus robot overlay)
//! - [`Layer`]: One input layer of the compositor's merge
//!
//! ### Feed records
//! - [`VisitedPosition`], [`PlannedPosition`], [`MapState`]: map feed snapshot
//! - [`RobotState`]: robot feed snapshot
//!
//! The lattice uses y-up orientation: rows are drawn from `max_y` at the top
//! down to `min_y`.

mod bounds;
mod cell;
mod coord;
mod state;

pub use bounds::{DEFAULT_HALF_EXTENT, DEFAULT_PADDING, Rectangle, bounds};
pub use cell::{CellState, Layer};
pub use coord::{Coordinate, ParseCoordinateError};
pub use state::{MapState, PlannedPosition, RobotState, VisitedPosition};
