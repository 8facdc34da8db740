//! # Khoj Grid
//!
//! Sparse-grid compositor for a search robot's exploration map.
//!
//! ## Overview
//!
//! The exploration server publishes two independent feeds:
//!
//! - **Map feed** - cells the robot has visited (with human detections and
//!   image paths) and the exploration stack of cells still to visit
//! - **Robot feed** - the robot's live cell and run state
//!
//! Every poll cycle the two snapshots are merged into a [`GridView`]: one
//! [`CellState`] per touched cell, one image reference per image-bearing
//! cell, and the [`Rectangle`] a renderer should draw.
//!
//! ## Cell States
//!
//! - **Empty** - Never touched (only seen by renderers)
//! - **Planned** - Queued on the exploration stack
//! - **Visited** - Robot has been here, nobody detected
//! - **Human** - Robot has been here and detected a human
//! - **Current / VisitedCurrent / HumanCurrent** - robot overlay on the above
//!
//! ## Quick Start
//!
//! ```rust
//! use khoj_grid::payload::{decode_map, decode_robot};
//! use khoj_grid::{CellState, Compositor, Coordinate, GridConfig};
//!
//! let map = decode_map(
//!     r#"{"visited_positions": [{"x": 0, "y": 0, "human_detected": true, "image_path": "uploads/a.jpg"}],
//!         "exploration_stack": [{"x": 1, "y": 0}]}"#,
//! )
//! .unwrap();
//! let robot = decode_robot(r#"{"current_x": 0, "current_y": 0, "is_running": true}"#).unwrap();
//!
//! let compositor = Compositor::new(GridConfig::default());
//! let view = compositor.compose(&map.state, &robot);
//!
//! assert_eq!(view.state_at(Coordinate::new(0, 0)), CellState::HumanCurrent);
//! assert_eq!(view.image_at(Coordinate::new(0, 0)), Some("a.jpg"));
//! ```
//!
//! ## Coordinate System
//!
//! Integer lattice, x to the right and y up. Renderers draw rows from
//! `max_y` at the top down to `min_y`.

#![warn(missing_docs)]

// Core types
pub mod core;

// Compositor configuration
pub mod config;

// Image path normalization
pub mod image;

// Feed payload decoding
pub mod payload;

// The compositor
pub mod compose;

// SVG and text rendering
pub mod io;

// Re-export commonly used types
pub use crate::core::{
    CellState, Coordinate, Layer, MapState, ParseCoordinateError, PlannedPosition, Rectangle,
    RobotState, VisitedPosition, bounds,
};

pub use config::GridConfig;

pub use image::{ImagePathNormalizer, normalize_image_path};

pub use payload::{DecodedMap, PayloadError};

pub use compose::{
    CellCounts, Compositor, FrameSummary, GridFrame, GridView, InvalidGridView, compose,
};
