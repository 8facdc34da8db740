//! Renderers for composed grids.
//!
//! - **SVG**: cell grid with image links, markers, status line and legend
//! - **Text**: one character per cell, for terminals and logs
//!
//! ```rust
//! use khoj_grid::{Compositor, MapState, RobotState};
//! use khoj_grid::io::{SvgConfig, SvgVisualizer, render_text};
//!
//! let frame = Compositor::default().frame(MapState::default(), RobotState::default());
//!
//! let svg = SvgVisualizer::new(&frame, SvgConfig::default())
//!     .with_title("Exploration")
//!     .render();
//! assert!(svg.contains("<svg"));
//!
//! let text = render_text(&frame);
//! assert!(text.contains('R'));
//! ```
//!
//! Bounds can be arbitrarily large when a feed reports far-away cells, so
//! both renderers draw at most a window of `max_side` cells per axis, kept
//! around the robot (see [`clip_viewport`]).

pub mod svg;
pub mod text;

pub use svg::{SvgColorScheme, SvgConfig, SvgVisualizer};
pub use text::{TextConfig, render_text, render_text_with, status_line};

use crate::core::{Coordinate, Rectangle};

/// Default cap on drawn cells per axis.
pub const DEFAULT_MAX_SIDE: u32 = 64;

/// Window of at most `max_side` cells per axis inside `bounds`, positioned
/// so that `focus` is drawn when it lies within `bounds`.
///
/// Axes that already fit are returned unchanged.
pub fn clip_viewport(bounds: Rectangle, focus: Coordinate, max_side: u32) -> Rectangle {
    let side = max_side.max(1);
    let (min_x, max_x) = clip_axis(bounds.min_x, bounds.max_x, focus.x, side);
    let (min_y, max_y) = clip_axis(bounds.min_y, bounds.max_y, focus.y, side);
    Rectangle {
        min_x,
        max_x,
        min_y,
        max_y,
    }
}

fn clip_axis(min: i32, max: i32, focus: i32, side: u32) -> (i32, i32) {
    let (min, max, side) = (min as i64, max as i64, side as i64);
    if max - min < side {
        return (min as i32, max as i32);
    }

    // Center on the focus, then slide back inside [min, max]
    let mut lo = focus as i64 - side / 2;
    lo = lo.clamp(min, max - side + 1);
    let hi = lo + side - 1;
    (lo as i32, hi as i32)
}

/// Join an image base (`/uploads/`) and a normalized reference (`a.jpg`).
pub fn image_url(base: &str, reference: &str) -> String {
    if base.is_empty() {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}
