//! Plain text rendering.
//!
//! One character per cell (see [`CellState::as_char`]), rows from `max_y`
//! down to `min_y`, framed with the row coordinate on the left:
//!
//! ```text
//!    1 |     |
//!    0 | .@o |
//!   -1 |     |
//!      x -1..3
//! [RUNNING] robot 1,0 | visited 2 | planned 1 | humans 1 | next 2,0
//! ```

use super::{DEFAULT_MAX_SIDE, clip_viewport};
use crate::compose::{FrameSummary, GridFrame};
use crate::core::{CellState, Coordinate};

/// Text rendering options
#[derive(Clone, Debug)]
pub struct TextConfig {
    /// Maximum cells drawn per axis
    pub max_side: u32,
    /// Append the status line
    pub status: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
            status: true,
        }
    }
}

/// Render with default options.
pub fn render_text(frame: &GridFrame) -> String {
    render_text_with(frame, &TextConfig::default())
}

/// Render a frame as text.
pub fn render_text_with(frame: &GridFrame, config: &TextConfig) -> String {
    let view = &frame.view;
    let viewport = clip_viewport(view.bounds, frame.robot.coordinate, config.max_side);
    let mut out = String::new();

    for y in viewport.rows_top_down() {
        let row: String = viewport
            .columns()
            .map(|x| view.state_at(Coordinate::new(x, y)))
            .map(CellState::as_char)
            .collect();
        out.push_str(&format!("{:>4} |{}|\n", y, row));
    }
    out.push_str(&format!("     x {}..{}\n", viewport.min_x, viewport.max_x));

    if config.status {
        out.push_str(&status_line(&frame.summary()));
        out.push('\n');
    }
    out
}

/// One-line status summary.
pub fn status_line(summary: &FrameSummary) -> String {
    let mut line = format!(
        "[{}] robot {} | visited {} | planned {} | humans {}",
        if summary.is_running {
            "RUNNING"
        } else {
            "STOPPED"
        },
        summary.robot,
        summary.visited,
        summary.planned,
        summary.humans
    );

    if let Some(next) = summary.next_target {
        line.push_str(&format!(" | next {}", next));
    }
    if summary.waiting_for_image {
        line.push_str(" | waiting for image");
    }
    line
}
