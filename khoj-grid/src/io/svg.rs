//! SVG visualization of a composed grid.
//!
//! Renders one [`GridFrame`] as a cell grid:
//! - Cells colored by base state (planned, visited, human)
//! - Robot marker on the current cell, human marker on detection cells
//! - Image cells wrapped in a link to `image_base + reference`
//! - Dashed outline on the next exploration target
//! - Status line and legend below the grid
//!
//! Rows run from `max_y` at the top to `min_y` at the bottom.

use std::path::Path;

use svg::Document;
use svg::node::element::{Anchor, Circle, Group, Rectangle as Rect, Text};

use super::{DEFAULT_MAX_SIDE, clip_viewport, image_url, text::status_line};
use crate::compose::GridFrame;
use crate::core::{CellState, Coordinate, Rectangle};

/// SVG color scheme for visualization
#[derive(Clone, Debug)]
pub struct SvgColorScheme {
    /// Untouched cell color
    pub empty: &'static str,
    /// Exploration stack cell color
    pub planned: &'static str,
    /// Visited cell color
    pub visited: &'static str,
    /// Human detection cell color
    pub human: &'static str,
    /// Robot marker color
    pub robot: &'static str,
    /// Next target outline color
    pub next_target: &'static str,
    /// Cell border color
    pub grid_line: &'static str,
    /// Label color
    pub text: &'static str,
}

impl Default for SvgColorScheme {
    fn default() -> Self {
        Self {
            empty: "#F4F4F4",
            planned: "#BFD7EA",
            visited: "#8FD19E",
            human: "#F28B82",
            robot: "#1A73E8",
            next_target: "#E69F00",
            grid_line: "#CCCCCC",
            text: "#333333",
        }
    }
}

impl SvgColorScheme {
    /// Fill color for a cell (robot overlay is drawn as a marker, not a fill).
    pub fn fill(&self, state: CellState) -> &'static str {
        match state.base() {
            CellState::Planned => self.planned,
            CellState::Visited => self.visited,
            CellState::Human => self.human,
            _ => self.empty,
        }
    }
}

/// Configuration for SVG rendering
#[derive(Clone, Debug)]
pub struct SvgConfig {
    /// Pixels per cell
    pub cell_size: f32,
    /// Padding around the grid in pixels
    pub padding: f32,
    /// Draw `x,y` labels in cells
    pub show_coordinates: bool,
    /// Prefix joined with image references to form link targets
    pub image_base: String,
    /// Maximum cells drawn per axis
    pub max_side: u32,
    /// Color scheme
    pub colors: SvgColorScheme,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            padding: 20.0,
            show_coordinates: true,
            image_base: "/uploads/".to_string(),
            max_side: DEFAULT_MAX_SIDE,
            colors: SvgColorScheme::default(),
        }
    }
}

const TITLE_HEIGHT: f32 = 30.0;
const STATUS_HEIGHT: f32 = 24.0;
const LEGEND_HEIGHT: f32 = 30.0;

/// SVG visualization builder
pub struct SvgVisualizer<'a> {
    config: SvgConfig,
    frame: &'a GridFrame,
    title: Option<String>,
}

impl<'a> SvgVisualizer<'a> {
    /// Create a new SVG visualizer
    pub fn new(frame: &'a GridFrame, config: SvgConfig) -> Self {
        Self {
            config,
            frame,
            title: None,
        }
    }

    /// Set a title to display
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Cells actually drawn.
    pub fn viewport(&self) -> Rectangle {
        clip_viewport(
            self.frame.view.bounds,
            self.frame.robot.coordinate,
            self.config.max_side,
        )
    }

    /// Build the SVG document
    pub fn document(&self) -> Document {
        let viewport = self.viewport();
        let cell = self.config.cell_size;
        let padding = self.config.padding;

        let grid_width = viewport.width() as f32 * cell;
        let grid_height = viewport.height() as f32 * cell;
        let title_height = if self.title.is_some() { TITLE_HEIGHT } else { 0.0 };

        let width = grid_width + 2.0 * padding;
        let height = grid_height + 2.0 * padding + title_height + STATUS_HEIGHT + LEGEND_HEIGHT;

        let mut doc = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .add(
                Rect::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", "#FFFFFF"),
            );

        if let Some(title) = &self.title {
            doc = doc.add(
                Text::new(title.as_str())
                    .set("x", width / 2.0)
                    .set("y", 22)
                    .set("font-family", "sans-serif")
                    .set("font-size", 16)
                    .set("font-weight", "bold")
                    .set("text-anchor", "middle")
                    .set("fill", self.config.colors.text),
            );
        }

        let grid_y = padding + title_height;
        doc = doc.add(
            self.render_grid(viewport)
                .set("transform", format!("translate({}, {})", padding, grid_y)),
        );

        let status_y = grid_y + grid_height + 16.0;
        doc = doc.add(
            Text::new(status_line(&self.frame.summary()))
                .set("id", "status")
                .set("x", padding)
                .set("y", status_y)
                .set("font-family", "monospace")
                .set("font-size", 12)
                .set("fill", self.config.colors.text),
        );

        doc.add(self.render_legend(padding, status_y + 8.0))
    }

    /// Render to SVG string
    pub fn render(&self) -> String {
        self.document().to_string()
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        svg::save(path, &self.document())
    }

    fn render_grid(&self, viewport: Rectangle) -> Group {
        let view = &self.frame.view;
        let next_target = self.frame.summary().next_target;
        let mut grid = Group::new().set("id", "grid");

        for (row, y) in viewport.rows_top_down().enumerate() {
            for (col, x) in viewport.columns().enumerate() {
                let coord = Coordinate::new(x, y);
                let state = view.state_at(coord);
                let px = col as f32 * self.config.cell_size;
                let py = row as f32 * self.config.cell_size;

                let mut cell = self.render_cell(coord, state, px, py);
                if next_target == Some(coord) {
                    cell = cell.add(self.target_outline(px, py));
                }

                grid = match view.image_at(coord) {
                    Some(reference) => grid.add(
                        Anchor::new()
                            .set("href", image_url(&self.config.image_base, reference))
                            .set("target", "_blank")
                            .add(cell),
                    ),
                    None => grid.add(cell),
                };
            }
        }

        grid
    }

    fn render_cell(&self, coord: Coordinate, state: CellState, px: f32, py: f32) -> Group {
        let size = self.config.cell_size;
        let colors = &self.config.colors;

        let mut group = Group::new()
            .set("class", format!("cell {}", state.css_classes()))
            .set("data-coord", coord.key())
            .add(
                Rect::new()
                    .set("x", px)
                    .set("y", py)
                    .set("width", size)
                    .set("height", size)
                    .set("fill", colors.fill(state))
                    .set("stroke", colors.grid_line)
                    .set("stroke-width", 1),
            );

        if self.config.show_coordinates {
            group = group.add(
                Text::new(coord.key())
                    .set("x", px + 3.0)
                    .set("y", py + size - 4.0)
                    .set("font-family", "sans-serif")
                    .set("font-size", (size / 4.0).max(6.0))
                    .set("fill", colors.text)
                    .set("opacity", 0.6),
            );
        }

        if state.has_human() {
            group = group.add(
                Text::new("H")
                    .set("class", "human-marker")
                    .set("x", px + size - 4.0)
                    .set("y", py + size / 3.0)
                    .set("font-family", "sans-serif")
                    .set("font-size", (size / 3.0).max(8.0))
                    .set("font-weight", "bold")
                    .set("text-anchor", "end")
                    .set("fill", colors.text),
            );
        }

        if state.has_robot() {
            group = group.add(
                Circle::new()
                    .set("class", "robot-marker")
                    .set("cx", px + size / 2.0)
                    .set("cy", py + size / 2.0)
                    .set("r", size / 4.0)
                    .set("fill", colors.robot)
                    .set("stroke", "white")
                    .set("stroke-width", 2),
            );
        }

        group
    }

    fn target_outline(&self, px: f32, py: f32) -> Rect {
        let inset = 2.0;
        Rect::new()
            .set("class", "next-target")
            .set("x", px + inset)
            .set("y", py + inset)
            .set("width", self.config.cell_size - 2.0 * inset)
            .set("height", self.config.cell_size - 2.0 * inset)
            .set("fill", "none")
            .set("stroke", self.config.colors.next_target)
            .set("stroke-width", 2)
            .set("stroke-dasharray", "4 2")
    }

    fn render_legend(&self, x: f32, y: f32) -> Group {
        let colors = &self.config.colors;
        let entries = [
            ("Planned", colors.planned),
            ("Visited", colors.visited),
            ("Human", colors.human),
            ("Robot", colors.robot),
        ];

        let mut legend = Group::new()
            .set("id", "legend")
            .set("font-family", "sans-serif")
            .set("font-size", 12)
            .set("transform", format!("translate({}, {})", x, y));

        for (i, (label, color)) in entries.into_iter().enumerate() {
            let entry_x = i as f32 * 90.0;
            legend = legend
                .add(
                    Rect::new()
                        .set("x", entry_x)
                        .set("y", 4)
                        .set("width", 14)
                        .set("height", 14)
                        .set("fill", color)
                        .set("stroke", colors.grid_line),
                )
                .add(
                    Text::new(label)
                        .set("x", entry_x + 20.0)
                        .set("y", 16)
                        .set("fill", colors.text),
                );
        }

        legend
    }
}
