//! Frame renderers.

use std::io::Write;
use std::path::PathBuf;

use khoj_grid::GridFrame;
use khoj_grid::io::{SvgConfig, SvgVisualizer, TextConfig, render_text_with};
use tracing::debug;

use crate::error::Result;

/// Consumer of composed frames
pub trait Renderer {
    /// Short name for log messages
    fn name(&self) -> &'static str;

    /// Render one frame
    fn render(&mut self, frame: &GridFrame) -> Result<()>;
}

/// Writes the SVG visualization to a file.
///
/// The file is written next to its destination and renamed into place, so
/// a browser polling the path never reads a half-written document.
pub struct SvgRenderer {
    path: PathBuf,
    config: SvgConfig,
    title: Option<String>,
}

impl SvgRenderer {
    pub fn new(path: impl Into<PathBuf>, config: SvgConfig) -> Self {
        Self {
            path: path.into(),
            config,
            title: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "grid.svg".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Renderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn render(&mut self, frame: &GridFrame) -> Result<()> {
        let mut visualizer = SvgVisualizer::new(frame, self.config.clone());
        if let Some(title) = &self.title {
            visualizer = visualizer.with_title(title.clone());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        visualizer.save(&temp)?;
        std::fs::rename(&temp, &self.path)?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// Prints the text grid and status line.
pub struct TerminalRenderer<W: Write> {
    out: W,
    config: TextConfig,
    clear_screen: bool,
}

impl TerminalRenderer<std::io::Stdout> {
    /// Render to stdout, redrawing in place
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
            config: TextConfig::default(),
            clear_screen: true,
        }
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render to any writer, appending frames
    pub fn new(out: W, config: TextConfig) -> Self {
        Self {
            out,
            config,
            clear_screen: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn render(&mut self, frame: &GridFrame) -> Result<()> {
        let text = render_text_with(frame, &self.config);
        if self.clear_screen {
            // ANSI: clear screen, cursor home
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
