//! Configuration loading for KhojView

use crate::error::{Result, ViewError};
use khoj_grid::GridConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub feeds: FeedConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the two feeds come from
#[derive(Clone, Debug, Deserialize)]
pub struct FeedConfig {
    /// Exploration server base URL (default: http://127.0.0.1:8000)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Map feed endpoint (default: /data/map)
    #[serde(default = "default_map_path")]
    pub map_path: String,

    /// Robot feed endpoint (default: /data/robot)
    #[serde(default = "default_robot_path")]
    pub robot_path: String,

    /// Request timeout in milliseconds (default: 2000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Read the map feed from this file instead of HTTP
    #[serde(default)]
    pub map_file: Option<PathBuf>,

    /// Read the robot feed from this file instead of HTTP
    #[serde(default)]
    pub robot_file: Option<PathBuf>,
}

/// Scheduler settings
#[derive(Clone, Debug, Deserialize)]
pub struct PollConfig {
    /// Cycle interval in milliseconds (default: 3000)
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Stop after this many cycles (default: run until Ctrl-C)
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

/// Output configuration
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Path to write the SVG visualization (empty disables it)
    #[serde(default = "default_svg_path")]
    pub svg_path: String,

    /// Prefix for image links in the SVG (default: /uploads/)
    #[serde(default = "default_image_base")]
    pub image_base: String,

    /// Print the text grid to stdout each cycle
    #[serde(default = "default_terminal")]
    pub terminal: bool,

    /// Title shown above the SVG grid
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            map_path: default_map_path(),
            robot_path: default_robot_path(),
            timeout_ms: default_timeout(),
            map_file: None,
            robot_file: None,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            max_cycles: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            svg_path: default_svg_path(),
            image_base: default_image_base(),
            terminal: default_terminal(),
            title: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_map_path() -> String {
    "/data/map".to_string()
}

fn default_robot_path() -> String {
    "/data/robot".to_string()
}

fn default_timeout() -> u64 {
    2000
}

fn default_interval() -> u64 {
    3000
}

fn default_svg_path() -> String {
    "output/grid.svg".to_string()
}

fn default_image_base() -> String {
    "/uploads/".to_string()
}

fn default_terminal() -> bool {
    true
}

impl ViewConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ViewError::Config(format!("Failed to read config file: {}", e)))?;
        let config: ViewConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scheduler cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_ms == 0 {
            return Err(ViewError::Config("poll.interval_ms must be > 0".into()));
        }
        if self.feeds.timeout_ms == 0 {
            return Err(ViewError::Config("feeds.timeout_ms must be > 0".into()));
        }
        if self.feeds.base_url.is_empty()
            && (self.feeds.map_file.is_none() || self.feeds.robot_file.is_none())
        {
            return Err(ViewError::Config(
                "feeds.base_url is empty and no feed file is configured".into(),
            ));
        }
        Ok(())
    }

    /// Full map feed URL
    pub fn map_url(&self) -> String {
        join_url(&self.feeds.base_url, &self.feeds.map_path)
    }

    /// Full robot feed URL
    pub fn robot_url(&self) -> String {
        join_url(&self.feeds.base_url, &self.feeds.robot_path)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.feeds.timeout_ms)
    }

    /// SVG output path, if enabled
    pub fn svg_path(&self) -> Option<&Path> {
        let path = self.output.svg_path.trim();
        (!path.is_empty()).then(|| Path::new(path))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
