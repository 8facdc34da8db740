//! Feed sources.
//!
//! The exploration server exposes two independent JSON endpoints, one for
//! the map (visited cells and exploration stack) and one for the robot
//! (current cell and run state). Each cycle fetches both. A fetch that fails
//! for any reason is replaced by the default snapshot, so a cycle always has
//! something to compose.

use std::path::PathBuf;
use std::time::Duration;

use khoj_grid::payload::{decode_map, decode_robot};
use khoj_grid::{MapState, RobotState};
use tracing::{debug, warn};

use crate::error::{Result, ViewError};

/// Source of map snapshots
pub trait MapFeed: Send + Sync {
    /// Fetch and decode the current map snapshot
    fn fetch_map(&self) -> Result<MapState>;

    /// Where the feed comes from, for log messages
    fn describe(&self) -> String;
}

/// Source of robot snapshots
pub trait RobotFeed: Send + Sync {
    /// Fetch and decode the current robot snapshot
    fn fetch_robot(&self) -> Result<RobotState>;

    /// Where the feed comes from, for log messages
    fn describe(&self) -> String;
}

/// Default substitution: a failed fetch yields the default snapshot.
pub fn fetch_or_default<T: Default>(source: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Feed {} unavailable, using default: {}", source, e);
            T::default()
        }
    }
}

fn decode_map_body(source: &str, body: &str) -> Result<MapState> {
    let decoded = decode_map(body)?;
    if decoded.skipped > 0 {
        warn!(
            "Feed {}: skipped {} malformed entries",
            source, decoded.skipped
        );
    }
    Ok(decoded.state)
}

/// Blocking HTTP feed for one endpoint.
pub struct HttpFeed {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpFeed {
    /// Create a feed for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn get_body(&self) -> Result<String> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViewError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        debug!("GET {} -> {} bytes", self.url, body.len());
        Ok(body)
    }
}

impl MapFeed for HttpFeed {
    fn fetch_map(&self) -> Result<MapState> {
        let body = self.get_body()?;
        decode_map_body(self.url(), &body)
    }

    fn describe(&self) -> String {
        self.url().to_string()
    }
}

impl RobotFeed for HttpFeed {
    fn fetch_robot(&self) -> Result<RobotState> {
        let body = self.get_body()?;
        Ok(decode_robot(&body)?)
    }

    fn describe(&self) -> String {
        self.url().to_string()
    }
}

/// Feed read from a JSON file on disk (replays, offline inspection).
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MapFeed for FileFeed {
    fn fetch_map(&self) -> Result<MapState> {
        let body = std::fs::read_to_string(&self.path)?;
        decode_map_body(&self.path.display().to_string(), &body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl RobotFeed for FileFeed {
    fn fetch_robot(&self) -> Result<RobotState> {
        let body = std::fs::read_to_string(&self.path)?;
        Ok(decode_robot(&body)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
