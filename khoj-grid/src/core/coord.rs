//! Lattice coordinates and their canonical key encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Integer cell coordinate on the exploration lattice.
///
/// The canonical key form is `"x,y"` (for example `"-3,12"`). It is used
/// wherever a coordinate has to be a string, including JSON object keys, and
/// always parses back to the same pair of integers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct Coordinate {
    /// X coordinate (column)
    pub x: i32,
    /// Y coordinate (row, positive up)
    pub y: i32,
}

impl Coordinate {
    /// The origin cell, where the robot starts.
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0 };

    /// Create a new coordinate
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canonical `"x,y"` key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Failure to parse a `"x,y"` coordinate key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordinateError {
    /// No comma separating the two components.
    #[error("missing ',' separator in coordinate key {0:?}")]
    MissingSeparator(String),

    /// A component is not a base-10 `i32`.
    #[error("invalid {axis} component {value:?} in coordinate key")]
    InvalidComponent {
        /// Which axis failed ("x" or "y")
        axis: &'static str,
        /// The offending text
        value: String,
    },

    /// Parses, but is not the canonical spelling (`+`, leading zeros, `-0`).
    #[error("coordinate key {0:?} is not in canonical form")]
    NonCanonical(String),
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| ParseCoordinateError::MissingSeparator(s.to_string()))?;

        let parse = |axis: &'static str, value: &str| {
            value
                .parse::<i32>()
                .map_err(|_| ParseCoordinateError::InvalidComponent {
                    axis,
                    value: value.to_string(),
                })
        };

        let coord = Coordinate::new(parse("x", x)?, parse("y", y)?);
        // Only one spelling per coordinate, so distinct keys never collide
        if coord.to_string() != s {
            return Err(ParseCoordinateError::NonCanonical(s.to_string()));
        }
        Ok(coord)
    }
}

impl From<Coordinate> for String {
    fn from(coord: Coordinate) -> Self {
        coord.to_string()
    }
}

impl TryFrom<String> for Coordinate {
    type Error = ParseCoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
