//! Decoding of the two feed payloads.
//!
//! Map feed:
//!
//! ```json
//! {
//!   "visited_positions": [{"x": 0, "y": 0, "human_detected": false, "image_path": "uploads/a.jpg"}],
//!   "exploration_stack": [{"x": 1, "y": 0}]
//! }
//! ```
//!
//! Robot feed:
//!
//! ```json
//! {"current_x": 0, "current_y": 0, "is_running": true, "waiting_for_image": false}
//! ```
//!
//! A map payload is decoded entry by entry: an entry with a missing or
//! unparsable field is skipped (and logged) while the rest of the payload is
//! kept. A payload that is not the expected JSON shape at all is an error;
//! the feed layer substitutes the default snapshot for it.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::{Coordinate, MapState, PlannedPosition, RobotState, VisitedPosition};

/// Payload decoding errors.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Body is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Body is JSON but not the expected shape
    #[error("unexpected payload shape: {0}")]
    Shape(String),
}

/// Wire form of a visit record.
#[derive(Debug, Deserialize)]
struct VisitedRecord {
    x: i32,
    y: i32,
    #[serde(default)]
    human_detected: bool,
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default)]
    timestamp: Option<f64>,
}

/// Wire form of an exploration stack entry.
#[derive(Debug, Deserialize)]
struct PlannedRecord {
    x: i32,
    y: i32,
}

/// Wire form of the robot state.
#[derive(Debug, Deserialize)]
struct RobotRecord {
    current_x: i32,
    current_y: i32,
    #[serde(default)]
    is_running: bool,
    #[serde(default)]
    waiting_for_image: bool,
}

/// Result of decoding a map payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedMap {
    /// Decoded snapshot
    pub state: MapState,
    /// Entries dropped because they were malformed
    pub skipped: usize,
}

/// Decode a map feed body.
pub fn decode_map(body: &str) -> Result<DecodedMap, PayloadError> {
    let value: Value = serde_json::from_str(body)?;
    decode_map_value(&value)
}

/// Decode an already parsed map feed body.
pub fn decode_map_value(value: &Value) -> Result<DecodedMap, PayloadError> {
    let object = value
        .as_object()
        .ok_or_else(|| PayloadError::Shape(format!("expected object, got {}", kind(value))))?;

    let mut skipped = 0;

    let visited = entries(object.get("visited_positions"), "visited_positions")?
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            match VisitedRecord::deserialize(entry) {
                Ok(r) => Some(VisitedPosition {
                    coordinate: Coordinate::new(r.x, r.y),
                    human_detected: r.human_detected,
                    image_path: r.image_path.filter(|p| !p.is_empty()),
                    timestamp: r.timestamp,
                }),
                Err(e) => {
                    log::warn!("Skipping visited_positions[{}]: {}", i, e);
                    skipped += 1;
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    let planned = entries(object.get("exploration_stack"), "exploration_stack")?
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match PlannedRecord::deserialize(entry) {
            Ok(r) => Some(PlannedPosition::new(Coordinate::new(r.x, r.y))),
            Err(e) => {
                log::warn!("Skipping exploration_stack[{}]: {}", i, e);
                skipped += 1;
                None
            }
        })
        .collect::<Vec<_>>();

    Ok(DecodedMap {
        state: MapState::new(visited, planned),
        skipped,
    })
}

/// Decode a robot feed body.
pub fn decode_robot(body: &str) -> Result<RobotState, PayloadError> {
    let record: RobotRecord = serde_json::from_str(body)?;
    Ok(RobotState {
        coordinate: Coordinate::new(record.current_x, record.current_y),
        is_running: record.is_running,
        waiting_for_image: record.waiting_for_image,
    })
}

/// A missing list is treated as empty; anything other than an array is a shape error.
fn entries<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a [Value], PayloadError> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(PayloadError::Shape(format!(
            "{} should be an array, got {}",
            field,
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
