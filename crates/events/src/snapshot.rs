//! World Snapshot Types
//!
//! Serializable captures of the full simulation state. The host uses these
//! to (re)build its display without reaching into engine internals; the
//! engine's determinism tests compare them for whole-world equality.

use serde::{Deserialize, Serialize};

/// A board coordinate in snapshot form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

/// State of a single snake at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    pub id: u32,
    /// Personality tag as a snake_case name
    pub personality: String,
    /// Body cells, head first; empty while a failed respawn is pending
    pub body: Vec<CellPos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<CellPos>,
    /// Current movement direction as a unit vector
    pub direction: CellPos,
    /// Active behavior state name, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_target: Option<u32>,
    pub satiety: u32,
    pub wandering: bool,
    pub respawning: bool,
    /// The max-space fallback fired on this snake's latest move
    pub desperation: bool,
}

/// Complete simulation state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Unique identifier (e.g. "snap_000012")
    pub snapshot_id: String,
    /// Simulation clock in milliseconds
    pub at_ms: u64,
    pub cols: i32,
    pub rows: i32,
    /// Run status as a snake_case name
    pub status: String,
    pub snakes: Vec<SnakeSnapshot>,
    /// Cells currently solid for collision purposes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub walls: Vec<CellPos>,
    /// Cells that will become solid soon
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incoming_walls: Vec<CellPos>,
}

impl WorldSnapshot {
    /// Serializes the snapshot to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}
