//! Shared event and snapshot types for the snake terrarium simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The embedding host (renderer, wallpaper bridge) consumes these records;
//! the engine crate produces them.

pub mod event;
pub mod snapshot;

// Re-export event types
pub use event::{generate_event_id, EventKind, SimEvent};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, CellPos, SnakeSnapshot, WorldSnapshot,
};
