//! Snake terrarium simulation engine.
//!
//! A tick-driven grid world in which several autonomous snakes navigate,
//! eat, evade and hunt each other using A* pathfinding and flood-fill
//! space evaluation. No rendering lives here; the host consumes
//! [`wriggle_events`] records and drives the clock.

use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod events;
pub mod grid;
pub mod output;
pub mod search;
pub mod sim;
pub mod systems;
pub mod terrain;
pub mod tuning;

pub use components::{BehaviorState, Personality, RunStatus, Snake, SnakeId, WorldState};
pub use config::{ConfigError, SimConfig};
pub use grid::{build_occupancy, Cell, Dir, GridDims, OccupancyFlags, OccupancyGrid};
pub use search::{find_path, reachable_count, SearchArena};
pub use sim::Simulation;
pub use tuning::Tuning;

/// Seeded random number generator owned by one simulation.
///
/// Every stochastic choice (trigger rolls, roam targets, food placement)
/// draws from this single generator, so a fixed seed reproduces a run.
pub struct SimRng(pub SmallRng);
