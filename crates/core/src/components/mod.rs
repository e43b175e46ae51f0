//! Simulation state components.

pub mod snake;
pub mod world;

pub use snake::{BehaviorState, Personality, Snake, SnakeId};
pub use world::{RunStatus, WorldState};
