//! Simulation systems: decisions, the tick driver, spawning.

pub mod decision;
pub mod social;
pub mod spawn;
pub mod tick;
