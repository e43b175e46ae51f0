//! World state: board, ordered roster, terrain, run status, clock.

use serde::{Deserialize, Serialize};

use crate::grid::GridDims;
use crate::terrain::Terrain;

use super::snake::{Snake, SnakeId};

/// Overall run status of one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Paused,
    /// The last living snake died.
    GameOver,
    /// A snake filled the whole board.
    Complete,
}

impl RunStatus {
    pub fn label(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Paused => "paused",
            RunStatus::GameOver => "game_over",
            RunStatus::Complete => "complete",
        }
    }
}

/// The single source of truth for mutable simulation state.
///
/// The roster order is authoritative: snakes are processed in this order
/// every tick, and an earlier snake's committed move (or a behavior flag
/// it set on a peer) is visible to later snakes in the same pass. The
/// tick loop must never be parallelized across the roster.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub dims: GridDims,
    pub snakes: Vec<Snake>,
    pub terrain: Terrain,
    pub status: RunStatus,
    /// Simulation clock in milliseconds, advanced by the driver.
    pub now_ms: u64,
    next_snake_id: u32,
}

impl WorldState {
    pub fn new(cols: i32, rows: i32) -> Self {
        let dims = GridDims::new(cols, rows);
        Self {
            dims,
            snakes: Vec::new(),
            terrain: Terrain::new(dims),
            status: RunStatus::Running,
            now_ms: 0,
            next_snake_id: 0,
        }
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }

    pub fn snake_mut(&mut self, id: SnakeId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|s| s.id == id)
    }

    pub fn snake_index(&self, id: SnakeId) -> Option<usize> {
        self.snakes.iter().position(|s| s.id == id)
    }

    /// Snakes currently on the board and alive.
    pub fn living_count(&self) -> usize {
        self.snakes.iter().filter(|s| !s.respawning).count()
    }

    /// Allocates the next unused snake id, skipping any id already in
    /// the roster.
    pub fn allocate_id(&mut self) -> SnakeId {
        while self.snakes.iter().any(|s| s.id.0 == self.next_snake_id) {
            self.next_snake_id += 1;
        }
        let id = SnakeId(self.next_snake_id);
        self.next_snake_id += 1;
        id
    }

    /// Applies new board dimensions. Terrain buffers are reallocated;
    /// snakes that no longer fit are sent through the respawn cycle by
    /// the tick driver.
    pub fn resize(&mut self, cols: i32, rows: i32) {
        self.dims = GridDims::new(cols, rows);
        self.terrain.resize(self.dims);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Personality;
    use crate::grid::Cell;

    #[test]
    fn test_allocate_id_skips_taken() {
        let mut world = WorldState::new(4, 4);
        assert_eq!(world.allocate_id(), SnakeId(0));
        world
            .snakes
            .push(Snake::new(SnakeId(1), vec![Cell::new(0, 0)], Personality::Lazy));
        assert_eq!(world.allocate_id(), SnakeId(2));
    }

    #[test]
    fn test_living_count_excludes_respawning() {
        let mut world = WorldState::new(4, 4);
        world
            .snakes
            .push(Snake::new(SnakeId(0), vec![Cell::new(0, 0)], Personality::Lazy));
        world
            .snakes
            .push(Snake::new(SnakeId(1), vec![Cell::new(2, 2)], Personality::Greedy));
        world.snakes[1].respawning = true;
        assert_eq!(world.living_count(), 1);
    }

    #[test]
    fn test_resize_rebuilds_terrain() {
        let mut world = WorldState::new(4, 4);
        world.terrain.set_solidity(Cell::new(1, 1), 1.0);
        world.resize(8, 8);
        assert_eq!(world.terrain.dims().cols, 8);
        assert!(world.terrain.solid_cells().is_empty());
    }
}
