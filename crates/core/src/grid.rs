//! Grid primitives and occupancy snapshots.
//!
//! The board is a dense row-major grid addressed by `y * cols + x`. All
//! spatial components (pathfinding, flood fill, the decision engine) go
//! through [`GridDims`] for index mapping and bounds checks.

use serde::{Deserialize, Serialize};

use crate::components::{SnakeId, WorldState};

/// A board coordinate. Signed so that a head plus a direction can leave
/// the board before the bounds check rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step in the given direction.
    pub fn step(self, dir: Dir) -> Self {
        Self {
            x: self.x + dir.dx,
            y: self.y + dir.dy,
        }
    }
}

/// Manhattan distance between two cells.
pub fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// One of the four cardinal unit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dir {
    pub dx: i32,
    pub dy: i32,
}

impl Dir {
    pub const UP: Dir = Dir { dx: 0, dy: -1 };
    pub const DOWN: Dir = Dir { dx: 0, dy: 1 };
    pub const LEFT: Dir = Dir { dx: -1, dy: 0 };
    pub const RIGHT: Dir = Dir { dx: 1, dy: 0 };

    /// Fixed expansion order used by every neighborhood walk. Search
    /// tie-breaking depends on this order staying stable within a run.
    pub const CARDINALS: [Dir; 4] = [Dir::UP, Dir::DOWN, Dir::LEFT, Dir::RIGHT];

    /// The direction from `from` to an adjacent cell `to`.
    pub fn between(from: Cell, to: Cell) -> Self {
        Self {
            dx: to.x - from.x,
            dy: to.y - from.y,
        }
    }

    /// True for exactly the four cardinal unit vectors.
    pub fn is_cardinal(self) -> bool {
        Dir::CARDINALS.contains(&self)
    }
}

/// Board dimensions plus flat-index mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub cols: i32,
    pub rows: i32,
}

impl GridDims {
    pub fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    /// Flat index of an in-bounds cell.
    pub fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell), "cell {:?} out of {:?}", cell, self);
        (cell.y * self.cols + cell.x) as usize
    }

    /// Coordinate of a flat index.
    pub fn cell_at(&self, index: usize) -> Cell {
        debug_assert!(index < self.cell_count());
        Cell {
            x: index as i32 % self.cols,
            y: index as i32 / self.cols,
        }
    }

    pub fn cell_count(&self) -> usize {
        (self.cols.max(0) as usize) * (self.rows.max(0) as usize)
    }
}

/// Flags controlling how an occupancy snapshot is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct OccupancyFlags {
    /// Skip the caller's own head cell (the caller is about to move; its
    /// current head is not an obstacle to itself).
    pub exclude_own_head: bool,
    /// Treat terrain cells that will become solid soon as already solid.
    pub include_incoming_walls: bool,
    /// The snake the snapshot is built for. `None` marks every snake
    /// fully, with no exclusions (used for placing items on the board).
    pub caller: Option<SnakeId>,
}

/// Boolean-per-cell snapshot of what is currently impassable.
///
/// Built fresh per query and owned by the caller, which may mutate it
/// afterwards (typically freeing the tail cell that vacates this tick).
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    dims: GridDims,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn empty(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![false; dims.cell_count()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.cells[self.dims.index(cell)]
    }

    pub fn is_blocked_index(&self, index: usize) -> bool {
        self.cells[index]
    }

    pub fn block(&mut self, cell: Cell) {
        let idx = self.dims.index(cell);
        self.cells[idx] = true;
    }

    pub fn free(&mut self, cell: Cell) {
        let idx = self.dims.index(cell);
        self.cells[idx] = false;
    }

    fn block_index(&mut self, index: usize) {
        self.cells[index] = true;
    }

    /// Number of unblocked cells.
    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|&&b| !b).count()
    }
}

/// Builds an occupancy snapshot of the board: snake bodies plus terrain.
///
/// Every snake other than the caller is always marked in full (corpses
/// included while they hold the board). The caller's head is skipped only
/// when `exclude_own_head` is set.
pub fn build_occupancy(world: &WorldState, flags: OccupancyFlags) -> OccupancyGrid {
    let dims = world.dims;
    let mut grid = OccupancyGrid::empty(dims);

    for snake in &world.snakes {
        let is_caller = flags.caller == Some(snake.id);
        let start = if is_caller && flags.exclude_own_head { 1 } else { 0 };
        for cell in snake.body.iter().skip(start) {
            grid.block(*cell);
        }
    }

    for index in 0..dims.cell_count() {
        if world.terrain.is_solid_index(index)
            || (flags.include_incoming_walls && world.terrain.is_incoming_index(index))
        {
            grid.block_index(index);
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Personality, Snake, WorldState};

    fn world_with_snakes() -> WorldState {
        let mut world = WorldState::new(8, 6);
        world.snakes.push(Snake::new(
            SnakeId(0),
            vec![Cell::new(3, 3), Cell::new(2, 3), Cell::new(1, 3)],
            Personality::Cautious,
        ));
        world.snakes.push(Snake::new(
            SnakeId(1),
            vec![Cell::new(6, 1), Cell::new(6, 2)],
            Personality::Greedy,
        ));
        world
    }

    #[test]
    fn test_index_roundtrip() {
        let dims = GridDims::new(8, 6);
        let cell = Cell::new(5, 4);
        assert_eq!(dims.index(cell), 37);
        assert_eq!(dims.cell_at(37), cell);
        assert_eq!(dims.cell_count(), 48);
    }

    #[test]
    fn test_contains() {
        let dims = GridDims::new(8, 6);
        assert!(dims.contains(Cell::new(0, 0)));
        assert!(dims.contains(Cell::new(7, 5)));
        assert!(!dims.contains(Cell::new(8, 0)));
        assert!(!dims.contains(Cell::new(0, -1)));
    }

    #[test]
    fn test_null_caller_marks_everything() {
        let world = world_with_snakes();
        let grid = build_occupancy(&world, OccupancyFlags::default());

        for snake in &world.snakes {
            for cell in &snake.body {
                assert!(grid.is_blocked(*cell));
            }
        }
        assert_eq!(grid.free_count(), 48 - 5);
    }

    #[test]
    fn test_exclude_own_head_skips_only_caller_head() {
        let world = world_with_snakes();
        let grid = build_occupancy(
            &world,
            OccupancyFlags {
                exclude_own_head: true,
                include_incoming_walls: false,
                caller: Some(SnakeId(0)),
            },
        );

        assert!(!grid.is_blocked(Cell::new(3, 3)));
        assert!(grid.is_blocked(Cell::new(2, 3)));
        // The other snake's head stays marked.
        assert!(grid.is_blocked(Cell::new(6, 1)));
    }

    #[test]
    fn test_terrain_threshold_and_incoming() {
        let mut world = world_with_snakes();
        world.terrain.set_solidity(Cell::new(0, 0), 0.6);
        world.terrain.set_solidity(Cell::new(1, 0), 0.4);
        world.terrain.set_incoming(Cell::new(2, 0), true);

        let plain = build_occupancy(&world, OccupancyFlags::default());
        assert!(plain.is_blocked(Cell::new(0, 0)));
        assert!(!plain.is_blocked(Cell::new(1, 0)));
        // The default build ignores walls that are still fading in.
        assert!(!plain.is_blocked(Cell::new(2, 0)));

        let preview = build_occupancy(
            &world,
            OccupancyFlags {
                include_incoming_walls: true,
                ..Default::default()
            },
        );
        assert!(preview.is_blocked(Cell::new(2, 0)));
    }

    #[test]
    fn test_caller_grid_is_mutable() {
        let world = world_with_snakes();
        let mut grid = build_occupancy(&world, OccupancyFlags::default());
        let tail = Cell::new(1, 3);
        assert!(grid.is_blocked(tail));
        grid.free(tail);
        assert!(!grid.is_blocked(tail));
    }

    #[test]
    fn test_dir_between_and_cardinal() {
        let d = Dir::between(Cell::new(3, 3), Cell::new(3, 2));
        assert_eq!(d, Dir::UP);
        assert!(d.is_cardinal());
        assert!(!Dir { dx: 1, dy: 1 }.is_cardinal());
    }
}
