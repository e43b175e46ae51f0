//! Static obstacle oracle.
//!
//! Walls fade in and out on the host's side; the engine only needs two
//! booleans per cell: "solid right now" (solidity at or past the
//! threshold) and "will become solid soon" (the incoming generation).
//! Generation and crossfade visuals stay outside the core.

use crate::grid::{Cell, GridDims};

/// Solidity at or above this value counts as a wall for collision.
pub const SOLID_THRESHOLD: f32 = 0.5;

/// Per-cell wall state, written by the host and read through the
/// occupancy builder.
#[derive(Debug, Clone)]
pub struct Terrain {
    dims: GridDims,
    /// 0.0 open .. 1.0 fully solid
    solidity: Vec<f32>,
    /// Cells the next wall generation will claim
    incoming: Vec<bool>,
}

impl Terrain {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            solidity: vec![0.0; dims.cell_count()],
            incoming: vec![false; dims.cell_count()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn is_solid_index(&self, index: usize) -> bool {
        self.solidity[index] >= SOLID_THRESHOLD
    }

    pub fn is_incoming_index(&self, index: usize) -> bool {
        self.incoming[index]
    }

    pub fn is_solid(&self, cell: Cell) -> bool {
        self.is_solid_index(self.dims.index(cell))
    }

    /// True when the cell is solid or about to become solid. Food sitting
    /// on such a cell gets relocated.
    pub fn claims(&self, cell: Cell) -> bool {
        let index = self.dims.index(cell);
        self.is_solid_index(index) || self.incoming[index]
    }

    pub fn set_solidity(&mut self, cell: Cell, value: f32) {
        let index = self.dims.index(cell);
        self.solidity[index] = value.clamp(0.0, 1.0);
    }

    pub fn set_incoming(&mut self, cell: Cell, incoming: bool) {
        let index = self.dims.index(cell);
        self.incoming[index] = incoming;
    }

    /// Clears all wall state (a fresh open board).
    pub fn clear(&mut self) {
        self.solidity.fill(0.0);
        self.incoming.fill(false);
    }

    /// Drops and reallocates the buffers for new board dimensions.
    pub fn resize(&mut self, dims: GridDims) {
        self.dims = dims;
        self.solidity = vec![0.0; dims.cell_count()];
        self.incoming = vec![false; dims.cell_count()];
    }

    /// Cells currently solid, for snapshots.
    pub fn solid_cells(&self) -> Vec<Cell> {
        (0..self.dims.cell_count())
            .filter(|&i| self.is_solid_index(i))
            .map(|i| self.dims.cell_at(i))
            .collect()
    }

    /// Cells the incoming generation will claim, for snapshots.
    pub fn incoming_cells(&self) -> Vec<Cell> {
        (0..self.dims.cell_count())
            .filter(|&i| self.incoming[i])
            .map(|i| self.dims.cell_at(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let mut terrain = Terrain::new(GridDims::new(4, 4));
        terrain.set_solidity(Cell::new(1, 1), 0.5);
        terrain.set_solidity(Cell::new(2, 1), 0.49);
        assert!(terrain.is_solid(Cell::new(1, 1)));
        assert!(!terrain.is_solid(Cell::new(2, 1)));
    }

    #[test]
    fn test_claims_includes_incoming() {
        let mut terrain = Terrain::new(GridDims::new(4, 4));
        terrain.set_incoming(Cell::new(3, 0), true);
        assert!(terrain.claims(Cell::new(3, 0)));
        assert!(!terrain.is_solid(Cell::new(3, 0)));
    }

    #[test]
    fn test_resize_clears() {
        let mut terrain = Terrain::new(GridDims::new(4, 4));
        terrain.set_solidity(Cell::new(0, 0), 1.0);
        terrain.resize(GridDims::new(6, 6));
        assert_eq!(terrain.dims().cols, 6);
        assert!(!terrain.is_solid(Cell::new(0, 0)));
        assert!(terrain.solid_cells().is_empty());
    }
}
