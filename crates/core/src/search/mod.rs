//! Grid search: A* pathfinding and flood-fill reachability.
//!
//! Both searches run against caller-built occupancy snapshots and share
//! one [`SearchArena`] of scratch buffers so repeated per-tick queries
//! allocate nothing. The arena is resized exactly when board dimensions
//! change and logically reset at the start of every call.

mod astar;
mod flood;
mod heap;

pub use astar::find_path;
pub use flood::reachable_count;
pub use heap::ScoredHeap;

use crate::grid::GridDims;

/// Reusable scratch buffers for A* and flood fill, sized to the board.
///
/// A* resets its slices with a bulk fill per call; flood fill avoids the
/// full clear with a generation stamp (a cell is visited this call iff
/// its stored mark equals the current stamp). Not safe for re-entrant
/// use; the single-threaded tick loop never needs that.
#[derive(Debug, Clone)]
pub struct SearchArena {
    dims: GridDims,
    pub(crate) g_score: Vec<u32>,
    pub(crate) f_score: Vec<u32>,
    pub(crate) parent: Vec<u32>,
    pub(crate) closed: Vec<bool>,
    pub(crate) open: Vec<usize>,
    pub(crate) visit_marks: Vec<u32>,
    pub(crate) visit_stamp: u32,
    pub(crate) stack: Vec<usize>,
}

impl SearchArena {
    pub fn new(dims: GridDims) -> Self {
        let n = dims.cell_count();
        Self {
            dims,
            g_score: vec![u32::MAX; n],
            f_score: vec![u32::MAX; n],
            parent: vec![u32::MAX; n],
            closed: vec![false; n],
            open: Vec::new(),
            visit_marks: vec![0; n],
            visit_stamp: 0,
            stack: Vec::new(),
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Reallocates the buffers when the board dimensions changed.
    /// Called at the top of every search, so callers never need to
    /// track resizes themselves.
    pub fn ensure_dims(&mut self, dims: GridDims) {
        if self.dims == dims {
            return;
        }
        *self = Self::new(dims);
    }

    /// Advances the flood-fill generation stamp, clearing the mark
    /// buffer once per wrap instead of once per call.
    pub(crate) fn next_visit_stamp(&mut self) -> u32 {
        if self.visit_stamp == u32::MAX {
            self.visit_marks.fill(0);
            self.visit_stamp = 0;
        }
        self.visit_stamp += 1;
        self.visit_stamp
    }
}
