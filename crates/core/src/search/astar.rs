//! A* shortest path over an occupancy grid.

use std::cell::Cell as ScoreCell;

use crate::grid::{Cell, Dir, OccupancyGrid};

use super::heap::ScoredHeap;
use super::SearchArena;

/// Finds the shortest 4-connected path from `start` to `goal`, inclusive
/// of both endpoints, or `None` when the goal is unreachable. Unit edge
/// cost, Manhattan heuristic.
///
/// The start cell is never treated as an obstacle for itself (a snake's
/// head sits on an occupied cell); out-of-bounds neighbors are pruned
/// silently. Total over in-bounds endpoints - absence of a route is an
/// expected outcome, not an error.
pub fn find_path(
    start: Cell,
    goal: Cell,
    occupancy: &OccupancyGrid,
    arena: &mut SearchArena,
) -> Option<Vec<Cell>> {
    let dims = occupancy.dims();
    arena.ensure_dims(dims);
    debug_assert!(dims.contains(start) && dims.contains(goal));

    let SearchArena {
        g_score,
        f_score,
        parent,
        closed,
        open,
        ..
    } = arena;

    g_score.fill(u32::MAX);
    f_score.fill(u32::MAX);
    parent.fill(u32::MAX);
    closed.fill(false);

    let h = |cell: Cell| ((cell.x - goal.x).abs() + (cell.y - goal.y).abs()) as u32;
    let start_idx = dims.index(start);
    let goal_idx = dims.index(goal);

    g_score[start_idx] = 0;
    f_score[start_idx] = h(start);

    // The heap re-reads f-scores on every comparison, so a relaxed entry
    // sorts by its current value. Shared view over the f-score slice
    // keeps that possible while edges below still write through it.
    let f_cells: &[ScoreCell<u32>] = ScoreCell::from_mut(f_score.as_mut_slice()).as_slice_of_cells();
    let mut frontier = ScoredHeap::new(open, |&idx: &usize| f_cells[idx].get());
    frontier.push(start_idx);

    while let Some(current) = frontier.pop() {
        if closed[current] {
            continue; // stale duplicate entry
        }
        closed[current] = true;

        if current == goal_idx {
            let mut path = Vec::new();
            let mut node = current;
            loop {
                path.push(dims.cell_at(node));
                if node == start_idx {
                    break;
                }
                node = parent[node] as usize;
            }
            path.reverse();
            return Some(path);
        }

        let cell = dims.cell_at(current);
        let g_here = g_score[current];
        for dir in Dir::CARDINALS {
            let next = cell.step(dir);
            if !dims.contains(next) {
                continue;
            }
            let next_idx = dims.index(next);
            if closed[next_idx] || occupancy.is_blocked_index(next_idx) {
                continue;
            }
            let g = g_here + 1;
            if g < g_score[next_idx] {
                parent[next_idx] = current as u32;
                g_score[next_idx] = g;
                f_cells[next_idx].set(g + h(next));
                frontier.push(next_idx);
            }
        }
    }

    None
}
