//! Flood-fill reachability counting.

use crate::grid::{Cell, OccupancyGrid};

use super::SearchArena;

/// Counts cells reachable from `start` through open, in-bounds,
/// 4-connected cells.
///
/// `cap` stops the fill early once the count reaches it; the result is
/// then a lower bound, which is all the safety checks need. The caller
/// may name one extra blocked cell to ask "what if this cell were also a
/// wall" without rebuilding the occupancy snapshot. A blocked or
/// out-of-bounds start yields 0.
pub fn reachable_count(
    start: Cell,
    occupancy: &OccupancyGrid,
    cap: Option<usize>,
    extra_blocked: Option<Cell>,
    arena: &mut SearchArena,
) -> usize {
    let dims = occupancy.dims();
    arena.ensure_dims(dims);

    if !dims.contains(start) {
        return 0;
    }
    if cap == Some(0) {
        return 0;
    }

    let extra_idx = extra_blocked
        .filter(|c| dims.contains(*c))
        .map(|c| dims.index(c));

    let stamp = arena.next_visit_stamp();
    let SearchArena {
        visit_marks, stack, ..
    } = arena;

    stack.clear();
    stack.push(dims.index(start));

    let cols = dims.cols as usize;
    let total = dims.cell_count();
    let mut count = 0;

    while let Some(idx) = stack.pop() {
        if visit_marks[idx] == stamp || occupancy.is_blocked_index(idx) || extra_idx == Some(idx) {
            continue;
        }
        visit_marks[idx] = stamp;
        count += 1;
        if let Some(cap) = cap {
            if count >= cap {
                return count;
            }
        }

        let x = idx % cols;
        if x > 0 {
            stack.push(idx - 1);
        }
        if x < cols - 1 {
            stack.push(idx + 1);
        }
        if idx >= cols {
            stack.push(idx - cols);
        }
        if idx + cols < total {
            stack.push(idx + cols);
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Dir, GridDims};
    use std::collections::VecDeque;

    fn open_grid(cols: i32, rows: i32) -> OccupancyGrid {
        OccupancyGrid::empty(GridDims::new(cols, rows))
    }

    /// Reference connected-component size by BFS.
    fn bfs_component(start: Cell, occ: &OccupancyGrid) -> usize {
        let dims = occ.dims();
        if !dims.contains(start) || occ.is_blocked(start) {
            return 0;
        }
        let mut seen = vec![false; dims.cell_count()];
        let mut queue = VecDeque::new();
        seen[dims.index(start)] = true;
        queue.push_back(start);
        let mut count = 0;
        while let Some(cell) = queue.pop_front() {
            count += 1;
            for dir in Dir::CARDINALS {
                let next = cell.step(dir);
                if !dims.contains(next) || occ.is_blocked(next) {
                    continue;
                }
                let idx = dims.index(next);
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back(next);
                }
            }
        }
        count
    }

    #[test]
    fn test_exact_count_matches_bfs() {
        let mut occ = open_grid(8, 8);
        for y in 0..7 {
            occ.block(Cell::new(4, y));
        }
        let mut arena = SearchArena::new(occ.dims());
        let start = Cell::new(1, 1);
        assert_eq!(
            reachable_count(start, &occ, None, None, &mut arena),
            bfs_component(start, &occ)
        );
    }

    #[test]
    fn test_cap_is_lower_bound() {
        let occ = open_grid(6, 6);
        let mut arena = SearchArena::new(occ.dims());
        let start = Cell::new(0, 0);
        let true_count = 36;
        for cap in [1usize, 5, 20, 36] {
            assert_eq!(
                reachable_count(start, &occ, Some(cap), None, &mut arena),
                cap
            );
        }
        // Caps past the true count return the true count.
        assert_eq!(
            reachable_count(start, &occ, Some(50), None, &mut arena),
            true_count
        );
    }

    #[test]
    fn test_extra_blocked_cut_vertex() {
        // Two 1-wide rooms joined by a single corridor cell.
        let mut occ = open_grid(5, 3);
        for y in 0..3 {
            occ.block(Cell::new(2, y));
        }
        let corridor = Cell::new(2, 1);
        occ.free(corridor);

        let mut arena = SearchArena::new(occ.dims());
        let start = Cell::new(0, 1);
        let with_corridor = reachable_count(start, &occ, None, None, &mut arena);
        let without = reachable_count(start, &occ, None, Some(corridor), &mut arena);
        assert_eq!(with_corridor, 13);
        assert_eq!(without, 6);
        assert!(without < with_corridor);
    }

    #[test]
    fn test_blocked_or_out_of_bounds_start() {
        let mut occ = open_grid(4, 4);
        occ.block(Cell::new(2, 2));
        let mut arena = SearchArena::new(occ.dims());
        assert_eq!(reachable_count(Cell::new(2, 2), &occ, None, None, &mut arena), 0);
        assert_eq!(reachable_count(Cell::new(-1, 0), &occ, None, None, &mut arena), 0);
        assert_eq!(reachable_count(Cell::new(0, 9), &occ, None, None, &mut arena), 0);
    }

    #[test]
    fn test_generation_stamps_stay_exact_across_calls() {
        let occ = open_grid(5, 5);
        let mut arena = SearchArena::new(occ.dims());
        // Repeated calls must not leak visited marks between runs.
        for _ in 0..200 {
            assert_eq!(reachable_count(Cell::new(2, 2), &occ, None, None, &mut arena), 25);
        }
    }

    #[test]
    fn test_count_after_stamp_wrap() {
        let occ = open_grid(3, 3);
        let mut arena = SearchArena::new(occ.dims());
        arena.visit_stamp = u32::MAX - 1;
        assert_eq!(reachable_count(Cell::new(1, 1), &occ, None, None, &mut arena), 9);
        assert_eq!(reachable_count(Cell::new(1, 1), &occ, None, None, &mut arena), 9);
        assert_eq!(reachable_count(Cell::new(1, 1), &occ, None, None, &mut arena), 9);
    }
}
