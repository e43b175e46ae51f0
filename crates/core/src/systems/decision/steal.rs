//! Greedy steal mode.
//!
//! Arming happens in the tick driver, rolled only at the moment a greedy
//! snake eats. While armed it keeps the nearest rival food targeted
//! (re-acquiring when the owner dies or loses its food) and paths toward
//! it under the standard safety gate. Consumption on contact - and the
//! owner's retaliation - are resolved by the tick driver too.

use crate::components::{BehaviorState, SnakeId, WorldState};
use crate::events::EventLog;
use crate::grid::{manhattan, Cell, Dir, OccupancyGrid};
use crate::search::SearchArena;
use crate::tuning::Tuning;

use super::{mark_behavior, step_is_safe, PathMemo};

#[allow(clippy::too_many_arguments)]
pub(super) fn steal(
    world: &mut WorldState,
    idx: usize,
    occupancy: &OccupancyGrid,
    sim: &OccupancyGrid,
    memo: &mut PathMemo,
    arena: &mut SearchArena,
    _tuning: &Tuning,
    events: &mut EventLog,
) -> Option<Dir> {
    let (id, head, len, margin) = {
        let me = &world.snakes[idx];
        debug_assert!(me.steal_active);
        (me.id, me.head(), me.len(), me.personality.safety_margin())
    };

    let valid = world.snakes[idx]
        .steal_target
        .and_then(|target| world.snake(target))
        .map_or(false, |s| s.is_active() && s.food.is_some());
    if !valid {
        let picked = nearest_food_owner(world, id, head);
        world.snakes[idx].steal_target = picked;
        if picked.is_none() {
            // Nobody holds food anymore; the steal run is over.
            world.snakes[idx].steal_active = false;
            return None;
        }
    }

    let target_id = world.snakes[idx].steal_target?;
    let target_food = world.snake(target_id)?.food?;
    mark_behavior(world, idx, BehaviorState::Stealing, Some(target_id), events);

    let next = memo.next_step(head, target_food, occupancy, arena)?;
    if step_is_safe(next, sim, len + margin, arena) {
        Some(Dir::between(head, next))
    } else {
        None
    }
}

/// Nearest other active snake currently holding food.
fn nearest_food_owner(world: &WorldState, id: SnakeId, from: Cell) -> Option<SnakeId> {
    world
        .snakes
        .iter()
        .filter(|s| s.id != id && s.is_active())
        .filter_map(|s| s.food.map(|food| (manhattan(from, food), s.id)))
        .min_by_key(|(dist, _)| *dist)
        .map(|(_, sid)| sid)
}

/// Arms steal mode for the snake at `idx` by targeting the nearest rival
/// food. Returns whether a target was assigned.
pub fn assign_steal_target(world: &mut WorldState, idx: usize, from: Cell) -> bool {
    let id = world.snakes[idx].id;
    let picked = nearest_food_owner(world, id, from);
    world.snakes[idx].steal_target = picked;
    picked.is_some()
}
