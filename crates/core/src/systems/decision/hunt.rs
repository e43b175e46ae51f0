//! Aggressive kill mode.
//!
//! An aggressive snake defends the area around its own food: any rival
//! head inside the trigger range can flip it into `Killing` (a per-tick
//! probability roll, skipped entirely when it is retaliating against a
//! food thief). The preferred attack is a blocking move - occupy the
//! neighbor of the victim's head that costs the victim the most
//! reachable space - with a direct chase as the close-range fallback.
//! Both are gated by the attacker's own safety margin.

use rand::rngs::SmallRng;
use rand::Rng;
use tracing::debug;

use crate::components::{BehaviorState, WorldState};
use crate::events::EventLog;
use crate::grid::{build_occupancy, manhattan, Cell, Dir, OccupancyFlags, OccupancyGrid};
use crate::search::{find_path, reachable_count, SearchArena};
use crate::tuning::Tuning;

use super::{mark_behavior, step_is_safe, PathMemo};

#[allow(clippy::too_many_arguments)]
pub(super) fn kill_mode(
    world: &mut WorldState,
    idx: usize,
    occupancy: &OccupancyGrid,
    sim: &OccupancyGrid,
    memo: &mut PathMemo,
    arena: &mut SearchArena,
    rng: &mut SmallRng,
    tuning: &Tuning,
    events: &mut EventLog,
) -> Option<Dir> {
    let now = world.now_ms;
    let (id, head, len, margin, food, retaliation_target, retaliation_until) = {
        let me = &world.snakes[idx];
        (
            me.id,
            me.head(),
            me.len(),
            me.personality.safety_margin(),
            me.food,
            me.retaliation_target,
            me.retaliation_until_ms,
        )
    };

    // A food thief is hunted without a trigger roll until the grudge
    // expires or the thief leaves the board.
    let mut victim_id = None;
    if let Some(target) = retaliation_target {
        let live = now < retaliation_until
            && world.snake(target).map_or(false, |s| s.is_active());
        if live {
            victim_id = Some(target);
        } else {
            let me = &mut world.snakes[idx];
            me.retaliation_target = None;
            me.retaliation_until_ms = 0;
        }
    }

    if victim_id.is_none() {
        if let Some(food) = food {
            let intruder = world
                .snakes
                .iter()
                .filter(|s| s.id != id && s.is_active())
                .map(|s| (manhattan(s.head(), food), s.id))
                .filter(|(dist, _)| *dist <= tuning.kill_trigger_range)
                .min_by_key(|(dist, _)| *dist)
                .map(|(_, sid)| sid);
            if let Some(intruder) = intruder {
                if rng.gen::<f64>() < tuning.kill_chance {
                    victim_id = Some(intruder);
                }
            }
        }
    }

    let victim_id = victim_id?;
    mark_behavior(world, idx, BehaviorState::Killing, Some(victim_id), events);
    if let Some(victim_idx) = world.snake_index(victim_id) {
        mark_behavior(world, victim_idx, BehaviorState::Feared, Some(id), events);
    }
    debug!(snake = id.0, victim = victim_id.0, "kill mode engaged");

    let victim = world.snake(victim_id)?;
    let victim_head = victim.head();
    let victim_len = victim.len();

    // The victim's view of the board: its own head is no obstacle to it.
    let victim_occupancy = build_occupancy(
        world,
        OccupancyFlags {
            exclude_own_head: true,
            include_incoming_walls: true,
            caller: Some(victim_id),
        },
    );
    // Enough resolution to rank blocking cells without filling the
    // whole board per candidate.
    let squeeze_cap = victim_len + tuning.kill_chase_range as usize;

    let mut best_block: Option<(usize, Cell)> = None;
    for dir in Dir::CARDINALS {
        let candidate = victim_head.step(dir);
        if !world.dims.contains(candidate) || occupancy.is_blocked(candidate) {
            continue;
        }
        let squeezed = reachable_count(
            victim_head,
            &victim_occupancy,
            Some(squeeze_cap),
            Some(candidate),
            arena,
        );
        if best_block.map_or(true, |(s, _)| squeezed < s) {
            best_block = Some((squeezed, candidate));
        }
    }

    let need = len + margin;
    if let Some((_, block_cell)) = best_block {
        if let Some(next) = memo.next_step(head, block_cell, occupancy, arena) {
            if step_is_safe(next, sim, need, arena) {
                return Some(Dir::between(head, next));
            }
        }
    }

    // Blocking failed; run straight at the head while it is in range.
    if manhattan(head, victim_head) <= tuning.kill_chase_range {
        let mut chase = occupancy.clone();
        chase.free(victim_head);
        if let Some(path) = find_path(head, victim_head, &chase, arena) {
            if path.len() > 1 && step_is_safe(path[1], sim, need, arena) {
                return Some(Dir::between(head, path[1]));
            }
        }
    }

    None
}
