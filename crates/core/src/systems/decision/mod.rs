//! Per-snake, per-tick direction choice.
//!
//! Phases run in strict priority order and the first one that yields a
//! direction wins: behavior bookkeeping, personality overrides (hunt /
//! evade / steal), own-food seeking, wander roaming, tail chasing, and
//! finally the max-space fallback. Every phase expresses "no move" by
//! falling through; the function always returns a cardinal direction.

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::Rng;
use tracing::trace;

use crate::components::{BehaviorState, Personality, SnakeId, WorldState};
use crate::events::EventLog;
use crate::grid::{build_occupancy, Cell, Dir, OccupancyFlags, OccupancyGrid};
use crate::search::{find_path, reachable_count, SearchArena};
use crate::tuning::Tuning;

mod evade;
mod hunt;
mod steal;

pub use steal::assign_steal_target;

/// Attempts to pick a random roam target before giving up for the tick.
const ROAM_RETRY_LIMIT: usize = 30;

/// A* results memoized per goal cell within one decision call (same
/// start, same occupancy snapshot), so phases querying the same target
/// pay for the search once.
pub(crate) struct PathMemo {
    by_goal: HashMap<usize, Option<Vec<Cell>>>,
}

impl PathMemo {
    fn new() -> Self {
        Self {
            by_goal: HashMap::new(),
        }
    }

    /// First step of the path to `goal`, or `None` when unreachable.
    fn next_step(
        &mut self,
        start: Cell,
        goal: Cell,
        occupancy: &OccupancyGrid,
        arena: &mut SearchArena,
    ) -> Option<Cell> {
        let key = occupancy.dims().index(goal);
        let path = self
            .by_goal
            .entry(key)
            .or_insert_with(|| find_path(start, goal, occupancy, arena));
        match path {
            Some(p) if p.len() > 1 => Some(p[1]),
            _ => None,
        }
    }
}

/// True when stepping onto `cell` leaves at least `need` reachable cells
/// on the post-move board (`sim`: full body marked, tail freed).
pub(crate) fn step_is_safe(
    cell: Cell,
    sim: &OccupancyGrid,
    need: usize,
    arena: &mut SearchArena,
) -> bool {
    reachable_count(cell, sim, Some(need), None, arena) >= need
}

/// Sets a transient behavior state, emitting an event on transitions.
pub(crate) fn mark_behavior(
    world: &mut WorldState,
    idx: usize,
    state: BehaviorState,
    target: Option<SnakeId>,
    events: &mut EventLog,
) {
    let now = world.now_ms;
    let snake = &mut world.snakes[idx];
    if snake.behavior != Some(state) || snake.behavior_target != target {
        events.emit_behavior(now, snake.id, state.label(), target);
    }
    snake.behavior = Some(state);
    snake.behavior_target = target;
}

/// Chooses the direction the snake at `idx` moves this tick.
pub fn compute_next_direction(
    world: &mut WorldState,
    idx: usize,
    arena: &mut SearchArena,
    rng: &mut SmallRng,
    tuning: &Tuning,
    events: &mut EventLog,
) -> Dir {
    debug_assert!(idx < world.snakes.len());
    debug_assert!(!world.snakes[idx].is_empty());

    refresh_behavior(world, idx);

    let me = &world.snakes[idx];
    let id = me.id;
    let head = me.head();
    let tail = me.tail();
    let len = me.len();
    let margin = me.personality.safety_margin();
    let personality = me.personality;
    let wandering = me.wandering;
    let prev_dir = me.dir;

    // Movement view: own head excluded (it is no obstacle to itself),
    // tail freed (it vacates this tick).
    let mut occupancy = build_occupancy(
        world,
        OccupancyFlags {
            exclude_own_head: true,
            include_incoming_walls: true,
            caller: Some(id),
        },
    );
    occupancy.free(tail);

    // Post-move view for safety checks: the whole body stays marked.
    let mut sim = build_occupancy(
        world,
        OccupancyFlags {
            exclude_own_head: false,
            include_incoming_walls: true,
            caller: Some(id),
        },
    );
    sim.free(tail);

    let mut memo = PathMemo::new();

    if !wandering {
        let choice = match personality {
            Personality::Aggressive => hunt::kill_mode(
                world, idx, &occupancy, &sim, &mut memo, arena, rng, tuning, events,
            ),
            Personality::Cautious => {
                evade::evade(world, idx, &occupancy, &sim, arena, tuning, events)
            }
            Personality::Greedy if world.snakes[idx].steal_active => steal::steal(
                world, idx, &occupancy, &sim, &mut memo, arena, tuning, events,
            ),
            _ => None,
        };
        if let Some(dir) = choice {
            return dir;
        }

        // Head toward own food, but never into a pocket smaller than the
        // personality demands.
        if let Some(food) = world.snakes[idx].food {
            if let Some(next) = memo.next_step(head, food, &occupancy, arena) {
                if step_is_safe(next, &sim, len + margin, arena) {
                    trace!(snake = id.0, "seeking food");
                    return Dir::between(head, next);
                }
            }
        }
    }

    if wandering {
        if let Some(dir) = roam(world, idx, &occupancy, &sim, &mut memo, arena, rng) {
            return dir;
        }
    }

    // Chase the own tail (known to come free next tick) to stay mobile.
    if !wandering && len > 1 {
        if let Some(next) = memo.next_step(head, tail, &occupancy, arena) {
            if step_is_safe(next, &sim, len, arena) {
                return Dir::between(head, next);
            }
        }
    }

    // No clean path anywhere: take the open neighbor with the most
    // reachable space and flag the tick as desperation.
    world.snakes[idx].desperation = true;
    let mut best: Option<(usize, Dir)> = None;
    for dir in Dir::CARDINALS {
        let next = head.step(dir);
        if !world.dims.contains(next) || occupancy.is_blocked(next) {
            continue;
        }
        let space = reachable_count(next, &sim, None, None, arena);
        if best.map_or(true, |(s, _)| space > s) {
            best = Some((space, dir));
        }
    }
    match best {
        Some((_, dir)) => dir,
        None => prev_dir,
    }
}

/// Start-of-tick behavior bookkeeping. A `Feared` mark survives only
/// while the aggressor is alive, still hunting, and still targeting this
/// snake; every other transient state is cleared and re-derived by the
/// phases below.
fn refresh_behavior(world: &mut WorldState, idx: usize) {
    let keep = {
        let me = &world.snakes[idx];
        match me.behavior {
            Some(BehaviorState::Feared) => me
                .behavior_target
                .and_then(|aggressor| world.snake(aggressor))
                .map_or(false, |aggressor| {
                    aggressor.is_active()
                        && aggressor.behavior == Some(BehaviorState::Killing)
                        && aggressor.behavior_target == Some(me.id)
                }),
            _ => false,
        }
    };
    if !keep {
        world.snakes[idx].clear_behavior();
    }
}

/// Wander-mode roaming: keep a random target alive and path toward it
/// with the reduced safety bar (body length only, no personality bonus).
fn roam(
    world: &mut WorldState,
    idx: usize,
    occupancy: &OccupancyGrid,
    sim: &OccupancyGrid,
    memo: &mut PathMemo,
    arena: &mut SearchArena,
    rng: &mut SmallRng,
) -> Option<Dir> {
    let id = world.snakes[idx].id;
    let head = world.snakes[idx].head();
    let len = world.snakes[idx].len();
    let dims = world.dims;

    // Target validity is judged on the untouched board (tail included).
    let full = build_occupancy(
        world,
        OccupancyFlags {
            exclude_own_head: false,
            include_incoming_walls: true,
            caller: Some(id),
        },
    );
    // A resize can leave a stale target outside the board.
    let needs_new = match world.snakes[idx].wander_target {
        None => true,
        Some(target) => target == head || !dims.contains(target) || full.is_blocked(target),
    };
    if needs_new {
        let mut picked = None;
        for _ in 0..ROAM_RETRY_LIMIT {
            let cell = Cell::new(rng.gen_range(0..dims.cols), rng.gen_range(0..dims.rows));
            if !full.is_blocked(cell) && cell != head {
                picked = Some(cell);
                break;
            }
        }
        world.snakes[idx].wander_target = picked;
    }

    let target = world.snakes[idx].wander_target?;
    let next = memo.next_step(head, target, occupancy, arena)?;
    if step_is_safe(next, sim, len, arena) {
        Some(Dir::between(head, next))
    } else {
        None
    }
}
