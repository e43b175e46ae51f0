//! The per-tick driver: cadence, movement, eating, death and respawn.
//!
//! Snakes are processed in roster order every pass. An earlier snake's
//! committed move - and any behavior flag it set on a peer - is visible
//! to later snakes in the same pass. Each snake still decides from a
//! self-consistent occupancy snapshot built at the start of its own
//! turn.

use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, info};
use wriggle_events::EventKind;

use crate::components::{BehaviorState, Personality, RunStatus, Snake, WorldState};
use crate::events::EventLog;
use crate::grid::{build_occupancy, OccupancyFlags};
use crate::search::SearchArena;
use crate::tuning::Tuning;

use super::decision;
use super::spawn;

/// Advances the simulation clock by `dt_ms` and ticks every snake whose
/// move interval has elapsed.
#[allow(clippy::too_many_arguments)]
pub fn advance_world(
    world: &mut WorldState,
    dt_ms: u64,
    tick_ms: u64,
    arena: &mut SearchArena,
    rng: &mut SmallRng,
    tuning: &Tuning,
    events: &mut EventLog,
) {
    if world.status != RunStatus::Running {
        return;
    }
    world.now_ms += dt_ms;
    let now = world.now_ms;

    for idx in 0..world.snakes.len() {
        if world.status != RunStatus::Running {
            break;
        }
        if world.snakes[idx].respawning {
            if now >= world.snakes[idx].respawn_at_ms {
                spawn::respawn_snake(world, idx, rng, tuning, events);
            }
            continue;
        }
        let interval = move_interval_ms(&world.snakes[idx], tick_ms, tuning);
        if now.saturating_sub(world.snakes[idx].last_move_ms) >= interval {
            tick_snake(world, idx, arena, rng, tuning, events);
        }
    }
}

/// Per-snake move interval: the base tick, doubled while wandering.
/// Personality and chase pacing only shape the host's animation, never
/// the logical cadence.
fn move_interval_ms(snake: &Snake, tick_ms: u64, tuning: &Tuning) -> u64 {
    let mut interval = tick_ms as f64;
    if snake.wandering {
        interval *= tuning.wander_speed_divisor;
    }
    interval.max(1.0) as u64
}

/// One full turn for a living snake: upkeep, decision, movement and its
/// consequences.
fn tick_snake(
    world: &mut WorldState,
    idx: usize,
    arena: &mut SearchArena,
    rng: &mut SmallRng,
    tuning: &Tuning,
    events: &mut EventLog,
) {
    let now = world.now_ms;
    debug_assert!(!world.snakes[idx].is_empty());

    {
        let snake = &mut world.snakes[idx];

        if snake.wandering {
            // Shed one tail segment per interval, up to the personality cap.
            let trim_cap = snake.personality.wander_trim_cap(tuning);
            if snake.trim_count < trim_cap
                && now - snake.last_trim_ms >= tuning.wander_trim_interval_ms
                && snake.len() > 1
            {
                snake.body.pop();
                snake.trim_count += 1;
                snake.last_trim_ms = now;
            }
            if now - snake.wander_started_ms >= tuning.wander_duration_ms {
                snake.wandering = false;
                snake.wander_target = None;
                events.emit(now, EventKind::WanderEnded, snake.id);
            }
        }

        if snake.personality == Personality::Greedy
            && snake.len() > tuning.greedy_min_length
            && now - snake.last_decay_ms >= tuning.greedy_decay_interval_ms
        {
            snake.body.pop();
            snake.last_decay_ms = now;
        }
    }

    // A wall that claimed (or is claiming) the food cell relocates it.
    if let Some(food) = world.snakes[idx].food {
        if world.terrain.claims(food) {
            spawn::place_food(world, idx, rng);
        }
    }

    world.snakes[idx].desperation = false;
    let dir = decision::compute_next_direction(world, idx, arena, rng, tuning, events);
    world.snakes[idx].dir = dir;
    let id = world.snakes[idx].id;
    if world.snakes[idx].desperation {
        events.emit(now, EventKind::Desperation, id);
    }

    let head = world.snakes[idx].head();
    let new_head = head.step(dir);
    if !world.dims.contains(new_head) {
        handle_death(world, idx, tuning, events);
        return;
    }

    // Collision view: everything marked, own vacating tail freed. Walls
    // still fading in are passable for actual movement.
    let tail = world.snakes[idx].tail();
    let mut occupied = build_occupancy(
        world,
        OccupancyFlags {
            exclude_own_head: false,
            include_incoming_walls: false,
            caller: Some(id),
        },
    );
    occupied.free(tail);
    if occupied.is_blocked(new_head) {
        handle_death(world, idx, tuning, events);
        return;
    }

    let ate = world.snakes[idx].food == Some(new_head);
    {
        let snake = &mut world.snakes[idx];
        snake.body.insert(0, new_head);
        if !ate {
            snake.body.pop();
        }
        snake.last_move_ms = now;
    }

    if ate {
        events.emit_at(now, EventKind::Ate, id, new_head);

        if world.snakes[idx].len() >= world.dims.cell_count() {
            world.status = RunStatus::Complete;
            events.emit(now, EventKind::BoardComplete, id);
            info!(snake = id.0, "board filled");
            return;
        }
        spawn::place_food(world, idx, rng);

        {
            let snake = &mut world.snakes[idx];
            if !snake.wandering {
                snake.satiety += 1;
                if let Some(threshold) = snake.personality.wander_satiety(tuning) {
                    if snake.satiety >= threshold {
                        snake.satiety = 0;
                        snake.wandering = true;
                        snake.wander_started_ms = now;
                        snake.last_trim_ms = now;
                        snake.trim_count = 0;
                        events.emit(now, EventKind::WanderStarted, snake.id);
                    }
                }
            }
        }

        // Steal mode arms only at the moment a greedy snake eats.
        let snake = &world.snakes[idx];
        if snake.personality == Personality::Greedy
            && !snake.wandering
            && !snake.steal_active
            && rng.gen::<f64>() < tuning.steal_chance
        {
            let armed = decision::assign_steal_target(world, idx, new_head);
            world.snakes[idx].steal_active = armed;
        }
    }

    resolve_steal(world, idx, rng, tuning, events);
}

/// An armed greedy snake landing on its target's food consumes it: one
/// segment gained, the owner's food relocated, and - when the owner is
/// aggressive - a retaliation grudge started.
fn resolve_steal(
    world: &mut WorldState,
    idx: usize,
    rng: &mut SmallRng,
    tuning: &Tuning,
    events: &mut EventLog,
) {
    let now = world.now_ms;
    let snake = &world.snakes[idx];
    if snake.personality != Personality::Greedy || !snake.steal_active {
        return;
    }
    let id = snake.id;
    let new_head = snake.head();

    let target_idx = snake
        .steal_target
        .and_then(|target| world.snake_index(target))
        .filter(|&t| world.snakes[t].is_active() && world.snakes[t].food.is_some());
    let Some(target_idx) = target_idx else {
        let snake = &mut world.snakes[idx];
        snake.steal_active = false;
        snake.steal_target = None;
        return;
    };

    if world.snakes[target_idx].food != Some(new_head) {
        return;
    }

    let tail = world.snakes[idx].tail();
    world.snakes[idx].body.push(tail);
    let target_id = world.snakes[target_idx].id;
    events.emit_targeted(now, EventKind::FoodStolen, id, target_id);
    debug!(snake = id.0, owner = target_id.0, "food stolen");

    if world.snakes[target_idx].personality == Personality::Aggressive {
        let owner = &mut world.snakes[target_idx];
        owner.retaliation_target = Some(id);
        owner.retaliation_until_ms = now + tuning.retaliation_duration_ms;
        // Retaliation overrides passive roaming immediately.
        owner.wandering = false;
        owner.wander_target = None;
    }

    spawn::place_food(world, target_idx, rng);
    let snake = &mut world.snakes[idx];
    snake.steal_active = false;
    snake.steal_target = None;
}

/// Sends a snake into the corpse/respawn cycle, or ends the run when it
/// was the last one living. The corpse keeps blocking the board until
/// the respawn fires.
pub(crate) fn handle_death(
    world: &mut WorldState,
    idx: usize,
    tuning: &Tuning,
    events: &mut EventLog,
) {
    let now = world.now_ms;
    let id = world.snakes[idx].id;

    if world.living_count() <= 1 {
        world.status = RunStatus::GameOver;
        events.emit(now, EventKind::GameOver, id);
        info!(snake = id.0, "last snake died, game over");
        return;
    }

    events.emit(now, EventKind::Died, id);
    debug!(snake = id.0, "died");

    let snake = &mut world.snakes[idx];
    snake.respawning = true;
    snake.corpse_fade_start_ms = now + tuning.corpse_hold_ms;
    snake.respawn_at_ms = now + tuning.respawn_delay_ms();
    snake.food = None;
    snake.wandering = false;
    snake.wander_target = None;
    snake.satiety = 0;
    snake.trim_count = 0;
    snake.steal_active = false;
    snake.steal_target = None;
    snake.retaliation_target = None;
    snake.retaliation_until_ms = 0;
    snake.behavior = None;
    snake.behavior_target = None;
    snake.last_move_ms = now;
}

/// After a board resize: snakes that no longer fit go through the
/// respawn cycle, and surviving snakes with out-of-bounds food get it
/// relocated.
pub fn enforce_bounds(
    world: &mut WorldState,
    rng: &mut SmallRng,
    tuning: &Tuning,
    events: &mut EventLog,
) {
    let now = world.now_ms;
    for idx in 0..world.snakes.len() {
        let snake = &world.snakes[idx];
        if !snake.respawning && snake.body.iter().any(|c| !world.dims.contains(*c)) {
            events.emit(now, EventKind::Died, snake.id);
            let snake = &mut world.snakes[idx];
            snake.respawning = true;
            snake.corpse_fade_start_ms = 0;
            snake.respawn_at_ms = now + tuning.respawn_delay_ms();
            snake.body.clear();
            snake.food = None;
            snake.wandering = false;
            snake.wander_target = None;
            snake.behavior = None;
            snake.behavior_target = None;
            continue;
        }
        if let Some(food) = world.snakes[idx].food {
            if !world.dims.contains(food) {
                spawn::place_food(world, idx, rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Snake;
    use crate::grid::Cell;
    use rand::SeedableRng;

    struct Harness {
        world: WorldState,
        arena: SearchArena,
        rng: SmallRng,
        tuning: Tuning,
        events: EventLog,
    }

    impl Harness {
        fn new(cols: i32, rows: i32) -> Self {
            let world = WorldState::new(cols, rows);
            let arena = SearchArena::new(world.dims);
            Self {
                world,
                arena,
                rng: SmallRng::seed_from_u64(2),
                tuning: Tuning::default(),
                events: EventLog::new(),
            }
        }

        fn advance(&mut self, dt_ms: u64) {
            advance_world(
                &mut self.world,
                dt_ms,
                100,
                &mut self.arena,
                &mut self.rng,
                &self.tuning,
                &mut self.events,
            );
        }

        fn push(&mut self, id: u32, cells: &[(i32, i32)], personality: Personality) {
            self.world.snakes.push(Snake::new(
                crate::components::SnakeId(id),
                cells.iter().map(|&(x, y)| Cell::new(x, y)).collect(),
                personality,
            ));
        }

        fn kinds(&mut self) -> Vec<EventKind> {
            self.events.drain().into_iter().map(|e| e.kind).collect()
        }
    }

    #[test]
    fn test_eating_grows_and_replaces_food() {
        let mut h = Harness::new(10, 10);
        h.push(0, &[(3, 3), (2, 3)], Personality::Explorer);
        h.world.snakes[0].food = Some(Cell::new(4, 3));

        h.advance(100);
        let snake = &h.world.snakes[0];
        assert_eq!(snake.head(), Cell::new(4, 3));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.satiety, 1);
        let food = snake.food.expect("food replaced");
        assert_ne!(food, Cell::new(4, 3));
        assert!(h.kinds().contains(&EventKind::Ate));
    }

    #[test]
    fn test_satiety_threshold_starts_wandering() {
        let mut h = Harness::new(10, 10);
        h.push(0, &[(3, 3), (2, 3)], Personality::Explorer);
        h.world.snakes[0].food = Some(Cell::new(4, 3));
        h.world.snakes[0].satiety = 9;

        h.advance(100);
        let snake = &h.world.snakes[0];
        assert!(snake.wandering);
        assert_eq!(snake.satiety, 0);
        assert!(h.kinds().contains(&EventKind::WanderStarted));
    }

    #[test]
    fn test_wander_trims_and_expires() {
        let mut h = Harness::new(12, 12);
        h.tuning.wander_duration_ms = 500;
        h.tuning.wander_trim_interval_ms = 200;
        h.push(0, &[(5, 5), (4, 5), (3, 5), (2, 5)], Personality::Explorer);
        h.world.snakes[0].wandering = true;

        h.advance(600);
        let snake = &h.world.snakes[0];
        assert_eq!(snake.len(), 3);
        assert!(!snake.wandering);
        assert!(h.kinds().contains(&EventKind::WanderEnded));
    }

    #[test]
    fn test_greedy_decay_respects_floor() {
        let mut h = Harness::new(12, 12);
        h.push(
            0,
            &[(5, 5), (4, 5), (3, 5), (2, 5)],
            Personality::Greedy,
        );
        h.world.snakes[0].food = Some(Cell::new(10, 10));

        h.advance(10_000);
        assert_eq!(h.world.snakes[0].len(), 3);
        // At the floor, later intervals stop shedding.
        h.world.snakes[0].last_decay_ms = 0;
        h.advance(10_000);
        assert_eq!(h.world.snakes[0].len(), 3);
    }

    #[test]
    fn test_enclosed_snake_dies_and_respawns() {
        let mut h = Harness::new(8, 8);
        // Cornered at the origin by the other snake's body.
        h.push(0, &[(0, 0)], Personality::Lazy);
        h.push(1, &[(1, 0), (1, 1), (0, 1)], Personality::Lazy);
        h.world.snakes[1].food = Some(Cell::new(6, 6));

        h.advance(200);
        assert!(h.world.snakes[0].respawning);
        assert_eq!(h.world.status, RunStatus::Running);
        assert!(h.kinds().contains(&EventKind::Died));

        // Past the corpse hold + fade the snake comes back.
        h.advance(h.tuning.respawn_delay_ms() + 200);
        assert!(h.world.snakes[0].is_active());
        assert!(h.world.snakes[0].food.is_some());
        assert!(h.kinds().contains(&EventKind::Respawned));
    }

    #[test]
    fn test_last_snake_death_is_game_over() {
        let mut h = Harness::new(8, 8);
        h.push(0, &[(0, 0)], Personality::Lazy);
        // Walls close the corner; the lone snake has nowhere to go.
        h.world.terrain.set_solidity(Cell::new(1, 0), 1.0);
        h.world.terrain.set_solidity(Cell::new(0, 1), 1.0);

        h.advance(200);
        assert_eq!(h.world.status, RunStatus::GameOver);
        assert!(h.kinds().contains(&EventKind::GameOver));
    }

    #[test]
    fn test_steal_resolution_triggers_retaliation() {
        let mut h = Harness::new(12, 12);
        h.push(0, &[(4, 4)], Personality::Greedy);
        h.world.snakes[0].steal_active = true;
        h.push(1, &[(0, 0)], Personality::Aggressive);
        h.world.snakes[1].food = Some(Cell::new(5, 4));
        h.world.snakes[0].steal_target = Some(crate::components::SnakeId(1));

        h.advance(100);
        let thief = &h.world.snakes[0];
        assert_eq!(thief.head(), Cell::new(5, 4));
        assert_eq!(thief.len(), 2);
        assert!(!thief.steal_active);

        let owner = &h.world.snakes[1];
        assert_eq!(owner.retaliation_target, Some(crate::components::SnakeId(0)));
        assert!(owner.retaliation_until_ms > 0);
        assert_ne!(owner.food, Some(Cell::new(5, 4)));
        assert!(h.kinds().contains(&EventKind::FoodStolen));
    }

    #[test]
    fn test_move_interval_scales_with_wander_only() {
        let tuning = Tuning::default();
        let mut snake = Snake::new(
            crate::components::SnakeId(0),
            vec![Cell::new(0, 0)],
            Personality::Lazy,
        );
        assert_eq!(move_interval_ms(&snake, 100, &tuning), 100);
        snake.wandering = true;
        assert_eq!(move_interval_ms(&snake, 100, &tuning), 200);
        // Personality and hunt pacing are animation hints; the logical
        // cadence ignores them.
        snake.wandering = false;
        snake.behavior = Some(BehaviorState::Killing);
        assert_eq!(move_interval_ms(&snake, 100, &tuning), 100);
    }

    #[test]
    fn test_enforce_bounds_after_shrink() {
        let mut h = Harness::new(10, 10);
        h.push(0, &[(9, 9), (8, 9)], Personality::Lazy);
        h.push(1, &[(1, 1)], Personality::Explorer);
        h.world.snakes[1].food = Some(Cell::new(9, 0));

        h.world.resize(5, 5);
        enforce_bounds(&mut h.world, &mut h.rng, &h.tuning, &mut h.events);
        assert!(h.world.snakes[0].respawning);
        assert!(h.world.snakes[0].body.is_empty());
        let food = h.world.snakes[1].food.unwrap();
        assert!(h.world.dims.contains(food));
    }
}
