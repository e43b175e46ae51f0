//! Food placement, respawn positioning and roster management.

use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, info};
use wriggle_events::EventKind;

use crate::components::{Personality, RunStatus, Snake, SnakeId, WorldState};
use crate::events::EventLog;
use crate::grid::{build_occupancy, Cell, OccupancyFlags};
use crate::tuning::Tuning;

/// Random placement attempts before a respawn is deferred.
const RESPAWN_ATTEMPTS: usize = 50;

/// Places food for the snake at `idx` on a uniformly random free cell.
///
/// Avoids every snake body (the owner's included), walls that exist or
/// are fading in, and all other snakes' food cells. A completely full
/// board leaves the snake foodless.
pub fn place_food(world: &mut WorldState, idx: usize, rng: &mut SmallRng) {
    let mut grid = build_occupancy(
        world,
        OccupancyFlags {
            exclude_own_head: false,
            include_incoming_walls: true,
            caller: None,
        },
    );
    let id = world.snakes[idx].id;
    for other in &world.snakes {
        if other.id != id {
            if let Some(food) = other.food {
                grid.block(food);
            }
        }
    }

    let dims = world.dims;
    let free = grid.free_count();
    if free == 0 {
        world.snakes[idx].food = None;
        return;
    }
    let mut pick = rng.gen_range(0..free);
    for index in 0..dims.cell_count() {
        if !grid.is_blocked_index(index) {
            if pick == 0 {
                world.snakes[idx].food = Some(dims.cell_at(index));
                return;
            }
            pick -= 1;
        }
    }
    world.snakes[idx].food = None;
}

/// Finds a clear horizontal strip for a new or respawning snake: head
/// rightmost, body extending left, length min(3, cols). `None` when the
/// random attempts all landed on occupied cells.
pub fn find_respawn_position(world: &WorldState, rng: &mut SmallRng) -> Option<Vec<Cell>> {
    let dims = world.dims;
    if dims.cols < 1 || dims.rows < 1 {
        return None;
    }
    let grid = build_occupancy(
        world,
        OccupancyFlags {
            exclude_own_head: false,
            include_incoming_walls: true,
            caller: None,
        },
    );
    let len = dims.cols.min(3).max(1);
    for _ in 0..RESPAWN_ATTEMPTS {
        let x = rng.gen_range(len - 1..dims.cols);
        let y = rng.gen_range(0..dims.rows);
        let blocked = (0..len).any(|i| grid.is_blocked(Cell::new(x - i, y)));
        if !blocked {
            return Some((0..len).map(|i| Cell::new(x - i, y)).collect());
        }
    }
    None
}

/// Brings a dead snake back onto the board, or defers the respawn for
/// another full delay when no clear strip was found.
pub fn respawn_snake(
    world: &mut WorldState,
    idx: usize,
    rng: &mut SmallRng,
    tuning: &Tuning,
    events: &mut EventLog,
) {
    let now = world.now_ms;
    match find_respawn_position(world, rng) {
        Some(body) => {
            world.snakes[idx].reset_onto(body, now);
            let id = world.snakes[idx].id;
            place_food(world, idx, rng);
            events.emit(now, EventKind::Respawned, id);
            info!(snake = id.0, "respawned");
        }
        None => {
            let snake = &mut world.snakes[idx];
            snake.body.clear();
            snake.corpse_fade_start_ms = 0;
            snake.respawn_at_ms = now + tuning.respawn_delay_ms();
            debug!(snake = snake.id.0, "respawn deferred, board too full");
        }
    }
}

/// Picks a personality weighted toward variety: every personality
/// already present in the roster has its weight halved per holder, so
/// unrepresented types are strongly favored.
pub fn pick_personality(world: &WorldState, rng: &mut SmallRng) -> Personality {
    let weights: Vec<f64> = Personality::ALL
        .iter()
        .map(|p| {
            let count = world.snakes.iter().filter(|s| s.personality == *p).count();
            0.5f64.powi(count as i32)
        })
        .collect();
    let total: f64 = weights.iter().sum();
    let mut roll = rng.gen::<f64>() * total;
    for (i, weight) in weights.iter().enumerate() {
        roll -= weight;
        if roll <= 0.0 {
            return Personality::ALL[i];
        }
    }
    Personality::ALL[Personality::ALL.len() - 1]
}

/// Adds a snake at a random clear position. `None` when the roster is
/// full or no position exists.
pub fn add_snake(
    world: &mut WorldState,
    rng: &mut SmallRng,
    tuning: &Tuning,
) -> Option<SnakeId> {
    if world.snakes.len() >= tuning.max_snakes {
        return None;
    }
    let body = find_respawn_position(world, rng)?;
    let id = world.allocate_id();
    let personality = pick_personality(world, rng);
    let mut snake = Snake::new(id, body, personality);
    snake.last_move_ms = world.now_ms;
    snake.last_decay_ms = world.now_ms;
    world.snakes.push(snake);
    let idx = world.snakes.len() - 1;
    place_food(world, idx, rng);
    Some(id)
}

/// Removes a snake from the roster. The last snake is never removed.
pub fn remove_snake(world: &mut WorldState, id: SnakeId) -> bool {
    if world.snakes.len() <= 1 {
        return false;
    }
    let before = world.snakes.len();
    world.snakes.retain(|s| s.id != id);
    world.snakes.len() != before
}

/// Seeds a fresh board: one snake centered and facing right, the rest at
/// random clear positions. A degenerate board (zero cells) pauses the
/// run with an empty-bodied primary snake waiting for a resize.
pub fn spawn_initial(
    world: &mut WorldState,
    count: usize,
    rng: &mut SmallRng,
    tuning: &Tuning,
) {
    let dims = world.dims;
    if dims.cols < 1 || dims.rows < 1 {
        let id = world.allocate_id();
        let mut snake = Snake::new(id, Vec::new(), pick_personality(world, rng));
        snake.respawning = true;
        world.snakes.push(snake);
        world.status = RunStatus::Paused;
        return;
    }

    let len = dims.cols.min(3).max(1);
    let cx = dims.cols / 2;
    let cy = dims.rows / 2;
    let body: Vec<Cell> = (0..len).map(|i| Cell::new(cx - i, cy)).collect();
    let id = world.allocate_id();
    let personality = pick_personality(world, rng);
    world.snakes.push(Snake::new(id, body, personality));
    place_food(world, 0, rng);

    for _ in 1..count {
        if add_snake(world, rng, tuning).is_none() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    #[test]
    fn test_place_food_avoids_bodies_and_other_food() {
        let mut world = WorldState::new(4, 2);
        let mut rng = rng();
        world.snakes.push(Snake::new(
            SnakeId(0),
            vec![Cell::new(1, 0), Cell::new(0, 0)],
            Personality::Lazy,
        ));
        world.snakes.push(Snake::new(
            SnakeId(1),
            vec![Cell::new(3, 1)],
            Personality::Greedy,
        ));
        world.snakes[1].food = Some(Cell::new(2, 1));

        for _ in 0..50 {
            place_food(&mut world, 0, &mut rng);
            let food = world.snakes[0].food.unwrap();
            assert!(!world.snakes.iter().any(|s| s.body.contains(&food)));
            assert_ne!(Some(food), world.snakes[1].food);
        }
    }

    #[test]
    fn test_place_food_on_full_board() {
        let mut world = WorldState::new(2, 1);
        let mut rng = rng();
        world.snakes.push(Snake::new(
            SnakeId(0),
            vec![Cell::new(1, 0), Cell::new(0, 0)],
            Personality::Lazy,
        ));
        place_food(&mut world, 0, &mut rng);
        assert_eq!(world.snakes[0].food, None);
    }

    #[test]
    fn test_respawn_strip_is_clear_and_horizontal() {
        let mut world = WorldState::new(10, 6);
        let mut rng = rng();
        world.snakes.push(Snake::new(
            SnakeId(0),
            vec![Cell::new(5, 3), Cell::new(4, 3)],
            Personality::Cautious,
        ));

        for _ in 0..20 {
            let body = find_respawn_position(&world, &mut rng).unwrap();
            assert_eq!(body.len(), 3);
            let head = body[0];
            for (i, cell) in body.iter().enumerate() {
                assert_eq!(*cell, Cell::new(head.x - i as i32, head.y));
                assert!(world.dims.contains(*cell));
                assert!(!world.snakes[0].body.contains(cell));
            }
        }
    }

    #[test]
    fn test_pick_personality_favors_missing_types() {
        let mut world = WorldState::new(20, 20);
        let mut rng = rng();
        // Saturate the roster with one personality; picks should mostly
        // land elsewhere.
        for i in 0..4 {
            world.snakes.push(Snake::new(
                SnakeId(i),
                vec![Cell::new(i as i32, 0)],
                Personality::Aggressive,
            ));
        }
        let aggressive_picks = (0..200)
            .filter(|_| pick_personality(&world, &mut rng) == Personality::Aggressive)
            .count();
        assert!(aggressive_picks < 40);
    }

    #[test]
    fn test_add_snake_respects_roster_cap() {
        let mut world = WorldState::new(30, 30);
        let mut rng = rng();
        let tuning = Tuning {
            max_snakes: 2,
            ..Default::default()
        };
        assert!(add_snake(&mut world, &mut rng, &tuning).is_some());
        assert!(add_snake(&mut world, &mut rng, &tuning).is_some());
        assert!(add_snake(&mut world, &mut rng, &tuning).is_none());
    }

    #[test]
    fn test_remove_snake_never_removes_last() {
        let mut world = WorldState::new(8, 8);
        world.snakes.push(Snake::new(
            SnakeId(0),
            vec![Cell::new(1, 1)],
            Personality::Lazy,
        ));
        assert!(!remove_snake(&mut world, SnakeId(0)));
        world.snakes.push(Snake::new(
            SnakeId(1),
            vec![Cell::new(3, 3)],
            Personality::Greedy,
        ));
        assert!(remove_snake(&mut world, SnakeId(1)));
        assert_eq!(world.snakes.len(), 1);
    }

    #[test]
    fn test_spawn_initial_centers_primary() {
        let mut world = WorldState::new(11, 7);
        let mut rng = rng();
        spawn_initial(&mut world, 3, &mut rng, &Tuning::default());
        assert_eq!(world.snakes.len(), 3);
        assert_eq!(world.snakes[0].head(), Cell::new(5, 3));
        assert!(world.snakes.iter().all(|s| s.food.is_some()));
    }

    #[test]
    fn test_spawn_initial_degenerate_board() {
        let mut world = WorldState::new(0, 0);
        let mut rng = rng();
        spawn_initial(&mut world, 2, &mut rng, &Tuning::default());
        assert_eq!(world.snakes.len(), 1);
        assert!(world.snakes[0].respawning);
        assert_eq!(world.status, RunStatus::Paused);
    }
}
