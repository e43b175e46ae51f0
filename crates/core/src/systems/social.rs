//! Proximity social signals: greetings, chats, and food disgust.
//!
//! Pure flavor for the host's speech bubbles - nothing here feeds back
//! into movement decisions. Pair bookkeeping lives outside the snakes so
//! both directions of an encounter share one cooldown entry.

use std::collections::HashMap;

use wriggle_events::EventKind;

use crate::components::{Personality, SnakeId, WorldState};
use crate::events::EventLog;
use crate::grid::manhattan;

/// Head distance at which two snakes greet.
const GREET_DISTANCE: i32 = 6;
/// They must separate this far before greeting again.
const GREET_RESET_DISTANCE: i32 = 10;
/// Minimum ms between greetings for a given pair.
const GREET_COOLDOWN_MS: u64 = 8_000;
/// Continuous proximity before the pair starts chatting.
const GREET_CHAT_AFTER_MS: u64 = 4_000;
/// Head distance from another snake's food that reads as gross.
const GROSS_FOOD_DISTANCE: i32 = 1;
/// Minimum ms between gross reactions per snake.
const GROSS_FOOD_COOLDOWN_MS: u64 = 4_000;

#[derive(Debug, Clone, Default)]
struct PairState {
    can_greet: bool,
    near_since_ms: u64,
    chatted: bool,
    last_greet_ms: u64,
}

/// Cross-snake social bookkeeping for one simulation.
#[derive(Debug, Default)]
pub struct SocialState {
    pairs: HashMap<(u32, u32), PairState>,
    last_gross_ms: HashMap<u32, u64>,
}

impl SocialState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all state involving a removed snake id.
    pub fn forget(&mut self, id: SnakeId) {
        self.pairs.retain(|&(a, b), _| a != id.0 && b != id.0);
        self.last_gross_ms.remove(&id.0);
    }

    fn pair(&mut self, a: SnakeId, b: SnakeId) -> &mut PairState {
        let key = (a.0.min(b.0), a.0.max(b.0));
        self.pairs.entry(key).or_insert_with(|| PairState {
            can_greet: true,
            ..Default::default()
        })
    }
}

/// Scans the roster once per pass and emits social events.
pub fn update(world: &WorldState, state: &mut SocialState, events: &mut EventLog) {
    let now = world.now_ms;

    for (i, snake) in world.snakes.iter().enumerate() {
        if !snake.is_active() {
            continue;
        }
        let head = snake.head();

        // Each pair is processed once, from the lower-index side.
        for other in world.snakes.iter().skip(i + 1) {
            if !other.is_active() {
                continue;
            }
            let dist = manhattan(head, other.head());
            let pair = state.pair(snake.id, other.id);

            if dist > GREET_DISTANCE {
                pair.near_since_ms = 0;
                pair.chatted = false;
                if dist >= GREET_RESET_DISTANCE {
                    pair.can_greet = true;
                }
                continue;
            }

            if pair.near_since_ms == 0 {
                pair.near_since_ms = now;
            }

            let off_cooldown = pair.last_greet_ms == 0
                || now.saturating_sub(pair.last_greet_ms) >= GREET_COOLDOWN_MS;
            if pair.can_greet && off_cooldown {
                pair.last_greet_ms = now;
                pair.can_greet = false;
                events.emit_targeted(now, EventKind::Greeted, snake.id, other.id);
                events.emit_targeted(now, EventKind::Greeted, other.id, snake.id);
            }

            if !pair.chatted && now.saturating_sub(pair.near_since_ms) >= GREET_CHAT_AFTER_MS {
                pair.chatted = true;
                events.emit_targeted(now, EventKind::Chatted, snake.id, other.id);
                events.emit_targeted(now, EventKind::Chatted, other.id, snake.id);
            }
        }

        // Greedy snakes find other snakes' food appetizing, not gross.
        if snake.personality == Personality::Greedy {
            continue;
        }
        let last_gross = state.last_gross_ms.get(&snake.id.0).copied().unwrap_or(0);
        if now.saturating_sub(last_gross) < GROSS_FOOD_COOLDOWN_MS && last_gross != 0 {
            continue;
        }
        for other in &world.snakes {
            if other.id == snake.id || !other.is_active() {
                continue;
            }
            let Some(food) = other.food else { continue };
            if manhattan(head, food) <= GROSS_FOOD_DISTANCE {
                state.last_gross_ms.insert(snake.id.0, now);
                events.emit_targeted(now, EventKind::Grossed, snake.id, other.id);
                break;
            }
        }
    }
}
