//! Snake state: personality, behavior, body and lifecycle bookkeeping.

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Dir};
use crate::tuning::Tuning;

/// Unique identifier for a snake, stable across respawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnakeId(pub u32);

/// Fixed set of snake temperaments. Each variant carries numeric tuning
/// read through the methods below; the decision engine dispatches on the
/// tag in a single match per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Hunts snakes that stray near its food.
    Aggressive,
    /// Keeps a wide berth and a deep safety margin.
    Cautious,
    /// Roams fast and far.
    Explorer,
    /// Moves slowly, wanders early.
    Lazy,
    /// Steals other snakes' food; never sated, steadily decays.
    Greedy,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Aggressive,
        Personality::Cautious,
        Personality::Explorer,
        Personality::Lazy,
        Personality::Greedy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Personality::Aggressive => "aggressive",
            Personality::Cautious => "cautious",
            Personality::Explorer => "explorer",
            Personality::Lazy => "lazy",
            Personality::Greedy => "greedy",
        }
    }

    /// Extra reachable cells (beyond body length) a step must leave
    /// before the goal-seeking phases will take it.
    pub fn safety_margin(self) -> usize {
        match self {
            Personality::Aggressive => 1,
            Personality::Cautious => 8,
            Personality::Explorer => 4,
            Personality::Lazy => 4,
            Personality::Greedy => 2,
        }
    }

    /// Animation pacing multiplier for the host renderer (lower reads
    /// as faster). The logical scheduler never varies cadence by
    /// personality; this only shapes movement interpolation.
    pub fn speed_multiplier(self) -> f64 {
        match self {
            Personality::Explorer => 0.8,
            Personality::Lazy => 1.2,
            _ => 1.0,
        }
    }

    /// Foods eaten before wander mode starts. `None` never wanders.
    pub fn wander_satiety(self, tuning: &Tuning) -> Option<u32> {
        match self {
            Personality::Greedy => None,
            Personality::Lazy => Some(5),
            _ => Some(tuning.satiety_max),
        }
    }

    /// Tail segments shed per wander cycle.
    pub fn wander_trim_cap(self, tuning: &Tuning) -> u32 {
        match self {
            Personality::Cautious => 5,
            Personality::Lazy => 4,
            Personality::Greedy => 0,
            _ => tuning.wander_max_trims,
        }
    }
}

/// Transient interaction states linking two snakes for the duration of
/// an encounter. Cleared and re-derived every tick by the decision
/// engine; `Feared` is the one state set on a snake by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Aggressive hunt in progress.
    Killing,
    /// Being hunted by an aggressive snake.
    Feared,
    /// Cautious flight from a nearby head.
    Evading,
    /// Greedy run at another snake's food.
    Stealing,
}

impl BehaviorState {
    pub fn label(self) -> &'static str {
        match self {
            BehaviorState::Killing => "killing",
            BehaviorState::Feared => "feared",
            BehaviorState::Evading => "evading",
            BehaviorState::Stealing => "stealing",
        }
    }
}

/// One autonomous snake.
///
/// The body is head-first; cells are distinct except transiently during
/// a move (the tail vacates the tick the head advances, unless eating).
#[derive(Debug, Clone)]
pub struct Snake {
    pub id: SnakeId,
    pub body: Vec<Cell>,
    pub personality: Personality,
    pub food: Option<Cell>,
    pub dir: Dir,

    // Transient behavior state, re-derived per tick
    pub behavior: Option<BehaviorState>,
    pub behavior_target: Option<SnakeId>,
    /// The max-space fallback fired on the latest decision
    pub desperation: bool,

    // Greedy steal mode (armed on eating, resolved by the tick driver)
    pub steal_active: bool,
    pub steal_target: Option<SnakeId>,

    // Aggressive retaliation against a food thief
    pub retaliation_target: Option<SnakeId>,
    pub retaliation_until_ms: u64,

    // Satiety / wander mode
    pub satiety: u32,
    pub wandering: bool,
    pub wander_started_ms: u64,
    pub wander_target: Option<Cell>,
    pub trim_count: u32,
    pub last_trim_ms: u64,

    // Timers on the simulation clock
    pub last_move_ms: u64,
    pub last_decay_ms: u64,

    // Respawn lifecycle
    pub respawning: bool,
    pub corpse_fade_start_ms: u64,
    pub respawn_at_ms: u64,
}

impl Snake {
    pub fn new(id: SnakeId, body: Vec<Cell>, personality: Personality) -> Self {
        Self {
            id,
            body,
            personality,
            food: None,
            dir: Dir::RIGHT,
            behavior: None,
            behavior_target: None,
            desperation: false,
            steal_active: false,
            steal_target: None,
            retaliation_target: None,
            retaliation_until_ms: 0,
            satiety: 0,
            wandering: false,
            wander_started_ms: 0,
            wander_target: None,
            trim_count: 0,
            last_trim_ms: 0,
            last_move_ms: 0,
            last_decay_ms: 0,
            respawning: false,
            corpse_fade_start_ms: 0,
            respawn_at_ms: 0,
        }
    }

    pub fn head(&self) -> Cell {
        debug_assert!(!self.body.is_empty());
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        debug_assert!(!self.body.is_empty());
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Alive and on the board (not in the corpse/respawn phase).
    pub fn is_active(&self) -> bool {
        !self.respawning && !self.body.is_empty()
    }

    /// Drops the interaction state at the start of a decision pass.
    pub fn clear_behavior(&mut self) {
        self.behavior = None;
        self.behavior_target = None;
    }

    /// Resets everything but identity and personality onto a new body.
    pub fn reset_onto(&mut self, body: Vec<Cell>, now_ms: u64) {
        self.body = body;
        self.food = None;
        self.dir = Dir::RIGHT;
        self.behavior = None;
        self.behavior_target = None;
        self.desperation = false;
        self.steal_active = false;
        self.steal_target = None;
        self.retaliation_target = None;
        self.retaliation_until_ms = 0;
        self.satiety = 0;
        self.wandering = false;
        self.wander_started_ms = 0;
        self.wander_target = None;
        self.trim_count = 0;
        self.last_trim_ms = 0;
        self.respawning = false;
        self.corpse_fade_start_ms = 0;
        self.respawn_at_ms = 0;
        self.last_move_ms = now_ms;
        self.last_decay_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_margins() {
        assert_eq!(Personality::Aggressive.safety_margin(), 1);
        assert_eq!(Personality::Cautious.safety_margin(), 8);
        assert_eq!(Personality::Greedy.safety_margin(), 2);
    }

    #[test]
    fn test_greedy_never_wanders() {
        let tuning = Tuning::default();
        assert_eq!(Personality::Greedy.wander_satiety(&tuning), None);
        assert_eq!(Personality::Lazy.wander_satiety(&tuning), Some(5));
        assert_eq!(
            Personality::Aggressive.wander_satiety(&tuning),
            Some(tuning.satiety_max)
        );
    }

    #[test]
    fn test_reset_preserves_identity() {
        let mut snake = Snake::new(
            SnakeId(3),
            vec![Cell::new(1, 1)],
            Personality::Explorer,
        );
        snake.satiety = 4;
        snake.wandering = true;
        snake.respawning = true;

        snake.reset_onto(vec![Cell::new(5, 5), Cell::new(4, 5)], 9000);
        assert_eq!(snake.id, SnakeId(3));
        assert_eq!(snake.personality, Personality::Explorer);
        assert_eq!(snake.head(), Cell::new(5, 5));
        assert_eq!(snake.satiety, 0);
        assert!(!snake.wandering);
        assert!(snake.is_active());
        assert_eq!(snake.last_move_ms, 9000);
    }

    #[test]
    fn test_behavior_labels() {
        assert_eq!(BehaviorState::Killing.label(), "killing");
        assert_eq!(BehaviorState::Feared.label(), "feared");
    }
}
