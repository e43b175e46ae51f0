//! Event Types
//!
//! Events are the contract between the simulation core and the host
//! presentation layer: every observable state transition (eating, dying,
//! entering a behavior state, desperation moves) is reported as a
//! [`SimEvent`] instead of being drawn directly.

use serde::{Deserialize, Serialize};

/// Kinds of observable simulation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A snake reached and consumed its own food.
    Ate,
    /// A greedy snake consumed another snake's food.
    FoodStolen,
    /// A snake collided and entered the corpse phase.
    Died,
    /// A dead snake re-entered the board.
    Respawned,
    /// A snake entered a transient behavior state (killing, feared, ...).
    BehaviorChanged,
    /// No safe path existed; the max-space fallback fired this tick.
    Desperation,
    /// Satiety threshold reached; the snake started roaming.
    WanderStarted,
    /// Wander phase expired; the snake resumed seeking food.
    WanderEnded,
    /// Two snake heads came close; both parties greet (cooldown gated).
    Greeted,
    /// Two snakes stayed close long enough to strike up a chat.
    Chatted,
    /// A non-greedy snake recoiled from another snake's food.
    Grossed,
    /// The last living snake died.
    GameOver,
    /// A snake filled the entire board.
    BoardComplete,
}

impl EventKind {
    /// Returns all event kind variants.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Ate,
            EventKind::FoodStolen,
            EventKind::Died,
            EventKind::Respawned,
            EventKind::BehaviorChanged,
            EventKind::Desperation,
            EventKind::WanderStarted,
            EventKind::WanderEnded,
            EventKind::Greeted,
            EventKind::Chatted,
            EventKind::Grossed,
            EventKind::GameOver,
            EventKind::BoardComplete,
        ]
    }
}

/// A single simulation event.
///
/// `snake` is the primary actor; `target` the other snake involved in a
/// two-party interaction (the feared victim, the robbed owner). Behavior
/// states are carried as their snake_case names so the host needs no
/// engine types to interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Unique identifier (e.g. "evt_00000042")
    pub event_id: String,
    /// Simulation clock at emission, in milliseconds
    pub at_ms: u64,
    /// Event category
    pub kind: EventKind,
    /// Primary snake id
    pub snake: u32,
    /// Other snake involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    /// Behavior state name for `BehaviorChanged` events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    /// Board cell the event happened on, if meaningful
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<crate::CellPos>,
}

impl SimEvent {
    /// Creates an event with the required fields.
    pub fn new(event_id: impl Into<String>, at_ms: u64, kind: EventKind, snake: u32) -> Self {
        Self {
            event_id: event_id.into(),
            at_ms,
            kind,
            snake,
            target: None,
            behavior: None,
            cell: None,
        }
    }

    /// Sets the other snake involved in the interaction.
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the behavior state name.
    pub fn with_behavior(mut self, behavior: impl Into<String>) -> Self {
        self.behavior = Some(behavior.into());
        self
    }

    /// Sets the board cell.
    pub fn with_cell(mut self, cell: crate::CellPos) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Serializes the event to a JSON line (for JSONL streams).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
