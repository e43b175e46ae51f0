//! Event collection for one simulation run.

use wriggle_events::{generate_event_id, CellPos, EventKind, SimEvent};

use crate::components::SnakeId;
use crate::grid::Cell;

/// Buffer of events produced since the host last drained it.
///
/// Sequence numbers are monotonic across the run, so event ids stay
/// unique and ordered even after draining.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    next_seq: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, at_ms: u64, kind: EventKind, snake: SnakeId) {
        let event = self.make(at_ms, kind, snake);
        self.events.push(event);
    }

    pub fn emit_at(&mut self, at_ms: u64, kind: EventKind, snake: SnakeId, cell: Cell) {
        let event = self
            .make(at_ms, kind, snake)
            .with_cell(CellPos { x: cell.x, y: cell.y });
        self.events.push(event);
    }

    pub fn emit_targeted(&mut self, at_ms: u64, kind: EventKind, snake: SnakeId, target: SnakeId) {
        let event = self.make(at_ms, kind, snake).with_target(target.0);
        self.events.push(event);
    }

    /// Records a behavior state transition, optionally naming the snake
    /// on the other side of the interaction.
    pub fn emit_behavior(
        &mut self,
        at_ms: u64,
        snake: SnakeId,
        behavior: &str,
        target: Option<SnakeId>,
    ) {
        let mut event = self
            .make(at_ms, EventKind::BehaviorChanged, snake)
            .with_behavior(behavior);
        if let Some(target) = target {
            event = event.with_target(target.0);
        }
        self.events.push(event);
    }

    fn make(&mut self, at_ms: u64, kind: EventKind, snake: SnakeId) -> SimEvent {
        let seq = self.next_seq;
        self.next_seq += 1;
        SimEvent::new(generate_event_id(seq), at_ms, kind, snake.0)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    /// Hands the buffered events to the caller and clears the buffer.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
