//! The owned simulation facade.
//!
//! Hosts construct one [`Simulation`], advance its clock, drain events
//! and take snapshots. Everything stochastic draws from the simulation's
//! seeded RNG, so a fixed seed reproduces a run exactly.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use wriggle_events::{SimEvent, WorldSnapshot};

use crate::components::{RunStatus, SnakeId, WorldState};
use crate::config::SimConfig;
use crate::events::EventLog;
use crate::grid::Dir;
use crate::output;
use crate::search::SearchArena;
use crate::systems::social::{self, SocialState};
use crate::systems::{decision, spawn, tick};
use crate::SimRng;

pub struct Simulation {
    world: WorldState,
    arena: SearchArena,
    rng: SimRng,
    config: SimConfig,
    events: EventLog,
    social: SocialState,
    snapshot_seq: u64,
}

impl Simulation {
    /// Builds a world from the configuration and seeds the roster.
    pub fn new(config: SimConfig) -> Self {
        let mut world = WorldState::new(config.cols, config.rows);
        let arena = SearchArena::new(world.dims);
        let mut rng = SimRng(SmallRng::seed_from_u64(config.seed));
        spawn::spawn_initial(&mut world, config.snakes, &mut rng.0, &config.tuning);
        Self {
            world,
            arena,
            rng,
            config,
            events: EventLog::new(),
            social: SocialState::new(),
            snapshot_seq: 0,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn status(&self) -> RunStatus {
        self.world.status
    }

    /// Advances the simulation clock and ticks every snake that is due.
    pub fn advance(&mut self, dt_ms: u64) {
        tick::advance_world(
            &mut self.world,
            dt_ms,
            self.config.tick_ms,
            &mut self.arena,
            &mut self.rng.0,
            &self.config.tuning,
            &mut self.events,
        );
        if self.world.status == RunStatus::Running {
            social::update(&self.world, &mut self.social, &mut self.events);
        }
    }

    /// Runs one decision for a snake without moving it. Hosts that drive
    /// their own stepping use this as the sole decision entry point.
    pub fn compute_next_direction(&mut self, id: SnakeId) -> Option<Dir> {
        let idx = self.world.snake_index(id)?;
        if !self.world.snakes[idx].is_active() {
            return None;
        }
        Some(decision::compute_next_direction(
            &mut self.world,
            idx,
            &mut self.arena,
            &mut self.rng.0,
            &self.config.tuning,
            &mut self.events,
        ))
    }

    /// Events produced since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Captures the world; snapshot ids count up per simulation.
    pub fn snapshot(&mut self) -> WorldSnapshot {
        let snap = output::snapshot_world(&self.world, self.snapshot_seq);
        self.snapshot_seq += 1;
        snap
    }

    pub fn add_snake(&mut self) -> Option<SnakeId> {
        spawn::add_snake(&mut self.world, &mut self.rng.0, &self.config.tuning)
    }

    pub fn remove_snake(&mut self, id: SnakeId) -> bool {
        let removed = spawn::remove_snake(&mut self.world, id);
        if removed {
            self.social.forget(id);
        }
        removed
    }

    /// Applies new board dimensions: terrain and search scratch are
    /// rebuilt, snakes that no longer fit go through the respawn cycle.
    pub fn resize(&mut self, cols: i32, rows: i32) {
        self.world.resize(cols, rows);
        self.arena.ensure_dims(self.world.dims);
        tick::enforce_bounds(
            &mut self.world,
            &mut self.rng.0,
            &self.config.tuning,
            &mut self.events,
        );
        if self.world.status == RunStatus::Paused && self.world.dims.cell_count() > 0 {
            self.world.status = RunStatus::Running;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.world.status = match (self.world.status, paused) {
            (RunStatus::Running, true) => RunStatus::Paused,
            (RunStatus::Paused, false) => RunStatus::Running,
            (status, _) => status,
        };
    }

    /// Starts a fresh round on the same board: roster reset to the
    /// configured size, terrain cleared, clock kept monotonic.
    pub fn restart(&mut self) {
        self.world.snakes.clear();
        self.world.terrain.clear();
        self.world.status = RunStatus::Running;
        self.social = SocialState::new();
        spawn::spawn_initial(
            &mut self.world,
            self.config.snakes,
            &mut self.rng.0,
            &self.config.tuning,
        );
    }
}
