//! Numeric tuning for behaviors and lifecycle timing.
//!
//! Everything here deserializes with per-field defaults so a config file
//! can override a single knob, and tests can pin trigger probabilities
//! to 0.0 or 1.0 instead of fighting the RNG.

use serde::{Deserialize, Serialize};

/// Behavior and lifecycle tuning. Durations are milliseconds on the
/// simulation clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Foods eaten before wander mode starts (personality may override)
    pub satiety_max: u32,
    /// How long wander mode lasts
    pub wander_duration_ms: u64,
    /// One tail segment shed per interval while wandering
    pub wander_trim_interval_ms: u64,
    /// Total segments shed per wander cycle (personality may override)
    pub wander_max_trims: u32,
    /// Move interval multiplier while wandering
    pub wander_speed_divisor: f64,

    /// Roster size limit
    pub max_snakes: usize,
    /// Dead snake stays fully solid this long
    pub corpse_hold_ms: u64,
    /// Then fades (still solid) this long before respawn
    pub corpse_fade_ms: u64,

    /// Greedy snakes shed one segment per interval
    pub greedy_decay_interval_ms: u64,
    /// Greedy decay never shrinks below this length
    pub greedy_min_length: usize,
    /// Chance to arm steal mode when a greedy snake eats
    pub steal_chance: f64,

    /// Manhattan range around own food that triggers kill mode
    pub kill_trigger_range: i32,
    /// Per-tick chance to enter kill mode once triggered
    pub kill_chance: f64,
    /// Direct-chase range when blocking the victim fails
    pub kill_chase_range: i32,
    /// How long an aggressive snake hunts a food thief
    pub retaliation_duration_ms: u64,
    /// Animation pacing multiplier the host applies during a kill chase
    /// (lower reads as faster); the logical cadence ignores it
    pub chase_speed_mult: f64,

    /// Manhattan range at which cautious snakes start evading
    pub evade_range: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            satiety_max: 10,
            wander_duration_ms: 60_000,
            wander_trim_interval_ms: 6_000,
            wander_max_trims: 9,
            wander_speed_divisor: 2.0,
            max_snakes: 10,
            corpse_hold_ms: 5_000,
            corpse_fade_ms: 5_000,
            greedy_decay_interval_ms: 10_000,
            greedy_min_length: 3,
            steal_chance: 0.3,
            kill_trigger_range: 4,
            kill_chance: 0.3,
            kill_chase_range: 8,
            retaliation_duration_ms: 20_000,
            chase_speed_mult: 0.7,
            evade_range: 5,
        }
    }
}

impl Tuning {
    /// Delay between death and respawn: corpse hold plus fade.
    pub fn respawn_delay_ms(&self) -> u64 {
        self.corpse_hold_ms + self.corpse_fade_ms
    }
}
