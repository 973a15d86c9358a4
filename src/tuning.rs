//! Game balance values
//!
//! Everything a designer might want to tweak without touching the simulation.
//! Loaded from JSON; missing fields fall back to the shipped defaults.

use serde::{Deserialize, Serialize};

/// Balance knobs for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Added to vertical velocity every frame
    pub gravity: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Vertical velocity set by a jump (negative = up)
    pub jump_power: f32,
    /// Jumps allowed between landings
    pub max_jumps: u8,

    // === Clock ===
    pub start_timer_secs: u32,
    pub clock_period_ms: u64,
    /// Global circle speed at session start
    pub initial_circle_speed: f32,
    /// Added to the global circle speed on every clock tick
    pub circle_speed_step: f32,

    // === Spawners ===
    pub initial_spawn_interval_ms: u64,
    pub spawn_interval_step_ms: u64,
    pub min_spawn_interval_ms: u64,
    pub bonus_interval_ms: u64,
    pub power_up_interval_ms: u64,
    /// Constant rise speed of power-up circles
    pub power_up_speed: f32,

    // === Effects & scoring ===
    pub slow_mode_duration_ms: u64,
    pub neutral_score: u64,
    pub bonus_seconds: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            move_speed: 6.0,
            jump_power: -10.0,
            max_jumps: 2,

            start_timer_secs: 60,
            clock_period_ms: 1000,
            initial_circle_speed: 1.0,
            circle_speed_step: 0.05,

            initial_spawn_interval_ms: 2000,
            spawn_interval_step_ms: 25,
            min_spawn_interval_ms: 50,
            bonus_interval_ms: 10_000,
            power_up_interval_ms: 30_000,
            power_up_speed: 0.5,

            slow_mode_duration_ms: 10_000,
            neutral_score: 10,
            bonus_seconds: 20,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON (handy as a template for overrides)
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Sanity-check values. Returns human readable warnings; never rejects.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.gravity <= 0.0 {
            w.push(format!("gravity {} <= 0; the player will never fall", self.gravity));
        }
        if self.jump_power >= 0.0 {
            w.push(format!(
                "jump_power {} is not negative; jumps will push the player down",
                self.jump_power
            ));
        }
        if self.max_jumps == 0 {
            w.push("max_jumps is 0; jumping is disabled".into());
        }
        if self.move_speed < 0.0 {
            w.push(format!("move_speed {} negative; controls are inverted", self.move_speed));
        }
        for (name, value) in [
            ("clock_period_ms", self.clock_period_ms),
            ("min_spawn_interval_ms", self.min_spawn_interval_ms),
            ("bonus_interval_ms", self.bonus_interval_ms),
            ("power_up_interval_ms", self.power_up_interval_ms),
        ] {
            if value == 0 {
                w.push(format!("{name} is 0; treated as 1ms"));
            }
        }
        if self.initial_spawn_interval_ms < self.min_spawn_interval_ms {
            w.push(format!(
                "initial_spawn_interval_ms {} below floor {}; floor wins",
                self.initial_spawn_interval_ms, self.min_spawn_interval_ms
            ));
        }
        if self.initial_circle_speed <= 0.0 {
            w.push(format!(
                "initial_circle_speed {} <= 0; circles will not rise",
                self.initial_circle_speed
            ));
        }
        if self.power_up_speed <= 0.0 {
            w.push(format!("power_up_speed {} <= 0; power-ups will not rise", self.power_up_speed));
        }
        if self.start_timer_secs == 0 {
            w.push("start_timer_secs is 0; the game ends on the first clock tick".into());
        }
        w
    }

    /// Spawn interval floor (never zero)
    pub fn spawn_floor_ms(&self) -> u64 {
        self.min_spawn_interval_ms.max(1)
    }

    /// Spawn interval at session start, respecting the floor
    pub fn starting_spawn_interval_ms(&self) -> u64 {
        self.initial_spawn_interval_ms.max(self.spawn_floor_ms())
    }
}
