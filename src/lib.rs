//! Bubble Rush - A single-screen platformer against the clock
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawners, timers, game state)
//! - `renderer`: Draw primitives and the WebGPU pipeline
//! - `tuning`: Data-driven game balance
//! - `game`: Host-facing loop (input mapping, step, restart)

pub mod game;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use game::{Game, Key};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// World dimensions (logical units, origin top-left, y grows downward)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 450.0;

    /// Nominal frame period used by headless runs (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 37.5;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_START_X: f32 = 100.0;
    /// Gap between the player's feet and the bottom edge at spawn
    pub const PLAYER_SPAWN_GAP: f32 = 10.0;

    /// All hazards share one radius
    pub const CIRCLE_RADIUS: f32 = 15.0;

    /// Fixed level geometry: (x, y, width, height)
    pub const PLATFORMS: [(f32, f32, f32, f32); 4] = [
        (300.0, WORLD_HEIGHT - 100.0, 200.0, 20.0),
        (550.0, WORLD_HEIGHT - 200.0, 200.0, 20.0),
        (50.0, WORLD_HEIGHT - 200.0, 200.0, 20.0),
        (0.0, WORLD_HEIGHT - 20.0, WORLD_WIDTH, 20.0),
    ];
}
