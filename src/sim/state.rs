//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen; only the pause toggle is live
    Paused,
    /// Timer ran out. Terminal.
    GameOver,
}

/// The player-controlled rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub jump_count: u8,
    pub is_jumping: bool,
}

impl Player {
    /// Spawn at the default start spot, just above the floor
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(
                PLAYER_START_X,
                WORLD_HEIGHT - PLAYER_HEIGHT - PLAYER_SPAWN_GAP,
            ),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            jump_count: 0,
            is_jumping: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Advance one frame: gravity, move, clamp to the world.
    ///
    /// Gravity is per frame, not per second; frames are assumed uniform.
    pub fn integrate(&mut self, gravity: f32) {
        self.vel.y += gravity;
        self.pos += self.vel;

        self.pos.x = self.pos.x.clamp(0.0, WORLD_WIDTH - self.size.x);
        if self.bottom() > WORLD_HEIGHT {
            self.land_at(WORLD_HEIGHT);
        }
    }

    /// Jump if any jumps are left. Returns whether the jump happened.
    pub fn jump(&mut self, jump_power: f32, max_jumps: u8) -> bool {
        if self.jump_count >= max_jumps {
            return false;
        }
        self.vel.y = jump_power;
        self.jump_count += 1;
        self.is_jumping = true;
        true
    }

    /// Put the player's feet on `surface_y` and reset jumps
    pub fn land_at(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.size.y;
        self.vel.y = 0.0;
        self.jump_count = 0;
        self.is_jumping = false;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed, solid-from-above platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    /// The fixed level layout
    pub fn level() -> Vec<Platform> {
        PLATFORMS
            .iter()
            .map(|&(x, y, w, h)| Platform::new(x, y, w, h))
            .collect()
    }
}

/// Hazard variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircleKind {
    /// Worth points
    Neutral,
    /// Adds time to the countdown
    Bonus,
    /// Triggers slow mode
    PowerUp,
}

impl CircleKind {
    pub const ALL: [CircleKind; 3] = [CircleKind::Neutral, CircleKind::Bonus, CircleKind::PowerUp];

    /// Whether this kind inherits and follows the global circle speed.
    /// Power-ups rise at a constant speed and ignore slow mode.
    pub fn follows_global_speed(&self) -> bool {
        !matches!(self, CircleKind::PowerUp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CircleKind::Neutral => "neutral",
            CircleKind::Bonus => "bonus",
            CircleKind::PowerUp => "power-up",
        }
    }
}

/// A rising circular hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub id: u32,
    pub kind: CircleKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Upward speed in units per frame
    pub speed: f32,
}

impl Circle {
    /// New circle centered on the bottom edge of the world
    pub fn new(id: u32, kind: CircleKind, x: f32, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::new(x, WORLD_HEIGHT),
            radius: CIRCLE_RADIUS,
            speed,
        }
    }

    /// Rise by this circle's own speed
    pub fn advance(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Completely above the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y + self.radius < 0.0
    }
}

/// The three hazard populations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Populations {
    pub neutral: Vec<Circle>,
    pub bonus: Vec<Circle>,
    pub power_up: Vec<Circle>,
}

impl Populations {
    pub fn get(&self, kind: CircleKind) -> &Vec<Circle> {
        match kind {
            CircleKind::Neutral => &self.neutral,
            CircleKind::Bonus => &self.bonus,
            CircleKind::PowerUp => &self.power_up,
        }
    }

    pub fn get_mut(&mut self, kind: CircleKind) -> &mut Vec<Circle> {
        match kind {
            CircleKind::Neutral => &mut self.neutral,
            CircleKind::Bonus => &mut self.bonus,
            CircleKind::PowerUp => &mut self.power_up,
        }
    }

    pub fn push(&mut self, circle: Circle) {
        self.get_mut(circle.kind).push(circle);
    }

    /// All circles whose speed tracks the global speed
    pub fn speed_scaled_mut(&mut self) -> impl Iterator<Item = &mut Circle> {
        self.neutral.iter_mut().chain(self.bonus.iter_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Circle> {
        self.neutral
            .iter()
            .chain(self.bonus.iter())
            .chain(self.power_up.iter())
    }

    pub fn len(&self) -> usize {
        self.neutral.len() + self.bonus.len() + self.power_up.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Complete game state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seconds left on the countdown
    pub timer: u32,
    pub score: u64,
    /// Baseline speed given to new Neutral/Bonus circles
    pub circle_speed: f32,
    /// Delay before the next Neutral spawn
    pub spawn_interval_ms: u64,
    /// Outstanding slow-mode activations (they stack)
    pub slow_mode_stacks: u32,
    pub phase: GamePhase,
    /// Frames simulated while running
    pub frames: u64,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub circles: Populations,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh world per the tuning
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            timer: tuning.start_timer_secs,
            score: 0,
            circle_speed: tuning.initial_circle_speed,
            spawn_interval_ms: tuning.starting_spawn_interval_ms(),
            slow_mode_stacks: 0,
            phase: GamePhase::Running,
            frames: 0,
            player: Player::new(),
            platforms: Platform::level(),
            circles: Populations::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn slow_mode_active(&self) -> bool {
        self.slow_mode_stacks > 0
    }
}
