//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-frame physics, uniform frames
//! - Seeded RNG only
//! - Timers run on a virtual clock the host advances
//! - No rendering or platform dependencies

pub mod clock;
pub mod effects;
pub mod geometry;
pub mod scheduler;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::ClockOutcome;
pub use geometry::Rect;
pub use scheduler::{Scheduler, TimerId};
pub use session::{Session, TimerEvent, TimerHandles};
pub use state::{Circle, CircleKind, GamePhase, GameState, Platform, Player, Populations};
pub use tick::{FrameInput, FrameOutcome, GameEvent, autopilot_input, tick};
