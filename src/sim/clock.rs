//! Countdown clock and difficulty ramp

use super::state::{GamePhase, GameState};
use crate::tuning::Tuning;

/// What a clock tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOutcome {
    /// Counted down one second
    Ticked,
    /// Not running (paused or already over); nothing changed
    Idle,
    /// The countdown hit zero on this tick. The clock must stop.
    Expired,
}

/// One clock period: count down, speed circles up, shorten spawn delay
pub fn tick(state: &mut GameState, tuning: &Tuning) -> ClockOutcome {
    if state.phase != GamePhase::Running {
        return ClockOutcome::Idle;
    }

    if state.timer > 0 {
        state.timer -= 1;
        state.circle_speed += tuning.circle_speed_step;
        state.spawn_interval_ms = state
            .spawn_interval_ms
            .saturating_sub(tuning.spawn_interval_step_ms)
            .max(tuning.spawn_floor_ms());
        log::debug!(
            "clock: {}s left, circle speed {:.2}, spawn every {}ms",
            state.timer,
            state.circle_speed,
            state.spawn_interval_ms
        );
    }

    if state.timer == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Time up! Final score: {}", state.score);
        return ClockOutcome::Expired;
    }

    ClockOutcome::Ticked
}
