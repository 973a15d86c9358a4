//! Slow mode
//!
//! Halves the global circle speed and every live Neutral/Bonus circle.
//! Restoration doubles whatever is alive at that moment, not a snapshot.
//! Activations stack: two pickups halve twice and restore twice.

use super::state::GameState;

/// Apply one slow-mode activation
pub fn activate_slow_mode(state: &mut GameState) {
    state.slow_mode_stacks += 1;
    state.circle_speed /= 2.0;
    for circle in state.circles.speed_scaled_mut() {
        circle.speed /= 2.0;
    }
    log::info!(
        "Slow mode on (stacks={}, circle speed {:.3})",
        state.slow_mode_stacks,
        state.circle_speed
    );
}

/// Undo one slow-mode activation
pub fn restore_speed(state: &mut GameState) {
    state.slow_mode_stacks = state.slow_mode_stacks.saturating_sub(1);
    state.circle_speed *= 2.0;
    for circle in state.circles.speed_scaled_mut() {
        circle.speed *= 2.0;
    }
    if !state.slow_mode_active() {
        log::info!("Slow mode off (circle speed {:.3})", state.circle_speed);
    }
}
