//! Hazard spawning
//!
//! Spawn cadence lives in the session's timers; this module only decides
//! where a new circle goes and how fast it rises.

use rand::Rng;

use super::state::{Circle, CircleKind, GameState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Starting speed for a freshly spawned circle of `kind`
pub fn spawn_speed(state: &GameState, tuning: &Tuning, kind: CircleKind) -> f32 {
    if kind.follows_global_speed() {
        state.circle_speed
    } else {
        tuning.power_up_speed
    }
}

/// Random x so the whole circle fits horizontally
pub fn spawn_x<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(CIRCLE_RADIUS..WORLD_WIDTH - CIRCLE_RADIUS)
}

/// Spawn one circle of `kind` at the bottom edge. Returns its id.
pub fn spawn_circle<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    tuning: &Tuning,
    kind: CircleKind,
) -> u32 {
    let id = state.next_entity_id();
    let x = spawn_x(rng);
    let speed = spawn_speed(state, tuning, kind);
    log::debug!("spawn {} #{id} at x={x:.1} speed={speed:.3}", kind.as_str());
    state.circles.push(Circle::new(id, kind, x, speed));
    id
}

/// Delay before the next Neutral spawn
pub fn neutral_delay_ms(state: &GameState, tuning: &Tuning) -> u64 {
    state.spawn_interval_ms.max(tuning.spawn_floor_ms())
}

/// Fixed cadence of the self-repeating spawners. Neutral has none: it
/// re-arms after every spawn with [`neutral_delay_ms`].
pub fn fixed_interval_ms(tuning: &Tuning, kind: CircleKind) -> Option<u64> {
    match kind {
        CircleKind::Neutral => None,
        CircleKind::Bonus => Some(tuning.bonus_interval_ms),
        CircleKind::PowerUp => Some(tuning.power_up_interval_ms),
    }
}
