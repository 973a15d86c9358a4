//! Per-frame simulation step
//!
//! Fixed update order inside a frame: input, hazards (power-ups, neutral,
//! bonus), player, platforms. Collision outcomes follow from that order.

use serde::{Deserialize, Serialize};

use super::effects;
use super::geometry::Rect;
use super::session::Session;
use super::state::{Circle, CircleKind, GameState};
use crate::tuning::Tuning;

/// Input for a single frame (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Move-left held
    pub left: bool,
    /// Move-right held
    pub right: bool,
    /// Jump pressed this frame (edge, not held)
    pub jump: bool,
    /// Pause toggle pressed this frame
    pub pause: bool,
    /// Demo mode - the game steers the player
    pub autopilot: bool,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stop,
}

/// Gameplay events produced by a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player touched a circle; it was removed and its effect applied
    Collected { kind: CircleKind, id: u32 },
    /// A circle rose past the top edge
    Escaped { kind: CircleKind, id: u32 },
    /// Player landed on the platform at this index
    Landed { platform: usize },
    /// A jump took effect
    Jumped { jump_count: u8 },
}

/// Advance the game state by one frame. Callers only tick a running game.
pub fn tick(state: &mut GameState, tuning: &Tuning, input: &FrameInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.frames += 1;

    // Input into velocity
    let player = &mut state.player;
    player.vel.x = if input.left {
        -tuning.move_speed
    } else if input.right {
        tuning.move_speed
    } else {
        0.0
    };
    if input.jump && player.jump(tuning.jump_power, tuning.max_jumps) {
        events.push(GameEvent::Jumped {
            jump_count: player.jump_count,
        });
    }

    // Hazards. Power-ups first so a pickup slows this frame's circles.
    for kind in [CircleKind::PowerUp, CircleKind::Neutral, CircleKind::Bonus] {
        update_population(state, tuning, kind, &mut events);
    }

    state.player.integrate(tuning.gravity);
    land_on_platforms(state, &mut events);

    events
}

/// Move, cull and collide one population. Survivors are kept in order;
/// nothing is skipped when a neighbour is removed.
fn update_population(
    state: &mut GameState,
    tuning: &Tuning,
    kind: CircleKind,
    events: &mut Vec<GameEvent>,
) {
    let player = state.player.rect();
    let mut collected = Vec::new();

    state.circles.get_mut(kind).retain_mut(|circle: &mut Circle| {
        circle.advance();
        if circle.is_off_screen() {
            events.push(GameEvent::Escaped { kind, id: circle.id });
            return false;
        }
        if player.overlaps_circle(circle.pos, circle.radius) {
            collected.push(circle.id);
            return false;
        }
        true
    });

    for id in collected {
        log::debug!("collected {} #{id}", kind.as_str());
        match kind {
            CircleKind::Neutral => state.score += tuning.neutral_score,
            CircleKind::Bonus => state.timer += tuning.bonus_seconds,
            CircleKind::PowerUp => effects::activate_slow_mode(state),
        }
        events.push(GameEvent::Collected { kind, id });
    }
}

/// Landing-only resolution: a falling player whose feet are inside a
/// platform's band snaps on top. No side or underside collisions.
pub fn land_on_platforms(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for (index, platform) in state.platforms.iter().enumerate() {
        let player = &mut state.player;
        if lands_on(&player.rect(), player.vel.y, &platform.rect) {
            player.land_at(platform.rect.top());
            events.push(GameEvent::Landed { platform: index });
        }
    }
}

/// Overlapping, feet no lower than the platform's bottom, moving down
pub fn lands_on(player: &Rect, vy: f32, platform: &Rect) -> bool {
    vy > 0.0 && player.overlaps(platform) && player.bottom() <= platform.bottom()
}

/// Demo-mode steering: chase the most valuable circle in reach
pub fn autopilot_input(state: &GameState) -> FrameInput {
    let player = &state.player;
    let center = player.pos + player.size / 2.0;

    let priority = |c: &Circle| match c.kind {
        CircleKind::Bonus => 0,
        CircleKind::PowerUp => 1,
        CircleKind::Neutral => 2,
    };
    let target = state.circles.iter().min_by(|a, b| {
        priority(a).cmp(&priority(b)).then(
            a.pos
                .distance_squared(center)
                .partial_cmp(&b.pos.distance_squared(center))
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    let Some(target) = target else {
        return FrameInput {
            autopilot: true,
            ..Default::default()
        };
    };

    let dx = target.pos.x - center.x;
    let dead_zone = player.size.x / 4.0;
    let close = dx.abs() < player.size.x * 2.0;
    let above = target.pos.y < player.pos.y;
    FrameInput {
        left: dx < -dead_zone,
        right: dx > dead_zone,
        // Jump from the ground or at the top of the first jump
        jump: close && above && player.vel.y >= 0.0,
        pause: false,
        autopilot: true,
    }
}

impl Session {
    /// One simulation frame. Handles the pause edge, then advances the world
    /// if running. Returns `Stop` once the game is over.
    pub fn frame(&mut self, input: &FrameInput) -> FrameOutcome {
        if input.pause {
            self.toggle_pause();
        }
        if self.state.is_game_over() {
            return FrameOutcome::Stop;
        }
        if self.state.is_paused() {
            return FrameOutcome::Continue;
        }

        let input = if input.autopilot {
            autopilot_input(&self.state)
        } else {
            input.clone()
        };

        let events = tick(&mut self.state, &self.tuning, &input);
        for event in &events {
            if let GameEvent::Collected {
                kind: CircleKind::PowerUp,
                ..
            } = event
            {
                self.schedule_slow_mode_expiry();
            }
        }
        FrameOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{GamePhase, Platform};
    use glam::Vec2;

    fn fresh() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(&tuning), tuning)
    }

    /// A circle centered on the player
    fn circle_on_player(state: &mut GameState, kind: CircleKind, speed: f32) -> u32 {
        let id = state.next_entity_id();
        let mut c = Circle::new(id, kind, 0.0, speed);
        c.pos = state.player.pos + state.player.size / 2.0 + Vec2::new(0.0, speed);
        state.circles.push(c);
        id
    }

    #[test]
    fn test_settles_on_floor_platform() {
        let (mut state, tuning) = fresh();
        let input = FrameInput::default();
        let mut landed = false;
        for _ in 0..10 {
            landed |= tick(&mut state, &tuning, &input)
                .iter()
                .any(|e| matches!(e, GameEvent::Landed { platform: 3 }));
        }
        assert!(landed);
        assert_eq!(state.player.bottom(), WORLD_HEIGHT - 20.0);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_input_sets_horizontal_velocity() {
        let (mut state, tuning) = fresh();
        let x = state.player.pos.x;
        tick(&mut state, &tuning, &FrameInput { right: true, ..Default::default() });
        assert_eq!(state.player.pos.x, x + 6.0);
        tick(&mut state, &tuning, &FrameInput { left: true, right: true, ..Default::default() });
        assert_eq!(state.player.pos.x, x);
        tick(&mut state, &tuning, &FrameInput::default());
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_neutral_collision_scores() {
        let (mut state, tuning) = fresh();
        let id = circle_on_player(&mut state, CircleKind::Neutral, 1.0);
        state.circles.push(Circle::new(99, CircleKind::Neutral, 700.0, 1.0));
        let events = tick(&mut state, &tuning, &FrameInput::default());
        assert_eq!(state.score, 10);
        assert_eq!(state.circles.neutral.len(), 1);
        assert_eq!(state.circles.neutral[0].id, 99);
        assert!(events.contains(&GameEvent::Collected { kind: CircleKind::Neutral, id }));
    }

    #[test]
    fn test_bonus_collision_adds_time() {
        let (mut state, tuning) = fresh();
        circle_on_player(&mut state, CircleKind::Bonus, 1.0);
        tick(&mut state, &tuning, &FrameInput::default());
        assert_eq!(state.timer, 80);
        assert!(state.circles.bonus.is_empty());
    }

    #[test]
    fn test_power_up_collision_slows_same_frame() {
        let (mut state, tuning) = fresh();
        circle_on_player(&mut state, CircleKind::PowerUp, 0.5);
        state.circles.push(Circle::new(50, CircleKind::Neutral, 700.0, 1.0));
        tick(&mut state, &tuning, &FrameInput::default());
        assert!(state.slow_mode_active());
        assert!(state.circles.power_up.is_empty());
        assert_eq!(state.circle_speed, 0.5);
        // Halved before it moved this frame
        assert_eq!(state.circles.neutral[0].pos.y, WORLD_HEIGHT - 0.5);
    }

    #[test]
    fn test_two_adjacent_collisions_both_count() {
        let (mut state, tuning) = fresh();
        circle_on_player(&mut state, CircleKind::Neutral, 1.0);
        circle_on_player(&mut state, CircleKind::Neutral, 1.0);
        tick(&mut state, &tuning, &FrameInput::default());
        assert_eq!(state.score, 20);
        assert!(state.circles.neutral.is_empty());
    }

    #[test]
    fn test_off_screen_circles_are_culled() {
        let (mut state, tuning) = fresh();
        let mut c = Circle::new(7, CircleKind::Bonus, 600.0, 2.0);
        c.pos.y = -14.0;
        state.circles.push(c);
        let events = tick(&mut state, &tuning, &FrameInput::default());
        assert!(state.circles.bonus.is_empty());
        assert!(events.contains(&GameEvent::Escaped { kind: CircleKind::Bonus, id: 7 }));
        assert_eq!(state.timer, 60);
    }

    #[test]
    fn test_lands_on_platform_from_above() {
        let (mut state, tuning) = fresh();
        let platform = state.platforms[0].rect;
        state.player.pos = Vec2::new(platform.left() + 10.0, platform.top() - 52.0);
        state.player.vel.y = 4.0;
        state.player.jump_count = 2;
        state.player.is_jumping = true;
        let events = tick(&mut state, &tuning, &FrameInput::default());
        assert!(events.contains(&GameEvent::Landed { platform: 0 }));
        assert_eq!(state.player.bottom(), platform.top());
        assert_eq!(state.player.vel.y, 0.0);
        assert_eq!(state.player.jump_count, 0);
        assert!(!state.player.is_jumping);
    }

    #[test]
    fn test_passes_through_platform_from_below() {
        let (mut state, tuning) = fresh();
        let platform = state.platforms[0].rect;
        state.player.pos = Vec2::new(platform.left() + 10.0, platform.bottom() - 5.0);
        state.player.vel.y = -8.0;
        let events = tick(&mut state, &tuning, &FrameInput::default());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Landed { .. })));
        assert!(state.player.vel.y < 0.0);
    }

    #[test]
    fn test_lands_on_edge_cases() {
        let platform = Platform::new(0.0, 100.0, 100.0, 20.0).rect;
        let feet_in_band = Rect::new(10.0, 60.0, 10.0, 50.0);
        assert!(lands_on(&feet_in_band, 1.0, &platform));
        assert!(!lands_on(&feet_in_band, 0.0, &platform));
        let feet_below = Rect::new(10.0, 75.0, 10.0, 50.0);
        assert!(!lands_on(&feet_below, 1.0, &platform));
        let beside = Rect::new(100.0, 60.0, 10.0, 50.0);
        assert!(!lands_on(&beside, 1.0, &platform));
    }

    #[test]
    fn test_third_jump_is_noop() {
        let (mut state, tuning) = fresh();
        let jump = FrameInput { jump: true, ..Default::default() };
        let events = tick(&mut state, &tuning, &jump);
        assert!(events.contains(&GameEvent::Jumped { jump_count: 1 }));
        let events = tick(&mut state, &tuning, &jump);
        assert!(events.contains(&GameEvent::Jumped { jump_count: 2 }));
        let vy = state.player.vel.y;
        let events = tick(&mut state, &tuning, &jump);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Jumped { .. })));
        assert_eq!(state.player.jump_count, 2);
        assert_eq!(state.player.vel.y, vy + tuning.gravity);
    }

    #[test]
    fn test_session_frame_schedules_slow_mode_expiry() {
        let mut session = Session::new(1, Tuning::default());
        circle_on_player(&mut session.state, CircleKind::PowerUp, 0.5);
        assert_eq!(session.frame(&FrameInput::default()), FrameOutcome::Continue);
        assert!(session.state.slow_mode_active());
        assert_eq!(session.pending_timers(), 5);
        // Pause keeps the clock from moving the baseline
        session.frame(&FrameInput { pause: true, ..Default::default() });
        session.advance_time(10_000);
        assert!(!session.state.slow_mode_active());
        assert_eq!(session.state.circle_speed, 1.0);
    }

    #[test]
    fn test_session_frame_frozen_while_paused() {
        let mut session = Session::new(1, Tuning::default());
        session.advance_time(2000);
        for _ in 0..30 {
            session.frame(&FrameInput::default());
        }
        let snapshot = serde_json::to_string(&session.state).unwrap();
        let pause = FrameInput { pause: true, ..Default::default() };
        session.frame(&pause);
        assert_eq!(session.state.phase, GamePhase::Paused);
        for _ in 0..100 {
            let input = FrameInput { left: true, jump: true, ..Default::default() };
            assert_eq!(session.frame(&input), FrameOutcome::Continue);
            session.advance_time(100);
        }
        let mut frozen = session.state.clone();
        frozen.phase = GamePhase::Running;
        assert_eq!(serde_json::to_string(&frozen).unwrap(), snapshot);

        session.frame(&pause);
        assert_eq!(session.state.phase, GamePhase::Running);
        assert_eq!(session.state.timer, 58);
    }

    #[test]
    fn test_session_frame_stops_after_game_over() {
        let mut session = Session::new(1, Tuning::default());
        session.advance_time(60_000);
        let pause = FrameInput { pause: true, ..Default::default() };
        assert_eq!(session.frame(&pause), FrameOutcome::Stop);
        assert_eq!(session.frame(&FrameInput::default()), FrameOutcome::Stop);
        assert!(session.state.is_game_over());
    }

    #[test]
    fn test_autopilot_chases_bonus() {
        let (mut state, _) = fresh();
        state.circles.push(Circle::new(1, CircleKind::Neutral, 120.0, 1.0));
        state.circles.push(Circle::new(2, CircleKind::Bonus, 600.0, 1.0));
        let input = autopilot_input(&state);
        assert!(input.right && !input.left);
        assert!(!input.jump);
    }

    #[test]
    fn test_autopilot_idles_without_targets() {
        let (state, _) = fresh();
        let input = autopilot_input(&state);
        assert!(!input.left && !input.right && !input.jump);
    }

    #[test]
    fn test_determinism() {
        let mut a = Session::new(99_999, Tuning::default());
        let mut b = Session::new(99_999, Tuning::default());
        let input = FrameInput { autopilot: true, ..Default::default() };
        for _ in 0..3000 {
            for s in [&mut a, &mut b] {
                s.advance_time(FRAME_MS);
                s.frame(&input);
            }
        }
        assert_eq!(a.state.score, b.state.score);
        assert_eq!(a.state.frames, b.state.frames);
        assert_eq!(a.state.player.pos, b.state.player.pos);
        assert_eq!(a.state.circles.len(), b.state.circles.len());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn frame_input() -> impl Strategy<Value = FrameInput> {
            (any::<bool>(), any::<bool>(), any::<bool>(), prop::bool::weighted(0.02)).prop_map(
                |(left, right, jump, pause)| FrameInput {
                    left,
                    right,
                    jump,
                    pause,
                    autopilot: false,
                },
            )
        }

        proptest! {
            #[test]
            fn player_stays_in_world(inputs in prop::collection::vec(frame_input(), 1..400)) {
                let (mut state, tuning) = fresh();
                for input in &inputs {
                    tick(&mut state, &tuning, input);
                    let p = &state.player;
                    prop_assert!(p.pos.x >= 0.0);
                    prop_assert!(p.pos.x <= WORLD_WIDTH - PLAYER_WIDTH);
                    prop_assert!(p.bottom() <= WORLD_HEIGHT);
                }
            }

            #[test]
            fn jump_count_never_exceeds_max(
                seed in any::<u64>(),
                inputs in prop::collection::vec(frame_input(), 1..400),
            ) {
                let mut session = Session::new(seed, Tuning::default());
                let max_jumps = session.tuning.max_jumps;
                for input in &inputs {
                    session.advance_time(FRAME_MS);
                    session.frame(input);
                    prop_assert!(session.state.player.jump_count <= max_jumps);
                    prop_assert!(session.state.player.pos.x >= 0.0);
                    prop_assert!(session.state.player.bottom() <= WORLD_HEIGHT);
                }
            }
        }
    }
}
