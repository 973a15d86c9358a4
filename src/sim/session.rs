//! One play session: state, timers and RNG in a single context object
//!
//! The frame loop and every timer callback mutate the same `Session`. All of
//! it runs on one thread; hosts that want threads must wrap the whole session
//! in a single lock rather than locking pieces.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::{self, ClockOutcome};
use super::effects;
use super::scheduler::{Scheduler, TimerId};
use super::spawner;
use super::state::{CircleKind, GamePhase, GameState};
use crate::tuning::Tuning;

/// Things the scheduler can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ClockTick,
    Spawn(CircleKind),
    SlowModeExpired,
}

/// Handles for the four pause-controlled timers
#[derive(Debug, Clone, Default)]
pub struct TimerHandles {
    pub clock: Option<TimerId>,
    pub neutral: Option<TimerId>,
    pub bonus: Option<TimerId>,
    pub power_up: Option<TimerId>,
}

impl TimerHandles {
    fn spawner_mut(&mut self, kind: CircleKind) -> &mut Option<TimerId> {
        match kind {
            CircleKind::Neutral => &mut self.neutral,
            CircleKind::Bonus => &mut self.bonus,
            CircleKind::PowerUp => &mut self.power_up,
        }
    }

    pub fn spawner(&self, kind: CircleKind) -> Option<TimerId> {
        match kind {
            CircleKind::Neutral => self.neutral,
            CircleKind::Bonus => self.bonus,
            CircleKind::PowerUp => self.power_up,
        }
    }

    /// Take every handle, leaving all slots empty
    fn take_all(&mut self) -> [Option<TimerId>; 4] {
        [
            self.clock.take(),
            self.neutral.take(),
            self.bonus.take(),
            self.power_up.take(),
        ]
    }
}

/// A running game
#[derive(Debug, Clone)]
pub struct Session {
    pub state: GameState,
    pub tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    scheduler: Scheduler<TimerEvent>,
    timers: TimerHandles,
}

impl Session {
    /// Build the initial world and start the clock and all spawners
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        for warning in tuning.validate() {
            log::warn!("tuning: {warning}");
        }
        let mut session = Self {
            state: GameState::new(&tuning),
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            timers: TimerHandles::default(),
        };
        session.start_clock();
        session.start_spawners();
        session.ensure_power_up_spawner();
        log::info!("Session started with seed {seed}");
        session
    }

    /// Throw everything away and start over in place
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.tuning.clone();
        *self = Self::new(seed, tuning);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Virtual milliseconds since the session started
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn timers(&self) -> &TimerHandles {
        &self.timers
    }

    /// Timers still pending, including slow-mode restorations
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.scheduler.is_active(id)
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Let `elapsed_ms` of wall-clock time pass, firing every timer due
    pub fn advance_time(&mut self, elapsed_ms: u64) {
        self.scheduler.advance_by(elapsed_ms);
        while let Some((id, event)) = self.scheduler.pop_due() {
            self.dispatch(id, event);
        }
    }

    fn dispatch(&mut self, id: TimerId, event: TimerEvent) {
        match event {
            TimerEvent::ClockTick => {
                if clock::tick(&mut self.state, &self.tuning) == ClockOutcome::Expired {
                    self.stop_all_timers();
                }
            }
            TimerEvent::Spawn(kind) => {
                if self.state.phase == GamePhase::Running {
                    spawner::spawn_circle(&mut self.state, &mut self.rng, &self.tuning, kind);
                }
                if kind == CircleKind::Neutral && self.timers.neutral == Some(id) {
                    let delay = spawner::neutral_delay_ms(&self.state, &self.tuning);
                    self.timers.neutral =
                        Some(self.scheduler.set_timeout(delay, TimerEvent::Spawn(kind)));
                }
            }
            TimerEvent::SlowModeExpired => effects::restore_speed(&mut self.state),
        }
    }

    /// (Re)start the one-second countdown. Never stacks: any running clock
    /// is cleared first.
    fn start_clock(&mut self) {
        if let Some(id) = self.timers.clock.take() {
            self.scheduler.clear(id);
        }
        if self.state.is_game_over() {
            return;
        }
        self.timers.clock = Some(
            self.scheduler
                .set_interval(self.tuning.clock_period_ms, TimerEvent::ClockTick),
        );
    }

    /// Start the Neutral and Bonus spawners if they are not running
    fn start_spawners(&mut self) {
        if self.timers.neutral.is_none() {
            let delay = spawner::neutral_delay_ms(&self.state, &self.tuning);
            self.timers.neutral = Some(
                self.scheduler
                    .set_timeout(delay, TimerEvent::Spawn(CircleKind::Neutral)),
            );
        }
        self.start_interval_spawner(CircleKind::Bonus);
    }

    /// Start the PowerUp spawner unless it is already running
    fn ensure_power_up_spawner(&mut self) {
        self.start_interval_spawner(CircleKind::PowerUp);
    }

    fn start_interval_spawner(&mut self, kind: CircleKind) {
        let Some(period) = spawner::fixed_interval_ms(&self.tuning, kind) else {
            return;
        };
        let slot = self.timers.spawner_mut(kind);
        if slot.is_none() {
            *slot = Some(self.scheduler.set_interval(period, TimerEvent::Spawn(kind)));
        }
    }

    /// Game over: nothing may fire again, slow-mode restorations included
    fn stop_all_timers(&mut self) {
        self.timers.take_all();
        self.scheduler.clear_all();
    }

    /// Schedule the end of one slow-mode activation
    pub(crate) fn schedule_slow_mode_expiry(&mut self) {
        self.scheduler
            .set_timeout(self.tuning.slow_mode_duration_ms, TimerEvent::SlowModeExpired);
    }

    // ------------------------------------------------------------------
    // Pause controller
    // ------------------------------------------------------------------

    /// Flip between Running and Paused. Does nothing once the game is over.
    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    /// Freeze physics, spawns and the clock. Pending handles are cancelled
    /// and cleared so a resume starts fresh timers.
    fn pause(&mut self) {
        self.state.phase = GamePhase::Paused;
        for id in self.timers.take_all().into_iter().flatten() {
            self.scheduler.clear(id);
        }
        log::info!("Game paused");
    }

    /// Restart the clock and spawners with full intervals
    fn resume(&mut self) {
        self.state.phase = GamePhase::Running;
        self.start_clock();
        self.start_spawners();
        self.ensure_power_up_spawner();
        log::info!("Game resumed");
    }
}
