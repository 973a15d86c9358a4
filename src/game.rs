//! Host-facing game loop
//!
//! Owns a [`Session`], turns key events into per-frame input and runs one
//! frame per display refresh: timers, simulation, then drawing.

use crate::renderer::{Canvas, draw_frame};
use crate::sim::{FrameInput, FrameOutcome, Session};
use crate::tuning::Tuning;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
    Pause,
    Autopilot,
    /// Handled by the host: needs a fresh seed and a restarted frame loop
    Restart,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Unknown keys map to None.
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ArrowUp" => Some(Key::Jump),
            "p" | "P" => Some(Key::Pause),
            "i" | "I" => Some(Key::Autopilot),
            "r" | "R" => Some(Key::Restart),
            _ => None,
        }
    }
}

/// Game instance holding the session and pending input
pub struct Game {
    pub session: Session,
    /// Input for the next frame. Edges are cleared after every frame.
    pub input: FrameInput,
    /// False once the loop has stopped itself
    pub running: bool,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            session: Session::new(seed, tuning),
            input: FrameInput::default(),
            running: true,
        }
    }

    /// Key pressed. `repeat` is the OS auto-repeat flag; repeats never jump.
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        if key == Key::Pause {
            if !repeat {
                self.input.pause = true;
            }
            return;
        }
        // Gameplay keys are dead while paused
        if self.session.state.is_paused() {
            return;
        }
        match key {
            Key::Left => self.input.left = true,
            Key::Right => self.input.right = true,
            Key::Jump if !repeat => self.input.jump = true,
            Key::Autopilot if !repeat => {
                self.input.autopilot = !self.input.autopilot;
                log::info!("Autopilot: {}", self.input.autopilot);
            }
            _ => {}
        }
    }

    /// Key released. Releases always register so nothing sticks after a pause.
    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            _ => {}
        }
    }

    /// Run one display frame: fire due timers, simulate, draw.
    pub fn step<C: Canvas + ?Sized>(&mut self, elapsed_ms: u64, canvas: &mut C) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Stop;
        }

        self.session.advance_time(elapsed_ms);
        let outcome = self.session.frame(&self.input);
        draw_frame(&self.session.state, canvas);

        // Clear one-shot inputs after processing
        self.input.jump = false;
        self.input.pause = false;

        if outcome == FrameOutcome::Stop {
            self.running = false;
            log::info!("Game over - final score {}", self.session.state.score);
        }
        outcome
    }

    /// Fresh session, same tuning
    pub fn restart(&mut self, seed: u64) {
        self.session.restart(seed);
        self.input = FrameInput::default();
        self.running = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::renderer::DrawList;

    fn game() -> Game {
        Game::new(5, Tuning::default())
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom("ArrowUp"), Some(Key::Jump));
        assert_eq!(Key::from_dom("P"), Some(Key::Pause));
        assert_eq!(Key::from_dom("r"), Some(Key::Restart));
        assert_eq!(Key::from_dom("q"), None);
        assert_eq!(Key::from_dom("ArrowDown"), None);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut g = game();
        let mut list = DrawList::new();
        g.key_down(Key::Jump, false);
        g.step(FRAME_MS, &mut list);
        assert_eq!(g.session.state.player.jump_count, 1);
        // Held key auto-repeats: no second jump
        g.key_down(Key::Jump, true);
        g.step(FRAME_MS, &mut list);
        assert_eq!(g.session.state.player.jump_count, 1);
        assert!(!g.input.jump);
    }

    #[test]
    fn test_gameplay_keys_ignored_while_paused() {
        let mut g = game();
        let mut list = DrawList::new();
        g.key_down(Key::Pause, false);
        g.step(FRAME_MS, &mut list);
        assert!(g.session.state.is_paused());
        assert!(list.has_text("Paused"));

        g.key_down(Key::Left, false);
        g.key_down(Key::Jump, false);
        assert!(!g.input.left && !g.input.jump);

        g.key_down(Key::Pause, false);
        g.step(FRAME_MS, &mut list);
        assert!(!g.session.state.is_paused());
        assert!(!list.has_text("Paused"));
    }

    #[test]
    fn test_release_during_pause_is_kept() {
        let mut g = game();
        let mut list = DrawList::new();
        g.key_down(Key::Right, false);
        g.key_down(Key::Pause, false);
        g.step(FRAME_MS, &mut list);
        g.key_up(Key::Right);
        assert!(!g.input.right);
    }

    #[test]
    fn test_loop_stops_at_game_over() {
        let mut g = game();
        let mut list = DrawList::new();
        let mut frames = 0;
        while g.step(FRAME_MS, &mut list) == FrameOutcome::Continue {
            frames += 1;
            assert!(frames < 100_000, "loop never stopped");
        }
        assert!(!g.running);
        assert!(list.has_text("Game Over"));
        assert_eq!(g.step(FRAME_MS, &mut list), FrameOutcome::Stop);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut g = game();
        let mut list = DrawList::new();
        g.step(61_000, &mut list);
        assert!(!g.running);
        g.restart(6);
        assert!(g.running);
        assert_eq!(g.step(FRAME_MS, &mut list), FrameOutcome::Continue);
        assert!(list.has_text("Time: 60"));
    }
}
