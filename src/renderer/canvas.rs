//! Draw primitives
//!
//! The simulation never draws. `draw_frame` turns a `GameState` into calls on
//! a [`Canvas`]; hosts decide what those calls mean (GPU triangles, DOM text,
//! or just a recorded list in tests).

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{CircleKind, GameState, Rect};

/// RGBA, 0-1
pub type Color = [f32; 4];

/// Something that can receive draw calls
pub trait Canvas {
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Rect {
        rect: Rect,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
}

/// Canvas that records every call since the last clear
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every text command, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| *t == needle)
    }

    /// Tessellate the shape commands into triangles. Text is skipped.
    pub fn to_vertices(&self) -> Vec<Vertex> {
        let mut vertices = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Rect { rect, color } => {
                    vertices.extend(shapes::rect(rect, *color));
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => {
                    let segments = shapes::circle_segments(*radius);
                    vertices.extend(shapes::circle(*center, *radius, *color, segments));
                }
                DrawCommand::Clear | DrawCommand::Text { .. } => {}
            }
        }
        vertices
    }
}

impl Canvas for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }
}

pub const HUD_FONT_SIZE: f32 = 24.0;
pub const BANNER_FONT_SIZE: f32 = 48.0;

pub fn circle_color(kind: CircleKind) -> Color {
    match kind {
        CircleKind::Neutral => colors::NEUTRAL,
        CircleKind::Bonus => colors::BONUS,
        CircleKind::PowerUp => colors::POWER_UP,
    }
}

/// Draw one frame of the game
pub fn draw_frame<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    canvas.clear();

    let center = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);

    if state.is_game_over() {
        canvas.fill_text(
            "Game Over",
            center + Vec2::new(-150.0, 0.0),
            BANNER_FONT_SIZE,
            colors::TEXT,
        );
        canvas.fill_text(
            &format!("Final Score: {}", state.score),
            center + Vec2::new(-120.0, 50.0),
            BANNER_FONT_SIZE,
            colors::TEXT,
        );
        return;
    }

    for platform in &state.platforms {
        canvas.fill_rect(platform.rect, colors::PLATFORM);
    }
    for circle in state.circles.iter() {
        canvas.fill_circle(circle.pos, circle.radius, circle_color(circle.kind));
    }
    canvas.fill_rect(state.player.rect(), colors::PLAYER);

    canvas.fill_text(
        &format!("Time: {}", state.timer),
        Vec2::new(10.0, 30.0),
        HUD_FONT_SIZE,
        colors::TEXT,
    );
    canvas.fill_text(
        &format!("Score: {}", state.score),
        Vec2::new(10.0, 60.0),
        HUD_FONT_SIZE,
        colors::TEXT,
    );

    if state.is_paused() {
        canvas.fill_text(
            "Paused",
            center + Vec2::new(-100.0, 0.0),
            BANNER_FONT_SIZE,
            colors::TEXT,
        );
    }
}
