//! Axis-aligned overlap tests
//!
//! World space is screen space: origin top-left, y grows downward.
//! Touching edges never count as overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict AABB overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Overlap against a circle's bounding square.
    ///
    /// Not a true distance test: corners of the square count as hits. This is
    /// the hit box players are used to, keep it.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.left() < center.x + radius
            && self.right() > center.x - radius
            && self.top() < center.y + radius
            && self.bottom() > center.y - radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(-10.0, -10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_circle_uses_bounding_square() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // ~19.8 from the corner at (10, 10): a true circle misses, the square hits
        assert!(r.overlaps_circle(Vec2::new(24.0, 24.0), 15.0));
        assert!(!r.overlaps_circle(Vec2::new(25.0, 5.0), 15.0));
        assert!(r.overlaps_circle(Vec2::new(5.0, 5.0), 15.0));
    }

    #[test]
    fn test_circle_touching_is_a_miss() {
        let r = Rect::new(100.0, 100.0, 40.0, 50.0);
        assert!(!r.overlaps_circle(Vec2::new(155.0, 120.0), 15.0));
        assert!(r.overlaps_circle(Vec2::new(154.9, 120.0), 15.0));
        assert!(!r.overlaps_circle(Vec2::new(120.0, 85.0), 15.0));
    }
}
