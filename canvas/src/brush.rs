//! Lazy-brush smoothing.
//!
//! The brush trails the raw pointer and only moves once the pointer leaves a
//! dead zone of fixed radius around it. Each update is O(1) with no lookahead,
//! so it runs per input sample at display rate.

#[cfg(test)]
#[path = "brush_test.rs"]
mod brush_test;

use crate::geometry::{Point, angle, distance};

/// Trailing-position filter. All positions are in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LazyBrush {
    pointer: Point,
    brush: Point,
    radius: f64,
}

impl LazyBrush {
    /// A brush at `origin` with the given dead-zone radius.
    #[must_use]
    pub fn new(origin: Point, radius: f64) -> Self {
        Self { pointer: origin, brush: origin, radius }
    }

    /// Force both pointer and brush to `p`, bypassing the radius check.
    pub fn seed(&mut self, p: Point) {
        self.pointer = p;
        self.brush = p;
    }

    /// Feed a raw pointer position. Returns `true` if the brush moved.
    ///
    /// `friction` in `[0, 1]` scales how far the brush catches up; 0 moves
    /// it all the way to the edge of the dead zone.
    pub fn update(&mut self, raw: Point, friction: f64) -> bool {
        self.pointer = raw;

        let dist = distance(self.brush, raw);
        if dist <= self.radius {
            return false;
        }

        let heading = angle(self.brush, raw);
        let step = (dist - self.radius) * (1.0 - friction);
        self.brush = Point::new(self.brush.x + heading.cos() * step, self.brush.y + heading.sin() * step);
        true
    }

    /// Latest raw pointer position.
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Smoothed brush position.
    #[must_use]
    pub fn brush(&self) -> Point {
        self.brush
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}
