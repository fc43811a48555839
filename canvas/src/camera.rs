//! Pan/zoom camera and screen ↔ world conversions.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Convert a screen-space point to world space for a given zoom and pan.
#[must_use]
pub fn screen_to_world(screen: Point, zoom: f64, pan: Point) -> Point {
    Point {
        x: (screen.x - pan.x) / zoom,
        y: (screen.y - pan.y) / zoom,
    }
}

/// Convert a world-space point to screen space for a given zoom and pan.
#[must_use]
pub fn world_to_screen(world: Point, zoom: f64, pan: Point) -> Point {
    Point {
        x: world.x * zoom + pan.x,
        y: world.y * zoom + pan.y,
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Pan offset as a point.
    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        screen_to_world(screen, self.zoom, self.pan())
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        world_to_screen(world, self.zoom, self.pan())
    }

    /// Apply one step of a pinch gesture.
    ///
    /// `factor` is the requested zoom multiplier; the resulting zoom is
    /// clamped to `[min_zoom, max_zoom]`. The world point under `anchor`
    /// (the pinch midpoint before this step) ends up under
    /// `anchor + pan_delta`. Returns `true` if the camera changed.
    pub fn apply_pinch(&mut self, anchor: Point, factor: f64, pan_delta: Point, min_zoom: f64, max_zoom: f64) -> bool {
        let before = *self;
        let new_zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
        let actual = new_zoom / self.zoom;

        let offset_x = (anchor.x - self.pan_x) * (actual - 1.0);
        let offset_y = (anchor.y - self.pan_y) * (actual - 1.0);

        self.zoom = new_zoom;
        self.pan_x = self.pan_x - offset_x + pan_delta.x;
        self.pan_y = self.pan_y - offset_y + pan_delta.y;

        *self != before
    }
}
