//! Rendering: draws strokes to a 2D context.
//!
//! The stroke path algorithm lives in [`trace_stroke`] and is written against
//! the [`PathSink`] trait so the live canvas and the raster exporter produce
//! identical curves. [`draw`] is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]; it reads a settled [`Scene`] and
//! produces pixels without mutating any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::frame`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::doc::Stroke;
use crate::geometry::{Point, midpoint};

/// Receiver for path construction calls.
pub trait PathSink {
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn quad_to(&mut self, ctrl: Point, end: Point);
}

/// Emit the smoothed path for one stroke.
///
/// Two points draw a straight segment. With three or more, each interior
/// point becomes the control of a quadratic curve ending halfway to the next
/// point, and a final segment reaches the true last point. Fewer than two
/// points emit nothing.
pub fn trace_stroke<S: PathSink + ?Sized>(points: &[Point], sink: &mut S) {
    let [first, .., last] = points else {
        return;
    };
    sink.move_to(*first);

    if points.len() == 2 {
        sink.line_to(*last);
        return;
    }

    for pair in points[1..].windows(2) {
        let (ctrl, next) = (pair[0], pair[1]);
        sink.quad_to(ctrl, midpoint(ctrl, next));
    }
    sink.line_to(*last);
}

/// Fixed stroke appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// CSS colour string.
    pub color: String,
    /// Line width in world units.
    pub width: f64,
}

impl StrokeStyle {
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self { color: config.stroke_color.clone(), width: config.stroke_width }
    }
}

/// Everything one frame needs, borrowed from the engine after the command
/// queue has been drained.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Committed strokes, bottom first.
    pub strokes: &'a [Stroke],
    /// The in-progress stroke, if any.
    pub live: Option<&'a Stroke>,
    pub camera: Camera,
    pub style: &'a StrokeStyle,
    /// Viewport size in CSS pixels.
    pub viewport_w: f64,
    pub viewport_h: f64,
    /// Device pixel ratio.
    pub dpr: f64,
}

impl<'a> Scene<'a> {
    /// Strokes to paint in order: committed first, then the live stroke if
    /// it has at least two points.
    pub fn paintable(self) -> impl Iterator<Item = &'a Stroke> {
        let live = self.live.filter(|s| s.is_committable());
        self.strokes.iter().chain(live)
    }
}

/// Path sink over a browser 2D context.
struct CanvasPath<'a>(&'a CanvasRenderingContext2d);

impl PathSink for CanvasPath<'_> {
    fn move_to(&mut self, p: Point) {
        self.0.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.0.line_to(p.x, p.y);
    }

    fn quad_to(&mut self, ctrl: Point, end: Point) {
        self.0.quadratic_curve_to(ctrl.x, ctrl.y, end.x, end.y);
    }
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) -> Result<(), JsValue> {
    // Layer 1: clear in device pixels.
    ctx.set_transform(scene.dpr, 0.0, 0.0, scene.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, scene.viewport_w, scene.viewport_h);

    // Layer 2: strokes through the camera.
    ctx.save();
    ctx.translate(scene.camera.pan_x, scene.camera.pan_y)?;
    ctx.scale(scene.camera.zoom, scene.camera.zoom)?;

    ctx.set_stroke_style_str(&scene.style.color);
    ctx.set_line_width(scene.style.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");

    let mut sink = CanvasPath(ctx);
    for stroke in scene.paintable() {
        ctx.begin_path();
        trace_stroke(&stroke.points, &mut sink);
        ctx.stroke();
    }

    ctx.restore();
    Ok(())
}
