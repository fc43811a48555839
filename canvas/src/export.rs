//! Raster export.
//!
//! DESIGN
//! ======
//! The drawing's world-space bounding box plus padding gives the natural
//! size `W × H`. One scale factor maps world units to output pixels:
//!
//! ```text
//! scale = min(oversample, max_dim / W, max_dim / H, sqrt(max_pixels / (W * H)))
//! ```
//!
//! Small drawings are supersampled by `oversample`; as a drawing grows the
//! factor shrinks towards 1 and then below it, so the bitmap never exceeds the
//! dimension or area budget. Geometry and line width scale together.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is returned as an [`ExportError`]; nothing here touches the
//! document, so a failed export leaves drawing state intact.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use log::info;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::config::{EngineConfig, ExportConfig, parse_hex_color};
use crate::doc::Stroke;
use crate::geometry::{Bounds, Point, bounding_box};
use crate::render::{PathSink, trace_stroke};

/// Error returned by [`plan`], [`rasterize`] and [`export_png`].
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// There is nothing to draw.
    #[error("nothing to export: the drawing is empty")]
    EmptyDocument,
    /// The bitmap could not be allocated.
    #[error("could not allocate a {width}x{height} bitmap")]
    Allocation { width: u32, height: u32 },
    /// A configured colour is not `#RRGGBB`.
    #[error("invalid colour: {0}")]
    InvalidColor(String),
    /// PNG encoding failed.
    #[error("image encoding failed: {0}")]
    Encode(String),
    /// PNG encoding produced no bytes.
    #[error("image encoding produced no data")]
    EmptyEncoding,
}

/// Output geometry for an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPlan {
    /// World-space bounding box of the drawing, without padding.
    pub bounds: Bounds,
    /// World-space top-left of the output, padding included.
    pub origin: Point,
    /// World units → output pixels.
    pub scale: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl ExportPlan {
    /// Map a world-space point into output pixels.
    #[must_use]
    pub fn to_pixels(&self, p: Point) -> Point {
        Point::new((p.x - self.origin.x) * self.scale, (p.y - self.origin.y) * self.scale)
    }
}

/// An encoded export, ready for the sharing collaborator.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Suggested filename.
    pub filename: String,
}

/// Compute the output size and scale for `strokes`.
///
/// # Errors
///
/// Returns [`ExportError::EmptyDocument`] if there are no points.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn plan(strokes: &[Stroke], config: &ExportConfig) -> Result<ExportPlan, ExportError> {
    let bounds = bounding_box(strokes);
    if bounds.is_empty() {
        return Err(ExportError::EmptyDocument);
    }

    let natural_w = (bounds.width() + 2.0 * config.padding).max(1.0);
    let natural_h = (bounds.height() + 2.0 * config.padding).max(1.0);
    let max_dim = f64::from(config.max_dimension);
    let area_fit = (config.max_pixels as f64 / (natural_w * natural_h)).sqrt();

    let scale = config
        .oversample
        .min(max_dim / natural_w)
        .min(max_dim / natural_h)
        .min(area_fit);

    let to_px = |natural: f64| ((natural * scale).ceil() as u32).clamp(1, config.max_dimension);
    let mut width = to_px(natural_w);
    let mut height = to_px(natural_h);

    // Rounding up can overshoot the area budget by a row or column.
    while u64::from(width) * u64::from(height) > config.max_pixels && width > 1 && height > 1 {
        if width >= height {
            width -= 1;
        } else {
            height -= 1;
        }
    }

    Ok(ExportPlan {
        bounds,
        origin: Point::new(bounds.min_x - config.padding, bounds.min_y - config.padding),
        scale,
        width,
        height,
    })
}

/// Path sink that places world-space points into output pixels.
struct PixmapPath<'a> {
    builder: PathBuilder,
    plan: &'a ExportPlan,
}

#[allow(clippy::cast_possible_truncation)]
fn px(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

impl PathSink for PixmapPath<'_> {
    fn move_to(&mut self, p: Point) {
        let (x, y) = px(self.plan.to_pixels(p));
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, p: Point) {
        let (x, y) = px(self.plan.to_pixels(p));
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, ctrl: Point, end: Point) {
        let (cx, cy) = px(self.plan.to_pixels(ctrl));
        let (x, y) = px(self.plan.to_pixels(end));
        self.builder.quad_to(cx, cy, x, y);
    }
}

fn color(value: &str) -> Result<Color, ExportError> {
    let [r, g, b] = parse_hex_color(value).ok_or_else(|| ExportError::InvalidColor(value.to_owned()))?;
    Ok(Color::from_rgba8(r, g, b, 255))
}

/// Rasterize `strokes` onto a background-filled bitmap.
///
/// # Errors
///
/// Returns [`ExportError`] if the drawing is empty, a colour is invalid, or
/// the bitmap cannot be allocated.
#[allow(clippy::cast_possible_truncation)]
pub fn rasterize(strokes: &[Stroke], config: &EngineConfig) -> Result<(Pixmap, ExportPlan), ExportError> {
    let plan = plan(strokes, &config.export)?;
    let background = color(&config.background_color)?;
    let ink = color(&config.stroke_color)?;

    let mut pixmap = Pixmap::new(plan.width, plan.height).ok_or(ExportError::Allocation {
        width: plan.width,
        height: plan.height,
    })?;
    pixmap.fill(background);

    let mut paint = Paint::default();
    paint.set_color(ink);
    paint.anti_alias = true;

    let stroke = tiny_skia::Stroke {
        width: (config.stroke_width * plan.scale) as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };

    for s in strokes.iter().filter(|s| s.is_committable()) {
        let mut sink = PixmapPath { builder: PathBuilder::new(), plan: &plan };
        trace_stroke(&s.points, &mut sink);
        if let Some(path) = sink.builder.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    Ok((pixmap, plan))
}

/// Rasterize and encode `strokes` as PNG.
///
/// `now_ms` stamps the suggested filename.
///
/// # Errors
///
/// Returns [`ExportError`] on any rasterization or encoding failure.
pub fn export_png(strokes: &[Stroke], config: &EngineConfig, now_ms: f64) -> Result<ExportedImage, ExportError> {
    let (pixmap, plan) = rasterize(strokes, config)?;
    let png = pixmap.encode_png().map_err(|e| ExportError::Encode(e.to_string()))?;
    if png.is_empty() {
        return Err(ExportError::EmptyEncoding);
    }

    info!(
        "exported {} strokes as {}x{} PNG ({} bytes, scale {:.3})",
        strokes.len(),
        plan.width,
        plan.height,
        png.len(),
        plan.scale
    );

    Ok(ExportedImage { width: plan.width, height: plan.height, png, filename: filename(now_ms) })
}

/// Suggested filename for an export taken at `now_ms`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn filename(now_ms: f64) -> String {
    format!("inkpad-{}.png", now_ms.max(0.0) as u64)
}
