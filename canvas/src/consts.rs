//! Shared numeric constants for the canvas crate.
//!
//! These are the defaults behind [`crate::config::EngineConfig`]; the engine
//! itself always reads the configured values.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest zoom factor the pinch gesture may reach.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the pinch gesture may reach.
pub const MAX_ZOOM: f64 = 10.0;

// ── Brush ───────────────────────────────────────────────────────

/// Radius of the lazy-brush dead zone, in screen pixels.
pub const LAZY_RADIUS_PX: f64 = 15.0;

/// Default brush friction (0 = brush catches up fully on every move).
pub const BRUSH_FRICTION: f64 = 0.0;

// ── Strokes ─────────────────────────────────────────────────────

/// Line width in world units. Not compensated for zoom.
pub const STROKE_WIDTH: f64 = 3.0;

/// Stroke colour as a `#RRGGBB` string.
pub const STROKE_COLOR: &str = "#1F1A17";

/// Background fill used by the exporter.
pub const BACKGROUND_COLOR: &str = "#FFFFFF";

/// A stroke needs at least this many points to be committed.
pub const MIN_STROKE_POINTS: usize = 2;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of entries kept in the undo/redo log.
pub const HISTORY_CAP: usize = 50;

// ── Export ──────────────────────────────────────────────────────

/// Maximum exported bitmap width or height, in pixels.
pub const EXPORT_MAX_DIMENSION: u32 = 2048;

/// Maximum exported bitmap area, in pixels.
pub const EXPORT_MAX_PIXELS: u64 = 2048 * 2048;

/// Largest `max_dimension` a config may ask for.
pub const EXPORT_DIMENSION_CEILING: u32 = 16_384;

/// Largest `max_pixels` a config may ask for (256 MiB of RGBA).
pub const EXPORT_PIXEL_CEILING: u64 = 64 * 1024 * 1024;

/// Padding added around the drawing's bounding box, in world units.
pub const EXPORT_PADDING: f64 = 20.0;

/// Supersampling factor used when the drawing is small enough to afford it.
pub const EXPORT_OVERSAMPLE: f64 = 2.0;
