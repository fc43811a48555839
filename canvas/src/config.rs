//! Engine tunables.
//!
//! Every field has a default from [`crate::consts`], so a host may pass a
//! partial JSON object (or none at all). Values are validated once on load;
//! the rest of the crate assumes a valid config.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BACKGROUND_COLOR, BRUSH_FRICTION, EXPORT_DIMENSION_CEILING, EXPORT_MAX_DIMENSION, EXPORT_MAX_PIXELS, EXPORT_OVERSAMPLE,
    EXPORT_PADDING, EXPORT_PIXEL_CEILING, HISTORY_CAP, LAZY_RADIUS_PX, MAX_ZOOM, MIN_ZOOM, STROKE_COLOR, STROKE_WIDTH,
};

/// Error returned by [`EngineConfig::from_json`] and [`EngineConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not valid JSON for an `EngineConfig`.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A field is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    OutOfRange { field: &'static str, reason: &'static str },
    /// A colour field is not a `#RRGGBB` string.
    #[error("invalid colour for `{field}`: {value}")]
    Color { field: &'static str, value: String },
}

/// Settings for the raster exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Maximum output width or height in pixels.
    pub max_dimension: u32,
    /// Maximum output area in pixels.
    pub max_pixels: u64,
    /// Padding around the drawing, in world units.
    pub padding: f64,
    /// Supersampling factor for small drawings.
    pub oversample: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_dimension: EXPORT_MAX_DIMENSION,
            max_pixels: EXPORT_MAX_PIXELS,
            padding: EXPORT_PADDING,
            oversample: EXPORT_OVERSAMPLE,
        }
    }
}

/// All engine tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lazy-brush dead-zone radius in screen pixels.
    pub lazy_radius: f64,
    /// Brush friction in `[0, 1]`.
    pub friction: f64,
    /// Maximum undo/redo log length.
    pub history_cap: usize,
    /// Lower zoom clamp.
    pub min_zoom: f64,
    /// Upper zoom clamp.
    pub max_zoom: f64,
    /// Stroke line width in world units.
    pub stroke_width: f64,
    /// Stroke colour, `#RRGGBB`.
    pub stroke_color: String,
    /// Export background colour, `#RRGGBB`.
    pub background_color: String,
    /// Exporter settings.
    pub export: ExportConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lazy_radius: LAZY_RADIUS_PX,
            friction: BRUSH_FRICTION,
            history_cap: HISTORY_CAP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            stroke_width: STROKE_WIDTH,
            stroke_color: STROKE_COLOR.to_owned(),
            background_color: BACKGROUND_COLOR.to_owned(),
            export: ExportConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lazy_radius.is_finite() && self.lazy_radius >= 0.0) {
            return Err(out_of_range("lazy_radius", "must be a finite value >= 0"));
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(out_of_range("friction", "must be within [0, 1]"));
        }
        if self.history_cap == 0 {
            return Err(out_of_range("history_cap", "must be at least 1"));
        }
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(out_of_range("min_zoom", "must be a finite value > 0"));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(out_of_range("max_zoom", "must be finite and >= min_zoom"));
        }
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(out_of_range("stroke_width", "must be a finite value > 0"));
        }
        if parse_hex_color(&self.stroke_color).is_none() {
            return Err(ConfigError::Color { field: "stroke_color", value: self.stroke_color.clone() });
        }
        if parse_hex_color(&self.background_color).is_none() {
            return Err(ConfigError::Color { field: "background_color", value: self.background_color.clone() });
        }
        if self.export.max_dimension == 0 {
            return Err(out_of_range("export.max_dimension", "must be at least 1"));
        }
        if self.export.max_dimension > EXPORT_DIMENSION_CEILING {
            return Err(out_of_range("export.max_dimension", "must be at most 16384"));
        }
        if self.export.max_pixels == 0 {
            return Err(out_of_range("export.max_pixels", "must be at least 1"));
        }
        if self.export.max_pixels > EXPORT_PIXEL_CEILING {
            return Err(out_of_range("export.max_pixels", "must be at most 67108864"));
        }
        if !(self.export.padding.is_finite() && self.export.padding >= 0.0) {
            return Err(out_of_range("export.padding", "must be a finite value >= 0"));
        }
        if !(self.export.oversample.is_finite() && self.export.oversample > 0.0) {
            return Err(out_of_range("export.oversample", "must be a finite value > 0"));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::OutOfRange { field, reason }
}

/// Parse a `#RRGGBB` colour into its components.
#[must_use]
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Some([r, g, b]),
        _ => None,
    }
}
