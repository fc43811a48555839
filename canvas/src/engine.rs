use std::collections::VecDeque;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::doc::{DocStore, HistoryStatus, Stroke, StrokeId};
use crate::export::{self, ExportError, ExportedImage};
use crate::gesture::{GestureEffect, GestureRouter};
use crate::input::{GestureMode, PointerEvent};
use crate::render::{self, Scene, StrokeStyle};
use crate::share::{ShareOutcome, ShareTarget};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Everything the host can ask the engine to do. Input handlers enqueue
/// commands; the queue is drained once per frame, so a recorded list of
/// commands replays to the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// A normalized contact event.
    Pointer(PointerEvent),
    Undo,
    Redo,
    /// Undoable clear of every stroke.
    Clear,
    /// Return the camera to identity zoom and zero pan.
    ResetView,
    /// The drawing surface changed size. `width`/`height` in CSS pixels.
    Resize { width: f64, height: f64, dpr: f64 },
}

/// Notifications returned from command handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StrokeCommitted(StrokeId),
    /// A contact ended without enough movement to form a stroke.
    StrokeDiscarded,
    CameraChanged(Camera),
    /// Undo/redo/clear/share availability changed.
    HistoryChanged(HistoryStatus),
    RenderNeeded,
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub gestures: GestureRouter,
    pub config: EngineConfig,
    pub style: StrokeStyle,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    queue: VecDeque<Command>,
    dirty: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from an already-validated config.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            doc: DocStore::new(config.history_cap),
            camera: Camera::default(),
            gestures: GestureRouter::new(config.lazy_radius, config.friction),
            style: StrokeStyle::from_config(&config),
            config,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            queue: VecDeque::new(),
            dirty: true,
        }
    }

    // --- Command queue ---

    /// Queue a command for the next frame.
    pub fn enqueue(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Number of commands waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply every queued command in order.
    pub fn drain(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Some(command) = self.queue.pop_front() {
            actions.extend(self.apply(command));
        }
        actions
    }

    /// Apply one command immediately.
    pub fn apply(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::Pointer(event) => self.on_pointer(&event),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Clear => self.clear(),
            Command::ResetView => self.reset_view(),
            Command::Resize { width, height, dpr } => self.set_viewport(width, height, dpr),
        }
    }

    // --- Input ---

    /// Route a contact event through the gesture router and apply its effects.
    pub fn on_pointer(&mut self, event: &PointerEvent) -> Vec<Action> {
        let effects = self.gestures.handle(event, &self.camera);
        let mut actions = Vec::new();
        let mut redraw = false;

        for effect in effects {
            match effect {
                GestureEffect::StrokeFinished(stroke) => {
                    actions.push(self.commit(stroke));
                    redraw = true;
                }
                GestureEffect::Pinch { anchor, factor, pan_delta } => {
                    let (min, max) = (self.config.min_zoom, self.config.max_zoom);
                    if self.camera.apply_pinch(anchor, factor, pan_delta, min, max) {
                        actions.push(Action::CameraChanged(self.camera));
                        redraw = true;
                    }
                }
                GestureEffect::Redraw => redraw = true,
            }
        }

        if redraw {
            self.dirty = true;
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn commit(&mut self, stroke: Stroke) -> Action {
        let id = stroke.id;
        let points = stroke.points.len();
        if self.doc.commit_stroke(stroke) {
            debug!("committed stroke {id} ({points} points)");
            Action::StrokeCommitted(id)
        } else {
            debug!("discarded stroke {id} ({points} points)");
            Action::StrokeDiscarded
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        if !self.doc.undo() {
            return Vec::new();
        }
        info!("undo: {} strokes", self.doc.len());
        self.history_changed()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        if !self.doc.redo() {
            return Vec::new();
        }
        info!("redo: {} strokes", self.doc.len());
        self.history_changed()
    }

    pub fn clear(&mut self) -> Vec<Action> {
        if !self.doc.clear() {
            return Vec::new();
        }
        info!("cleared drawing");
        self.history_changed()
    }

    fn history_changed(&mut self) -> Vec<Action> {
        self.dirty = true;
        vec![Action::HistoryChanged(self.doc.status()), Action::RenderNeeded]
    }

    // --- View ---

    /// Return the camera to identity.
    pub fn reset_view(&mut self) -> Vec<Action> {
        if self.camera == Camera::default() {
            return Vec::new();
        }
        self.camera = Camera::default();
        self.dirty = true;
        vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.dirty = true;
        vec![Action::RenderNeeded]
    }

    /// Canvas backing-store size for the current viewport, in device pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.viewport_width * self.dpr).round() as u32,
            (self.viewport_height * self.dpr).round() as u32,
        )
    }

    // --- Frame ---

    /// Whether the visible frame is stale.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force a redraw on the next frame.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// The settled state the renderer reads.
    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            strokes: self.doc.strokes(),
            live: self.gestures.live_stroke(),
            camera: self.camera,
            style: &self.style,
            viewport_w: self.viewport_width,
            viewport_h: self.viewport_height,
            dpr: self.dpr,
        }
    }

    // --- Export / share ---

    /// Rasterize the committed strokes as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the drawing is empty or rasterization fails.
    pub fn export(&self, now_ms: f64) -> Result<ExportedImage, ExportError> {
        export::export_png(self.doc.strokes(), &self.config, now_ms)
    }

    /// Export and hand the image to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the export fails; the target is not called.
    pub fn share(&self, target: &mut dyn ShareTarget, now_ms: f64) -> Result<ShareOutcome, ExportError> {
        let image = self.export(now_ms)?;
        let outcome = target.share(&image);
        outcome.log(&image.filename);
        Ok(outcome)
    }

    // --- Queries ---

    /// Undo/redo/clear/share availability.
    #[must_use]
    pub fn status(&self) -> HistoryStatus {
        self.doc.status()
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.gestures.mode()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Committed strokes in draw order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        self.doc.strokes()
    }
}

/// What one frame tick did.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Actions produced while draining the command queue.
    pub actions: Vec<Action>,
    /// Whether anything was painted.
    pub drawn: bool,
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, core: EngineCore::with_config(config) })
    }

    /// Queue a command for the next frame.
    pub fn submit(&mut self, command: Command) {
        self.core.enqueue(command);
    }

    /// Size the backing store to CSS size × device pixel ratio.
    pub fn resize(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.sync_backing_store();
    }

    /// One display frame: drain queued commands, then draw if dirty.
    /// A drained [`Command::Resize`] resizes the backing store before drawing.
    ///
    /// # Errors
    ///
    /// Returns `Err` if drawing fails; the frame stays dirty.
    pub fn frame(&mut self) -> Result<FrameReport, JsValue> {
        let actions = self.core.drain();
        self.sync_backing_store();
        if !self.core.take_dirty() {
            return Ok(FrameReport { actions, drawn: false });
        }
        if let Err(e) = render::draw(&self.ctx, &self.core.scene()) {
            self.core.mark_dirty();
            return Err(e);
        }
        Ok(FrameReport { actions, drawn: true })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Setting a canvas dimension clears it, so only touch it on change.
    fn sync_backing_store(&mut self) {
        let (width, height) = self.core.backing_size();
        if self.canvas.width() != width || self.canvas.height() != height {
            debug!("canvas backing store {width}x{height}");
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }
}
