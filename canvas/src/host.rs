//! Browser adapter.
//!
//! `DrawingSurface` is the `wasm-bindgen` face of the engine. The page's
//! script forwards DOM events and button clicks to it; it normalizes every
//! input source into [`PointerEvent`]s, queues them as [`Command`]s, and runs
//! the `requestAnimationFrame` loop that drains the queue and redraws.
//!
//! The page can register a change callback; it fires after any frame whose
//! commands changed undo/redo/clear/share availability, so buttons can be
//! enabled or disabled without polling. Share state changes made by
//! [`DrawingSurface::export_png`] and [`DrawingSurface::finish_share`] are
//! reported on the next frame, never from inside those calls.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{Level, debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::config::EngineConfig;
use crate::engine::{Action, Command, Engine};
use crate::geometry::Point;
use crate::input::{Button, PointerEvent, PointerId, PointerKind, PointerPhase};
use crate::share::ShareOutcome;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Install the panic hook and console logger. Runs when the module loads.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(Level::Info).is_err() {
        debug!("console logger already installed");
    }
}

/// The drawing surface bound to one `<canvas>`.
#[wasm_bindgen]
pub struct DrawingSurface {
    engine: Rc<RefCell<Engine>>,
    running: Rc<Cell<bool>>,
    on_change: Rc<RefCell<Option<js_sys::Function>>>,
    share_pending: bool,
    share_changed: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl DrawingSurface {
    /// Bind to `canvas`. `config_json` may override any [`EngineConfig`] field.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the config is invalid or the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<DrawingSurface, JsValue> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => EngineConfig::default(),
        };
        let engine = Engine::new(canvas, config)?;
        let surface = Self {
            engine: Rc::new(RefCell::new(engine)),
            running: Rc::new(Cell::new(false)),
            on_change: Rc::new(RefCell::new(None)),
            share_pending: false,
            share_changed: Rc::new(Cell::new(false)),
        };
        surface.resize();
        Ok(surface)
    }

    /// Re-read the canvas CSS size and device pixel ratio.
    pub fn resize(&self) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let mut engine = self.engine.borrow_mut();
        let (w, h) = {
            let canvas = engine.canvas();
            (f64::from(canvas.client_width()), f64::from(canvas.client_height()))
        };
        engine.resize(w, h, dpr);
    }

    /// Register a callback fired when undo/redo/clear/share availability changes.
    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        *self.on_change.borrow_mut() = callback;
    }

    /// Start the redraw loop. Calling it twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the first animation frame cannot be requested.
    pub fn start(&self) -> Result<(), JsValue> {
        if self.running.replace(true) {
            return Ok(());
        }

        let engine = Rc::clone(&self.engine);
        let running = Rc::clone(&self.running);
        let on_change = Rc::clone(&self.on_change);
        let share_changed = Rc::clone(&self.share_changed);
        let slot: FrameCallback = Rc::new(RefCell::new(None));
        let slot_for_cb = Rc::clone(&slot);

        let cb = Closure::wrap(Box::new(move |_ts: f64| {
            if !running.get() {
                drop(slot_for_cb.borrow_mut().take());
                return;
            }
            tick(&engine, &on_change, &share_changed);
            if let Some(cb) = slot_for_cb.borrow().as_ref() {
                if let Err(e) = request_frame(cb) {
                    warn!("animation frame request failed: {e:?}");
                    running.set(false);
                }
            }
        }) as Box<dyn FnMut(f64)>);

        request_frame(&cb)?;
        *slot.borrow_mut() = Some(cb);
        Ok(())
    }

    /// Stop the redraw loop after the current frame.
    pub fn stop(&self) {
        self.running.set(false);
    }

    // --- Input ---

    /// Forward a `pointerdown` / `pointermove` / `pointerup` / `pointercancel` event.
    pub fn pointer_event(&self, ev: &web_sys::PointerEvent) {
        let Some(phase) = PointerPhase::from_dom(&ev.type_()) else {
            return;
        };
        let position = self.local_point(ev.client_x(), ev.client_y());
        self.submit(PointerEvent {
            id: PointerId(i64::from(ev.pointer_id())),
            phase,
            kind: PointerKind::from_dom(&ev.pointer_type()),
            button: Button::from_dom(ev.button()),
            position,
            time_ms: ev.time_stamp(),
        });
    }

    /// Forward a touch event on platforms without pointer events.
    /// Each changed touch becomes its own contact.
    pub fn touch_event(&self, ev: &TouchEvent) {
        let Some(phase) = PointerPhase::from_dom(&ev.type_()) else {
            return;
        };
        let touches = ev.changed_touches();
        for i in 0..touches.length() {
            let Some(touch) = touches.get(i) else {
                continue;
            };
            let position = self.local_point(touch.client_x(), touch.client_y());
            self.submit(PointerEvent {
                id: PointerId(i64::from(touch.identifier())),
                phase,
                kind: PointerKind::Touch,
                button: Button::Primary,
                position,
                time_ms: ev.time_stamp(),
            });
        }
    }

    /// Forward a mouse event on platforms without pointer events.
    pub fn mouse_event(&self, ev: &MouseEvent) {
        let Some(phase) = PointerPhase::from_dom(&ev.type_()) else {
            return;
        };
        let position = self.local_point(ev.client_x(), ev.client_y());
        self.submit(PointerEvent {
            id: PointerId::MOUSE,
            phase,
            kind: PointerKind::Mouse,
            button: Button::from_dom(ev.button()),
            position,
            time_ms: ev.time_stamp(),
        });
    }

    // --- Controls ---

    pub fn undo(&self) {
        self.engine.borrow_mut().submit(Command::Undo);
    }

    pub fn redo(&self) {
        self.engine.borrow_mut().submit(Command::Redo);
    }

    pub fn clear(&self) {
        self.engine.borrow_mut().submit(Command::Clear);
    }

    pub fn reset_view(&self) {
        self.engine.borrow_mut().submit(Command::ResetView);
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.engine.borrow().core.status().can_undo
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.engine.borrow().core.status().can_redo
    }

    #[must_use]
    pub fn can_clear(&self) -> bool {
        self.engine.borrow().core.status().can_clear
    }

    #[must_use]
    pub fn can_share(&self) -> bool {
        !self.share_pending && self.engine.borrow().core.status().can_share
    }

    // --- Export / share ---

    /// Rasterize the drawing to PNG bytes for the page's share call.
    ///
    /// Only one share may be in flight; call [`Self::finish_share`] when the
    /// page's share promise settles.
    ///
    /// # Errors
    ///
    /// Returns `Err` with a user-facing message if a share is already pending
    /// or the export fails.
    pub fn export_png(&mut self) -> Result<Vec<u8>, JsValue> {
        if self.share_pending {
            debug!("export requested while a share is pending");
            return Err(JsValue::from_str("A share is already in progress"));
        }
        let image = self
            .engine
            .borrow()
            .core
            .export(js_sys::Date::now())
            .map_err(|e| {
                warn!("export failed: {e}");
                JsValue::from_str(&e.to_string())
            })?;
        self.share_pending = true;
        self.share_changed.set(true);
        Ok(image.png)
    }

    /// Suggested filename for the next export.
    #[must_use]
    pub fn export_filename(&self) -> String {
        crate::export::filename(js_sys::Date::now())
    }

    /// Report how the page's share call settled. `error_name` is the DOM
    /// exception name, or `None` on success. Returns a notice to show the
    /// user, if any.
    pub fn finish_share(&mut self, error_name: Option<String>, message: Option<String>) -> Option<String> {
        self.share_pending = false;
        self.share_changed.set(true);
        let outcome = ShareOutcome::from_dom_error(error_name.as_deref(), message.as_deref().unwrap_or(""));
        outcome.log("drawing");
        outcome.notice()
    }
}

impl DrawingSurface {
    fn submit(&self, event: PointerEvent) {
        self.engine.borrow_mut().submit(Command::Pointer(event));
    }

    /// Convert client coordinates to canvas-local CSS pixels.
    fn local_point(&self, client_x: i32, client_y: i32) -> Point {
        let rect = self.engine.borrow().canvas().get_bounding_client_rect();
        Point::new(f64::from(client_x) - rect.left(), f64::from(client_y) - rect.top())
    }
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window.request_animation_frame(cb.as_ref().unchecked_ref())
}

fn tick(engine: &Rc<RefCell<Engine>>, on_change: &Rc<RefCell<Option<js_sys::Function>>>, share_changed: &Cell<bool>) {
    let report = match engine.borrow_mut().frame() {
        Ok(report) => report,
        Err(e) => {
            warn!("render failed: {e:?}");
            return;
        }
    };
    if !availability_changed(&report.actions, share_changed.replace(false)) {
        return;
    }
    if let Some(callback) = on_change.borrow().as_ref() {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            warn!("change callback failed: {e:?}");
        }
    }
}

/// Whether a frame's outcome can flip any control the page enables or disables.
fn availability_changed(actions: &[Action], share_changed: bool) -> bool {
    share_changed
        || actions
            .iter()
            .any(|a| matches!(a, Action::HistoryChanged(_) | Action::StrokeCommitted(_)))
}
