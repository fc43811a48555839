//! Gesture router: the pointer state machine.
//!
//! DESIGN
//! ======
//! The router tracks every live contact in an ordered map and keeps an
//! explicit [`GestureState`]. Contact-down and contact-up change the map's
//! cardinality and go through one transition function, [`GestureRouter::reclassify`],
//! which owns every enter/leave side effect:
//!
//! - 0 contacts: `Idle`. Leaving `Drawing` finishes the stroke.
//! - 1 contact: `Drawing`. A fresh stroke starts under that contact, with the
//!   brush seeded there; nothing carries over from an earlier gesture.
//! - 2+ contacts: `Transforming`. The pinch follows "the pair", the two
//!   lowest identities at the time the pair is chosen. The pair is only
//!   re-picked when one of its members lifts; extra contacts are bookkept
//!   but never move the camera.
//!
//! Contact-move never changes state; it either feeds the brush or produces a
//! pinch step.
//!
//! The router never touches the document or the camera. It returns
//! [`GestureEffect`]s and the engine applies them.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::collections::BTreeMap;

use log::debug;

use crate::brush::LazyBrush;
use crate::camera::Camera;
use crate::doc::Stroke;
use crate::geometry::{Point, distance, midpoint};
use crate::input::{GestureMode, GestureState, PointerEvent, PointerId, PointerPhase};

/// Pair separations below this are treated as zero.
const MIN_PINCH_DISTANCE: f64 = 1e-9;

/// Side effects requested by the router.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEffect {
    /// A drawing gesture ended; commit the stroke if it has enough points.
    StrokeFinished(Stroke),
    /// One pinch step. See [`Camera::apply_pinch`].
    Pinch { anchor: Point, factor: f64, pan_delta: Point },
    /// The visible frame is stale.
    Redraw,
}

/// Pointer-identity-tracking gesture state machine.
#[derive(Debug, Clone)]
pub struct GestureRouter {
    pointers: BTreeMap<PointerId, Point>,
    state: GestureState,
    lazy_radius: f64,
    friction: f64,
}

impl GestureRouter {
    /// A router in the `Idle` state.
    #[must_use]
    pub fn new(lazy_radius: f64, friction: f64) -> Self {
        Self {
            pointers: BTreeMap::new(),
            state: GestureState::Idle,
            lazy_radius,
            friction: friction.clamp(0.0, 1.0),
        }
    }

    /// Feed one normalized event. `camera` is used to place stroke points in
    /// world space.
    pub fn handle(&mut self, event: &PointerEvent, camera: &Camera) -> Vec<GestureEffect> {
        match event.phase {
            PointerPhase::Down => self.on_down(event, camera),
            PointerPhase::Move => self.on_move(event, camera),
            PointerPhase::Up | PointerPhase::Cancel => self.on_up(event, camera),
        }
    }

    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.state.mode()
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// The stroke currently being drawn, if any.
    #[must_use]
    pub fn live_stroke(&self) -> Option<&Stroke> {
        self.state.live_stroke()
    }

    /// Number of tracked contacts.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Last known screen position of a tracked contact.
    #[must_use]
    pub fn pointer(&self, id: PointerId) -> Option<Point> {
        self.pointers.get(&id).copied()
    }

    // =============================================================
    // Event handlers
    // =============================================================

    fn on_down(&mut self, event: &PointerEvent, camera: &Camera) -> Vec<GestureEffect> {
        if !event.is_trackable() {
            debug!("ignoring {:?} button down for pointer {:?}", event.button, event.id);
            return Vec::new();
        }
        if self.pointers.contains_key(&event.id) {
            debug!("ignoring duplicate down for pointer {:?}", event.id);
            return Vec::new();
        }
        self.pointers.insert(event.id, event.position);
        self.reclassify(camera, event.time_ms)
    }

    fn on_move(&mut self, event: &PointerEvent, camera: &Camera) -> Vec<GestureEffect> {
        let Some(slot) = self.pointers.get_mut(&event.id) else {
            return Vec::new();
        };
        *slot = event.position;

        match &mut self.state {
            GestureState::Drawing { pointer, brush, stroke } if *pointer == event.id => {
                if brush.update(event.position, self.friction) {
                    stroke.push(camera.screen_to_world(brush.brush()));
                    vec![GestureEffect::Redraw]
                } else {
                    Vec::new()
                }
            }
            GestureState::Transforming { pair, last_distance, last_midpoint }
                if pair.0 == event.id || pair.1 == event.id =>
            {
                let (Some(a), Some(b)) = (self.pointers.get(&pair.0), self.pointers.get(&pair.1)) else {
                    return Vec::new();
                };
                let new_distance = distance(*a, *b);
                let new_midpoint = midpoint(*a, *b);

                let factor = if *last_distance > MIN_PINCH_DISTANCE {
                    new_distance / *last_distance
                } else {
                    1.0
                };
                let pan_delta = Point::new(new_midpoint.x - last_midpoint.x, new_midpoint.y - last_midpoint.y);
                let anchor = *last_midpoint;

                *last_distance = new_distance;
                *last_midpoint = new_midpoint;

                vec![GestureEffect::Pinch { anchor, factor, pan_delta }]
            }
            _ => Vec::new(),
        }
    }

    fn on_up(&mut self, event: &PointerEvent, camera: &Camera) -> Vec<GestureEffect> {
        // Every mouse button shares one id; only the primary release ends the contact.
        if event.phase == PointerPhase::Up && !event.is_trackable() {
            debug!("ignoring {:?} button up for pointer {:?}", event.button, event.id);
            return Vec::new();
        }
        if self.pointers.remove(&event.id).is_none() {
            debug!("ignoring {:?} for untracked pointer {:?}", event.phase, event.id);
            return Vec::new();
        }
        self.reclassify(camera, event.time_ms)
    }

    // =============================================================
    // Transitions
    // =============================================================

    /// Bring the state in line with the current contact count.
    fn reclassify(&mut self, camera: &Camera, time_ms: f64) -> Vec<GestureEffect> {
        let target = match self.pointers.len() {
            0 => GestureMode::Idle,
            1 => GestureMode::Drawing,
            _ => GestureMode::Transforming,
        };

        let mut effects = Vec::new();
        match (self.state.mode(), target) {
            (GestureMode::Idle, GestureMode::Idle) | (GestureMode::Drawing, GestureMode::Drawing) => {}
            (GestureMode::Transforming, GestureMode::Transforming) => {
                if !self.pair_is_tracked() {
                    self.begin_transform();
                }
            }
            (_, GestureMode::Idle) => {
                self.finish_stroke(&mut effects);
                effects.push(GestureEffect::Redraw);
            }
            (_, GestureMode::Drawing) => {
                self.finish_stroke(&mut effects);
                self.begin_drawing(camera, time_ms);
                effects.push(GestureEffect::Redraw);
            }
            (_, GestureMode::Transforming) => {
                self.finish_stroke(&mut effects);
                self.begin_transform();
                effects.push(GestureEffect::Redraw);
            }
        }
        effects
    }

    /// Leave the current state, handing any in-progress stroke to the engine.
    fn finish_stroke(&mut self, effects: &mut Vec<GestureEffect>) {
        if let GestureState::Drawing { stroke, .. } = std::mem::take(&mut self.state) {
            effects.push(GestureEffect::StrokeFinished(stroke));
        }
    }

    fn begin_drawing(&mut self, camera: &Camera, time_ms: f64) {
        let Some((&pointer, &position)) = self.pointers.iter().next() else {
            self.state = GestureState::Idle;
            return;
        };
        let mut brush = LazyBrush::new(position, self.lazy_radius);
        brush.seed(position);
        self.state = GestureState::Drawing {
            pointer,
            brush,
            stroke: Stroke::begin(camera.screen_to_world(position), time_ms),
        };
    }

    fn begin_transform(&mut self) {
        let mut lowest = self.pointers.iter();
        let (Some((&a, &pa)), Some((&b, &pb))) = (lowest.next(), lowest.next()) else {
            self.state = GestureState::Idle;
            return;
        };
        self.state = GestureState::Transforming {
            pair: (a, b),
            last_distance: distance(pa, pb),
            last_midpoint: midpoint(pa, pb),
        };
    }

    fn pair_is_tracked(&self) -> bool {
        match self.state {
            GestureState::Transforming { pair, .. } => {
                self.pointers.contains_key(&pair.0) && self.pointers.contains_key(&pair.1)
            }
            _ => false,
        }
    }
}
