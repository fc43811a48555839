//! Input model: pointer events and the gesture state.
//!
//! `PointerEvent` is the single call shape that every input source (unified
//! pointer events, touch lists, plain mouse events) is normalized into before
//! it reaches the [`crate::gesture::GestureRouter`]. `GestureState` is the
//! active gesture, carrying all context needed to continue it on the next
//! event.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::brush::LazyBrush;
use crate::doc::Stroke;
use crate::geometry::Point;

/// Device-assigned contact identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub i64);

impl PointerId {
    /// Synthetic identity used for mouse input on platforms without pointer events.
    pub const MOUSE: Self = Self(-1);
}

/// Kind of device behind a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Mouse or trackpad cursor.
    Mouse,
    /// Finger on a touch screen.
    #[default]
    Touch,
    /// Stylus.
    Pen,
}

impl PointerKind {
    /// Map a DOM `pointerType` string. Unknown types are treated as touch.
    #[must_use]
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "mouse" => Self::Mouse,
            "pen" => Self::Pen,
            _ => Self::Touch,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or any touch / pen contact).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Lifecycle phase of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerPhase {
    /// Map a DOM event type from any of the three input streams.
    /// Returns `None` for event types the engine does not consume.
    #[must_use]
    pub fn from_dom(event_type: &str) -> Option<Self> {
        match event_type {
            "pointerdown" | "touchstart" | "mousedown" => Some(Self::Down),
            "pointermove" | "touchmove" | "mousemove" => Some(Self::Move),
            "pointerup" | "touchend" | "mouseup" => Some(Self::Up),
            "pointercancel" | "touchcancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// One normalized contact event in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: PointerId,
    pub phase: PointerPhase,
    #[serde(default)]
    pub kind: PointerKind,
    #[serde(default)]
    pub button: Button,
    /// Screen-space position in CSS pixels.
    pub position: Point,
    /// Host timestamp in milliseconds.
    #[serde(default)]
    pub time_ms: f64,
}

impl PointerEvent {
    /// A primary-button touch event; convenient for scripted input.
    #[must_use]
    pub fn touch(id: i64, phase: PointerPhase, position: Point, time_ms: f64) -> Self {
        Self {
            id: PointerId(id),
            phase,
            kind: PointerKind::Touch,
            button: Button::Primary,
            position,
            time_ms,
        }
    }

    /// Whether this contact may start a gesture.
    #[must_use]
    pub fn is_trackable(&self) -> bool {
        self.kind != PointerKind::Mouse || self.button == Button::Primary
    }
}

/// Coarse gesture classification, derived from [`GestureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    Drawing,
    Transforming,
}

/// The active gesture.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No contacts.
    #[default]
    Idle,
    /// One contact is drawing a stroke.
    Drawing {
        /// The contact driving the stroke.
        pointer: PointerId,
        /// Smoothing filter, in screen space.
        brush: LazyBrush,
        /// The in-progress stroke, in world space.
        stroke: Stroke,
    },
    /// Two or more contacts are panning/zooming.
    Transforming {
        /// The two contacts the pinch math follows (lowest identities).
        pair: (PointerId, PointerId),
        /// Pair separation at the previous event, in screen pixels.
        last_distance: f64,
        /// Pair midpoint at the previous event, in screen pixels.
        last_midpoint: Point,
    },
}

impl GestureState {
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        match self {
            Self::Idle => GestureMode::Idle,
            Self::Drawing { .. } => GestureMode::Drawing,
            Self::Transforming { .. } => GestureMode::Transforming,
        }
    }

    /// The stroke being drawn, if any.
    #[must_use]
    pub fn live_stroke(&self) -> Option<&Stroke> {
        match self {
            Self::Drawing { stroke, .. } => Some(stroke),
            _ => None,
        }
    }
}
