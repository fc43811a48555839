use super::*;

// --- DOM mapping ---

#[test]
fn pointer_kind_from_dom() {
    assert_eq!(PointerKind::from_dom("mouse"), PointerKind::Mouse);
    assert_eq!(PointerKind::from_dom("pen"), PointerKind::Pen);
    assert_eq!(PointerKind::from_dom("touch"), PointerKind::Touch);
    assert_eq!(PointerKind::from_dom(""), PointerKind::Touch);
}

#[test]
fn button_from_dom() {
    assert_eq!(Button::from_dom(0), Button::Primary);
    assert_eq!(Button::from_dom(1), Button::Middle);
    assert_eq!(Button::from_dom(2), Button::Secondary);
    assert_eq!(Button::from_dom(-1), Button::Primary);
}

#[test]
fn phase_from_every_stream() {
    for (name, phase) in [
        ("pointerdown", PointerPhase::Down),
        ("touchstart", PointerPhase::Down),
        ("mousedown", PointerPhase::Down),
        ("pointermove", PointerPhase::Move),
        ("touchmove", PointerPhase::Move),
        ("mousemove", PointerPhase::Move),
        ("pointerup", PointerPhase::Up),
        ("touchend", PointerPhase::Up),
        ("mouseup", PointerPhase::Up),
        ("pointercancel", PointerPhase::Cancel),
        ("touchcancel", PointerPhase::Cancel),
    ] {
        assert_eq!(PointerPhase::from_dom(name), Some(phase), "{name}");
    }
}

#[test]
fn phase_from_unrelated_event_is_none() {
    assert_eq!(PointerPhase::from_dom("wheel"), None);
    assert_eq!(PointerPhase::from_dom("pointerenter"), None);
}

// --- PointerEvent ---

#[test]
fn touch_constructor() {
    let e = PointerEvent::touch(7, PointerPhase::Move, Point::new(1.0, 2.0), 33.0);
    assert_eq!(e.id, PointerId(7));
    assert_eq!(e.kind, PointerKind::Touch);
    assert_eq!(e.button, Button::Primary);
    assert!(e.is_trackable());
}

#[test]
fn secondary_mouse_button_is_not_trackable() {
    let mut e = PointerEvent::touch(-1, PointerPhase::Down, Point::default(), 0.0);
    e.kind = PointerKind::Mouse;
    e.button = Button::Secondary;
    assert!(!e.is_trackable());
    e.button = Button::Primary;
    assert!(e.is_trackable());
}

#[test]
fn event_deserializes_with_defaults() {
    let e: PointerEvent =
        serde_json::from_str(r#"{"id":3,"phase":"down","position":{"x":10.0,"y":20.0}}"#).unwrap();
    assert_eq!(e, PointerEvent::touch(3, PointerPhase::Down, Point::new(10.0, 20.0), 0.0));
}

#[test]
fn event_deserializes_mouse_fields() {
    let e: PointerEvent = serde_json::from_str(
        r#"{"id":-1,"phase":"up","kind":"mouse","button":"middle","position":{"x":0,"y":0},"time_ms":5}"#,
    )
    .unwrap();
    assert_eq!(e.id, PointerId::MOUSE);
    assert_eq!(e.kind, PointerKind::Mouse);
    assert_eq!(e.button, Button::Middle);
    assert!(!e.is_trackable());
}

// --- GestureState ---

#[test]
fn idle_state_has_no_stroke() {
    let s = GestureState::default();
    assert_eq!(s.mode(), GestureMode::Idle);
    assert!(s.live_stroke().is_none());
}

#[test]
fn drawing_state_exposes_stroke() {
    let origin = Point::new(5.0, 5.0);
    let s = GestureState::Drawing {
        pointer: PointerId(1),
        brush: LazyBrush::new(origin, 15.0),
        stroke: Stroke::begin(origin, 0.0),
    };
    assert_eq!(s.mode(), GestureMode::Drawing);
    assert_eq!(s.live_stroke().map(|st| st.points.len()), Some(1));
}

#[test]
fn transforming_state_mode() {
    let s = GestureState::Transforming {
        pair: (PointerId(1), PointerId(2)),
        last_distance: 100.0,
        last_midpoint: Point::default(),
    };
    assert_eq!(s.mode(), GestureMode::Transforming);
    assert!(s.live_stroke().is_none());
}
