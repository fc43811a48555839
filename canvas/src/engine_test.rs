#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::Point;
use crate::input::PointerPhase;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Engine whose brush tracks the pointer exactly.
fn exact_core() -> EngineCore {
    EngineCore::with_config(EngineConfig { lazy_radius: 0.0, ..EngineConfig::default() })
}

fn pointer(id: i64, phase: PointerPhase, x: f64, y: f64) -> Command {
    Command::Pointer(PointerEvent::touch(id, phase, Point::new(x, y), 0.0))
}

fn draw_line(core: &mut EngineCore, points: &[(f64, f64)]) -> Vec<Action> {
    let mut actions = Vec::new();
    let (x0, y0) = points[0];
    actions.extend(core.apply(pointer(1, PointerPhase::Down, x0, y0)));
    for &(x, y) in &points[1..] {
        actions.extend(core.apply(pointer(1, PointerPhase::Move, x, y)));
    }
    let (xn, yn) = points[points.len() - 1];
    actions.extend(core.apply(pointer(1, PointerPhase::Up, xn, yn)));
    actions
}

fn has_history_changed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::HistoryChanged(_)))
}

struct RecordingTarget {
    outcome: ShareOutcome,
    received: Vec<String>,
}

impl ShareTarget for RecordingTarget {
    fn share(&mut self, image: &ExportedImage) -> ShareOutcome {
        self.received.push(image.filename.clone());
        self.outcome.clone()
    }
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_is_empty_idle_and_dirty() {
    let core = EngineCore::new();
    assert!(core.strokes().is_empty());
    assert_eq!(core.mode(), GestureMode::Idle);
    assert_eq!(core.camera(), Camera::default());
    assert_eq!(core.status(), HistoryStatus::default());
    assert!(core.is_dirty());
    assert_eq!(core.pending(), 0);
}

#[test]
fn config_flows_into_components() {
    let config = EngineConfig { history_cap: 2, stroke_width: 7.0, ..EngineConfig::default() };
    let core = EngineCore::with_config(config);
    assert_eq!(core.doc.history().cap(), 2);
    assert_eq!(core.style.width, 7.0);
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn drawing_commits_stroke() {
    let mut core = exact_core();
    let actions = draw_line(&mut core, &[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);

    assert_eq!(core.strokes().len(), 1);
    let id = core.strokes()[0].id;
    assert!(actions.contains(&Action::StrokeCommitted(id)));
    assert_eq!(
        core.strokes()[0].points,
        vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)]
    );
    assert_eq!(core.mode(), GestureMode::Idle);
}

#[test]
fn tap_is_discarded() {
    let mut core = EngineCore::new();
    let actions = draw_line(&mut core, &[(4.0, 4.0), (6.0, 6.0)]);
    assert!(actions.contains(&Action::StrokeDiscarded));
    assert!(core.strokes().is_empty());
    assert!(core.doc.history().is_empty());
}

#[test]
fn default_lazy_radius_lags_points() {
    let mut core = EngineCore::new();
    draw_line(&mut core, &[(0.0, 0.0), (40.0, 0.0)]);
    let points = &core.strokes()[0].points;
    assert_eq!(points.len(), 2);
    assert!(approx_eq(points[1].x, 25.0));
}

#[test]
fn strokes_are_placed_in_world_space() {
    let mut core = exact_core();
    core.camera = Camera { pan_x: 100.0, pan_y: 0.0, zoom: 2.0 };
    draw_line(&mut core, &[(100.0, 0.0), (120.0, 40.0)]);
    assert_eq!(core.strokes()[0].points, vec![Point::new(0.0, 0.0), Point::new(10.0, 20.0)]);
}

#[test]
fn live_stroke_appears_in_scene() {
    let mut core = exact_core();
    core.apply(pointer(1, PointerPhase::Down, 0.0, 0.0));
    core.apply(pointer(1, PointerPhase::Move, 10.0, 0.0));

    let scene = core.scene();
    assert!(scene.strokes.is_empty());
    assert_eq!(scene.live.map(|s| s.points.len()), Some(2));
    assert_eq!(scene.paintable().count(), 1);
}

// =============================================================
// Pinch
// =============================================================

#[test]
fn pinch_zooms_about_midpoint() {
    let mut core = EngineCore::new();
    core.apply(pointer(1, PointerPhase::Down, 100.0, 100.0));
    core.apply(pointer(2, PointerPhase::Down, 200.0, 100.0));
    let world_mid = core.camera.screen_to_world(Point::new(150.0, 100.0));

    core.apply(pointer(1, PointerPhase::Move, 50.0, 100.0));
    let actions = core.apply(pointer(2, PointerPhase::Move, 250.0, 100.0));

    assert!(approx_eq(core.camera.zoom, 2.0));
    assert!(actions.iter().any(|a| matches!(a, Action::CameraChanged(_))));
    let screen = core.camera.world_to_screen(world_mid);
    assert!(approx_eq(screen.x, 150.0) && approx_eq(screen.y, 100.0));
}

#[test]
fn two_finger_pan_translates() {
    let mut core = EngineCore::new();
    core.apply(pointer(1, PointerPhase::Down, 0.0, 0.0));
    core.apply(pointer(2, PointerPhase::Down, 100.0, 0.0));
    core.apply(pointer(1, PointerPhase::Move, 30.0, 40.0));
    core.apply(pointer(2, PointerPhase::Move, 130.0, 40.0));

    assert!(approx_eq(core.camera.zoom, 1.0));
    assert!(approx_eq(core.camera.pan_x, 30.0));
    assert!(approx_eq(core.camera.pan_y, 40.0));
}

#[test]
fn pinch_respects_zoom_clamp() {
    let mut core = EngineCore::new();
    core.apply(pointer(1, PointerPhase::Down, 0.0, 0.0));
    core.apply(pointer(2, PointerPhase::Down, 10.0, 0.0));
    core.apply(pointer(2, PointerPhase::Move, 1000.0, 0.0));
    assert!(approx_eq(core.camera.zoom, 10.0));
    core.apply(pointer(2, PointerPhase::Move, 1.0, 0.0));
    assert!(approx_eq(core.camera.zoom, 0.1));
}

#[test]
fn pinch_does_not_create_strokes() {
    let mut core = exact_core();
    core.apply(pointer(1, PointerPhase::Down, 0.0, 0.0));
    core.apply(pointer(1, PointerPhase::Move, 50.0, 0.0));
    core.apply(pointer(2, PointerPhase::Down, 100.0, 0.0));
    assert_eq!(core.strokes().len(), 1);

    core.apply(pointer(2, PointerPhase::Move, 200.0, 0.0));
    core.apply(pointer(2, PointerPhase::Up, 200.0, 0.0));
    core.apply(pointer(1, PointerPhase::Up, 50.0, 0.0));
    assert_eq!(core.strokes().len(), 1);
}

// =============================================================
// History
// =============================================================

#[test]
fn undo_redo_restore_document() {
    let mut core = exact_core();
    draw_line(&mut core, &[(0.0, 0.0), (10.0, 10.0)]);
    draw_line(&mut core, &[(20.0, 0.0), (30.0, 10.0)]);
    let before = core.strokes().to_vec();

    let actions = core.undo();
    assert!(has_history_changed(&actions));
    assert_eq!(core.strokes().len(), 1);

    core.redo();
    assert_eq!(core.strokes(), before.as_slice());
}

#[test]
fn undo_on_empty_is_silent() {
    let mut core = EngineCore::new();
    assert!(core.undo().is_empty());
    assert!(core.redo().is_empty());
    assert!(core.clear().is_empty());
}

#[test]
fn clear_then_undo_restores_every_point() {
    let mut core = exact_core();
    draw_line(&mut core, &[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);

    let actions = core.clear();
    assert_eq!(actions[0], Action::HistoryChanged(core.status()));
    assert!(core.strokes().is_empty());
    assert!(!core.status().can_share);

    core.undo();
    assert_eq!(core.strokes().len(), 1);
    assert_eq!(
        core.strokes()[0].points,
        vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)]
    );
}

#[test]
fn clear_keeps_camera() {
    let mut core = exact_core();
    core.camera = Camera { pan_x: 5.0, pan_y: 5.0, zoom: 3.0 };
    draw_line(&mut core, &[(0.0, 0.0), (10.0, 0.0)]);
    core.clear();
    assert_eq!(core.camera.zoom, 3.0);
}

#[test]
fn history_is_capped() {
    let mut core = EngineCore::with_config(EngineConfig { lazy_radius: 0.0, history_cap: 50, ..EngineConfig::default() });
    for i in 0..51 {
        let y = f64::from(i) * 10.0;
        draw_line(&mut core, &[(0.0, y), (10.0, y)]);
    }
    assert_eq!(core.doc.history().len(), 50);
    assert_eq!(core.doc.history().cursor(), Some(49));
    let mut undos = 0;
    while !core.undo().is_empty() {
        undos += 1;
    }
    assert_eq!(undos, 50);
    assert_eq!(core.strokes().len(), 1);
}

// =============================================================
// View and frame
// =============================================================

#[test]
fn reset_view_returns_to_identity() {
    let mut core = EngineCore::new();
    assert!(core.reset_view().is_empty());

    core.camera = Camera { pan_x: 10.0, pan_y: -10.0, zoom: 4.0 };
    let actions = core.reset_view();
    assert_eq!(actions, vec![Action::CameraChanged(Camera::default()), Action::RenderNeeded]);
    assert_eq!(core.camera, Camera::default());
}

#[test]
fn set_viewport_sanitizes_dpr() {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 600.0, 0.0);
    assert_eq!(core.dpr, 1.0);
    core.set_viewport(800.0, 600.0, f64::NAN);
    assert_eq!(core.dpr, 1.0);
    core.set_viewport(-5.0, 600.0, 2.0);
    assert_eq!((core.viewport_width, core.dpr), (0.0, 2.0));
}

#[test]
fn queued_resize_sets_backing_size() {
    let mut core = EngineCore::new();
    core.enqueue(Command::Resize { width: 400.5, height: 300.0, dpr: 2.0 });
    assert_eq!(core.backing_size(), (0, 0));

    let actions = core.drain();

    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.backing_size(), (801, 600));
    assert!(core.is_dirty());
}

#[test]
fn take_dirty_clears_flag() {
    let mut core = EngineCore::new();
    assert!(core.take_dirty());
    assert!(!core.take_dirty());
    core.mark_dirty();
    assert!(core.is_dirty());
}

#[test]
fn absorbed_move_does_not_dirty() {
    let mut core = EngineCore::new();
    core.apply(pointer(1, PointerPhase::Down, 0.0, 0.0));
    core.take_dirty();
    let actions = core.apply(pointer(1, PointerPhase::Move, 3.0, 3.0));
    assert!(actions.is_empty());
    assert!(!core.is_dirty());
}

// =============================================================
// Command queue
// =============================================================

#[test]
fn commands_wait_for_drain() {
    let mut core = exact_core();
    core.enqueue(pointer(1, PointerPhase::Down, 0.0, 0.0));
    core.enqueue(pointer(1, PointerPhase::Move, 20.0, 0.0));
    core.enqueue(pointer(1, PointerPhase::Up, 20.0, 0.0));
    core.enqueue(Command::Undo);
    assert_eq!(core.pending(), 4);
    assert!(core.strokes().is_empty());

    let actions = core.drain();
    assert_eq!(core.pending(), 0);
    assert!(actions.iter().any(|a| matches!(a, Action::StrokeCommitted(_))));
    assert!(has_history_changed(&actions));
    assert!(core.strokes().is_empty());
    assert!(core.status().can_redo);
}

#[test]
fn commands_deserialize_from_tagged_json() {
    let json = r#"[
        {"type": "resize", "width": 800, "height": 600, "dpr": 2},
        {"type": "pointer", "id": 1, "phase": "down", "position": {"x": 0, "y": 0}},
        {"type": "pointer", "id": 1, "phase": "move", "position": {"x": 50, "y": 0}},
        {"type": "pointer", "id": 1, "phase": "up", "position": {"x": 50, "y": 0}},
        {"type": "clear"},
        {"type": "undo"},
        {"type": "reset_view"}
    ]"#;
    let commands: Vec<Command> = serde_json::from_str(json).unwrap();
    assert_eq!(commands.len(), 7);
    assert_eq!(commands[4], Command::Clear);

    let mut core = EngineCore::new();
    for command in commands {
        core.enqueue(command);
    }
    core.drain();
    assert_eq!(core.strokes().len(), 1);
    assert_eq!(core.viewport_width, 800.0);
    assert_eq!(core.dpr, 2.0);
}

// =============================================================
// Export / share
// =============================================================

#[test]
fn export_empty_document_fails() {
    let core = EngineCore::new();
    assert!(matches!(core.export(0.0), Err(ExportError::EmptyDocument)));
}

#[test]
fn share_hands_image_to_target() {
    let mut core = exact_core();
    draw_line(&mut core, &[(0.0, 0.0), (100.0, 100.0)]);
    let mut target = RecordingTarget { outcome: ShareOutcome::Cancelled, received: Vec::new() };

    let outcome = core.share(&mut target, 42.0).unwrap();

    assert_eq!(outcome, ShareOutcome::Cancelled);
    assert_eq!(target.received, vec!["inkpad-42.png".to_owned()]);
    assert_eq!(core.strokes().len(), 1);
}

#[test]
fn share_of_empty_document_skips_target() {
    let core = EngineCore::new();
    let mut target = RecordingTarget { outcome: ShareOutcome::Shared, received: Vec::new() };
    assert!(core.share(&mut target, 0.0).is_err());
    assert!(target.received.is_empty());
}
