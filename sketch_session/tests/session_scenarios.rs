mod common;

use std::time::Duration;

use hand_gesture::{Gesture, Point2D};
use sketch_session::{
    CommandLog, ControlAction, ControlId, ControlPanel, ControlValue, DrawCommand, DrawSurface,
    Modes, PanelEffect, SessionConfig, ShapeMode, SketchSession, Status, Zone,
};

use common::{hand, VP};

fn at(ms: u64) -> Duration {
    Duration::from_millis(1_700_000_000_000 + ms)
}

fn session() -> SketchSession {
    SketchSession::new(SessionConfig { viewport: VP, seed: Some(7), ..SessionConfig::default() })
}

#[test]
fn circle_drag_repaints_from_anchor() {
    let mut s = session();
    let modes = Modes { shape_mode: ShapeMode::Circle, ..Modes::default() };

    let first = s.on_frame(Some(&hand(Gesture::Point, 200.0, 300.0)), &modes, at(0));
    assert_eq!(first.status, Some(Status::Drawing(ShapeMode::Circle)));
    assert!(first.commands.is_empty());

    let second = s.on_frame(Some(&hand(Gesture::Point, 230.0, 340.0)), &modes, at(33));
    assert_eq!(second.zone, Some(Zone::Canvas));
    assert_eq!(second.commands.len(), 2);
    assert_eq!(second.commands[0], DrawCommand::Clear);
    let DrawCommand::StrokedCircle { center, radius, width, .. } = second.commands[1] else {
        panic!("expected a circle, got {:?}", second.commands[1]);
    };
    assert!((center.x - 200.0).abs() < 1e-3 && (center.y - 300.0).abs() < 1e-3);
    assert!((radius - 50.0).abs() < 1e-2);
    assert_eq!(width, 5.0);
}

#[test]
fn losing_the_hand_starts_a_new_stroke() {
    let mut s = session();
    let modes = Modes::default();
    let mut log = CommandLog::default();

    for (t, frame) in [
        (0, Some(hand(Gesture::Point, 100.0, 400.0))),
        (33, Some(hand(Gesture::Point, 120.0, 400.0))),
        (66, None),
        (99, Some(hand(Gesture::Point, 900.0, 500.0))),
        (132, Some(hand(Gesture::Point, 910.0, 500.0))),
    ] {
        let out = s.on_frame(frame.as_ref(), &modes, at(t));
        log.draw_all(&out.commands);
    }

    // Two segments, and none bridges the gap.
    assert_eq!(log.len(), 2);
    for cmd in &log.commands {
        let DrawCommand::Segment { from, to, .. } = cmd else { panic!("not a segment") };
        assert!(from.distance(*to) < 30.0);
    }
}

#[test]
fn non_point_gesture_ends_the_stroke_and_reports_itself() {
    let mut s = session();
    let modes = Modes::default();
    s.on_frame(Some(&hand(Gesture::Point, 100.0, 400.0)), &modes, at(0));
    let out = s.on_frame(Some(&hand(Gesture::Fist, 110.0, 400.0)), &modes, at(33));
    assert_eq!(out.gesture, Some(Gesture::Fist));
    assert_eq!(out.status, Some(Status::Gesture(Gesture::Fist)));
    assert!(out.commands.is_empty());
    assert!(!s.drawing().is_drawing());
}

#[test]
fn panel_point_breaks_stroke_continuity() {
    let mut s = session();
    let modes = Modes::default();
    s.on_frame(Some(&hand(Gesture::Point, 300.0, 200.0)), &modes, at(0));
    let panel = s.on_frame(Some(&hand(Gesture::Point, 300.0, 40.0)), &modes, at(33));
    assert_eq!(panel.zone, Some(Zone::Panel));
    assert!(panel.commands.is_empty());
    assert!(panel.action.is_none());

    let back = s.on_frame(Some(&hand(Gesture::Point, 300.0, 200.0)), &modes, at(66));
    assert_eq!(back.status, Some(Status::Drawing(ShapeMode::Free)));
    assert!(back.commands.is_empty());
}

#[test]
fn palm_then_two_fingers_sets_shape_mode() {
    let mut s = session();
    let mut panel = ControlPanel::default();

    let out = s.on_frame(Some(&hand(Gesture::Palm, 1200.0, 40.0)), panel.modes(), at(0));
    assert_eq!(out.action, ControlAction::Select(ControlId::ShapeMode));
    assert_eq!(out.status, Some(Status::Selected(ControlId::ShapeMode)));

    // Still cooling down.
    let early = s.on_frame(Some(&hand(Gesture::TwoFingers, 900.0, 40.0)), panel.modes(), at(499));
    assert!(early.action.is_none());
    assert_eq!(early.status, None);

    let out = s.on_frame(Some(&hand(Gesture::TwoFingers, 900.0, 40.0)), panel.modes(), at(500));
    assert_eq!(out.action, ControlAction::Adjust(ControlId::ShapeMode, ControlValue::Choice(2)));
    assert_eq!(out.status, Some(Status::Adjusting(ControlId::ShapeMode)));
    assert_eq!(panel.apply(&out.action), None);
    assert_eq!(panel.modes().shape_mode, ShapeMode::Circle);
}

#[test]
fn pinch_on_start_camera_fires_effect() {
    let mut s = session();
    let mut panel = ControlPanel::default();

    s.on_frame(Some(&hand(Gesture::Palm, 100.0, 40.0)), panel.modes(), at(0));
    let out = s.on_frame(Some(&hand(Gesture::Pinch, 100.0, 40.0)), panel.modes(), at(600));
    assert_eq!(out.action, ControlAction::Activate(ControlId::StartCamera));
    assert_eq!(out.status, Some(Status::Activated(ControlId::StartCamera)));
    assert_eq!(panel.apply(&out.action), Some(PanelEffect::StartCamera));
    assert!(panel.camera_active());
}

#[test]
fn hand_loss_drops_the_selection() {
    let mut s = session();
    let modes = Modes::default();
    s.on_frame(Some(&hand(Gesture::Palm, 100.0, 40.0)), &modes, at(0));
    assert_eq!(s.router().selected(), Some(ControlId::StartCamera));
    let out = s.on_frame(None, &modes, at(100));
    assert_eq!(out.status, Some(Status::NoHand));
    assert_eq!(s.router().selected(), None);

    let out = s.on_frame(Some(&hand(Gesture::Pinch, 100.0, 40.0)), &modes, at(1000));
    assert!(out.action.is_none());
}

#[test]
fn dwell_at_centre_calibrates_and_corrects_the_pointer() {
    let mut s = session();
    let modes = Modes::default();
    let raw = (660.0, 380.0);

    let statuses: Vec<Option<Status>> = [0, 1050, 2100]
        .iter()
        .map(|&t| s.on_frame(Some(&hand(Gesture::Point, raw.0, raw.1)), &modes, at(t)).status)
        .collect();
    assert_eq!(statuses[0], Some(Status::Drawing(ShapeMode::Free)));
    assert_eq!(statuses[1], None);
    assert_eq!(statuses[2], Some(Status::CalibrationComplete));

    let offset = s.calibration().offset();
    assert!((offset.dx + 20.0).abs() < 1e-2);
    assert!((offset.dy + 20.0).abs() < 1e-2);

    let out = s.on_frame(Some(&hand(Gesture::Point, raw.0, raw.1)), &modes, at(2133));
    let p = out.pointer.expect("pointer");
    assert!(p.distance(VP.center()) < 1e-2);
}

#[test]
fn reset_after_calibration_forgets_the_offset() {
    let mut s = session();
    let modes = Modes::default();
    for t in [0, 2000] {
        s.on_frame(Some(&hand(Gesture::Point, 600.0, 340.0)), &modes, at(t));
    }
    assert!(!s.calibration().offset().is_zero());

    s.reset();
    assert!(s.calibration().offset().is_zero());
    assert!(!s.drawing().is_drawing());
    let out = s.on_frame(Some(&hand(Gesture::Point, 600.0, 340.0)), &modes, at(2100));
    let p = out.pointer.expect("pointer");
    assert!(p.distance(Point2D::new(600.0, 340.0)) < 1e-2);
}
