//! Per-frame orchestration.
//!
//! `SketchSession` owns all session state (calibration, stroke continuity,
//! control selection) and is driven one frame at a time. Each frame goes to
//! exactly one consumer, chosen by where the corrected fingertip is: the
//! control router inside the panel band, the drawing state machine below it.

use std::fmt;

use serde::{Deserialize, Serialize};

use hand_gesture::{
    CalibrationConfig, CalibrationEvent, CalibrationTracker, Gesture, GestureClassifier,
    GestureThresholds, LandmarkFrame, Point2D, Timestamp, Viewport,
};

use crate::command::DrawCommand;
use crate::controls::{ControlAction, ControlId, ControlRouter, RouterConfig};
use crate::drawing::{DrawingSession, StrokeStep};
use crate::modes::{Modes, ShapeMode};

// ════════════════════════════════════════════════════════════════════════════
// SessionConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub viewport:    Viewport,
    pub gestures:    GestureThresholds,
    pub calibration: CalibrationConfig,
    pub controls:    RouterConfig,
    /// Fixed seed for the spray brush; entropy when absent.
    pub seed:        Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            viewport:    Viewport::default(),
            gestures:    GestureThresholds::default(),
            calibration: CalibrationConfig::default(),
            controls:    RouterConfig::default(),
            seed:        None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Status
// ════════════════════════════════════════════════════════════════════════════

/// Text for the status line.
#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    Ready,
    CameraActive,
    CameraOff,
    CameraError(String),
    NoHand,
    Calibrating,
    CalibrationComplete,
    Drawing(ShapeMode),
    Gesture(Gesture),
    Selected(ControlId),
    Adjusting(ControlId),
    Activated(ControlId),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready          => f.write_str("Press Enter to start the camera"),
            Status::CameraActive   => f.write_str("Camera active - Point at center of screen to calibrate"),
            Status::CameraOff      => f.write_str("Camera off"),
            Status::CameraError(e) => write!(f, "Camera error: {}", e),
            Status::NoHand         => f.write_str("No hand detected"),
            Status::Calibrating    => f.write_str("Calibrating... Hold position"),
            Status::CalibrationComplete => f.write_str("Calibration complete - Drawing mode: ON"),
            Status::Drawing(ShapeMode::Free) => f.write_str("Drawing mode: ON (Free draw)"),
            Status::Drawing(shape) => write!(f, "Drawing mode: ON ({})", shape),
            Status::Gesture(g)     => write!(f, "Gesture: {}", g),
            Status::Selected(id)   => write!(f, "Selected: {}", id),
            Status::Adjusting(id)  => write!(f, "Adjusting: {}", id),
            Status::Activated(id)  => write!(f, "Activated: {}", id),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameOutput
// ════════════════════════════════════════════════════════════════════════════

/// Which consumer handled the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Panel,
    Canvas,
}

/// Everything one frame produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    pub gesture:  Option<Gesture>,
    /// Corrected fingertip in canvas pixels.
    pub pointer:  Option<Point2D>,
    pub zone:     Option<Zone>,
    /// Primitives for the drawing surface, in order.
    pub commands: Vec<DrawCommand>,
    pub action:   ControlAction,
    /// `None` leaves the previous status in place.
    pub status:   Option<Status>,
}

// ════════════════════════════════════════════════════════════════════════════
// SketchSession
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SketchSession {
    config:      SessionConfig,
    classifier:  GestureClassifier,
    calibration: CalibrationTracker,
    drawing:     DrawingSession,
    router:      ControlRouter,
}

impl Default for SketchSession {
    fn default() -> Self {
        SketchSession::new(SessionConfig::default())
    }
}

impl SketchSession {
    pub fn new(config: SessionConfig) -> Self {
        SketchSession {
            classifier:  GestureClassifier::new(config.gestures),
            calibration: CalibrationTracker::new(config.calibration),
            drawing:     DrawingSession::new(config.seed),
            router:      ControlRouter::new(config.controls, config.viewport),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig { &self.config }
    pub fn calibration(&self) -> &CalibrationTracker { &self.calibration }
    pub fn drawing(&self) -> &DrawingSession { &self.drawing }
    pub fn router(&self) -> &ControlRouter { &self.router }

    /// Process one frame; `None` means no hand was detected.
    pub fn on_frame(&mut self, frame: Option<&LandmarkFrame>, modes: &Modes, now: Timestamp) -> FrameOutput {
        let Some(frame) = frame else {
            self.drawing.on_non_point_frame();
            self.calibration.cancel_dwell();
            self.router.clear_selection();
            return FrameOutput { status: Some(Status::NoHand), ..FrameOutput::default() };
        };

        let gesture = self.classifier.classify(frame);
        let raw = self.config.viewport.to_screen(frame.index_tip());
        let calibration = self.calibration.update(raw, gesture, &self.config.viewport, now);
        let pointer = self.calibration.correct(raw);

        let mut out = FrameOutput {
            gesture: Some(gesture),
            pointer: Some(pointer),
            ..FrameOutput::default()
        };

        if self.router.in_panel(pointer) {
            out.zone = Some(Zone::Panel);
            self.drawing.on_non_point_frame();
            out.action = self.router.route(pointer, gesture, now);
            out.status = match out.action {
                ControlAction::Select(id)    => Some(Status::Selected(id)),
                ControlAction::Adjust(id, _) => Some(Status::Adjusting(id)),
                ControlAction::Activate(id)  => Some(Status::Activated(id)),
                ControlAction::None          => None,
            };
            return out;
        }

        out.zone = Some(Zone::Canvas);
        if gesture != Gesture::Point {
            self.drawing.on_non_point_frame();
            out.status = Some(Status::Gesture(gesture));
            return out;
        }

        let calibration_status = match calibration {
            CalibrationEvent::DwellStarted => Some(Status::Calibrating),
            CalibrationEvent::Committed(_) => Some(Status::CalibrationComplete),
            CalibrationEvent::Idle | CalibrationEvent::Dwelling { .. } => None,
        };
        match self.drawing.on_point_frame(pointer, modes, now) {
            StrokeStep::Began(shape) => {
                out.status = Some(Status::Drawing(shape));
            }
            StrokeStep::Drew(commands) => {
                out.commands = commands;
                out.status = calibration_status;
            }
        }
        out
    }

    /// Drop all session state, as when the camera stops.
    pub fn reset(&mut self) {
        self.calibration.reset();
        self.drawing.on_non_point_frame();
        self.router.reset();
        log::info!("session state reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_texts() {
        assert_eq!(Status::Drawing(ShapeMode::Free).to_string(), "Drawing mode: ON (Free draw)");
        assert_eq!(Status::Drawing(ShapeMode::Circle).to_string(), "Drawing mode: ON (circle)");
        assert_eq!(Status::Gesture(Gesture::TwoFingers).to_string(), "Gesture: two_fingers");
        assert_eq!(Status::Selected(ControlId::ShapeMode).to_string(), "Selected: shapeMode");
        assert_eq!(Status::CameraError("busy".into()).to_string(), "Camera error: busy");
        assert_eq!(Status::Ready.to_string(), "Press Enter to start the camera");
    }

    #[test]
    fn no_hand_reports_status_only() {
        let mut s = SketchSession::default();
        let out = s.on_frame(None, &Modes::default(), Timestamp::from_secs(1));
        assert_eq!(out.status, Some(Status::NoHand));
        assert!(out.commands.is_empty());
        assert_eq!(out.gesture, None);
    }
}
