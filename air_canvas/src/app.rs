//! Top-level application state machine.
//!
//! `AppState` owns the `SketchSession`, the `ControlPanel` and the raster
//! `Canvas`. It processes `SourceEvent`s and key commands one at a time and
//! hands the visualizer a `Scene` each frame. Frames that arrive while the
//! camera is off are dropped unprocessed.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use hand_gesture::{Gesture, LandmarkFrame, Point2D, Timestamp};
use sketch_session::{ControlId, ControlPanel, DrawSurface, PanelEffect, SketchSession, Status};

use crate::canvas::Canvas;
use crate::config::{AppConfig, SourceKind};
use crate::source::{
    spawn_landmark_source, ReplaySource, SimInput, SimLandmarkSource, SourceEvent,
};
use crate::visualizer::{KeyCommand, Scene, Visualizer};

/// Wall-clock time since the UNIX epoch.
pub fn wall_clock() -> Timestamp {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── per-frame core ───────────────────────────────────────────────────
    session: SketchSession,
    panel:   ControlPanel,
    canvas:  Canvas,

    // ── last frame, for the overlay ───────────────────────────────────────
    hand:    Option<LandmarkFrame>,
    gesture: Option<Gesture>,
    pointer: Option<Point2D>,

    // ── status line ───────────────────────────────────────────────────────
    status:      Status,
    status_text: String,

    // ── layout ────────────────────────────────────────────────────────────
    panel_height: usize,
    zone_radius:  f32,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let session = SketchSession::new(cfg.session_config());
        AppState {
            session,
            panel:        ControlPanel::new(cfg.modes),
            canvas:       Canvas::new(cfg.window.width, cfg.window.height),
            hand:         None,
            gesture:      None,
            pointer:      None,
            status_text:  Status::Ready.to_string(),
            status:       Status::Ready,
            panel_height: cfg.session.controls.panel_height.max(0.0) as usize,
            zone_radius:  cfg.session.calibration.radius_px,
        }
    }

    fn set_status(&mut self, status: Status) {
        if status != self.status {
            log::debug!("status: {}", status);
            self.status_text = status.to_string();
            self.status = status;
        }
    }

    // ── process one SourceEvent ──────────────────────────────────────────

    pub fn handle_source_event(&mut self, event: SourceEvent, now: Timestamp) {
        match event {
            SourceEvent::Frame(frame) => {
                if !self.panel.camera_active() {
                    log::trace!("camera off, frame dropped");
                    return;
                }
                self.process_frame(frame, now);
            }
            SourceEvent::Failed(msg) => {
                log::warn!("landmark source failed: {}", msg);
                self.stop_camera();
                self.set_status(Status::CameraError(msg));
            }
            SourceEvent::Finished => {
                log::info!("landmark source finished");
                self.stop_camera();
            }
        }
    }

    fn process_frame(&mut self, frame: Option<LandmarkFrame>, now: Timestamp) {
        let modes = *self.panel.modes();
        let out = self.session.on_frame(frame.as_ref(), &modes, now);

        self.canvas.draw_all(&out.commands);
        self.hand    = frame;
        self.gesture = out.gesture;
        self.pointer = out.pointer;
        if let Some(status) = out.status {
            self.set_status(status);
        }
        if let Some(effect) = self.panel.apply(&out.action) {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: PanelEffect) {
        match effect {
            PanelEffect::StartCamera => {
                log::info!("camera started");
                self.set_status(Status::CameraActive);
            }
            PanelEffect::StopCamera => {
                log::info!("camera stopped");
                self.session.reset();
                self.hand    = None;
                self.gesture = None;
                self.pointer = None;
                self.set_status(Status::CameraOff);
            }
            PanelEffect::ClearCanvas => {
                log::info!("canvas cleared");
                self.canvas.clear();
            }
        }
    }

    fn stop_camera(&mut self) {
        if let Some(effect) = self.panel.primary_action(ControlId::StopCamera) {
            self.apply_effect(effect);
        }
    }

    // ── keyboard ─────────────────────────────────────────────────────────

    /// Returns false on quit.
    pub fn handle_key(&mut self, cmd: KeyCommand) -> bool {
        let trigger = match cmd {
            KeyCommand::StartCamera => ControlId::StartCamera,
            KeyCommand::StopCamera  => ControlId::StopCamera,
            KeyCommand::ClearCanvas => ControlId::ClearCanvas,
            KeyCommand::PenSize(delta) => {
                self.panel.nudge_pen_size(delta);
                return true;
            }
            KeyCommand::Quit => return false,
        };
        if let Some(effect) = self.panel.primary_action(trigger) {
            self.apply_effect(effect);
        }
        true
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn canvas(&self)  -> &Canvas        { &self.canvas }
    pub fn panel(&self)   -> &ControlPanel  { &self.panel }
    pub fn session(&self) -> &SketchSession { &self.session }
    pub fn status(&self)  -> &Status        { &self.status }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            panel:        &self.panel,
            selected:     self.session.router().selected(),
            hand:         self.hand.as_ref(),
            gesture:      self.gesture,
            pointer:      self.pointer,
            status:       &self.status_text,
            panel_height: self.panel_height,
            zone_radius:  self.panel.camera_active().then_some(self.zone_radius),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn open_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Result<Receiver<SourceEvent>> {
    Ok(match cfg.source.kind {
        SourceKind::Sim => spawn_landmark_source(SimLandmarkSource { rx: sim_rx }),
        SourceKind::Replay => {
            let path = cfg.source.path.clone().context("replay source needs a path")?;
            spawn_landmark_source(ReplaySource::new(path))
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => spawn_landmark_source(crate::source::LeapLandmarkSource),
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => anyhow::bail!("built without LeapMotion support (enable the `leap` feature)"),
    })
}

/// Run the full application.
///
/// This is the entry point called from `main.rs`. It creates the visualizer
/// and the configured landmark source, then drives the event/render loop at
/// the configured frame rate. All frame processing happens on this thread.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Sim input channel ────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let source_rx = open_source(&cfg, sim_rx)?;

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(&cfg.window, sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);
    if cfg.source.autostart {
        app.handle_key(KeyCommand::StartCamera);
    }

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Keyboard commands, and the simulated hand to the sim source
        for cmd in vis.poll_input() {
            if !app.handle_key(cmd) {
                return Ok(());
            }
        }

        // 2. Drain landmark events, strictly in order
        loop {
            match source_rx.try_recv() {
                Ok(event) => app.handle_source_event(event, wall_clock()),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        // 3. Render
        vis.render(app.canvas(), &app.scene());
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{synth_hand, SimPose};
    use std::time::Duration;

    const BLACK: u32 = 0xFF000000;
    const WHITE: u32 = 0xFFFFFFFF;

    fn make_app() -> AppState {
        AppState::new(&AppConfig::default())
    }

    fn ms(n: u64) -> Timestamp {
        Duration::from_millis(1_700_000_000_000 + n)
    }

    /// A hand event with the index tip at window pixel `(x, y)` (1280×720).
    fn hand(pose: SimPose, x: f32, y: f32) -> SourceEvent {
        SourceEvent::Frame(Some(synth_hand(pose, x / 1280.0, y / 720.0)))
    }

    fn started() -> AppState {
        let mut app = make_app();
        app.handle_key(KeyCommand::StartCamera);
        app
    }

    #[test]
    fn frames_dropped_while_camera_off() {
        let mut app = make_app();
        app.handle_source_event(hand(SimPose::Point, 384.0, 360.0), ms(0));
        app.handle_source_event(hand(SimPose::Point, 448.0, 360.0), ms(33));
        assert!(app.canvas().pixels().iter().all(|&p| p == WHITE));
        assert_eq!(*app.status(), Status::Ready);
        assert_eq!(app.scene().status, "Press Enter to start the camera");
        assert!(app.scene().hand.is_none());
    }

    #[test]
    fn start_then_point_draws() {
        let mut app = started();
        assert_eq!(*app.status(), Status::CameraActive);
        app.handle_source_event(hand(SimPose::Point, 384.0, 360.0), ms(0));
        app.handle_source_event(hand(SimPose::Point, 448.0, 360.0), ms(33));
        assert_eq!(app.canvas().pixel(416, 360), Some(BLACK));
        assert_eq!(*app.status(), Status::Drawing(sketch_session::ShapeMode::Free));
        assert_eq!(app.scene().gesture, Some(Gesture::Point));
    }

    #[test]
    fn stop_key_resets_calibration_and_drops_later_frames() {
        let mut app = started();
        for t in [0, 1000, 2000] {
            app.handle_source_event(hand(SimPose::Point, 620.0, 350.0), ms(t));
        }
        assert!(!app.session().calibration().offset().is_zero());

        app.handle_key(KeyCommand::StopCamera);
        assert!(app.session().calibration().offset().is_zero());
        assert_eq!(*app.status(), Status::CameraOff);
        assert!(app.scene().pointer.is_none());

        let before = app.canvas().clone();
        app.handle_source_event(hand(SimPose::Point, 100.0, 600.0), ms(3000));
        app.handle_source_event(hand(SimPose::Point, 200.0, 600.0), ms(3033));
        assert_eq!(*app.canvas(), before);
    }

    #[test]
    fn pinch_on_stop_slot_stops_camera() {
        let mut app = started();
        app.handle_source_event(hand(SimPose::Palm, 300.0, 40.0), ms(0));
        assert_eq!(app.scene().selected, Some(ControlId::StopCamera));
        app.handle_source_event(hand(SimPose::Pinch, 300.0, 40.0), ms(600));
        assert!(!app.panel().camera_active());
        assert_eq!(*app.status(), Status::CameraOff);
        assert_eq!(app.scene().selected, None);
    }

    #[test]
    fn pinch_on_clear_slot_wipes_canvas() {
        let mut app = started();
        app.handle_source_event(hand(SimPose::Point, 384.0, 360.0), ms(0));
        app.handle_source_event(hand(SimPose::Point, 448.0, 360.0), ms(33));
        assert_eq!(app.canvas().pixel(416, 360), Some(BLACK));

        app.handle_source_event(hand(SimPose::Palm, 500.0, 40.0), ms(100));
        app.handle_source_event(hand(SimPose::Pinch, 500.0, 40.0), ms(700));
        assert!(app.canvas().pixels().iter().all(|&p| p == WHITE));
        assert_eq!(*app.status(), Status::Activated(ControlId::ClearCanvas));
        assert!(app.panel().camera_active());
    }

    #[test]
    fn source_failure_surfaces_as_camera_error() {
        let mut app = started();
        app.handle_source_event(SourceEvent::Failed("no device".into()), ms(0));
        assert!(!app.panel().camera_active());
        assert_eq!(app.status().to_string(), "Camera error: no device");
        assert_eq!(app.scene().status, "Camera error: no device");
    }

    #[test]
    fn replay_finishing_stops_the_camera() {
        let mut app = started();
        app.handle_source_event(SourceEvent::Finished, ms(0));
        assert!(!app.panel().camera_active());
        assert_eq!(*app.status(), Status::CameraOff);
    }

    #[test]
    fn pen_size_keys_and_quit() {
        let mut app = make_app();
        for _ in 0..100 {
            app.handle_key(KeyCommand::PenSize(1));
        }
        assert_eq!(app.panel().modes().stroke_width, 50);
        assert!(!app.handle_key(KeyCommand::Quit));
    }

    #[test]
    fn calibration_zone_shown_only_while_running() {
        let mut app = make_app();
        assert_eq!(app.scene().zone_radius, None);
        app.handle_key(KeyCommand::StartCamera);
        assert_eq!(app.scene().zone_radius, Some(50.0));
    }
}
