//! Landmark sources: keyboard/mouse simulation, recorded replays and
//! LeapMotion hardware.
//!
//! The public interface is [`SourceEvent`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from hardware, a file,
//! or the simulator. The receiving end is the only consumer and handles
//! events strictly in arrival order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use hand_gesture::landmark::*;
use hand_gesture::{LandmarkFrame, Point3D};

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// One estimator output; `None` when no hand is in view.
    Frame(Option<LandmarkFrame>),
    /// The source could not start or died; nothing more will arrive.
    Failed(String),
    /// Clean end of input (replay exhausted, simulator closed).
    Finished,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait: unified interface for hw, file and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Hand pose selected by a held number key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    Point,      // 1
    Palm,       // 2
    TwoFingers, // 3
    Pinch,      // 4
    Fist,       // 5
}

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Cursor in normalized window coordinates, and the held pose. No pose
    /// means no hand in view.
    Hand { x: f32, y: f32, pose: Option<SimPose> },
    Quit,
}

/// Source driven by [`SimInput`] events from the visualizer's window.
///
/// The visualizer sends one `SimInput` per rendered frame; this translator
/// turns each into a synthetic landmark frame with the index fingertip
/// under the cursor.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        for input in self.rx {
            let event = match input {
                SimInput::Hand { x, y, pose } => {
                    SourceEvent::Frame(pose.map(|p| synth_hand(p, x, y)))
                }
                SimInput::Quit => break,
            };
            if tx.send(event).is_err() { return; }
        }
        let _ = tx.send(SourceEvent::Finished);
    }
}

// ── Synthetic hand ──────────────────────────────────────────────────────────
//
// Built in a wrist-local frame (wrist at origin, fingers pointing to -y),
// then translated so the index tip lands on the cursor.

const FINGER_BASE_X: [f32; 4] = [-0.04, 0.0, 0.04, 0.08]; // index..pinky
const MCP_Y: f32 = -0.15;

fn finger_joints(base_x: f32, extended: bool) -> [Point3D; 4] {
    let ys: [f32; 4] = if extended {
        [MCP_Y, -0.24, -0.31, -0.38]
    } else {
        [MCP_Y, -0.20, -0.16, -0.12]
    };
    ys.map(|y| Point3D::new(base_x, y, 0.0))
}

fn thumb_joints(pose: SimPose) -> [Point3D; 4] {
    let cmc = Point3D::new(-0.04, -0.04, 0.0);
    let mcp = Point3D::new(-0.08, -0.09, 0.0);
    let (ip, tip) = match pose {
        SimPose::Pinch => ((-0.12, -0.24), (-0.09, -0.34)),
        SimPose::Palm  => ((-0.13, -0.17), (-0.19, -0.26)),
        _              => ((-0.07, -0.12), (-0.03, -0.14)),
    };
    [
        cmc,
        mcp,
        Point3D::new(ip.0, ip.1, 0.0),
        Point3D::new(tip.0, tip.1, 0.0),
    ]
}

/// A 21-point hand making `pose`, index tip at normalized `(x, y)`.
pub fn synth_hand(pose: SimPose, x: f32, y: f32) -> LandmarkFrame {
    // index, middle, ring, pinky
    let up: [bool; 4] = match pose {
        SimPose::Point      => [true,  false, false, false],
        SimPose::Palm       => [true,  true,  true,  true ],
        SimPose::TwoFingers => [true,  true,  false, false],
        SimPose::Pinch      => [true,  true,  true,  false],
        SimPose::Fist       => [false, false, false, false],
    };

    let mut local = [Point3D::default(); LANDMARK_COUNT];
    local[THUMB_CMC..=THUMB_TIP].copy_from_slice(&thumb_joints(pose));
    for (finger, (&base_x, &extended)) in FINGER_BASE_X.iter().zip(up.iter()).enumerate() {
        let first = INDEX_MCP + finger * 4;
        local[first..first + 4].copy_from_slice(&finger_joints(base_x, extended));
    }

    let anchor = local[INDEX_TIP];
    LandmarkFrame::new(local.map(|p| Point3D::new(p.x - anchor.x + x, p.y - anchor.y + y, p.z)))
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource: JSON-lines recordings
// ════════════════════════════════════════════════════════════════════════════

/// One line of a recording:
/// `{"t_ms": 1200, "landmarks": [[x, y, z], ...21]}` or `"landmarks": null`.
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    t_ms:      u64,
    landmarks: Option<Vec<[f32; 3]>>,
}

/// Parse one recording line into its timestamp and frame.
pub fn parse_replay_line(line: &str) -> Result<(u64, Option<LandmarkFrame>)> {
    let record: ReplayRecord = serde_json::from_str(line).context("malformed record")?;
    let frame = record
        .landmarks
        .map(|triples| LandmarkFrame::from_triples(&triples))
        .transpose()?;
    Ok((record.t_ms, frame))
}

/// Plays a recording back, paced by the recorded timestamps.
pub struct ReplaySource {
    pub path: PathBuf,
    /// Multiplies every recorded delay; 0 plays as fast as possible.
    pub pace: f32,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ReplaySource { path: path.into(), pace: 1.0 }
    }
}

impl LandmarkSource for ReplaySource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let file = match File::open(&self.path) {
            Ok(f)  => f,
            Err(e) => {
                log::warn!("cannot open replay {}: {}", self.path.display(), e);
                let _ = tx.send(SourceEvent::Failed(format!("{}: {}", self.path.display(), e)));
                return;
            }
        };
        log::info!("replaying {}", self.path.display());

        let mut last_t: Option<u64> = None;
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(l)  => l,
                Err(e) => {
                    let _ = tx.send(SourceEvent::Failed(format!("{}: {}", self.path.display(), e)));
                    return;
                }
            };
            if line.trim().is_empty() { continue; }

            let (t_ms, frame) = match parse_replay_line(&line) {
                Ok(r)  => r,
                Err(e) => {
                    log::warn!("{}:{}: skipped: {:#}", self.path.display(), n + 1, e);
                    continue;
                }
            };
            if let Some(prev) = last_t {
                let delay = t_ms.saturating_sub(prev) as f32 * self.pace;
                if delay > 0.0 {
                    thread::sleep(Duration::from_secs_f32(delay / 1000.0));
                }
            }
            last_t = Some(t_ms);
            if tx.send(SourceEvent::Frame(frame)).is_err() { return; }
        }
        let _ = tx.send(SourceEvent::Finished);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// The first tracked hand's joints are reordered into the 21-point layout
/// and millimetres are scaled into `[0, 1]`: x so that moving the hand right
/// moves the cursor right, y inverted so up is up.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(SourceEvent::Failed(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(SourceEvent::Failed(format!("LeapMotion device: {:?}", e)));
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let hand = frame.hands().next().and_then(|hand| {
                    let digits: Vec<_> = hand.digits().collect();
                    if digits.len() < 5 { return None; }

                    let wrist = digits[2].metacarpal().prev_joint();
                    let mut points = vec![leap_to_normalized(wrist.x, wrist.y, wrist.z)];
                    for d in &digits {
                        // The thumb's metacarpal is zero-length; its proximal bone starts at the CMC.
                        for j in [
                            d.proximal().prev_joint(),
                            d.intermediate().prev_joint(),
                            d.distal().prev_joint(),
                            d.distal().next_joint(),
                        ] {
                            points.push(leap_to_normalized(j.x, j.y, j.z));
                        }
                    }
                    LandmarkFrame::from_slice(&points).ok()
                });
                if tx.send(SourceEvent::Frame(hand)).is_err() { return; }
            }
        }
    }
}

/// Millimetres above the device to normalized image space.
#[cfg(feature = "leap")]
fn leap_to_normalized(x: f32, y: f32, z: f32) -> Point3D {
    // Interaction box.
    const HALF_WIDTH: f32 = 200.0;
    const Y_MIN:      f32 = 100.0;
    const Y_SPAN:     f32 = 300.0;
    Point3D::new(0.5 + x / (2.0 * HALF_WIDTH), 1.0 - (y - Y_MIN) / Y_SPAN, z / 1000.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
