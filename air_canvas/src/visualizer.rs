//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌────────┬────────┬────────┬──────────┬─────────────┬───────────┐
//! │ Start  │ Stop   │ Clear  │ penColor │ drawingMode │ shapeMode │  control strip
//! ├────────┴────────┴────────┴──────────┴─────────────┴───────────┤
//! │                                                               │
//! │            drawing canvas + hand overlay + pointer            │
//! │                        [calibration zone]                     │
//! │                                                               │
//! ├───────────────────────────────────────────────────────────────┤
//! │ status bar                                                    │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use hand_gesture::landmark::HAND_SKELETON;
use hand_gesture::{Gesture, LandmarkFrame, Point2D};
use sketch_session::{ControlId, ControlPanel, ControlValue, LineCap, CONTROL_SLOTS};

use crate::canvas::Canvas;
use crate::config::WindowConfig;
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:        usize = 26;
const FONT_SCALE:      usize = 2;
const PANEL_BG:        u32   = 0xFF1A1A2E;
const SLOT_BORDER:     u32   = 0xFF0F3460;
const SELECTED_COLOR:  u32   = 0xFFFFD700;  // gold
const LABEL_COLOR:     u32   = 0xFFEEEEEE;
const DIM_LABEL:       u32   = 0xFF777777;
const STATUS_BG:       u32   = 0xFF0F3460;
const ZONE_COLOR:      u32   = 0xFF44AAFF;
const NO_HAND_COLOR:   u32   = 0xFF888888;

// ════════════════════════════════════════════════════════════════════════════
// Scene: everything one frame shows besides the canvas
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene<'a> {
    pub panel:         &'a ControlPanel,
    pub selected:      Option<ControlId>,
    pub hand:          Option<&'a LandmarkFrame>,
    pub gesture:       Option<Gesture>,
    /// Corrected fingertip.
    pub pointer:       Option<Point2D>,
    pub status:        &'a str,
    pub panel_height:  usize,
    /// Half-size of the calibration zone; drawn while the camera runs.
    pub zone_radius:   Option<f32>,
}

/// Commands the keyboard issues directly, bypassing gestures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    StartCamera,
    StopCamera,
    ClearCanvas,
    PenSize(i32),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    frame:  Canvas,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(cfg: &WindowConfig, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            &cfg.title,
            cfg.width, cfg.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("creating window: {}", e))?;

        let fps = u64::from(cfg.fps.max(1));
        window.limit_update_rate(Some(Duration::from_micros(1_000_000 / fps)));

        Ok(Visualizer {
            window,
            frame: Canvas::new(cfg.width, cfg.height),
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse. Forwards the simulated hand to the sim
    /// source and returns the direct key commands.
    pub fn poll_input(&mut self) -> Vec<KeyCommand> {
        let mut cmds = Vec::new();
        if !self.window.is_open() {
            cmds.push(KeyCommand::Quit);
            return cmds;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            cmds.push(KeyCommand::Quit);
            return cmds;
        }
        if one_shot(Key::Enter)     { cmds.push(KeyCommand::StartCamera); }
        if one_shot(Key::Backspace) { cmds.push(KeyCommand::StopCamera); }
        if one_shot(Key::C)         { cmds.push(KeyCommand::ClearCanvas); }
        if held(Key::Equal) || held(Key::NumPadPlus)   { cmds.push(KeyCommand::PenSize(1)); }
        if held(Key::Minus) || held(Key::NumPadMinus)  { cmds.push(KeyCommand::PenSize(-1)); }

        let pose = self.held_pose();
        let (w, h) = (self.frame.width() as f32, self.frame.height() as f32);
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let _ = self.sim_tx.send(SimInput::Hand { x: mx / w, y: my / h, pose });
        }
        cmds
    }

    /// Number keys pick a pose; the left mouse button alone means Point.
    fn held_pose(&self) -> Option<SimPose> {
        let down = |k: Key| self.window.is_key_down(k);
        if down(Key::Key1) { return Some(SimPose::Point); }
        if down(Key::Key2) { return Some(SimPose::Palm); }
        if down(Key::Key3) { return Some(SimPose::TwoFingers); }
        if down(Key::Key4) { return Some(SimPose::Pinch); }
        if down(Key::Key5) { return Some(SimPose::Fist); }
        self.window.get_mouse_down(MouseButton::Left).then_some(SimPose::Point)
    }

    /// Render one frame.
    pub fn render(&mut self, canvas: &Canvas, scene: &Scene) {
        compose(&mut self.frame, canvas, scene);
        let (w, h) = (self.frame.width(), self.frame.height());
        self.window.update_with_buffer(self.frame.pixels(), w, h).ok();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Composition (window-free)
// ════════════════════════════════════════════════════════════════════════════

/// Paint `canvas` plus every overlay of `scene` into `frame`.
pub fn compose(frame: &mut Canvas, canvas: &Canvas, scene: &Scene) {
    frame.copy_from(canvas);

    if let Some(r) = scene.zone_radius {
        draw_zone(frame, r);
    }
    draw_panel(frame, scene);
    if let Some(hand) = scene.hand {
        draw_hand(frame, hand, gesture_color(scene.gesture));
    }
    if let Some(p) = scene.pointer {
        frame.stroke_circle(p, 8.0, 2.0, gesture_color(scene.gesture));
    }
    draw_status(frame, scene.status);
}

/// Pixel rectangle `(x, y, w, h)` of control slot `index`.
pub fn slot_rect(index: usize, width: usize, panel_height: usize) -> (usize, usize, usize, usize) {
    let col = width / CONTROL_SLOTS.len();
    let w = if index + 1 == CONTROL_SLOTS.len() { width - col * index } else { col };
    (index * col, 0, w, panel_height)
}

fn draw_panel(frame: &mut Canvas, scene: &Scene) {
    let width = frame.width();
    frame.fill_rect(0, 0, width, scene.panel_height, PANEL_BG);

    for (i, &id) in CONTROL_SLOTS.iter().enumerate() {
        let (x, y, w, h) = slot_rect(i, width, scene.panel_height);
        frame.draw_border(x, y, w, h, SLOT_BORDER);

        let enabled = match id {
            ControlId::StartCamera => !scene.panel.camera_active(),
            ControlId::StopCamera  => scene.panel.camera_active(),
            _ => true,
        };
        let color = if enabled { LABEL_COLOR } else { DIM_LABEL };
        draw_label(frame, id.label(), x + 8, y + 10, color);

        match scene.panel.value(id) {
            Some(ControlValue::Color(c)) => {
                frame.fill_rect(x + 8, y + 30, w.saturating_sub(16), 16, c.to_argb());
            }
            Some(ControlValue::Choice(_)) => {
                let text = match id {
                    ControlId::DrawingMode => scene.panel.modes().drawing_mode.name(),
                    _                      => scene.panel.modes().shape_mode.name(),
                };
                draw_label(frame, text, x + 8, y + 32, SELECTED_COLOR);
            }
            _ => {}
        }

        if scene.selected == Some(id) {
            for inset in 0..3 {
                frame.draw_border(
                    x + inset, y + inset,
                    w.saturating_sub(2 * inset), h.saturating_sub(2 * inset),
                    SELECTED_COLOR,
                );
            }
        }
    }

    let size = format!("size {}", scene.panel.modes().stroke_width);
    let x = width.saturating_sub(text_width(&size) + 8);
    draw_label(frame, &size, x, scene.panel_height.saturating_sub(14), DIM_LABEL);
}

fn draw_zone(frame: &mut Canvas, radius: f32) {
    let (cx, cy) = (frame.width() as f32 / 2.0, frame.height() as f32 / 2.0);
    let x = (cx - radius).max(0.0) as usize;
    let y = (cy - radius).max(0.0) as usize;
    let side = (2.0 * radius) as usize;
    frame.draw_border(x, y, side, side, ZONE_COLOR);
    frame.stroke_segment(Point2D::new(cx - 6.0, cy), Point2D::new(cx + 6.0, cy), 1.0, LineCap::Round, ZONE_COLOR);
    frame.stroke_segment(Point2D::new(cx, cy - 6.0), Point2D::new(cx, cy + 6.0), 1.0, LineCap::Round, ZONE_COLOR);
}

fn draw_hand(frame: &mut Canvas, hand: &LandmarkFrame, color: u32) {
    let (w, h) = (frame.width() as f32, frame.height() as f32);
    let at = |i: usize| {
        let p = hand.points()[i];
        Point2D::new(p.x * w, p.y * h)
    };
    let bone = blend(color, 0xFFFFFFFF, 0.4);
    for (a, b) in HAND_SKELETON {
        frame.stroke_segment(at(a), at(b), 2.0, LineCap::Round, bone);
    }
    for i in 0..hand.points().len() {
        frame.fill_disc(at(i), 3.0, color);
    }
}

fn draw_status(frame: &mut Canvas, status: &str) {
    let (w, h) = (frame.width(), frame.height());
    let y = h.saturating_sub(STATUS_H);
    frame.fill_rect(0, y, w, STATUS_H, STATUS_BG);
    draw_label(frame, status, 10, y + 8, LABEL_COLOR);

    let legend = "1-5=pose  enter=start  backspace=stop  c=clear  +/-=size  q=quit";
    let x = w.saturating_sub(text_width(legend) + 10);
    draw_label(frame, legend, x, y + 8, DIM_LABEL);
}

/// Overlay colour per gesture.
pub fn gesture_color(g: Option<Gesture>) -> u32 {
    match g {
        Some(Gesture::Point)      => 0xFF00C853,
        Some(Gesture::Palm)       => 0xFF2979FF,
        Some(Gesture::TwoFingers) => 0xFFFF9100,
        Some(Gesture::Pinch)      => 0xFFD500F9,
        Some(Gesture::Fist)       => 0xFFFF1744,
        Some(Gesture::Unknown) | None => NO_HAND_COLOR,
    }
}

// ── Text ────────────────────────────────────────────────────────────────────

pub fn text_width(text: &str) -> usize {
    text.chars().count() * 4 * FONT_SCALE
}

/// Minimal bitmap font: 3×5 glyphs, scaled by `FONT_SCALE`.
pub fn draw_label(frame: &mut Canvas, text: &str, x: usize, y: usize, color: u32) {
    let mut cx = x;
    for ch in text.chars() {
        let glyph = char_glyph(ch);
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..3usize {
                if bits & (1 << (2 - col)) != 0 {
                    frame.fill_rect(cx + col * FONT_SCALE, y + row * FONT_SCALE, FONT_SCALE, FONT_SCALE, color);
                }
            }
        }
        cx += 4 * FONT_SCALE; // 3 wide + 1 gap
        if cx + 4 * FONT_SCALE > frame.width() { break; }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
