//! Colours and the externally-owned drawing modes read on every frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hand_gesture::Timestamp;

// ════════════════════════════════════════════════════════════════════════════
// Color
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid colour {0:?}: expected #rrggbb")]
pub struct ParseColorError(pub String);

/// Opaque RGB colour. Serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK:   Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED:     Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GREEN:   Color = Color::rgb(0x00, 0xFF, 0x00);
    pub const BLUE:    Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const YELLOW:  Color = Color::rgb(0xFF, 0xFF, 0x00);
    pub const MAGENTA: Color = Color::rgb(0xFF, 0x00, 0xFF);
    pub const CYAN:    Color = Color::rgb(0x00, 0xFF, 0xFF);
    pub const WHITE:   Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Packed `0xAARRGGBB` with full alpha, the framebuffer format.
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// The 8 colours reachable through the colour control, in slider order.
pub const PALETTE: [Color; 8] = [
    Color::BLACK,
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::YELLOW,
    Color::MAGENTA,
    Color::CYAN,
    Color::WHITE,
];

/// Canvas background; the eraser paints with it.
pub const BACKGROUND: Color = Color::WHITE;

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Color> for String {
    fn from(c: Color) -> String { c.to_string() }
}

/// Time-cycled colour for rainbow mode: each channel is
/// `128 + 127·sin(t·k)` for `k` = 1.0, 1.1, 1.2, `t` in epoch seconds.
pub fn rainbow_color(now: Timestamp) -> Color {
    let t = now.as_secs_f64();
    let channel = |k: f64| ((t * k).sin() * 127.0 + 128.0).floor() as u8;
    Color::rgb(channel(1.0), channel(1.1), channel(1.2))
}

// ════════════════════════════════════════════════════════════════════════════
// Modes
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} {name:?}")]
pub struct ParseModeError {
    pub kind: &'static str,
    pub name: String,
}

/// Brush used by freehand strokes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingMode {
    #[default]
    Pen,
    Spray,
    Eraser,
    Rainbow,
}

impl DrawingMode {
    pub const ALL: [DrawingMode; 4] =
        [DrawingMode::Pen, DrawingMode::Spray, DrawingMode::Eraser, DrawingMode::Rainbow];

    pub fn name(&self) -> &'static str {
        match self {
            DrawingMode::Pen     => "pen",
            DrawingMode::Spray   => "spray",
            DrawingMode::Eraser  => "eraser",
            DrawingMode::Rainbow => "rainbow",
        }
    }
}

/// Whether Point draws freehand or drags out a shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    #[default]
    Free,
    Line,
    Circle,
    Rectangle,
}

impl ShapeMode {
    pub const ALL: [ShapeMode; 4] =
        [ShapeMode::Free, ShapeMode::Line, ShapeMode::Circle, ShapeMode::Rectangle];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeMode::Free      => "free",
            ShapeMode::Line      => "line",
            ShapeMode::Circle    => "circle",
            ShapeMode::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for DrawingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl fmt::Display for ShapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for DrawingMode {
    type Err = ParseModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrawingMode::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ParseModeError { kind: "drawing mode", name: s.to_string() })
    }
}

impl FromStr for ShapeMode {
    type Err = ParseModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeMode::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ParseModeError { kind: "shape mode", name: s.to_string() })
    }
}

/// Everything the drawing state machine reads from the controls each frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modes {
    pub drawing_mode: DrawingMode,
    pub shape_mode:   ShapeMode,
    pub color:        Color,
    pub stroke_width: u32,
}

impl Default for Modes {
    fn default() -> Self {
        Modes {
            drawing_mode: DrawingMode::Pen,
            shape_mode:   ShapeMode::Free,
            color:        Color::BLACK,
            stroke_width: 5,
        }
    }
}

impl Modes {
    /// Colour actually painted this frame: rainbow overrides the pen colour
    /// without touching it.
    pub fn effective_color(&self, now: Timestamp) -> Color {
        match self.drawing_mode {
            DrawingMode::Rainbow => rainbow_color(now),
            _ => self.color,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
