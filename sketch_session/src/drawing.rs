//! Stroke continuity across frames.
//!
//! A stroke is either freehand or a shape drag, never both: the two
//! sub-states live in one enum. The first Point frame after an idle frame
//! only records where the stroke starts; every following Point frame emits
//! primitives. Anything other than Point ends the stroke.
//!
//! Shape previews are destructive: each frame clears the whole surface and
//! repaints the shape from its anchor to the fingertip. There is no retained
//! stroke history, so prior freehand work is wiped when a shape drag starts
//! drawing.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hand_gesture::{Point2D, Timestamp};

use crate::command::{DrawCommand, LineCap, LineJoin};
use crate::modes::{DrawingMode, Modes, ShapeMode, BACKGROUND};

// ════════════════════════════════════════════════════════════════════════════
// Stroke
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Stroke {
    #[default]
    Idle,
    /// Freehand: segments run from `last` to the current point.
    Freehand { last: Point2D },
    /// Shape drag anchored at `start`.
    Shape { start: Point2D },
}

/// Result of feeding one Point frame to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum StrokeStep {
    /// A new stroke was anchored; nothing drawn yet.
    Began(ShapeMode),
    /// The stroke continued with these primitives, in order.
    Drew(Vec<DrawCommand>),
}

// ════════════════════════════════════════════════════════════════════════════
// DrawingSession
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct DrawingSession {
    stroke: Stroke,
    rng:    StdRng,
}

impl Default for DrawingSession {
    fn default() -> Self {
        DrawingSession::new(None)
    }
}

impl DrawingSession {
    /// `seed` fixes the spray pattern; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };
        DrawingSession { stroke: Stroke::Idle, rng }
    }

    pub fn stroke(&self) -> Stroke { self.stroke }

    pub fn is_drawing(&self) -> bool {
        matches!(self.stroke, Stroke::Freehand { .. })
    }

    pub fn is_shape_drawing(&self) -> bool {
        matches!(self.stroke, Stroke::Shape { .. })
    }

    /// Advance the stroke with the corrected fingertip of a Point frame.
    pub fn on_point_frame(&mut self, p: Point2D, modes: &Modes, now: Timestamp) -> StrokeStep {
        let free = modes.shape_mode == ShapeMode::Free;
        match self.stroke {
            Stroke::Freehand { last } if free => {
                let cmds = self.brush(last, p, modes, now);
                self.stroke = Stroke::Freehand { last: p };
                StrokeStep::Drew(cmds)
            }
            Stroke::Shape { start } if !free => {
                StrokeStep::Drew(vec![DrawCommand::Clear, shape(start, p, modes, now)])
            }
            // Idle, or the shape mode flipped mid-stroke: anchor a fresh one.
            _ => {
                self.stroke = if free {
                    Stroke::Freehand { last: p }
                } else {
                    Stroke::Shape { start: p }
                };
                log::debug!("stroke began ({}) at ({:.1}, {:.1})", modes.shape_mode, p.x, p.y);
                StrokeStep::Began(modes.shape_mode)
            }
        }
    }

    /// Any non-Point frame, or no hand at all.
    pub fn on_non_point_frame(&mut self) {
        self.stroke = Stroke::Idle;
    }

    fn brush(&mut self, from: Point2D, to: Point2D, modes: &Modes, now: Timestamp) -> Vec<DrawCommand> {
        let size = modes.stroke_width as f32;
        match modes.drawing_mode {
            DrawingMode::Pen | DrawingMode::Rainbow => vec![DrawCommand::Segment {
                from,
                to,
                color: modes.effective_color(now),
                width: size,
                cap:   LineCap::Round,
                join:  LineJoin::Round,
            }],
            DrawingMode::Spray => {
                let density = modes.stroke_width as usize * 2;
                let radius  = size * 2.0;
                (0..density)
                    .map(|_| {
                        let angle: f32 = self.rng.gen_range(0.0..TAU);
                        let dist:  f32 = self.rng.gen::<f32>() * radius;
                        DrawCommand::FilledCircle {
                            center: Point2D::new(to.x + angle.cos() * dist, to.y + angle.sin() * dist),
                            radius: size / 4.0,
                            color:  modes.color,
                        }
                    })
                    .collect()
            }
            DrawingMode::Eraser => vec![DrawCommand::FilledCircle {
                center: to,
                radius: size,
                color:  BACKGROUND,
            }],
        }
    }
}

/// The shape primitive spanning `start` to `end`. Only called outside free mode.
fn shape(start: Point2D, end: Point2D, modes: &Modes, now: Timestamp) -> DrawCommand {
    let color = modes.effective_color(now);
    let width = modes.stroke_width as f32;
    match modes.shape_mode {
        ShapeMode::Circle => DrawCommand::StrokedCircle {
            center: start,
            radius: start.distance(end),
            color,
            width,
        },
        ShapeMode::Rectangle => DrawCommand::Rect { from: start, to: end, color, width },
        ShapeMode::Line | ShapeMode::Free => DrawCommand::Segment {
            from: start,
            to:   end,
            color,
            width,
            cap:  LineCap::Round,
            join: LineJoin::Miter,
        },
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
