//! Drawing primitives emitted by the session, and the surface that
//! consumes them.
//!
//! The session never rasterizes anything itself. It produces an ordered list
//! of [`DrawCommand`]s per frame; whatever implements [`DrawSurface`] (the
//! software canvas in the app, or [`CommandLog`] in tests) paints them.

use hand_gesture::Point2D;

use crate::modes::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
}

/// One primitive drawing operation in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Straight stroked segment.
    Segment {
        from:  Point2D,
        to:    Point2D,
        color: Color,
        width: f32,
        cap:   LineCap,
        join:  LineJoin,
    },
    /// Solid disc (spray dots, eraser).
    FilledCircle {
        center: Point2D,
        radius: f32,
        color:  Color,
    },
    /// Circle outline (circle shape).
    StrokedCircle {
        center: Point2D,
        radius: f32,
        color:  Color,
        width:  f32,
    },
    /// Axis-aligned rectangle outline spanning two corners.
    Rect {
        from:  Point2D,
        to:    Point2D,
        color: Color,
        width: f32,
    },
    /// Wipe the whole surface to the background colour.
    Clear,
}

/// Anything that can paint [`DrawCommand`]s.
pub trait DrawSurface {
    fn draw(&mut self, cmd: &DrawCommand);

    fn draw_all(&mut self, cmds: &[DrawCommand]) {
        for cmd in cmds {
            self.draw(cmd);
        }
    }
}

/// Surface that only records what it was asked to paint.
#[derive(Clone, Debug, Default)]
pub struct CommandLog {
    pub commands: Vec<DrawCommand>,
}

impl CommandLog {
    pub fn len(&self) -> usize { self.commands.len() }
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Commands recorded since the most recent `Clear`.
    pub fn since_last_clear(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::Clear)
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }
}

impl DrawSurface for CommandLog {
    fn draw(&mut self, cmd: &DrawCommand) {
        self.commands.push(cmd.clone());
    }
}
