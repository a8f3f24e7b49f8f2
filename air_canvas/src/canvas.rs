//! Software raster canvas.
//!
//! A packed `0xAARRGGBB` pixel buffer, the same format `minifb` presents.
//! It is the drawing surface for session output and the scratch buffer the
//! visualizer composes overlays onto.

use hand_gesture::Point2D;
use sketch_session::{Color, DrawCommand, DrawSurface, LineCap, BACKGROUND};

#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, pixels: vec![BACKGROUND.to_argb(); width * height] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BACKGROUND.to_argb());
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Overwrite this canvas with another of the same size.
    pub fn copy_from(&mut self, other: &Canvas) {
        if other.pixels.len() == self.pixels.len() {
            self.pixels.copy_from_slice(&other.pixels);
        }
    }

    // ── Integer primitives ────────────────────────────────────────────────

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.pixels[row * self.width + col] = color;
            }
        }
    }

    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    // ── Anti-alias-free float primitives ──────────────────────────────────

    /// Visit every pixel centre inside the clipped box `[x0, x1] × [y0, y1]`.
    fn for_each_in(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, mut f: impl FnMut(f32, f32) -> bool, color: u32) {
        let clip = |v: f32, max: usize| v.max(0.0).min(max as f32) as usize;
        let (cx0, cx1) = (clip(x0.floor(), self.width), clip(x1.ceil() + 1.0, self.width));
        let (cy0, cy1) = (clip(y0.floor(), self.height), clip(y1.ceil() + 1.0, self.height));
        for row in cy0..cy1 {
            for col in cx0..cx1 {
                if f(col as f32 + 0.5, row as f32 + 0.5) {
                    self.pixels[row * self.width + col] = color;
                }
            }
        }
    }

    pub fn fill_disc(&mut self, c: Point2D, radius: f32, color: u32) {
        let r2 = radius * radius;
        self.for_each_in(
            c.x - radius, c.y - radius, c.x + radius, c.y + radius,
            |x, y| (x - c.x).powi(2) + (y - c.y).powi(2) <= r2,
            color,
        );
    }

    /// Circle outline of the given stroke width, centred on `radius`.
    pub fn stroke_circle(&mut self, c: Point2D, radius: f32, width: f32, color: u32) {
        let half = width.max(1.0) / 2.0;
        let outer = radius + half;
        self.for_each_in(
            c.x - outer, c.y - outer, c.x + outer, c.y + outer,
            |x, y| ((x - c.x).hypot(y - c.y) - radius).abs() <= half,
            color,
        );
    }

    /// Thick segment. Round caps extend by half the width past each end.
    pub fn stroke_segment(&mut self, a: Point2D, b: Point2D, width: f32, cap: LineCap, color: u32) {
        let half = width.max(1.0) / 2.0;
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            if cap == LineCap::Round {
                self.fill_disc(a, half, color);
            }
            return;
        }
        self.for_each_in(
            a.x.min(b.x) - half, a.y.min(b.y) - half, a.x.max(b.x) + half, a.y.max(b.y) + half,
            |x, y| {
                let t = ((x - a.x) * dx + (y - a.y) * dy) / len2;
                let t = match cap {
                    LineCap::Round => t.clamp(0.0, 1.0),
                    LineCap::Butt if !(0.0..=1.0).contains(&t) => return false,
                    LineCap::Butt => t,
                };
                (x - (a.x + t * dx)).hypot(y - (a.y + t * dy)) <= half
            },
            color,
        );
    }

    /// Axis-aligned rectangle outline with mitred (square) corners.
    pub fn stroke_rect(&mut self, a: Point2D, b: Point2D, width: f32, color: u32) {
        let half = width.max(1.0) / 2.0;
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        let band = |ax: f32, ay: f32, bx: f32, by: f32| {
            move |x: f32, y: f32| x >= ax && x <= bx && y >= ay && y <= by
        };
        for (ax, ay, bx, by) in [
            (x0 - half, y0 - half, x1 + half, y0 + half), // top
            (x0 - half, y1 - half, x1 + half, y1 + half), // bottom
            (x0 - half, y0 - half, x0 + half, y1 + half), // left
            (x1 - half, y0 - half, x1 + half, y1 + half), // right
        ] {
            self.for_each_in(ax, ay, bx, by, band(ax, ay, bx, by), color);
        }
    }
}

impl DrawSurface for Canvas {
    fn draw(&mut self, cmd: &DrawCommand) {
        let argb = |c: &Color| c.to_argb();
        match cmd {
            DrawCommand::Segment { from, to, color, width, cap, .. } => {
                self.stroke_segment(*from, *to, *width, *cap, argb(color));
            }
            DrawCommand::FilledCircle { center, radius, color } => {
                self.fill_disc(*center, *radius, argb(color));
            }
            DrawCommand::StrokedCircle { center, radius, color, width } => {
                self.stroke_circle(*center, *radius, *width, argb(color));
            }
            DrawCommand::Rect { from, to, color, width } => {
                self.stroke_rect(*from, *to, *width, argb(color));
            }
            DrawCommand::Clear => self.clear(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_session::LineJoin;

    const WHITE: u32 = 0xFFFFFFFF;
    const RED:   u32 = 0xFFFF0000;

    fn p(x: f32, y: f32) -> Point2D { Point2D::new(x, y) }

    #[test]
    fn starts_white() {
        let c = Canvas::new(10, 5);
        assert!(c.pixels().iter().all(|&px| px == WHITE));
        assert_eq!(c.pixel(10, 0), None);
    }

    #[test]
    fn disc_covers_centre_only() {
        let mut c = Canvas::new(50, 50);
        c.draw(&DrawCommand::FilledCircle { center: p(25.0, 25.0), radius: 5.0, color: Color::RED });
        assert_eq!(c.pixel(25, 25), Some(RED));
        assert_eq!(c.pixel(28, 25), Some(RED));
        assert_eq!(c.pixel(32, 25), Some(WHITE));
        c.draw(&DrawCommand::Clear);
        assert_eq!(c.pixel(25, 25), Some(WHITE));
    }

    #[test]
    fn segment_caps() {
        let mut round = Canvas::new(60, 20);
        let mut butt  = Canvas::new(60, 20);
        for (canvas, cap) in [(&mut round, LineCap::Round), (&mut butt, LineCap::Butt)] {
            canvas.draw(&DrawCommand::Segment {
                from: p(10.0, 10.0),
                to: p(50.0, 10.0),
                color: Color::RED,
                width: 6.0,
                cap,
                join: LineJoin::Round,
            });
        }
        assert_eq!(round.pixel(30, 10), Some(RED));
        assert_eq!(butt.pixel(30, 10), Some(RED));
        // 2 px before the start: inside the round cap only.
        assert_eq!(round.pixel(8, 10), Some(RED));
        assert_eq!(butt.pixel(8, 10), Some(WHITE));
        assert_eq!(round.pixel(30, 15), Some(WHITE));
    }

    #[test]
    fn stroked_circle_is_hollow() {
        let mut c = Canvas::new(100, 100);
        c.draw(&DrawCommand::StrokedCircle { center: p(50.0, 50.0), radius: 30.0, color: Color::RED, width: 4.0 });
        assert_eq!(c.pixel(50, 50), Some(WHITE));
        assert_eq!(c.pixel(80, 50), Some(RED));
        assert_eq!(c.pixel(50, 19), Some(RED));
        assert_eq!(c.pixel(95, 50), Some(WHITE));
    }

    #[test]
    fn rect_outline_leaves_interior() {
        let mut c = Canvas::new(100, 100);
        c.draw(&DrawCommand::Rect { from: p(70.0, 80.0), to: p(20.0, 30.0), color: Color::RED, width: 4.0 });
        assert_eq!(c.pixel(45, 55), Some(WHITE));
        assert_eq!(c.pixel(45, 30), Some(RED));
        assert_eq!(c.pixel(20, 55), Some(RED));
        // Square corner.
        assert_eq!(c.pixel(18, 28), Some(RED));
    }

    #[test]
    fn shapes_clip_at_edges() {
        let mut c = Canvas::new(20, 20);
        c.fill_disc(p(-5.0, -5.0), 12.0, RED);
        c.stroke_segment(p(-100.0, 10.0), p(100.0, 10.0), 3.0, LineCap::Round, RED);
        c.fill_rect(15, 15, 100, 100, RED);
        assert_eq!(c.pixel(0, 0), Some(RED));
        assert_eq!(c.pixel(19, 19), Some(RED));
    }
}
