//! Hand landmark frames and the mapping from normalized image space to
//! screen pixels.
//!
//! A [`LandmarkFrame`] is one estimator output: exactly 21 points in
//! MediaPipe hand ordering, normalized to `[0, 1]` per axis, already
//! mirrored for a front-facing camera.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (MediaPipe hand model, 21 total)
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Bone connections, used by the overlay renderer.
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Points
// ════════════════════════════════════════════════════════════════════════════

/// A landmark in normalized image space. `z` is relative depth and is not
/// used for classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3D { x, y, z }
    }

    /// Euclidean distance in the xy-plane.
    pub fn planar_distance(&self, other: &Point3D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A point in screen (pixel) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Point2D { x, y }
    }

    pub fn distance(&self, other: Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset_by(self, offset: Offset) -> Point2D {
        Point2D { x: self.x + offset.dx, y: self.y + offset.dy }
    }
}

/// Screen-space correction added to every mapped position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Viewport
// ════════════════════════════════════════════════════════════════════════════

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width:  f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.width / 2.0, self.height / 2.0)
    }

    /// Map a normalized landmark to pixels, without any calibration offset.
    pub fn to_screen(&self, p: Point3D) -> Point2D {
        Point2D::new(p.x * self.width, p.y * self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1280.0, 720.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, found {found}")]
    WrongCount { expected: usize, found: usize },
}

/// One detected hand: 21 landmarks, index 0 is the wrist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: [Point3D; LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: [Point3D; LANDMARK_COUNT]) -> Self {
        LandmarkFrame { points }
    }

    pub fn from_slice(points: &[Point3D]) -> Result<Self, LandmarkError> {
        let points: [Point3D; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            LandmarkError::WrongCount { expected: LANDMARK_COUNT, found: points.len() }
        })?;
        Ok(LandmarkFrame { points })
    }

    /// Build from `[x, y, z]` triples, as found in replay files.
    pub fn from_triples(triples: &[[f32; 3]]) -> Result<Self, LandmarkError> {
        let points: Vec<Point3D> = triples
            .iter()
            .map(|&[x, y, z]| Point3D::new(x, y, z))
            .collect();
        Self::from_slice(&points)
    }

    pub fn points(&self) -> &[Point3D; LANDMARK_COUNT] { &self.points }
    pub fn get(&self, index: usize) -> Option<Point3D> { self.points.get(index).copied() }
    pub fn wrist(&self)      -> Point3D { self.points[WRIST] }
    pub fn index_tip(&self)  -> Point3D { self.points[INDEX_TIP] }
    pub fn thumb_tip(&self)  -> Point3D { self.points[THUMB_TIP] }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_wrong_counts() {
        let short = vec![Point3D::default(); 20];
        let long  = vec![Point3D::default(); 22];
        assert_eq!(
            LandmarkFrame::from_slice(&short),
            Err(LandmarkError::WrongCount { expected: 21, found: 20 })
        );
        assert_eq!(
            LandmarkFrame::from_slice(&long),
            Err(LandmarkError::WrongCount { expected: 21, found: 22 })
        );
        assert!(LandmarkFrame::from_slice(&[Point3D::default(); 21]).is_ok());
    }

    #[test]
    fn from_triples_keeps_order() {
        let triples: Vec<[f32; 3]> = (0..21).map(|i| [i as f32 / 100.0, 0.5, 0.0]).collect();
        let frame = LandmarkFrame::from_triples(&triples).unwrap();
        assert_eq!(frame.index_tip().x, 0.08);
        assert_eq!(frame.wrist().x, 0.0);
    }

    #[test]
    fn viewport_maps_normalized_points() {
        let vp = Viewport::new(1000.0, 500.0);
        let p = vp.to_screen(Point3D::new(0.25, 0.5, 0.3));
        assert_eq!(p, Point2D::new(250.0, 250.0));
        assert_eq!(vp.center(), Point2D::new(500.0, 250.0));
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Point3D::new(0.0, 0.0, 0.0);
        let b = Point3D::new(0.3, 0.4, 9.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn skeleton_indices_in_range() {
        for (a, b) in HAND_SKELETON {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }
}
