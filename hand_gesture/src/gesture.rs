//! Single-frame gesture classification.
//!
//! A finger is *extended* when its tip lies farther than
//! [`GestureThresholds::extension`] from the wrist in the xy-plane. The
//! extension pattern (plus the thumb/index pinch distance) is matched
//! against an ordered rule table; the first rule that holds wins and
//! anything unmatched is [`Gesture::Unknown`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::landmark::{LandmarkFrame, INDEX_TIP, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP};

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// Discrete gesture recognised from one landmark frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    /// Index extended, middle/ring/pinky curled. Draws.
    Point,
    /// All four fingers extended. Selects a control.
    Palm,
    /// Index and middle extended. Adjusts the selected control.
    TwoFingers,
    /// Thumb and index tips together. Activates the selected control.
    Pinch,
    /// No fingers extended.
    Fist,
    Unknown,
}

impl Gesture {
    pub const ALL: [Gesture; 6] = [
        Gesture::Point,
        Gesture::Palm,
        Gesture::TwoFingers,
        Gesture::Pinch,
        Gesture::Fist,
        Gesture::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Point      => "point",
            Gesture::Palm       => "palm",
            Gesture::TwoFingers => "two_fingers",
            Gesture::Pinch      => "pinch",
            Gesture::Fist       => "fist",
            Gesture::Unknown    => "unknown",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Distances in normalized image units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Tip-to-wrist distance above which a finger counts as extended.
    pub extension: f32,
    /// Thumb-to-index tip distance below which the hand is pinching.
    pub pinch:     f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        GestureThresholds { extension: 0.3, pinch: 0.1 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandShape: the geometric features the rules look at
// ════════════════════════════════════════════════════════════════════════════

/// Extension flags and pinch distance extracted from one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandShape {
    pub thumb:  bool,
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
    /// Thumb tip to index tip, xy-plane.
    pub pinch_distance: f32,
}

impl HandShape {
    pub fn measure(frame: &LandmarkFrame, thresholds: &GestureThresholds) -> Self {
        let wrist = frame.wrist();
        let extended = |tip: usize| {
            frame.points()[tip].planar_distance(&wrist) > thresholds.extension
        };
        HandShape {
            thumb:  extended(THUMB_TIP),
            index:  extended(INDEX_TIP),
            middle: extended(MIDDLE_TIP),
            ring:   extended(RING_TIP),
            pinky:  extended(PINKY_TIP),
            pinch_distance: frame.index_tip().planar_distance(&frame.thumb_tip()),
        }
    }

    /// Number of extended non-thumb fingers.
    pub fn extended_fingers(&self) -> usize {
        [self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&e| e)
            .count()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rule table
// ════════════════════════════════════════════════════════════════════════════

type Rule = fn(&HandShape, &GestureThresholds) -> bool;

fn is_point(h: &HandShape, _: &GestureThresholds) -> bool {
    h.index && !h.middle && !h.ring && !h.pinky
}

fn is_palm(h: &HandShape, _: &GestureThresholds) -> bool {
    h.index && h.middle && h.ring && h.pinky
}

fn is_two_fingers(h: &HandShape, _: &GestureThresholds) -> bool {
    h.index && h.middle && !h.ring && !h.pinky
}

fn is_pinch(h: &HandShape, t: &GestureThresholds) -> bool {
    h.pinch_distance < t.pinch && h.index && h.thumb
}

fn is_fist(h: &HandShape, _: &GestureThresholds) -> bool {
    h.extended_fingers() == 0
}

/// Evaluated top to bottom. Point precedes Pinch: a pinching hand with the
/// other three fingers curled is reported as Point.
const RULES: [(Gesture, Rule); 5] = [
    (Gesture::Point,      is_point),
    (Gesture::Palm,       is_palm),
    (Gesture::TwoFingers, is_two_fingers),
    (Gesture::Pinch,      is_pinch),
    (Gesture::Fist,       is_fist),
];

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Stateless classifier; holds only its thresholds.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureClassifier {
    pub thresholds: GestureThresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        GestureClassifier { thresholds }
    }

    pub fn classify(&self, frame: &LandmarkFrame) -> Gesture {
        self.classify_shape(&HandShape::measure(frame, &self.thresholds))
    }

    pub fn classify_shape(&self, shape: &HandShape) -> Gesture {
        RULES
            .iter()
            .find(|(_, rule)| rule(shape, &self.thresholds))
            .map(|&(gesture, _)| gesture)
            .unwrap_or(Gesture::Unknown)
    }
}

/// Classify with the default thresholds.
pub fn classify(frame: &LandmarkFrame) -> Gesture {
    GestureClassifier::default().classify(frame)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
