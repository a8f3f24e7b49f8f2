//! # hand_gesture
//!
//! Turns one frame of 21 hand landmarks into a discrete [`Gesture`], and
//! tracks the dwell-to-calibrate offset applied to fingertip positions.
//!
//! Everything here is driven by explicit inputs: frames come from the
//! caller, time is passed in as a [`Timestamp`], and no state outlives the
//! values that own it.
//!
//! ## Gestures
//!
//! | Gesture | Fingers (tip farther than 0.3 from wrist) |
//! |---|---|
//! | `Point` | index only |
//! | `Palm` | index, middle, ring, pinky |
//! | `TwoFingers` | index + middle |
//! | `Pinch` | thumb + index extended, tips closer than 0.1 |
//! | `Fist` | none of the four |
//! | `Unknown` | anything else |
//!
//! ```rust
//! use hand_gesture::{classify, Gesture, LandmarkFrame, Point3D};
//!
//! let mut points = [Point3D::new(0.5, 0.9, 0.0); 21];
//! points[hand_gesture::landmark::INDEX_TIP] = Point3D::new(0.5, 0.4, 0.0);
//! let frame = LandmarkFrame::new(points);
//! assert_eq!(classify(&frame), Gesture::Point);
//! ```

pub mod landmark;
pub mod gesture;
pub mod calibration;

/// Wall-clock time as a duration since the UNIX epoch.
pub type Timestamp = std::time::Duration;

pub use calibration::{CalibrationConfig, CalibrationEvent, CalibrationTracker};
pub use gesture::{classify, Gesture, GestureClassifier, GestureThresholds, HandShape};
pub use landmark::{LandmarkError, LandmarkFrame, Offset, Point2D, Point3D, Viewport};
