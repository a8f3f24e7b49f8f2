//! Dwell-to-calibrate.
//!
//! Holding a Point gesture inside a square zone around the viewport centre
//! for the dwell period commits a new screen-space offset that maps the
//! *uncorrected* fingertip onto the centre. The dwell is contiguous: leaving
//! the zone or changing gesture clears the timer with no partial credit.
//! After a commit the timer clears again, so a further dwell recalibrates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gesture::Gesture;
use crate::landmark::{Offset, Point2D, Viewport};
use crate::Timestamp;

// ════════════════════════════════════════════════════════════════════════════
// CalibrationConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Half-width of the centre zone in pixels, tested per axis.
    pub radius_px: f32,
    /// Milliseconds the point must stay in the zone.
    pub dwell_ms:  u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        CalibrationConfig { radius_px: 50.0, dwell_ms: 2000 }
    }
}

impl CalibrationConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CalibrationEvent
// ════════════════════════════════════════════════════════════════════════════

/// What one call to [`CalibrationTracker::update`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CalibrationEvent {
    /// Nothing running (wrong gesture, or outside the zone).
    Idle,
    /// The dwell timer started this frame.
    DwellStarted,
    /// Still inside the zone, timer running.
    Dwelling { elapsed: Duration },
    /// The dwell completed and this offset is now in effect.
    Committed(Offset),
}

// ════════════════════════════════════════════════════════════════════════════
// CalibrationTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct CalibrationTracker {
    pub config: CalibrationConfig,
    started:    Option<Timestamp>,
    offset:     Offset,
}

impl CalibrationTracker {
    pub fn new(config: CalibrationConfig) -> Self {
        CalibrationTracker { config, started: None, offset: Offset::ZERO }
    }

    /// The committed correction.
    pub fn offset(&self) -> Offset { self.offset }

    /// When the running dwell began, if any.
    pub fn dwell_started(&self) -> Option<Timestamp> { self.started }

    /// Map an uncorrected screen point through the committed offset.
    pub fn correct(&self, uncorrected: Point2D) -> Point2D {
        uncorrected.offset_by(self.offset)
    }

    /// Advance the dwell for one frame.
    ///
    /// `uncorrected` is the fingertip mapped to pixels without any offset;
    /// the zone test uses the corrected position, the commit uses the
    /// uncorrected one.
    pub fn update(
        &mut self,
        uncorrected: Point2D,
        gesture:     Gesture,
        viewport:    &Viewport,
        now:         Timestamp,
    ) -> CalibrationEvent {
        if gesture != Gesture::Point {
            self.started = None;
            return CalibrationEvent::Idle;
        }

        let center = viewport.center();
        let p = self.correct(uncorrected);
        let in_zone = (p.x - center.x).abs() < self.config.radius_px
                   && (p.y - center.y).abs() < self.config.radius_px;
        if !in_zone {
            self.started = None;
            return CalibrationEvent::Idle;
        }

        match self.started {
            None => {
                self.started = Some(now);
                log::debug!("calibration dwell started at ({:.1}, {:.1})", p.x, p.y);
                CalibrationEvent::DwellStarted
            }
            Some(start) => {
                let elapsed = now.saturating_sub(start);
                if elapsed < self.config.dwell() {
                    return CalibrationEvent::Dwelling { elapsed };
                }
                self.offset = Offset {
                    dx: center.x - uncorrected.x,
                    dy: center.y - uncorrected.y,
                };
                self.started = None;
                log::info!(
                    "calibration committed: offset ({:.1}, {:.1})",
                    self.offset.dx, self.offset.dy
                );
                CalibrationEvent::Committed(self.offset)
            }
        }
    }

    /// Clear a running dwell; the committed offset survives.
    pub fn cancel_dwell(&mut self) {
        self.started = None;
    }

    /// Back to the initial state, offset included.
    pub fn reset(&mut self) {
        self.started = None;
        self.offset = Offset::ZERO;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(1000.0, 800.0);

    fn ms(n: u64) -> Timestamp { Duration::from_millis(n) }

    #[test]
    fn only_point_runs_the_timer() {
        let mut cal = CalibrationTracker::default();
        let p = Point2D::new(500.0, 400.0);
        assert_eq!(cal.update(p, Gesture::Palm, &VP, ms(0)), CalibrationEvent::Idle);
        assert_eq!(cal.dwell_started(), None);
        assert_eq!(cal.update(p, Gesture::Point, &VP, ms(10)), CalibrationEvent::DwellStarted);
        assert_eq!(cal.update(p, Gesture::Fist, &VP, ms(20)), CalibrationEvent::Idle);
        assert_eq!(cal.dwell_started(), None);
    }

    #[test]
    fn commits_after_dwell_and_clears_timer() {
        let mut cal = CalibrationTracker::default();
        let raw = Point2D::new(520.0, 390.0);
        cal.update(raw, Gesture::Point, &VP, ms(0));
        assert!(matches!(
            cal.update(raw, Gesture::Point, &VP, ms(1999)),
            CalibrationEvent::Dwelling { .. }
        ));
        let ev = cal.update(raw, Gesture::Point, &VP, ms(2000));
        assert_eq!(ev, CalibrationEvent::Committed(Offset { dx: -20.0, dy: 10.0 }));
        assert_eq!(cal.dwell_started(), None);
        assert_eq!(cal.correct(raw), VP.center());
    }

    #[test]
    fn zone_is_tested_per_axis() {
        let mut cal = CalibrationTracker::default();
        // 40 px off on both axes: diagonal distance > 50, still inside.
        let p = Point2D::new(540.0, 440.0);
        assert_eq!(cal.update(p, Gesture::Point, &VP, ms(0)), CalibrationEvent::DwellStarted);
        let p = Point2D::new(550.0, 400.0);
        assert_eq!(cal.update(p, Gesture::Point, &VP, ms(10)), CalibrationEvent::Idle);
    }

    #[test]
    fn reset_clears_offset() {
        let mut cal = CalibrationTracker::default();
        let raw = Point2D::new(510.0, 410.0);
        cal.update(raw, Gesture::Point, &VP, ms(0));
        cal.update(raw, Gesture::Point, &VP, ms(2500));
        assert!(!cal.offset().is_zero());
        cal.cancel_dwell();
        assert!(!cal.offset().is_zero());
        cal.reset();
        assert!(cal.offset().is_zero());
    }
}
