//! Gesture-driven control routing.
//!
//! While the fingertip is inside the control-panel band at the top of the
//! screen, gestures operate controls instead of drawing:
//!
//! | Gesture | Effect |
//! |---|---|
//! | Palm | select the slot under the hand (6 equal columns) |
//! | TwoFingers | set the selected control from the hand's x position |
//! | Pinch | activate the selected control |
//!
//! Every action starts a global cooldown during which the router emits
//! nothing. The selection itself survives the cooldown and is only dropped
//! when the hand is lost.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hand_gesture::{Gesture, Point2D, Timestamp, Viewport};

use crate::modes::{Color, DrawingMode, ShapeMode, PALETTE};

// ════════════════════════════════════════════════════════════════════════════
// Control registry
// ════════════════════════════════════════════════════════════════════════════

/// Every control the gestures can reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlId {
    StartCamera,
    StopCamera,
    ClearCanvas,
    PenColor,
    PenSize,
    DrawingMode,
    ShapeMode,
}

/// Selectable slots, left to right across the panel. `PenSize` is not one
/// of them; it is adjusted from the keyboard.
pub const CONTROL_SLOTS: [ControlId; 6] = [
    ControlId::StartCamera,
    ControlId::StopCamera,
    ControlId::ClearCanvas,
    ControlId::PenColor,
    ControlId::DrawingMode,
    ControlId::ShapeMode,
];

pub const PEN_SIZE_MIN: i32 = 1;
pub const PEN_SIZE_MAX: i32 = 50;

impl ControlId {
    pub fn label(&self) -> &'static str {
        match self {
            ControlId::StartCamera => "Start Camera",
            ControlId::StopCamera  => "Stop Camera",
            ControlId::ClearCanvas => "Clear",
            ControlId::PenColor    => "penColor",
            ControlId::PenSize     => "penSize",
            ControlId::DrawingMode => "drawingMode",
            ControlId::ShapeMode   => "shapeMode",
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            ControlId::StartCamera | ControlId::StopCamera | ControlId::ClearCanvas => {
                ControlKind::Trigger
            }
            ControlId::PenColor => ControlKind::Discrete,
            ControlId::PenSize  => ControlKind::Continuous { min: PEN_SIZE_MIN, max: PEN_SIZE_MAX },
            ControlId::DrawingMode => ControlKind::Enumerated { options: DrawingMode::ALL.len() },
            ControlId::ShapeMode   => ControlKind::Enumerated { options: ShapeMode::ALL.len() },
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capability set of a control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    /// Button-like: only activation does anything.
    Trigger,
    /// Slider over an integer range.
    Continuous { min: i32, max: i32 },
    /// Colour picked from [`PALETTE`].
    Discrete,
    /// One of `options` choices.
    Enumerated { options: usize },
}

/// A value a control can be set to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlValue {
    Level(i32),
    Color(Color),
    Choice(usize),
}

impl ControlKind {
    /// Map a horizontal position onto this control's domain, clamped.
    /// Triggers have no value.
    pub fn value_at(&self, x: f32, screen_width: f32) -> Option<ControlValue> {
        let frac = x / screen_width;
        match *self {
            ControlKind::Trigger => None,
            ControlKind::Continuous { min, max } => {
                let v = (frac * (max - min) as f32 + min as f32).round();
                let v = if v.is_nan() { min } else { (v as i32).clamp(min, max) };
                Some(ControlValue::Level(v))
            }
            ControlKind::Discrete => {
                Some(ControlValue::Color(PALETTE[bucket(frac, PALETTE.len())]))
            }
            ControlKind::Enumerated { options } => {
                Some(ControlValue::Choice(bucket(frac, options)))
            }
        }
    }
}

/// `floor(frac * n)` clamped to `0..n`.
fn bucket(frac: f32, n: usize) -> usize {
    let i = (frac * n as f32).floor().max(0.0) as usize;
    i.min(n.saturating_sub(1))
}

// ════════════════════════════════════════════════════════════════════════════
// ControlAction
// ════════════════════════════════════════════════════════════════════════════

/// What the router asks the control surface to do this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControlAction {
    #[default]
    None,
    Select(ControlId),
    Adjust(ControlId, ControlValue),
    /// Primary action; a no-op for anything but triggers.
    Activate(ControlId),
}

impl ControlAction {
    pub fn is_none(&self) -> bool {
        *self == ControlAction::None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ControlRouter
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Height of the control band, in pixels from the top.
    pub panel_height: f32,
    /// Minimum time between two actions.
    pub cooldown_ms:  u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig { panel_height: 80.0, cooldown_ms: 500 }
    }
}

#[derive(Clone, Debug)]
pub struct ControlRouter {
    config:      RouterConfig,
    viewport:    Viewport,
    selected:    Option<ControlId>,
    last_action: Option<Timestamp>,
}

impl ControlRouter {
    pub fn new(config: RouterConfig, viewport: Viewport) -> Self {
        ControlRouter { config, viewport, selected: None, last_action: None }
    }

    pub fn selected(&self) -> Option<ControlId> { self.selected }
    pub fn last_action(&self) -> Option<Timestamp> { self.last_action }

    fn cooldown(&self) -> Duration {
        Duration::from_millis(self.config.cooldown_ms)
    }

    /// Whether `p` lies in the control band.
    pub fn in_panel(&self, p: Point2D) -> bool {
        p.y <= self.config.panel_height
    }

    fn cooling_down(&self, now: Timestamp) -> bool {
        self.last_action
            .map_or(false, |t| now.saturating_sub(t) < self.cooldown())
    }

    /// Slot under horizontal position `x`, if any.
    pub fn slot_at(&self, x: f32) -> Option<ControlId> {
        if x < 0.0 {
            return None;
        }
        let column = self.viewport.width / CONTROL_SLOTS.len() as f32;
        CONTROL_SLOTS.get((x / column).floor() as usize).copied()
    }

    pub fn route(&mut self, p: Point2D, gesture: Gesture, now: Timestamp) -> ControlAction {
        if !self.in_panel(p) || self.cooling_down(now) {
            return ControlAction::None;
        }

        let action = match (gesture, self.selected) {
            (Gesture::Palm, _) => match self.slot_at(p.x) {
                Some(id) => {
                    self.selected = Some(id);
                    ControlAction::Select(id)
                }
                None => ControlAction::None,
            },
            (Gesture::TwoFingers, Some(id)) => match id.kind().value_at(p.x, self.viewport.width) {
                Some(value) => ControlAction::Adjust(id, value),
                None => ControlAction::None,
            },
            (Gesture::Pinch, Some(id)) => ControlAction::Activate(id),
            _ => ControlAction::None,
        };

        if !action.is_none() {
            self.last_action = Some(now);
            log::debug!("control action {:?}", action);
        }
        action
    }

    /// Hand lost: forget the selection. The cooldown clock keeps running.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.last_action = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(1200.0, 700.0);

    fn ms(n: u64) -> Timestamp { Duration::from_millis(n) }

    fn router() -> ControlRouter {
        ControlRouter::new(RouterConfig::default(), VP)
    }

    #[test]
    fn continuous_clamps_to_range() {
        let k = ControlKind::Continuous { min: 1, max: 50 };
        assert_eq!(k.value_at(0.0, 1000.0), Some(ControlValue::Level(1)));
        assert_eq!(k.value_at(1000.0, 1000.0), Some(ControlValue::Level(50)));
        assert_eq!(k.value_at(1500.0, 1000.0), Some(ControlValue::Level(50)));
        assert_eq!(k.value_at(-20.0, 1000.0), Some(ControlValue::Level(1)));
        assert_eq!(k.value_at(500.0, 1000.0), Some(ControlValue::Level(26)));
    }

    #[test]
    fn discrete_indexes_palette() {
        let k = ControlKind::Discrete;
        assert_eq!(k.value_at(0.0, 800.0), Some(ControlValue::Color(Color::BLACK)));
        assert_eq!(k.value_at(150.0, 800.0), Some(ControlValue::Color(Color::RED)));
        assert_eq!(k.value_at(800.0, 800.0), Some(ControlValue::Color(Color::WHITE)));
        assert_eq!(k.value_at(-5.0, 800.0), Some(ControlValue::Color(Color::BLACK)));
    }

    #[test]
    fn enumerated_indexes_options() {
        let k = ControlKind::Enumerated { options: 4 };
        assert_eq!(k.value_at(0.0, 400.0), Some(ControlValue::Choice(0)));
        assert_eq!(k.value_at(299.0, 400.0), Some(ControlValue::Choice(2)));
        assert_eq!(k.value_at(400.0, 400.0), Some(ControlValue::Choice(3)));
        assert_eq!(ControlKind::Trigger.value_at(10.0, 400.0), None);
    }

    #[test]
    fn palm_selects_by_column() {
        let mut r = router();
        let y = 10.0;
        assert_eq!(
            r.route(Point2D::new(VP.width * 0.1, y), Gesture::Palm, ms(0)),
            ControlAction::Select(ControlId::StartCamera)
        );
        assert_eq!(
            r.route(Point2D::new(VP.width * 0.99, y), Gesture::Palm, ms(600)),
            ControlAction::Select(ControlId::ShapeMode)
        );
        assert_eq!(r.selected(), Some(ControlId::ShapeMode));
    }

    #[test]
    fn palm_outside_columns_selects_nothing_and_keeps_cooldown_free() {
        let mut r = router();
        assert_eq!(r.route(Point2D::new(-3.0, 10.0), Gesture::Palm, ms(0)), ControlAction::None);
        assert_eq!(r.route(Point2D::new(VP.width, 10.0), Gesture::Palm, ms(1)), ControlAction::None);
        assert_eq!(r.last_action(), None);
        assert_eq!(
            r.route(Point2D::new(10.0, 10.0), Gesture::Palm, ms(2)),
            ControlAction::Select(ControlId::StartCamera)
        );
    }

    #[test]
    fn adjust_and_activate_need_selection() {
        let mut r = router();
        let p = Point2D::new(100.0, 10.0);
        assert_eq!(r.route(p, Gesture::TwoFingers, ms(0)), ControlAction::None);
        assert_eq!(r.route(p, Gesture::Pinch, ms(0)), ControlAction::None);
    }

    #[test]
    fn cooldown_blocks_then_releases() {
        let mut r = router();
        let palm_at = Point2D::new(VP.width * 0.55, 10.0); // penColor column
        assert_eq!(r.route(palm_at, Gesture::Palm, ms(1000)), ControlAction::Select(ControlId::PenColor));
        let adjust_at = Point2D::new(VP.width * 0.3, 10.0);
        assert_eq!(r.route(adjust_at, Gesture::TwoFingers, ms(1499)), ControlAction::None);
        assert_eq!(
            r.route(adjust_at, Gesture::TwoFingers, ms(1500)),
            ControlAction::Adjust(ControlId::PenColor, ControlValue::Color(Color::GREEN))
        );
    }

    #[test]
    fn adjusting_a_trigger_does_nothing() {
        let mut r = router();
        r.route(Point2D::new(10.0, 10.0), Gesture::Palm, ms(0));
        assert_eq!(r.route(Point2D::new(10.0, 10.0), Gesture::TwoFingers, ms(600)), ControlAction::None);
        assert_eq!(
            r.route(Point2D::new(10.0, 10.0), Gesture::Pinch, ms(700)),
            ControlAction::Activate(ControlId::StartCamera)
        );
    }

    #[test]
    fn below_panel_is_ignored() {
        let mut r = router();
        assert_eq!(r.route(Point2D::new(10.0, 81.0), Gesture::Palm, ms(0)), ControlAction::None);
        assert!(r.in_panel(Point2D::new(10.0, 80.0)));
    }

    #[test]
    fn selection_survives_until_cleared() {
        let mut r = router();
        r.route(Point2D::new(10.0, 10.0), Gesture::Palm, ms(0));
        r.route(Point2D::new(10.0, 10.0), Gesture::Fist, ms(5000));
        assert_eq!(r.selected(), Some(ControlId::StartCamera));
        r.clear_selection();
        assert_eq!(r.selected(), None);
        assert_eq!(r.last_action(), Some(ms(0)));
    }
}
