//! The control surface the router drives.
//!
//! `ControlPanel` owns the drawing [`Modes`] and the camera flag, exposes
//! the get/set/options/primary-action capabilities of every [`ControlId`],
//! and applies [`ControlAction`]s. Trigger activations come back as a
//! [`PanelEffect`] for the program to carry out.

use crate::controls::{ControlAction, ControlId, ControlKind, ControlValue, PEN_SIZE_MAX, PEN_SIZE_MIN};
use crate::modes::{DrawingMode, Modes, ShapeMode, PALETTE};

/// Side effect of activating a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEffect {
    StartCamera,
    StopCamera,
    ClearCanvas,
}

#[derive(Clone, Debug, Default)]
pub struct ControlPanel {
    modes:         Modes,
    camera_active: bool,
}

impl ControlPanel {
    /// The pen size is clamped into its control's range.
    pub fn new(mut modes: Modes) -> Self {
        let width = modes.stroke_width.clamp(PEN_SIZE_MIN as u32, PEN_SIZE_MAX as u32);
        if width != modes.stroke_width {
            log::warn!("pen size {} out of range, using {}", modes.stroke_width, width);
            modes.stroke_width = width;
        }
        ControlPanel { modes, camera_active: false }
    }

    pub fn modes(&self) -> &Modes { &self.modes }
    pub fn camera_active(&self) -> bool { self.camera_active }

    /// Current value; triggers have none.
    pub fn value(&self, id: ControlId) -> Option<ControlValue> {
        match id {
            ControlId::PenColor => Some(ControlValue::Color(self.modes.color)),
            ControlId::PenSize  => Some(ControlValue::Level(self.modes.stroke_width as i32)),
            ControlId::DrawingMode => DrawingMode::ALL
                .iter()
                .position(|m| *m == self.modes.drawing_mode)
                .map(ControlValue::Choice),
            ControlId::ShapeMode => ShapeMode::ALL
                .iter()
                .position(|m| *m == self.modes.shape_mode)
                .map(ControlValue::Choice),
            ControlId::StartCamera | ControlId::StopCamera | ControlId::ClearCanvas => None,
        }
    }

    /// Set a value. Returns false when the value does not fit the control.
    pub fn set_value(&mut self, id: ControlId, value: ControlValue) -> bool {
        match (id, value) {
            (ControlId::PenColor, ControlValue::Color(c)) => {
                self.modes.color = c;
            }
            (ControlId::PenSize, ControlValue::Level(v)) => {
                self.modes.stroke_width = v.clamp(PEN_SIZE_MIN, PEN_SIZE_MAX) as u32;
            }
            (ControlId::DrawingMode, ControlValue::Choice(i)) if i < DrawingMode::ALL.len() => {
                self.modes.drawing_mode = DrawingMode::ALL[i];
            }
            (ControlId::ShapeMode, ControlValue::Choice(i)) if i < ShapeMode::ALL.len() => {
                self.modes.shape_mode = ShapeMode::ALL[i];
            }
            _ => return false,
        }
        log::info!("{} set to {:?}", id, value);
        true
    }

    /// Human-readable option list for discrete and enumerated controls.
    pub fn options(&self, id: ControlId) -> Vec<String> {
        match id {
            ControlId::PenColor    => PALETTE.iter().map(|c| c.to_string()).collect(),
            ControlId::DrawingMode => DrawingMode::ALL.iter().map(|m| m.name().to_string()).collect(),
            ControlId::ShapeMode   => ShapeMode::ALL.iter().map(|m| m.name().to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Fire a trigger. Non-triggers, and triggers whose state already
    /// holds (starting a running camera), do nothing.
    pub fn primary_action(&mut self, id: ControlId) -> Option<PanelEffect> {
        if id.kind() != ControlKind::Trigger {
            return None;
        }
        match id {
            ControlId::StartCamera if !self.camera_active => {
                self.camera_active = true;
                Some(PanelEffect::StartCamera)
            }
            ControlId::StopCamera if self.camera_active => {
                self.camera_active = false;
                Some(PanelEffect::StopCamera)
            }
            ControlId::ClearCanvas => Some(PanelEffect::ClearCanvas),
            _ => None,
        }
    }

    pub fn apply(&mut self, action: &ControlAction) -> Option<PanelEffect> {
        match *action {
            ControlAction::Adjust(id, value) => {
                self.set_value(id, value);
                None
            }
            ControlAction::Activate(id) => self.primary_action(id),
            ControlAction::Select(_) | ControlAction::None => None,
        }
    }

    /// Step the pen size by `delta`, clamped.
    pub fn nudge_pen_size(&mut self, delta: i32) {
        let v = self.modes.stroke_width as i32 + delta;
        self.set_value(ControlId::PenSize, ControlValue::Level(v));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
