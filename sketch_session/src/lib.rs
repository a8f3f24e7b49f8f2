//! # sketch_session
//!
//! The per-frame brain of the air canvas. A [`SketchSession`] takes an
//! optional hand frame, classifies it, applies calibration, and hands the
//! corrected fingertip to exactly one consumer:
//!
//! * inside the control band at the top, the [`ControlRouter`] turns
//!   gestures into [`ControlAction`]s that a [`ControlPanel`] applies;
//! * below it, the [`DrawingSession`] turns Point frames into
//!   [`DrawCommand`]s for any [`DrawSurface`].
//!
//! ## Controls
//!
//! | Gesture (in band) | Action |
//! |---|---|
//! | Palm | select the column under the hand |
//! | Two fingers | set the selected control from x position |
//! | Pinch | fire the selected button |
//!
//! ```rust
//! use sketch_session::{Modes, SketchSession, Status};
//! use std::time::Duration;
//!
//! let mut session = SketchSession::default();
//! let out = session.on_frame(None, &Modes::default(), Duration::from_secs(1));
//! assert_eq!(out.status, Some(Status::NoHand));
//! ```

pub mod modes;
pub mod command;
pub mod drawing;
pub mod controls;
pub mod panel;
pub mod session;

pub use command::{CommandLog, DrawCommand, DrawSurface, LineCap, LineJoin};
pub use controls::{
    ControlAction, ControlId, ControlKind, ControlRouter, ControlValue, RouterConfig, CONTROL_SLOTS,
    PEN_SIZE_MAX, PEN_SIZE_MIN,
};
pub use drawing::{DrawingSession, Stroke, StrokeStep};
pub use modes::{
    rainbow_color, Color, DrawingMode, Modes, ParseColorError, ParseModeError, ShapeMode,
    BACKGROUND, PALETTE,
};
pub use panel::{ControlPanel, PanelEffect};
pub use session::{FrameOutput, SessionConfig, SketchSession, Status, Zone};
