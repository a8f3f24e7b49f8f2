//! # air_canvas
//!
//! Draw on a canvas by pointing at it. A landmark source (simulated hand,
//! recorded session or LeapMotion controller) feeds 21-point hand frames into
//! a `SketchSession`, which turns gestures into strokes and control-panel
//! actions. The canvas and overlays render into a `minifb` window.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Where | Action |
//! |---|---|---|
//! | Point (index only) | Canvas | Draw with the current mode and shape |
//! | Point, held at screen centre | Canvas | Calibrate after the dwell time |
//! | Palm (all fingers) | Panel | Select the control under the fingertip |
//! | Pinch (thumb to index) | Panel, selected trigger | Activate it |
//! | Two fingers | Panel, selected option | Set the value under the fingertip |
//! | Anything else | Canvas | End the current stroke |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**. The mouse is the fingertip and number keys hold a pose.
//! * `leap`: **Hardware mode**. Polls a real LeapMotion controller via LeapC.
//!
//! ### Keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `1` / left mouse | Hold Point |
//! | `2` | Hold Palm |
//! | `3` | Hold Two fingers |
//! | `4` | Hold Pinch |
//! | `5` | Hold Fist |
//! | `Enter` | Start camera |
//! | `Backspace` | Stop camera |
//! | `C` | Clear canvas |
//! | `=` / `-` | Pen size up / down |
//! | `Q` / `Escape` | Quit |

pub mod config;
pub mod source;
pub mod canvas;
pub mod visualizer;
pub mod app;
