//! Application configuration, loaded from an optional TOML file.
//!
//! Every field has a default, so an empty file (or none at all) is valid:
//!
//! ```toml
//! seed = 7
//!
//! [window]
//! width  = 1280
//! height = 720
//!
//! [session.calibration]
//! dwell_ms = 1500
//!
//! [session.controls]
//! cooldown_ms = 400
//!
//! [modes]
//! drawing_mode = "spray"
//! color        = "#ff00ff"
//!
//! [source]
//! kind      = "replay"
//! path      = "recordings/wave.jsonl"
//! autostart = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use hand_gesture::{CalibrationConfig, GestureThresholds, Viewport};
use sketch_session::{Modes, RouterConfig, SessionConfig, PEN_SIZE_MAX, PEN_SIZE_MIN};

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title:  String,
    pub width:  usize,
    pub height: usize,
    /// Frame-rate cap for the render loop.
    pub fps:    u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title:  "Air Canvas".to_string(),
            width:  1280,
            height: 720,
            fps:    60,
        }
    }
}

/// Tuning for the per-frame session. The viewport comes from `[window]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub gestures:    GestureThresholds,
    pub calibration: CalibrationConfig,
    pub controls:    RouterConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Mouse position plus a held pose key.
    #[default]
    Sim,
    /// JSON-lines recording.
    Replay,
    /// LeapMotion controller (`leap` feature).
    Leap,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind:      SourceKind,
    /// Recording to play when `kind = "replay"`.
    pub path:      Option<PathBuf>,
    /// Start the camera as soon as the window opens.
    pub autostart: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window:  WindowConfig,
    pub session: SessionSection,
    /// Initial drawing modes.
    pub modes:   Modes,
    pub source:  SourceConfig,
    /// Fixed seed for the spray brush.
    pub seed:    Option<u64>,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(text).context("invalid configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.window.width, self.window.height);
        }
        let width = self.modes.stroke_width;
        if !((PEN_SIZE_MIN as u32)..=(PEN_SIZE_MAX as u32)).contains(&width) {
            bail!("modes.stroke_width must be {}..={}, got {}", PEN_SIZE_MIN, PEN_SIZE_MAX, width);
        }
        if self.source.kind == SourceKind::Replay && self.source.path.is_none() {
            bail!("source kind \"replay\" needs a path");
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.window.width as f32, self.window.height as f32)
    }

    /// Session settings with the window's viewport and the configured seed.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            viewport:    self.viewport(),
            gestures:    self.session.gestures,
            calibration: self.session.calibration,
            controls:    self.session.controls,
            seed:        self.seed,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
