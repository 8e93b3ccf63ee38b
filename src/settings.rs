//! Presentation preferences
//!
//! Nothing in here changes the simulation outcome; the camera is a per-frame
//! positional filter and the frame clamp only bounds how much wall-clock time
//! one real frame may feed into the fixed-step accumulator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::SimError;

/// How the camera follows the ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum CameraMode {
    /// Jump straight to the ship every tick
    #[default]
    Snap,
    /// Exponential ease toward the ship (`factor` per second)
    Ease { factor: f32 },
}

impl CameraMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::Snap => "Snap",
            CameraMode::Ease { .. } => "Ease",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snap" => Some(CameraMode::Snap),
            "ease" | "smooth" => Some(CameraMode::Ease { factor: 8.0 }),
            _ => None,
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera follow behaviour
    pub camera_mode: CameraMode,
    /// Viewport size in world units
    pub viewport: (f32, f32),

    // === Frame pacing ===
    /// Longest wall-clock frame accepted by the accumulator (seconds)
    pub max_frame_dt: f32,
    /// Simulation steps allowed per real frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_mode: CameraMode::Snap,
            viewport: (1920.0, 1080.0),
            max_frame_dt: MAX_FRAME_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|source| SimError::Parse {
            what: "settings".to_string(),
            source,
        })
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_mode_from_str() {
        assert_eq!(CameraMode::from_str("SNAP"), Some(CameraMode::Snap));
        assert!(matches!(CameraMode::from_str("ease"), Some(CameraMode::Ease { .. })));
        assert_eq!(CameraMode::from_str("orbit"), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "camera_mode": { "Ease": { "factor": 3.0 } } }"#)
            .expect("valid settings");
        assert_eq!(settings.camera_mode, CameraMode::Ease { factor: 3.0 });
        assert_eq!(settings.max_substeps, MAX_SUBSTEPS);
    }
}
