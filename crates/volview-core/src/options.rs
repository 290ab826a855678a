//! Configuration options for volview.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VolviewError};
use crate::slice::clamp_sweep_rate;

/// Bounds applied to the bounding-box scale.
pub const BOUNDING_BOX_SCALE_RANGE: (f32, f32) = (0.1, 5.0);

/// Viewer configuration.
///
/// Every field has a default, so a partial JSON file only overrides the keys
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Background color.
    pub background_color: Vec3,

    /// Whether the volume's bounding box is drawn.
    pub show_bounding_box: bool,

    /// Bounding box scale relative to the volume extent.
    pub bounding_box_scale: f32,

    /// Whether the dataset/FPS overlay is drawn.
    pub show_overlay: bool,

    /// Preset selected at startup.
    pub default_preset: usize,

    /// Auto-sweep rate in slices per second.
    pub sweep_rate_hz: f32,

    /// Degrees of orbit per dragged pixel.
    pub rotate_sensitivity: f32,

    /// Distance moved per wheel step.
    pub zoom_sensitivity: f32,

    /// Display refresh interval in milliseconds.
    pub refresh_interval_ms: u64,

    /// How long notifications stay up, in milliseconds.
    pub notification_lifetime_ms: u64,

    /// Overrides the recent-files location.
    pub history_file: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            background_color: Vec3::new(0.1, 0.1, 0.2),
            show_bounding_box: true,
            bounding_box_scale: 1.0,
            show_overlay: true,
            default_preset: 0,
            sweep_rate_hz: 5.0,
            rotate_sensitivity: 0.25,
            zoom_sensitivity: 0.5,
            refresh_interval_ms: 16,
            notification_lifetime_ms: 3000,
            history_file: None,
        }
    }
}

impl Options {
    /// Reads options from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let options: Self = serde_json::from_str(&text)?;
                log::debug!("loaded options from {}", path.display());
                Ok(options.sanitized())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no options file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(VolviewError::IoError(err)),
        }
    }

    /// Writes options as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns a copy with out-of-range values pulled back into range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.bounding_box_scale = clamp_bounding_box_scale(self.bounding_box_scale);
        self.background_color = self.background_color.clamp(Vec3::ZERO, Vec3::ONE);
        self.sweep_rate_hz = clamp_sweep_rate(self.sweep_rate_hz);
        self.refresh_interval_ms = self.refresh_interval_ms.max(1);
        self
    }
}

/// Clamps a bounding-box scale to [`BOUNDING_BOX_SCALE_RANGE`]; NaN maps to 1.
pub fn clamp_bounding_box_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(BOUNDING_BOX_SCALE_RANGE.0, BOUNDING_BOX_SCALE_RANGE.1)
}
