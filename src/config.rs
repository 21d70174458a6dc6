//! Engine configuration supplied by the host page.
//!
//! The host passes a JSON object; every field is optional and falls back to
//! [`EngineConfig::default`]. An empty string is the same as `{}`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{DEFAULT_SCALE, MARKER_RADIUS_PX, ZOOM_RATE};
use crate::renderer::Style;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into a config.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the engine cannot work with.
    #[error("invalid config value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether state changes redraw immediately.
    pub auto_redraw: bool,
    /// Wheel zoom rate per pixel of vertical scroll.
    pub zoom_rate: f64,
    /// Hit radius of point markers, in CSS pixels.
    pub marker_radius_px: f64,
    /// Half-height of the view after a reset.
    pub default_scale: f64,
    /// Style pushed to the renderer at startup.
    pub style: Style,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_redraw: true,
            zoom_rate: ZOOM_RATE,
            marker_radius_px: MARKER_RADIUS_PX,
            default_scale: DEFAULT_SCALE,
            style: Style::default(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_normal() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, value })
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that numeric fields are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("zoom_rate", self.zoom_rate)?;
        positive("marker_radius_px", self.marker_radius_px)?;
        positive("default_scale", self.default_scale)?;
        Ok(())
    }
}
