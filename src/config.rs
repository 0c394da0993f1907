//! Policy constants and runtime configuration.
//!
//! Every threshold the pipeline uses is a fixed policy value with a named
//! constant here. `PipelineConfig` carries the same values so a deployment can
//! override them from a JSON file without recompiling.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Scene tags below this confidence never leave the labeler adapter.
pub const LABELER_CONFIDENCE_FLOOR: f32 = 0.65;
/// A scene tag must exceed this to become the scene-context entry.
pub const SCENE_ANNOUNCE_THRESHOLD: f32 = 0.75;
/// Minimum gap between two automatic object announcements.
pub const SPEECH_THROTTLE_MS: u64 = 3000;
/// Recognized text is spoken this long after its caption is shown.
pub const TEXT_PRESENTATION_DELAY_MS: u64 = 4000;
pub const HAPTIC_PULSE_MS: u64 = 80;
/// Bounded wait for a single detector call.
pub const DETECTOR_TIMEOUT_MS: u64 = 1500;
/// Bounded wait when pulling the next frame.
pub const FRAME_WAIT_MS: u64 = 250;

pub const HORIZONTAL_LEFT_MAX: f32 = 0.33;
pub const HORIZONTAL_RIGHT_MIN: f32 = 0.66;
pub const VERTICAL_ABOVE_MAX: f32 = 0.4;
pub const VERTICAL_BELOW_MIN: f32 = 0.7;
pub const PROXIMITY_VERY_CLOSE_AREA: f32 = 0.3;
pub const PROXIMITY_NEARBY_AREA: f32 = 0.1;

/// Who the device is configured for. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserProfile {
    Blind,
    /// Speech is never produced; haptic and visual output still are.
    Deaf,
    Mobility,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::Blind
    }
}

impl UserProfile {
    pub fn speech_enabled(&self) -> bool {
        !matches!(self, UserProfile::Deaf)
    }
}

/// Cut points used by the spatial locator. All values are fractions of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorThresholds {
    pub left_max: f32,
    pub right_min: f32,
    pub above_max: f32,
    pub below_min: f32,
    pub very_close_area: f32,
    pub nearby_area: f32,
}

impl Default for LocatorThresholds {
    fn default() -> Self {
        Self {
            left_max: HORIZONTAL_LEFT_MAX,
            right_min: HORIZONTAL_RIGHT_MIN,
            above_max: VERTICAL_ABOVE_MAX,
            below_min: VERTICAL_BELOW_MIN,
            very_close_area: PROXIMITY_VERY_CLOSE_AREA,
            nearby_area: PROXIMITY_NEARBY_AREA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub profile: UserProfile,
    pub locator: LocatorThresholds,
    pub labeler_confidence_floor: f32,
    pub scene_announce_threshold: f32,
    pub speech_throttle_ms: u64,
    pub text_presentation_delay_ms: u64,
    pub haptic_pulse_ms: u64,
    pub detector_timeout_ms: u64,
    pub frame_wait_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profile: UserProfile::default(),
            locator: LocatorThresholds::default(),
            labeler_confidence_floor: LABELER_CONFIDENCE_FLOOR,
            scene_announce_threshold: SCENE_ANNOUNCE_THRESHOLD,
            speech_throttle_ms: SPEECH_THROTTLE_MS,
            text_presentation_delay_ms: TEXT_PRESENTATION_DELAY_MS,
            haptic_pulse_ms: HAPTIC_PULSE_MS,
            detector_timeout_ms: DETECTOR_TIMEOUT_MS,
            frame_wait_ms: FRAME_WAIT_MS,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document. Missing fields fall back to the defaults.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid pipeline config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Loads from the file named by `NAVASSIST_CONFIG`, or returns defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os("NAVASSIST_CONFIG") {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |name: &'static str, v: f32| {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange { field: name, value: v as f64 })
            }
        };
        unit("labeler_confidence_floor", self.labeler_confidence_floor)?;
        unit("scene_announce_threshold", self.scene_announce_threshold)?;
        unit("locator.left_max", self.locator.left_max)?;
        unit("locator.right_min", self.locator.right_min)?;
        unit("locator.above_max", self.locator.above_max)?;
        unit("locator.below_min", self.locator.below_min)?;
        unit("locator.very_close_area", self.locator.very_close_area)?;
        unit("locator.nearby_area", self.locator.nearby_area)?;

        if self.locator.left_max > self.locator.right_min {
            return Err(ConfigError::Inverted { lower: "locator.left_max", upper: "locator.right_min" });
        }
        if self.locator.above_max > self.locator.below_min {
            return Err(ConfigError::Inverted { lower: "locator.above_max", upper: "locator.below_min" });
        }
        if self.locator.nearby_area > self.locator.very_close_area {
            return Err(ConfigError::Inverted {
                lower: "locator.nearby_area",
                upper: "locator.very_close_area",
            });
        }
        if self.detector_timeout_ms == 0 {
            return Err(ConfigError::Zero("detector_timeout_ms"));
        }
        if self.frame_wait_ms == 0 {
            return Err(ConfigError::Zero("frame_wait_ms"));
        }
        Ok(())
    }

    pub fn detector_timeout(&self) -> Duration {
        Duration::from_millis(self.detector_timeout_ms)
    }

    pub fn frame_wait(&self) -> Duration {
        Duration::from_millis(self.frame_wait_ms)
    }

    pub fn haptic_pulse(&self) -> Duration {
        Duration::from_millis(self.haptic_pulse_ms)
    }

    pub fn text_presentation_delay(&self) -> Duration {
        Duration::from_millis(self.text_presentation_delay_ms)
    }
}
