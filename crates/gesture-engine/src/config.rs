//! Gesture engine configuration

use serde::{Deserialize, Serialize};

use crate::GestureError;

/// Target screen geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Screen width in pixels
    pub width: u32,
    /// Screen height in pixels
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Gesture thresholds and timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// EAR below which a single eye counts as closed for a wink
    pub wink_threshold: f32,

    /// How far above `wink_threshold` the other eye must stay open
    pub wink_asymmetry_margin: f32,

    /// EAR below which both eyes count as closed (stricter than wink)
    pub blink_threshold: f32,

    /// Continuous wink hold before a click fires (milliseconds)
    pub wink_hold_ms: u64,

    /// Minimum spacing between clicks and other discrete actions (milliseconds)
    pub action_cooldown_ms: u64,

    /// Continuous both-eyes-closed hold before a screenshot (milliseconds)
    pub screenshot_hold_ms: u64,

    /// Vertical iris movement per frame that counts as a scroll (frame pixels)
    pub scroll_pixel_threshold: u32,

    /// Minimum spacing between scroll events (milliseconds)
    pub scroll_cooldown_ms: u64,

    /// Wheel units sent per scroll event
    pub scroll_amount: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            wink_threshold: 0.25,
            wink_asymmetry_margin: 0.1,
            blink_threshold: 0.18,
            wink_hold_ms: 200,
            action_cooldown_ms: 1000,
            screenshot_hold_ms: 3000,
            scroll_pixel_threshold: 15,
            scroll_cooldown_ms: 500,
            scroll_amount: 10,
        }
    }
}

impl ThresholdConfig {
    /// EAR the open eye must exceed during a wink
    pub fn wink_open_threshold(&self) -> f32 {
        self.wink_threshold + self.wink_asymmetry_margin
    }

    /// Reject configurations where winks and blinks could overlap
    pub fn validate(&self) -> Result<(), GestureError> {
        if !(self.blink_threshold > 0.0 && self.blink_threshold < self.wink_threshold) {
            return Err(GestureError::Config(format!(
                "blink_threshold {} must be positive and below wink_threshold {}",
                self.blink_threshold, self.wink_threshold
            )));
        }
        if self.wink_asymmetry_margin <= 0.0 {
            return Err(GestureError::Config(
                "wink_asymmetry_margin must be positive".into(),
            ));
        }
        if self.screenshot_hold_ms == 0 || self.wink_hold_ms == 0 {
            return Err(GestureError::Config("hold durations must be non-zero".into()));
        }
        Ok(())
    }
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<(), GestureError> {
        if self.width == 0 || self.height == 0 {
            return Err(GestureError::Config(format!(
                "screen size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
