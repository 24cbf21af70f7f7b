//! Eye Gesture Engine
//!
//! Real-time interpretation of face-mesh landmarks:
//! - Eye aspect ratio and iris extraction
//! - Left/right wink detection (click)
//! - Sustained both-eye closure (screenshot)
//! - Vertical iris velocity (scroll)
//! - Iris-to-screen cursor mapping and the bottom-left hot zone

pub mod analysis;
pub mod config;
pub mod cursor;
pub mod detector;
pub mod eye;
pub mod state;

pub use analysis::{FrameAnalysis, GestureEvent};
pub use config::{ScreenConfig, ThresholdConfig};
pub use cursor::{CursorMapper, CursorPosition, HotZone};
pub use eye::{EyeMetrics, Point2D, REQUIRED_LANDMARKS};
pub use state::{GestureTimers, HoldPhase};

use frame_source::FrameSample;
use thiserror::Error;
use tracing::{debug, trace};

/// Gesture engine error types
#[derive(Error, Debug)]
pub enum GestureError {
    #[error("No face detected")]
    NoLandmarks,

    #[error("Frame carries {found} landmarks, {required} required")]
    LandmarksMissing { required: usize, found: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Per-frame gesture interpreter
pub struct GestureEngine {
    thresholds: ThresholdConfig,
    cursor: CursorMapper,
    hot_zone_enabled: bool,
    reset_holds_on_dropout: bool,
    timers: GestureTimers,
    clock_started: bool,
}

impl GestureEngine {
    /// Create a new engine with validated configuration
    pub fn new(screen: ScreenConfig, thresholds: ThresholdConfig) -> Result<Self, GestureError> {
        screen.validate()?;
        thresholds.validate()?;

        Ok(Self {
            thresholds,
            cursor: CursorMapper::new(screen),
            hot_zone_enabled: true,
            reset_holds_on_dropout: false,
            timers: GestureTimers::default(),
            clock_started: false,
        })
    }

    /// Enable or disable the hot zone trigger
    pub fn with_hot_zone(mut self, enabled: bool) -> Self {
        self.hot_zone_enabled = enabled;
        self
    }

    /// Abandon in-progress wink/blink holds when a frame has no face
    pub fn with_dropout_reset(mut self, enabled: bool) -> Self {
        self.reset_holds_on_dropout = enabled;
        self
    }

    /// Analyze a single landmark frame
    pub fn process(&mut self, sample: &FrameSample) -> Result<FrameAnalysis, GestureError> {
        if !sample.has_face() {
            self.on_dropout();
            return Err(GestureError::NoLandmarks);
        }

        let metrics = EyeMetrics::extract(&sample.landmarks).ok_or_else(|| {
            self.on_dropout();
            GestureError::LandmarksMissing {
                required: REQUIRED_LANDMARKS,
                found: sample.landmark_count(),
            }
        })?;

        Ok(self.evaluate(&metrics, sample.width, sample.height, sample.timestamp_ns))
    }

    /// Run every detector over already-extracted metrics
    pub fn evaluate(
        &mut self,
        metrics: &EyeMetrics,
        frame_width: u32,
        frame_height: u32,
        now_ns: u64,
    ) -> FrameAnalysis {
        if !self.clock_started {
            debug!("Cooldown clocks started at {}ns", now_ns);
            self.timers.start_cooldowns(now_ns);
            self.clock_started = true;
        }

        let mut events = Vec::new();
        let t = &self.thresholds;

        events.extend(detector::update_winks(&mut self.timers, metrics, t, now_ns));
        events.extend(detector::update_sustained_blink(
            &mut self.timers.sustained_blink,
            metrics,
            t,
            now_ns,
        ));

        let cursor = self
            .cursor
            .map(metrics.left_iris, metrics.right_iris, frame_width, frame_height);

        events.extend(detector::update_scroll(
            &mut self.timers.scroll,
            metrics.eye_y_px(frame_height),
            t,
            now_ns,
        ));

        if self.hot_zone_enabled && self.cursor.in_hot_zone(cursor) {
            events.push(GestureEvent::HotZoneTrigger);
        }

        trace!(
            left_ear = metrics.left_ear,
            right_ear = metrics.right_ear,
            x = cursor.x,
            y = cursor.y,
            "frame evaluated"
        );

        FrameAnalysis {
            timestamp_ns: now_ns,
            metrics: *metrics,
            cursor,
            events,
        }
    }

    fn on_dropout(&mut self) {
        if self.reset_holds_on_dropout {
            debug!("Face lost, abandoning gesture holds");
            self.timers.reset_holds();
        }
    }

    /// Read-only view of gesture timers
    pub fn timers(&self) -> &GestureTimers {
        &self.timers
    }
}
