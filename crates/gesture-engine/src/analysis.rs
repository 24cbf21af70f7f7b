//! Gesture events and per-frame analysis results

use crate::cursor::CursorPosition;
use crate::eye::EyeMetrics;

/// Discrete gesture recognized in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    /// Nothing to do (also produced when a gate suppresses an event)
    None,

    /// Left eye wink held
    LeftClick,

    /// Right eye wink held
    RightClick,

    /// Both eyes closed for the screenshot hold duration
    ScreenshotHold,

    /// Iris moved up faster than the scroll threshold
    ScrollUp,

    /// Iris moved down faster than the scroll threshold
    ScrollDown,

    /// Cursor inside the bottom-left hot zone
    HotZoneTrigger,
}

impl GestureEvent {
    /// Label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LeftClick => "left_click",
            Self::RightClick => "right_click",
            Self::ScreenshotHold => "screenshot_hold",
            Self::ScrollUp => "scroll_up",
            Self::ScrollDown => "scroll_down",
            Self::HotZoneTrigger => "hot_zone",
        }
    }

    /// Whether this event produces a mouse click
    pub fn is_click(&self) -> bool {
        matches!(self, Self::LeftClick | Self::RightClick)
    }

    pub fn is_scroll(&self) -> bool {
        matches!(self, Self::ScrollUp | Self::ScrollDown)
    }
}

/// Complete result of evaluating one frame
#[derive(Debug, Clone, Default)]
pub struct FrameAnalysis {
    /// Frame timestamp (nanoseconds)
    pub timestamp_ns: u64,

    /// Eye openness and iris positions
    pub metrics: EyeMetrics,

    /// Mapped absolute cursor position
    pub cursor: CursorPosition,

    /// Gestures recognized this frame, in evaluation order
    pub events: Vec<GestureEvent>,
}

impl FrameAnalysis {
    /// Check if any gesture fired
    pub fn has_events(&self) -> bool {
        self.events.iter().any(|e| *e != GestureEvent::None)
    }

    /// Whether a specific gesture fired this frame
    pub fn contains(&self, event: GestureEvent) -> bool {
        self.events.contains(&event)
    }
}
