//! Foreground-context gate for click gestures

use gesture_engine::GestureEvent;
use tracing::debug;

/// Supplies a label for whatever currently has focus (e.g. window title)
pub trait ContextProbe {
    fn active_context(&mut self) -> Option<String>;
}

impl<T: ContextProbe + ?Sized> ContextProbe for Box<T> {
    fn active_context(&mut self) -> Option<String> {
        (**self).active_context()
    }
}

/// Fixed context label, mostly for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct StaticContext(pub Option<String>);

impl StaticContext {
    pub fn new(label: impl Into<String>) -> Self {
        Self(Some(label.into()))
    }
}

impl ContextProbe for StaticContext {
    fn active_context(&mut self) -> Option<String> {
        self.0.clone()
    }
}

/// Suppresses clicks while an exempt context (video playback) has focus.
/// Scroll, screenshot, and hot-zone events always pass.
#[derive(Debug, Clone, Default)]
pub struct ContextGate {
    exempt_patterns: Vec<String>,
}

impl ContextGate {
    /// Patterns are matched as case-insensitive substrings
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exempt_patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_exempt(&self, context: Option<&str>) -> bool {
        let Some(label) = context else {
            return false;
        };
        let label = label.to_lowercase();
        self.exempt_patterns.iter().any(|p| label.contains(p.as_str()))
    }

    /// Gate one event
    pub fn apply(&self, event: GestureEvent, context: Option<&str>) -> GestureEvent {
        if event.is_click() && self.is_exempt(context) {
            debug!("Suppressing {} in exempt context", event.as_str());
            metrics::counter!("gesture_actions_suppressed_total", "reason" => "context").increment(1);
            GestureEvent::None
        } else {
            event
        }
    }

    /// Gate a frame's events, evaluating the context once
    pub fn filter(&self, events: &[GestureEvent], context: Option<&str>) -> Vec<GestureEvent> {
        events.iter().map(|e| self.apply(*e, context)).collect()
    }
}
