//! Action Dispatcher Implementation

use std::collections::HashMap;
use std::time::Duration;

use gesture_engine::{CursorPosition, GestureEvent, ThresholdConfig};
use tracing::{debug, info, warn};

use crate::sink::{
    Hotkey, InputSink, MouseButton, Notification, Notifier, ScreenshotSink, ScrollDirection,
    SinkError,
};

const NS_PER_MS: u64 = 1_000_000;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Cooldown between repeats of the same discrete action (milliseconds)
    pub action_cooldown_ms: u64,
    /// Cooldown between repeats of the same scroll direction (milliseconds)
    pub scroll_cooldown_ms: u64,
    /// Wheel units per scroll
    pub scroll_amount: u32,
    /// Application name shown on notifications
    pub app_name: String,
    /// Notification display time (seconds)
    pub notification_timeout_secs: u64,
    /// Send a notification after each screenshot
    pub notify_on_screenshot: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from_thresholds(&ThresholdConfig::default())
    }
}

impl DispatchConfig {
    /// Derive cooldowns from the gesture thresholds
    pub fn from_thresholds(thresholds: &ThresholdConfig) -> Self {
        Self {
            action_cooldown_ms: thresholds.action_cooldown_ms,
            scroll_cooldown_ms: thresholds.scroll_cooldown_ms,
            scroll_amount: thresholds.scroll_amount,
            app_name: "Eye Tracker".to_string(),
            notification_timeout_secs: 5,
            notify_on_screenshot: true,
        }
    }
}

/// Dispatch history of one action kind
#[derive(Debug, Clone)]
pub struct ActionState {
    /// Last time this action was attempted (frame clock, nanoseconds)
    pub last_fired_ns: u64,
    /// Number of attempts
    pub fire_count: usize,
    /// Number of attempts whose sink failed
    pub failure_count: usize,
}

/// Result of dispatching one event
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Sink accepted the action
    Dispatched,
    /// `GestureEvent::None`, nothing to do
    Ignored,
    /// Same action fired too recently
    CoolingDown,
    /// Sink failed; the attempt still counts toward cooldown
    Failed(SinkError),
}

impl DispatchOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

/// The only component allowed to touch the outside world
pub struct ActionDispatcher<I, S, N> {
    config: DispatchConfig,
    input: I,
    screenshots: S,
    notifier: N,
    /// Dispatch states by action kind
    states: HashMap<GestureEvent, ActionState>,
}

impl<I, S, N> ActionDispatcher<I, S, N>
where
    I: InputSink,
    S: ScreenshotSink,
    N: Notifier,
{
    /// Create a new dispatcher
    pub fn new(config: DispatchConfig, input: I, screenshots: S, notifier: N) -> Self {
        info!("Creating action dispatcher with config: {:?}", config);
        Self {
            config,
            input,
            screenshots,
            notifier,
            states: HashMap::new(),
        }
    }

    fn cooldown_ms(&self, event: GestureEvent) -> u64 {
        if event.is_scroll() {
            self.config.scroll_cooldown_ms
        } else {
            self.config.action_cooldown_ms
        }
    }

    /// Check whether an action may fire at `now_ns`
    pub fn should_fire(&self, event: GestureEvent, now_ns: u64) -> bool {
        if event == GestureEvent::None {
            return false;
        }

        match self.states.get(&event) {
            Some(state) => {
                let elapsed = now_ns.saturating_sub(state.last_fired_ns);
                elapsed > self.cooldown_ms(event) * NS_PER_MS
            }
            None => true,
        }
    }

    fn record_fire(&mut self, event: GestureEvent, now_ns: u64) -> &mut ActionState {
        let state = self.states.entry(event).or_insert(ActionState {
            last_fired_ns: now_ns,
            fire_count: 0,
            failure_count: 0,
        });
        state.last_fired_ns = now_ns;
        state.fire_count += 1;
        state
    }

    /// Position the cursor. Not subject to cooldown.
    pub fn move_cursor(&mut self, cursor: CursorPosition) -> Result<(), SinkError> {
        self.input.move_cursor(cursor.x, cursor.y)
    }

    /// Attempt exactly one external action for `event`
    pub fn dispatch(&mut self, event: GestureEvent, now_ns: u64) -> DispatchOutcome {
        if event == GestureEvent::None {
            return DispatchOutcome::Ignored;
        }

        if !self.should_fire(event, now_ns) {
            debug!("Action {} suppressed: in cooldown period", event.as_str());
            metrics::counter!("gesture_actions_suppressed_total", "reason" => "cooldown").increment(1);
            return DispatchOutcome::CoolingDown;
        }

        // Recorded before the attempt so a failing sink is not retried next frame
        self.record_fire(event, now_ns);

        match self.perform(event) {
            Ok(()) => {
                info!("Action dispatched: {}", event.as_str());
                metrics::counter!("gesture_events_total", "kind" => event.as_str()).increment(1);
                DispatchOutcome::Dispatched
            }
            Err(e) => {
                warn!("Action {} failed: {}", event.as_str(), e);
                metrics::counter!("sink_failures_total", "sink" => event.as_str()).increment(1);
                if let Some(state) = self.states.get_mut(&event) {
                    state.failure_count += 1;
                }
                DispatchOutcome::Failed(e)
            }
        }
    }

    fn perform(&mut self, event: GestureEvent) -> Result<(), SinkError> {
        match event {
            GestureEvent::None => Ok(()),
            GestureEvent::LeftClick => self.input.click(MouseButton::Left),
            GestureEvent::RightClick => self.input.click(MouseButton::Right),
            GestureEvent::ScrollUp => self.input.scroll(ScrollDirection::Up, self.config.scroll_amount),
            GestureEvent::ScrollDown => {
                self.input.scroll(ScrollDirection::Down, self.config.scroll_amount)
            }
            GestureEvent::HotZoneTrigger => self.input.hotkey(Hotkey::CloseTab),
            GestureEvent::ScreenshotHold => {
                let path = self.screenshots.capture()?;
                info!("Screenshot saved at: {}", path.display());

                if self.config.notify_on_screenshot {
                    self.notifier.notify(&Notification {
                        title: "Screenshot Taken".to_string(),
                        message: format!("Saved at: {}", path.display()),
                        app_name: self.config.app_name.clone(),
                        timeout: Duration::from_secs(self.config.notification_timeout_secs),
                    })?;
                }
                Ok(())
            }
        }
    }

    /// Audible cue at startup
    pub fn startup_beep(&mut self) -> Result<(), SinkError> {
        self.notifier.beep()
    }

    /// Get dispatch state for an action kind
    pub fn state(&self, event: GestureEvent) -> Option<&ActionState> {
        self.states.get(&event)
    }

    /// Number of attempts for an action kind
    pub fn fire_count(&self, event: GestureEvent) -> usize {
        self.states.get(&event).map_or(0, |s| s.fire_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Action, RecordingSink};

    const MS: u64 = NS_PER_MS;

    fn dispatcher(
        sink: &RecordingSink,
    ) -> ActionDispatcher<RecordingSink, RecordingSink, RecordingSink> {
        ActionDispatcher::new(
            DispatchConfig::default(),
            sink.clone(),
            sink.clone(),
            sink.clone(),
        )
    }

    #[test]
    fn test_each_event_maps_to_one_action() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink);

        d.dispatch(GestureEvent::LeftClick, 0);
        d.dispatch(GestureEvent::RightClick, 0);
        d.dispatch(GestureEvent::ScrollUp, 0);
        d.dispatch(GestureEvent::ScrollDown, 0);
        d.dispatch(GestureEvent::HotZoneTrigger, 0);

        assert_eq!(
            sink.actions(),
            vec![
                Action::Click(MouseButton::Left),
                Action::Click(MouseButton::Right),
                Action::Scroll { direction: ScrollDirection::Up, amount: 10 },
                Action::Scroll { direction: ScrollDirection::Down, amount: 10 },
                Action::Hotkey(Hotkey::CloseTab),
            ]
        );
    }

    #[test]
    fn test_hot_zone_deduplicated_by_cooldown() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink);

        // Hot zone reported every frame at ~30fps for 2.5s
        let dispatched = (0..75u64)
            .filter(|i| d.dispatch(GestureEvent::HotZoneTrigger, i * 33 * MS).is_dispatched())
            .count();

        assert_eq!(dispatched, 3);
        assert_eq!(d.fire_count(GestureEvent::HotZoneTrigger), 3);
    }

    #[test]
    fn test_none_is_ignored() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink);

        assert!(matches!(d.dispatch(GestureEvent::None, 0), DispatchOutcome::Ignored));
        assert!(sink.actions().is_empty());
    }

    #[test]
    fn test_screenshot_notifies_with_path() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink);

        assert!(d.dispatch(GestureEvent::ScreenshotHold, 0).is_dispatched());
        assert_eq!(
            sink.actions(),
            vec![
                Action::Screenshot("screenshot_0.png".into()),
                Action::Notify {
                    title: "Screenshot Taken".into(),
                    message: "Saved at: screenshot_0.png".into(),
                },
            ]
        );
    }

    #[test]
    fn test_failed_capture_still_consumes_cooldown() {
        let sink = RecordingSink::new();
        let mut d = ActionDispatcher::new(
            DispatchConfig::default(),
            sink.clone(),
            sink.clone().failing_screenshots(),
            sink.clone(),
        );

        assert!(matches!(
            d.dispatch(GestureEvent::ScreenshotHold, 0),
            DispatchOutcome::Failed(SinkError::Unavailable(_))
        ));
        assert!(matches!(
            d.dispatch(GestureEvent::ScreenshotHold, 10 * MS),
            DispatchOutcome::CoolingDown
        ));

        let state = d.state(GestureEvent::ScreenshotHold).unwrap();
        assert_eq!(state.fire_count, 1);
        assert_eq!(state.failure_count, 1);
        assert!(sink.actions().is_empty());
    }

    #[test]
    fn test_scroll_uses_scroll_cooldown() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink);

        assert!(d.dispatch(GestureEvent::ScrollDown, 0).is_dispatched());
        assert!(!d.dispatch(GestureEvent::ScrollDown, 400 * MS).is_dispatched());
        assert!(d.dispatch(GestureEvent::ScrollDown, 501 * MS).is_dispatched());
    }

    #[test]
    fn test_startup_beep() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink);
        d.startup_beep().unwrap();
        assert_eq!(sink.actions(), vec![Action::Beep]);
    }
}
