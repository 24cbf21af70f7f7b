//! Gesture state machines: winks, sustained blink, and vertical scroll
//!
//! Each detector is a function over its own slice of `GestureTimers`, the
//! current metrics, and the frame timestamp. None of them hold state of
//! their own, so the engine can evaluate them in a fixed order each frame.

use tracing::{debug, info};

use crate::analysis::GestureEvent;
use crate::config::ThresholdConfig;
use crate::eye::EyeMetrics;
use crate::state::{GestureTimers, HoldPhase, HoldTimer, ScrollState};

const NS_PER_MS: u64 = 1_000_000;

/// Which eye is closed during a wink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinkSide {
    Left,
    Right,
}

impl WinkSide {
    fn event(self) -> GestureEvent {
        match self {
            Self::Left => GestureEvent::LeftClick,
            Self::Right => GestureEvent::RightClick,
        }
    }
}

fn elapsed_ns(now_ns: u64, since_ns: u64) -> u64 {
    now_ns.saturating_sub(since_ns)
}

/// True when no previous firing exists or it is strictly older than the cooldown
fn cooled_down(last_fired_ns: Option<u64>, now_ns: u64, cooldown_ms: u64) -> bool {
    last_fired_ns.map_or(true, |t| elapsed_ns(now_ns, t) > cooldown_ms * NS_PER_MS)
}

/// Advance one wink timer.
///
/// `cooldown_anchor` is the shared last-click time for both eyes.
fn update_wink(
    timer: &mut HoldTimer,
    side: WinkSide,
    closed_ear: f32,
    open_ear: f32,
    cooldown_anchor: Option<u64>,
    config: &ThresholdConfig,
    now_ns: u64,
) -> Option<GestureEvent> {
    let asymmetric = closed_ear < config.wink_threshold && open_ear > config.wink_open_threshold();

    if !asymmetric {
        if timer.is_holding() {
            debug!("{:?} wink interrupted", side);
        }
        timer.reset();
        return None;
    }

    match timer.phase {
        HoldPhase::Idle | HoldPhase::Fired => {
            debug!("{:?} wink hold started at {}ns", side, now_ns);
            timer.arm(now_ns);
            None
        }
        HoldPhase::Holding { since_ns } => {
            let held = elapsed_ns(now_ns, since_ns) > config.wink_hold_ms * NS_PER_MS;
            if held && cooled_down(cooldown_anchor, now_ns, config.action_cooldown_ms) {
                info!("{:?} wink recognized", side);
                timer.mark_fired(now_ns);
                timer.reset();
                Some(side.event())
            } else {
                None
            }
        }
    }
}

/// Evaluate both wink detectors. At most one side can qualify per frame
/// because each requires the other eye to be clearly open.
pub fn update_winks(
    timers: &mut GestureTimers,
    metrics: &EyeMetrics,
    config: &ThresholdConfig,
    now_ns: u64,
) -> Option<GestureEvent> {
    let anchor = timers.last_wink_fired_ns();
    let left = update_wink(
        &mut timers.left_wink,
        WinkSide::Left,
        metrics.left_ear,
        metrics.right_ear,
        anchor,
        config,
        now_ns,
    );

    let anchor = timers.last_wink_fired_ns();
    let right = update_wink(
        &mut timers.right_wink,
        WinkSide::Right,
        metrics.right_ear,
        metrics.left_ear,
        anchor,
        config,
        now_ns,
    );

    left.or(right)
}

/// Both-eyes-closed hold. Fires once per closure; the eyes must reopen
/// before it can fire again.
pub fn update_sustained_blink(
    timer: &mut HoldTimer,
    metrics: &EyeMetrics,
    config: &ThresholdConfig,
    now_ns: u64,
) -> Option<GestureEvent> {
    let closed = metrics.left_ear < config.blink_threshold && metrics.right_ear < config.blink_threshold;

    if !closed {
        if timer.is_holding() {
            debug!("Sustained blink released before firing");
        }
        timer.reset();
        return None;
    }

    match timer.phase {
        HoldPhase::Idle => {
            debug!("Sustained blink hold started at {}ns", now_ns);
            timer.arm(now_ns);
            None
        }
        HoldPhase::Holding { since_ns } => {
            if elapsed_ns(now_ns, since_ns) > config.screenshot_hold_ms * NS_PER_MS {
                info!("Sustained blink recognized");
                timer.mark_fired(now_ns);
                timer.phase = HoldPhase::Fired;
                Some(GestureEvent::ScreenshotHold)
            } else {
                None
            }
        }
        HoldPhase::Fired => None,
    }
}

/// Velocity-triggered vertical scroll. `prev_eye_y` is refreshed every
/// frame whether or not a scroll fires.
pub fn update_scroll(
    state: &mut ScrollState,
    eye_y: i32,
    config: &ThresholdConfig,
    now_ns: u64,
) -> Option<GestureEvent> {
    let prev_eye_y = state.prev_eye_y;
    let event = prev_eye_y.and_then(|prev| {
        let delta = i64::from(eye_y) - i64::from(prev);
        if delta.unsigned_abs() <= u64::from(config.scroll_pixel_threshold)
            || !cooled_down(state.last_fired_ns, now_ns, config.scroll_cooldown_ms)
        {
            return None;
        }

        state.last_fired_ns = Some(now_ns);
        let event = if delta < 0 {
            GestureEvent::ScrollUp
        } else {
            GestureEvent::ScrollDown
        };
        debug!("Scroll {} (delta {}px)", event.as_str(), delta);
        Some(event)
    });

    state.prev_eye_y = Some(eye_y);
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = NS_PER_MS;

    fn eyes(left_ear: f32, right_ear: f32) -> EyeMetrics {
        EyeMetrics {
            left_ear,
            right_ear,
            ..Default::default()
        }
    }

    /// Feed the same metrics every `step_ms` from `start_ms` to `end_ms` inclusive
    fn run_winks(
        timers: &mut GestureTimers,
        metrics: EyeMetrics,
        start_ms: u64,
        end_ms: u64,
        step_ms: u64,
    ) -> Vec<(u64, GestureEvent)> {
        let config = ThresholdConfig::default();
        (start_ms..=end_ms)
            .step_by(step_ms as usize)
            .filter_map(|t| update_winks(timers, &metrics, &config, t * MS).map(|e| (t, e)))
            .collect()
    }

    #[test]
    fn test_left_wink_fires_once_per_cooldown() {
        let mut timers = GestureTimers::default();
        let fired = run_winks(&mut timers, eyes(0.1, 0.4), 0, 900, 33);

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1, GestureEvent::LeftClick);
        assert!(fired[0].0 > 200);
    }

    #[test]
    fn test_continued_wink_refires_after_cooldown() {
        let mut timers = GestureTimers::default();
        let fired = run_winks(&mut timers, eyes(0.4, 0.1), 0, 2500, 10);

        assert!(fired.iter().all(|(_, e)| *e == GestureEvent::RightClick));
        assert!(fired.len() >= 2);
        for pair in fired.windows(2) {
            assert!(pair[1].0 - pair[0].0 > 1000);
        }
    }

    #[test]
    fn test_symmetric_closure_is_not_a_wink() {
        let mut timers = GestureTimers::default();
        // Both below wink threshold, above blink threshold
        let fired = run_winks(&mut timers, eyes(0.2, 0.22), 0, 2000, 33);
        assert!(fired.is_empty());
        assert!(!timers.left_wink.is_holding());
        assert!(!timers.right_wink.is_holding());
    }

    #[test]
    fn test_open_eye_inside_margin_is_not_a_wink() {
        let mut timers = GestureTimers::default();
        // 0.34 is above the wink threshold but inside the 0.1 margin
        let fired = run_winks(&mut timers, eyes(0.1, 0.34), 0, 2000, 33);
        assert!(fired.is_empty());
    }

    #[test]
    fn test_interrupted_wink_restarts_hold() {
        let config = ThresholdConfig::default();
        let mut timers = GestureTimers::default();
        let wink = eyes(0.1, 0.4);
        let open = eyes(0.4, 0.4);

        assert_eq!(update_winks(&mut timers, &wink, &config, 0), None);
        assert_eq!(update_winks(&mut timers, &wink, &config, 150 * MS), None);
        assert_eq!(update_winks(&mut timers, &open, &config, 180 * MS), None);
        assert_eq!(timers.left_wink.hold_started_ns(), None);

        assert_eq!(update_winks(&mut timers, &wink, &config, 190 * MS), None);
        // 210ms after the first frame but only 20ms into the new hold
        assert_eq!(update_winks(&mut timers, &wink, &config, 210 * MS), None);
        assert_eq!(
            update_winks(&mut timers, &wink, &config, 400 * MS),
            Some(GestureEvent::LeftClick)
        );
    }

    #[test]
    fn test_left_then_right_share_cooldown() {
        let config = ThresholdConfig::default();
        let mut timers = GestureTimers::default();
        let left = eyes(0.1, 0.4);
        let right = eyes(0.4, 0.1);

        update_winks(&mut timers, &left, &config, 0);
        assert_eq!(
            update_winks(&mut timers, &left, &config, 250 * MS),
            Some(GestureEvent::LeftClick)
        );

        update_winks(&mut timers, &right, &config, 300 * MS);
        assert_eq!(update_winks(&mut timers, &right, &config, 600 * MS), None);
        assert_eq!(update_winks(&mut timers, &right, &config, 1200 * MS), None);
        assert_eq!(
            update_winks(&mut timers, &right, &config, 1300 * MS),
            Some(GestureEvent::RightClick)
        );
    }

    #[test]
    fn test_blink_fires_once_after_hold() {
        let config = ThresholdConfig::default();
        let mut timer = HoldTimer::default();
        let closed = eyes(0.1, 0.1);

        assert_eq!(update_sustained_blink(&mut timer, &closed, &config, 0), None);
        assert_eq!(update_sustained_blink(&mut timer, &closed, &config, 3000 * MS), None);
        assert_eq!(
            update_sustained_blink(&mut timer, &closed, &config, 3000 * MS + 1),
            Some(GestureEvent::ScreenshotHold)
        );

        // Still closed: latched until the eyes reopen
        for t in (3100..10_000).step_by(100) {
            assert_eq!(update_sustained_blink(&mut timer, &closed, &config, t * MS), None);
        }
    }

    #[test]
    fn test_blink_rearms_after_reopen() {
        let config = ThresholdConfig::default();
        let mut timer = HoldTimer::default();
        let closed = eyes(0.1, 0.1);
        let open = eyes(0.3, 0.3);

        update_sustained_blink(&mut timer, &closed, &config, 0);
        assert!(update_sustained_blink(&mut timer, &closed, &config, 3100 * MS).is_some());
        update_sustained_blink(&mut timer, &open, &config, 3200 * MS);
        update_sustained_blink(&mut timer, &closed, &config, 3300 * MS);
        assert_eq!(
            update_sustained_blink(&mut timer, &closed, &config, 6400 * MS),
            Some(GestureEvent::ScreenshotHold)
        );
    }

    #[test]
    fn test_broken_blink_hold_emits_nothing() {
        let config = ThresholdConfig::default();
        let mut timer = HoldTimer::default();
        let closed = eyes(0.1, 0.1);
        let one_open = eyes(0.1, 0.2);

        update_sustained_blink(&mut timer, &closed, &config, 0);
        assert_eq!(update_sustained_blink(&mut timer, &closed, &config, 2999 * MS), None);
        assert_eq!(update_sustained_blink(&mut timer, &one_open, &config, 2999 * MS + 1), None);
        assert_eq!(timer.phase, HoldPhase::Idle);

        // Resumed closure starts a fresh 3s window
        update_sustained_blink(&mut timer, &closed, &config, 3000 * MS);
        assert_eq!(update_sustained_blink(&mut timer, &closed, &config, 5000 * MS), None);
        assert_eq!(update_sustained_blink(&mut timer, &closed, &config, 6000 * MS), None);
        assert!(update_sustained_blink(&mut timer, &closed, &config, 6001 * MS).is_some());
    }

    #[test]
    fn test_wink_never_starts_blink_hold() {
        let config = ThresholdConfig::default();
        let mut timer = HoldTimer::default();
        update_sustained_blink(&mut timer, &eyes(0.05, 0.4), &config, 0);
        assert_eq!(timer.phase, HoldPhase::Idle);
    }

    #[test]
    fn test_scroll_direction_and_cooldown() {
        let config = ThresholdConfig::default();
        let mut state = ScrollState::default();

        assert_eq!(update_scroll(&mut state, 240, &config, 0), None);
        assert_eq!(
            update_scroll(&mut state, 256, &config, 600 * MS),
            Some(GestureEvent::ScrollDown)
        );
        // Qualifying delta within 500ms is suppressed
        assert_eq!(update_scroll(&mut state, 230, &config, 800 * MS), None);
        assert_eq!(state.prev_eye_y, Some(230));
        assert_eq!(
            update_scroll(&mut state, 210, &config, 1200 * MS),
            Some(GestureEvent::ScrollUp)
        );
    }

    #[test]
    fn test_scroll_threshold_is_strict() {
        let config = ThresholdConfig::default();
        let mut state = ScrollState::default();

        update_scroll(&mut state, 100, &config, 0);
        assert_eq!(update_scroll(&mut state, 115, &config, 1000 * MS), None);
        assert_eq!(
            update_scroll(&mut state, 131, &config, 2000 * MS),
            Some(GestureEvent::ScrollDown)
        );
    }

    #[test]
    fn test_scroll_delta_across_full_range() {
        let config = ThresholdConfig::default();
        let mut state = ScrollState::default();

        update_scroll(&mut state, i32::MIN, &config, 0);
        assert_eq!(
            update_scroll(&mut state, i32::MAX, &config, 1000 * MS),
            Some(GestureEvent::ScrollDown)
        );
        assert_eq!(
            update_scroll(&mut state, i32::MIN, &config, 2000 * MS),
            Some(GestureEvent::ScrollUp)
        );
    }

    #[test]
    fn test_slow_drift_never_scrolls() {
        let config = ThresholdConfig::default();
        let mut state = ScrollState::default();
        for (i, y) in (0..400).step_by(5).enumerate() {
            assert_eq!(update_scroll(&mut state, y, &config, i as u64 * 1000 * MS), None);
        }
    }
}
