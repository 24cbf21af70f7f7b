//! Gesture timer state (tracked over time)

/// Phase of a hold-to-fire gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldPhase {
    #[default]
    Idle,
    /// Condition has held continuously since the given timestamp
    Holding { since_ns: u64 },
    /// Fired; waits for the condition to lapse before re-arming
    Fired,
}

/// Hold timer for a single gesture kind
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldTimer {
    pub phase: HoldPhase,
    /// When this gesture last fired (nanoseconds)
    pub last_fired_ns: Option<u64>,
}

impl HoldTimer {
    /// Timestamp the current hold began, if holding
    pub fn hold_started_ns(&self) -> Option<u64> {
        match self.phase {
            HoldPhase::Holding { since_ns } => Some(since_ns),
            _ => None,
        }
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.phase, HoldPhase::Holding { .. })
    }

    /// Start a hold at `now_ns`
    pub fn arm(&mut self, now_ns: u64) {
        self.phase = HoldPhase::Holding { since_ns: now_ns };
    }

    /// Drop any hold in progress. Cooldown history is kept.
    pub fn reset(&mut self) {
        self.phase = HoldPhase::Idle;
    }

    /// Record a firing at `now_ns`
    pub fn mark_fired(&mut self, now_ns: u64) {
        self.last_fired_ns = Some(now_ns);
    }
}

/// Scroll gesture memory
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollState {
    /// Average iris height of the previous frame (frame pixels)
    pub prev_eye_y: Option<i32>,
    /// When a scroll last fired (nanoseconds)
    pub last_fired_ns: Option<u64>,
}

/// All gesture state owned by the engine for the lifetime of a run
#[derive(Debug, Clone, Default)]
pub struct GestureTimers {
    pub left_wink: HoldTimer,
    pub right_wink: HoldTimer,
    pub sustained_blink: HoldTimer,
    pub scroll: ScrollState,
}

impl GestureTimers {
    /// Most recent click from either eye. Left and right winks share one
    /// cooldown clock so eye flutter cannot produce a left+right pair.
    pub fn last_wink_fired_ns(&self) -> Option<u64> {
        match (self.left_wink.last_fired_ns, self.right_wink.last_fired_ns) {
            (Some(l), Some(r)) => Some(l.max(r)),
            (l, r) => l.or(r),
        }
    }

    /// Abandon in-progress holds without touching cooldowns or scroll memory
    pub fn reset_holds(&mut self) {
        self.left_wink.reset();
        self.right_wink.reset();
        self.sustained_blink.reset();
    }

    /// Start the click and scroll cooldown clocks at `now_ns`, so neither
    /// gesture can fire until a full cooldown has passed.
    pub fn start_cooldowns(&mut self, now_ns: u64) {
        self.left_wink.last_fired_ns = Some(now_ns);
        self.right_wink.last_fired_ns = Some(now_ns);
        self.scroll.last_fired_ns = Some(now_ns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_wink_cooldown_uses_latest() {
        let mut timers = GestureTimers::default();
        assert_eq!(timers.last_wink_fired_ns(), None);

        timers.right_wink.mark_fired(500);
        assert_eq!(timers.last_wink_fired_ns(), Some(500));

        timers.left_wink.mark_fired(900);
        assert_eq!(timers.last_wink_fired_ns(), Some(900));
    }

    #[test]
    fn test_start_cooldowns_leaves_blink_free() {
        let mut timers = GestureTimers::default();
        timers.start_cooldowns(42);

        assert_eq!(timers.last_wink_fired_ns(), Some(42));
        assert_eq!(timers.scroll.last_fired_ns, Some(42));
        assert_eq!(timers.sustained_blink.last_fired_ns, None);
    }

    #[test]
    fn test_reset_holds_keeps_history() {
        let mut timers = GestureTimers::default();
        timers.left_wink.arm(10);
        timers.left_wink.mark_fired(5);
        timers.scroll.prev_eye_y = Some(200);

        timers.reset_holds();

        assert!(!timers.left_wink.is_holding());
        assert_eq!(timers.left_wink.last_fired_ns, Some(5));
        assert_eq!(timers.scroll.prev_eye_y, Some(200));
    }
}
