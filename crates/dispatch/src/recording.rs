//! In-memory sink that records every action, for tests and dry runs

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::sink::{
    Hotkey, InputSink, MouseButton, Notification, Notifier, ScreenshotSink, ScrollDirection,
    SinkError,
};

/// Side effect as seen by a sink
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MoveCursor { x: i32, y: i32 },
    Click(MouseButton),
    Scroll { direction: ScrollDirection, amount: u32 },
    Hotkey(Hotkey),
    Screenshot(PathBuf),
    Notify { title: String, message: String },
    Beep,
}

/// Records actions into a shared log. Clones share the same log, so one
/// handle can be kept by a test while others are moved into a dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<Action>>>,
    fail_screenshots: bool,
    fail_input: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every capture fail with `SinkError::Unavailable`
    pub fn failing_screenshots(mut self) -> Self {
        self.fail_screenshots = true;
        self
    }

    /// Make every input action fail after being recorded
    pub fn failing_input(mut self) -> Self {
        self.fail_input = true;
        self
    }

    fn record(&self, action: Action) {
        if let Ok(mut log) = self.log.lock() {
            log.push(action);
        }
    }

    fn input_result(&self) -> Result<(), SinkError> {
        if self.fail_input {
            Err(SinkError::Unavailable("input disabled".into()))
        } else {
            Ok(())
        }
    }

    /// Snapshot of recorded actions
    pub fn actions(&self) -> Vec<Action> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Recorded actions other than cursor moves
    pub fn discrete_actions(&self) -> Vec<Action> {
        self.actions()
            .into_iter()
            .filter(|a| !matches!(a, Action::MoveCursor { .. }))
            .collect()
    }
}

impl InputSink for RecordingSink {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError> {
        self.record(Action::MoveCursor { x, y });
        self.input_result()
    }

    fn click(&mut self, button: MouseButton) -> Result<(), SinkError> {
        self.record(Action::Click(button));
        self.input_result()
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), SinkError> {
        self.record(Action::Scroll { direction, amount });
        self.input_result()
    }

    fn hotkey(&mut self, hotkey: Hotkey) -> Result<(), SinkError> {
        self.record(Action::Hotkey(hotkey));
        self.input_result()
    }
}

impl ScreenshotSink for RecordingSink {
    fn capture(&mut self) -> Result<PathBuf, SinkError> {
        if self.fail_screenshots {
            return Err(SinkError::Unavailable("capture disabled".into()));
        }
        let n = self
            .actions()
            .iter()
            .filter(|a| matches!(a, Action::Screenshot(_)))
            .count();
        let path = PathBuf::from(format!("screenshot_{}.png", n));
        self.record(Action::Screenshot(path.clone()));
        Ok(path)
    }
}

impl Notifier for RecordingSink {
    fn notify(&mut self, notification: &Notification) -> Result<(), SinkError> {
        self.record(Action::Notify {
            title: notification.title.clone(),
            message: notification.message.clone(),
        });
        Ok(())
    }

    fn beep(&mut self) -> Result<(), SinkError> {
        self.record(Action::Beep);
        Ok(())
    }
}
