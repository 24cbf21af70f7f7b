//! Side-effect sink traits

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Sink failure. Logged by the dispatcher, never retried.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Signed wheel delta (up is positive)
    pub fn signed(&self, amount: u32) -> i64 {
        match self {
            Self::Up => amount as i64,
            Self::Down => -(amount as i64),
        }
    }
}

/// Keyboard shortcuts the pipeline can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// Ctrl+W
    CloseTab,
}

impl Hotkey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CloseTab => "ctrl+w",
        }
    }
}

/// Desktop notification request
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub app_name: String,
    pub timeout: Duration,
}

/// Mouse and keyboard injection
pub trait InputSink {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError>;
    fn click(&mut self, button: MouseButton) -> Result<(), SinkError>;
    fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), SinkError>;
    fn hotkey(&mut self, hotkey: Hotkey) -> Result<(), SinkError>;
}

/// Screen capture
pub trait ScreenshotSink {
    /// Capture the screen and return the file written
    fn capture(&mut self) -> Result<PathBuf, SinkError>;
}

/// User-facing notifications
pub trait Notifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), SinkError>;

    /// Audible cue, the terminal bell by default
    fn beep(&mut self) -> Result<(), SinkError> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}

impl<T: InputSink + ?Sized> InputSink for Box<T> {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError> {
        (**self).move_cursor(x, y)
    }

    fn click(&mut self, button: MouseButton) -> Result<(), SinkError> {
        (**self).click(button)
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), SinkError> {
        (**self).scroll(direction, amount)
    }

    fn hotkey(&mut self, hotkey: Hotkey) -> Result<(), SinkError> {
        (**self).hotkey(hotkey)
    }
}

impl<T: ScreenshotSink + ?Sized> ScreenshotSink for Box<T> {
    fn capture(&mut self) -> Result<PathBuf, SinkError> {
        (**self).capture()
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&mut self, notification: &Notification) -> Result<(), SinkError> {
        (**self).notify(notification)
    }

    fn beep(&mut self) -> Result<(), SinkError> {
        (**self).beep()
    }
}
