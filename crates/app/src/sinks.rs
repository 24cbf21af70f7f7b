//! Command-backed sinks and context probe
//!
//! Each external collaborator is an argv template run with
//! `std::process::Command`. Placeholders of the form `{name}` are replaced
//! per call. Missing templates, or `--dry-run`, fall back to logging.

use std::path::PathBuf;
use std::process::Command;

use dispatch::{
    ContextProbe, Hotkey, InputSink, MouseButton, Notification, Notifier, ScreenshotSink,
    ScrollDirection, SinkError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::config::InputConfig;

/// Program and arguments with `{placeholder}` substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTemplate(pub Vec<String>);

impl CommandTemplate {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(argv.into_iter().map(Into::into).collect())
    }

    /// Substitute placeholders in every argument
    pub fn render(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.0
            .iter()
            .map(|arg| {
                vars.iter().fold(arg.clone(), |acc, (name, value)| {
                    acc.replace(&format!("{{{}}}", name), value)
                })
            })
            .collect()
    }

    /// Run to completion and return trimmed stdout
    pub fn run(&self, vars: &[(&str, &str)]) -> Result<String, SinkError> {
        let argv = self.render(vars);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SinkError::Unavailable("empty command template".into()))?;

        let output = Command::new(program).args(args).output()?;
        if !output.status.success() {
            return Err(SinkError::Command {
                command: argv.join(" "),
                reason: format!(
                    "{} {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Mouse/keyboard injection through external tools (xdotool, ydotool, ...)
pub struct CommandInputSink {
    config: InputConfig,
    dry_run: bool,
}

impl CommandInputSink {
    pub fn new(config: InputConfig, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    fn run(&self, template: &Option<CommandTemplate>, vars: &[(&str, &str)]) -> Result<bool, SinkError> {
        match template {
            Some(t) if !self.dry_run => t.run(vars).map(|_| true),
            _ => Ok(false),
        }
    }
}

impl InputSink for CommandInputSink {
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), SinkError> {
        let (xs, ys) = (x.to_string(), y.to_string());
        if !self.run(&self.config.move_command, &[("x", xs.as_str()), ("y", ys.as_str())])? {
            trace!("cursor -> ({}, {})", x, y);
        }
        Ok(())
    }

    fn click(&mut self, button: MouseButton) -> Result<(), SinkError> {
        // X11 button numbers: 1 left, 3 right
        let id = match button {
            MouseButton::Left => "1",
            MouseButton::Right => "3",
        };
        let vars = [("button", button.as_str()), ("button_id", id)];
        if !self.run(&self.config.click_command, &vars)? {
            info!("click {}", button.as_str());
        }
        Ok(())
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: u32) -> Result<(), SinkError> {
        let amount_s = amount.to_string();
        let delta = direction.signed(amount).to_string();
        let wheel_button = match direction {
            ScrollDirection::Up => "4",
            ScrollDirection::Down => "5",
        };
        let vars = [
            ("direction", direction.as_str()),
            ("amount", amount_s.as_str()),
            ("delta", delta.as_str()),
            ("wheel_button", wheel_button),
        ];
        if !self.run(&self.config.scroll_command, &vars)? {
            info!("scroll {} by {}", direction.as_str(), amount);
        }
        Ok(())
    }

    fn hotkey(&mut self, hotkey: Hotkey) -> Result<(), SinkError> {
        if !self.run(&self.config.hotkey_command, &[("keys", hotkey.as_str())])? {
            info!("hotkey {}", hotkey.as_str());
        }
        Ok(())
    }
}

/// Screen capture through an external tool (grim, scrot, screencapture, ...)
pub struct CommandScreenshotSink {
    directory: PathBuf,
    capture: Option<CommandTemplate>,
    reveal: Option<CommandTemplate>,
    dry_run: bool,
}

impl CommandScreenshotSink {
    pub fn new(
        directory: PathBuf,
        capture: Option<CommandTemplate>,
        reveal: Option<CommandTemplate>,
        dry_run: bool,
    ) -> Self {
        Self {
            directory,
            capture,
            reveal,
            dry_run,
        }
    }

    /// Next file name: `screenshot_<unix seconds>.png`
    pub fn next_path(&self) -> PathBuf {
        self.directory
            .join(format!("screenshot_{}.png", chrono::Utc::now().timestamp()))
    }
}

impl ScreenshotSink for CommandScreenshotSink {
    fn capture(&mut self) -> Result<PathBuf, SinkError> {
        let path = self.next_path();
        if self.dry_run {
            info!("[dry-run] would capture screen to {}", path.display());
            return Ok(path);
        }

        let template = self
            .capture
            .as_ref()
            .ok_or_else(|| SinkError::Unavailable("no capture command configured".into()))?;
        let path_s = path.display().to_string();
        template.run(&[("path", path_s.as_str())])?;

        if let Some(reveal) = &self.reveal {
            let dir = self.directory.display().to_string();
            if let Err(e) = reveal.run(&[("path", dir.as_str())]) {
                warn!("Failed to open screenshot folder: {}", e);
            }
        }

        Ok(path)
    }
}

/// Desktop notifications through an external tool (notify-send, ...)
pub struct CommandNotifier {
    command: Option<CommandTemplate>,
    dry_run: bool,
}

impl CommandNotifier {
    pub fn new(command: Option<CommandTemplate>, dry_run: bool) -> Self {
        Self { command, dry_run }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&mut self, n: &Notification) -> Result<(), SinkError> {
        match &self.command {
            Some(template) if !self.dry_run => {
                let timeout_ms = n.timeout.as_millis().to_string();
                template.run(&[
                    ("title", n.title.as_str()),
                    ("message", n.message.as_str()),
                    ("app_name", n.app_name.as_str()),
                    ("timeout_ms", timeout_ms.as_str()),
                ])?;
            }
            _ => info!("[{}] {}: {}", n.app_name, n.title, n.message),
        }
        Ok(())
    }
}

/// Active window title from an external command (xdotool getactivewindow getwindowname, ...)
pub struct CommandContextProbe {
    command: CommandTemplate,
}

impl CommandContextProbe {
    pub fn new(command: CommandTemplate) -> Self {
        Self { command }
    }
}

impl ContextProbe for CommandContextProbe {
    fn active_context(&mut self) -> Option<String> {
        match self.command.run(&[]) {
            Ok(label) if !label.is_empty() => Some(label),
            Ok(_) => None,
            Err(e) => {
                debug!("Context probe failed: {}", e);
                None
            }
        }
    }
}
