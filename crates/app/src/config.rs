//! Layered application configuration
//!
//! Defaults, then an optional TOML file, then `EYE_GESTURE__*` environment
//! variables (double underscore separates sections).

use std::path::{Path, PathBuf};

use directories::UserDirs;
use dispatch::DispatchConfig;
use gesture_engine::{ScreenConfig, ThresholdConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::sinks::CommandTemplate;

/// Config file looked up when none is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "eye-gesture.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "EYE_GESTURE";

/// Optional pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Close the current tab when the cursor enters the bottom-left corner
    pub hot_zone: bool,
    /// Beep once when the pipeline starts
    pub startup_beep: bool,
    /// Abandon wink/blink holds on frames without a face
    pub reset_holds_on_dropout: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            hot_zone: true,
            startup_beep: false,
            reset_holds_on_dropout: false,
        }
    }
}

/// Foreground context gating
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Case-insensitive substrings of the active context that disable clicks
    pub exempt_patterns: Vec<String>,
    /// Command printing the active window title on stdout
    pub probe_command: Option<CommandTemplate>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            exempt_patterns: vec!["youtube".to_string()],
            probe_command: None,
        }
    }
}

/// Screenshot capture and notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Output directory, `~/Pictures/Screenshots` when unset
    pub directory: Option<PathBuf>,
    /// Capture command; `{path}` is replaced by the target file
    pub capture_command: Option<CommandTemplate>,
    /// Notification command; `{title}`, `{message}`, `{app_name}`, `{timeout_ms}`
    pub notify_command: Option<CommandTemplate>,
    /// Notify after each screenshot
    pub notify: bool,
    /// Notification display time (seconds)
    pub notification_timeout_secs: u64,
    /// Open the screenshot directory after each capture
    pub reveal_folder: bool,
    /// Command used to open the directory; `{path}` is the directory
    pub reveal_command: CommandTemplate,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            directory: None,
            capture_command: None,
            notify_command: None,
            notify: true,
            notification_timeout_secs: 5,
            reveal_folder: true,
            reveal_command: CommandTemplate::new(["xdg-open", "{path}"]),
        }
    }
}

/// Input injection commands. Unset commands are logged instead of run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// `{x}`, `{y}`
    pub move_command: Option<CommandTemplate>,
    /// `{button}` is `left` or `right`, `{button_id}` the X11 number
    pub click_command: Option<CommandTemplate>,
    /// `{direction}`, `{amount}`, `{delta}` (signed, up positive), `{wheel_button}`
    pub scroll_command: Option<CommandTemplate>,
    /// `{keys}`, e.g. `ctrl+w`
    pub hotkey_command: Option<CommandTemplate>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub screen: ScreenConfig,
    pub thresholds: ThresholdConfig,
    pub features: FeatureFlags,
    pub context_gate: GateConfig,
    pub screenshot: ScreenshotConfig,
    pub input: InputConfig,
}

impl AppConfig {
    /// Load configuration. An explicit path must exist; the default file
    /// is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        info!(
            "Configuration loaded: screen {}x{}, wink {} / blink {}",
            loaded.screen.width,
            loaded.screen.height,
            loaded.thresholds.wink_threshold,
            loaded.thresholds.blink_threshold
        );
        Ok(loaded)
    }

    /// Resolve the screenshot output directory
    pub fn screenshot_dir(&self) -> PathBuf {
        if let Some(dir) = &self.screenshot.directory {
            return dir.clone();
        }

        UserDirs::new()
            .and_then(|dirs| {
                dirs.picture_dir()
                    .map(Path::to_path_buf)
                    .or_else(|| Some(dirs.home_dir().join("Pictures")))
            })
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Screenshots")
    }

    /// Dispatcher settings derived from thresholds and screenshot options
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            notify_on_screenshot: self.screenshot.notify,
            notification_timeout_secs: self.screenshot.notification_timeout_secs,
            ..DispatchConfig::from_thresholds(&self.thresholds)
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_original_tuning() {
        let config = AppConfig::default();
        assert_eq!(config.screen, ScreenConfig { width: 1920, height: 1080 });
        assert_eq!(config.thresholds.wink_threshold, 0.25);
        assert_eq!(config.thresholds.blink_threshold, 0.18);
        assert_eq!(config.thresholds.screenshot_hold_ms, 3000);
        assert_eq!(config.context_gate.exempt_patterns, vec!["youtube"]);
        assert!(config.features.hot_zone);
        assert!(config.screenshot.reveal_folder);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[screen]
width = 2560

[thresholds]
wink_hold_ms = 300

[features]
hot_zone = false

[input]
click_command = ["xdotool", "click", "{{button}}"]
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.screen.width, 2560);
        assert_eq!(config.screen.height, 1080);
        assert_eq!(config.thresholds.wink_hold_ms, 300);
        assert_eq!(config.thresholds.scroll_pixel_threshold, 15);
        assert!(!config.features.hot_zone);
        assert_eq!(
            config.input.click_command,
            Some(CommandTemplate::new(["xdotool", "click", "{button}"]))
        );
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[thresholds]
wink_threshold = 0.3
wink_hold_ms = 300
"#
        )
        .unwrap();

        let vars = config::Map::from([
            (
                "EYE_GESTURE__THRESHOLDS__WINK_THRESHOLD".to_string(),
                "0.22".to_string(),
            ),
            ("EYE_GESTURE__FEATURES__HOT_ZONE".to_string(), "false".to_string()),
        ]);
        let config =
            AppConfig::load_with_env(Some(file.path()), environment().source(Some(vars))).unwrap();

        assert_eq!(config.thresholds.wink_threshold, 0.22);
        assert_eq!(config.thresholds.wink_hold_ms, 300);
        assert!(!config.features.hot_zone);
        assert_eq!(config.thresholds.blink_threshold, 0.18);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/eye-gesture.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_screenshot_dir() {
        let mut config = AppConfig::default();
        config.screenshot.directory = Some(PathBuf::from("/tmp/shots"));
        assert_eq!(config.screenshot_dir(), PathBuf::from("/tmp/shots"));
    }

    #[test]
    fn test_dispatch_config_follows_thresholds() {
        let mut config = AppConfig::default();
        config.thresholds.action_cooldown_ms = 1500;
        config.screenshot.notify = false;

        let dispatch = config.dispatch_config();
        assert_eq!(dispatch.action_cooldown_ms, 1500);
        assert_eq!(dispatch.scroll_amount, 10);
        assert!(!dispatch.notify_on_screenshot);
    }
}
