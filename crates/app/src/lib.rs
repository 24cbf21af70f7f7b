//! Eye Gesture Control
//!
//! Wires a landmark frame source, the gesture engine, and command-backed
//! sinks into a single frame loop.

pub mod config;
pub mod pipeline;
pub mod sinks;

use dispatch::{ActionDispatcher, ContextGate, ContextProbe, StaticContext};
use frame_source::{CaptureError, FrameSource};
use gesture_engine::{GestureEngine, GestureError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::AppConfig;
use pipeline::Pipeline;
use sinks::{CommandContextProbe, CommandInputSink, CommandNotifier, CommandScreenshotSink};

/// Startup errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Gesture engine error: {0}")]
    Gesture(#[from] GestureError),

    #[error("Frame source error: {0}")]
    Capture(#[from] CaptureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline as assembled by the binary
pub type AppPipeline = Pipeline<
    Box<dyn FrameSource>,
    Box<dyn ContextProbe>,
    CommandInputSink,
    CommandScreenshotSink,
    CommandNotifier,
>;

/// Assemble the pipeline from configuration
pub fn build_pipeline(
    config: &AppConfig,
    source: Box<dyn FrameSource>,
    dry_run: bool,
) -> Result<AppPipeline, AppError> {
    let engine = GestureEngine::new(config.screen, config.thresholds.clone())?
        .with_hot_zone(config.features.hot_zone)
        .with_dropout_reset(config.features.reset_holds_on_dropout);

    let screenshot_dir = config.screenshot_dir();
    if !dry_run {
        std::fs::create_dir_all(&screenshot_dir)?;
    }
    info!("Screenshots will be saved to {}", screenshot_dir.display());

    let reveal = config
        .screenshot
        .reveal_folder
        .then(|| config.screenshot.reveal_command.clone());

    let probe: Box<dyn ContextProbe> = match &config.context_gate.probe_command {
        Some(command) => Box::new(CommandContextProbe::new(command.clone())),
        None => Box::new(StaticContext::default()),
    };

    let dispatcher = ActionDispatcher::new(
        config.dispatch_config(),
        CommandInputSink::new(config.input.clone(), dry_run),
        CommandScreenshotSink::new(
            screenshot_dir,
            config.screenshot.capture_command.clone(),
            reveal,
            dry_run,
        ),
        CommandNotifier::new(config.screenshot.notify_command.clone(), dry_run),
    );

    let pipeline = Pipeline::new(
        source,
        engine,
        ContextGate::new(&config.context_gate.exempt_patterns),
        probe,
        dispatcher,
    )
    .with_startup_beep(config.features.startup_beep);

    Ok(pipeline)
}

/// Initialize logging. `RUST_LOG` overrides the default `info` level.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}
