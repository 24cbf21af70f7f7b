//! Eye Gesture Control - Main Entry Point

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use app::config::AppConfig;
use app::{build_pipeline, init_logging, AppError};
use clap::Parser;
use frame_source::{FrameSource, LandmarkStream};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};

/// Hands-free mouse control from face-mesh landmarks
#[derive(Parser, Debug)]
#[command(name = "eye-gesture", version, about)]
struct Args {
    /// Configuration file (defaults to ./eye-gesture.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines landmark stream, `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Log actions instead of running external commands
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_json);

    info!("=== Eye Gesture Control v{} ===", env!("CARGO_PKG_VERSION"));

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<u8> {
    if let Some(addr) = args.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install metrics exporter")?;
        info!("Serving metrics on {}", addr);
    }

    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.dry_run {
        info!("Dry run: external commands are disabled");
    }

    let quit = Arc::new(AtomicBool::new(false));
    let quit_flag = quit.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Quit requested, finishing current frame");
            quit_flag.store(true, Ordering::SeqCst);
        }
    });

    let Args { input, dry_run, .. } = args;
    let reason = tokio::task::spawn_blocking(move || -> Result<_, AppError> {
        let source: Box<dyn FrameSource> = if input == "-" {
            info!("Reading landmarks from stdin");
            Box::new(LandmarkStream::new(std::io::stdin().lock()))
        } else {
            Box::new(LandmarkStream::open(&input)?)
        };

        let mut pipeline = build_pipeline(&config, source, dry_run)?;
        Ok(pipeline.run(&quit))
    })
    .await
    .context("Frame loop task failed")?
    .context("Failed to start gesture pipeline")?;

    Ok(reason.exit_code())
}
