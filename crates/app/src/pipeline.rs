//! Single-threaded frame loop
//!
//! One iteration: acquire a frame, validate it, evaluate gestures, gate
//! clicks by foreground context, dispatch. The quit flag is checked after
//! every frame, so an in-flight frame always completes.

use std::sync::atomic::{AtomicBool, Ordering};

use dispatch::{ActionDispatcher, ContextGate, ContextProbe, DispatchOutcome, InputSink, Notifier, ScreenshotSink};
use frame_source::{CaptureError, FrameSource, FrameValidator};
use gesture_engine::{FrameAnalysis, GestureEngine, GestureError, GestureEvent};
use tracing::{debug, error, info, trace, warn};

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames fully evaluated
    pub frames: u64,
    /// Frames skipped (no face, truncated mesh, invalid sample)
    pub skipped: u64,
    /// Events that reached the dispatcher after gating
    pub events: u64,
    /// Actions accepted by sinks
    pub dispatched: u64,
    /// Actions whose sink failed
    pub failures: u64,
}

/// What happened to a single frame
#[derive(Debug)]
pub enum StepOutcome {
    /// Gestures evaluated; events are post-gate
    Processed {
        analysis: FrameAnalysis,
        gated: Vec<GestureEvent>,
    },
    /// Frame unusable, gesture evaluation skipped
    Skipped(String),
}

/// Why the loop stopped
#[derive(Debug)]
pub enum ExitReason {
    /// User asked to quit
    Quit,
    /// Frame source broke or ran dry
    CaptureFailed(CaptureError),
}

impl ExitReason {
    /// Process exit code: 0 for a requested quit, 1 for capture failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Quit => 0,
            Self::CaptureFailed(_) => 1,
        }
    }
}

/// Frame-driven gesture pipeline
pub struct Pipeline<F, P, I, S, N> {
    source: F,
    validator: FrameValidator,
    engine: GestureEngine,
    gate: ContextGate,
    probe: P,
    dispatcher: ActionDispatcher<I, S, N>,
    startup_beep: bool,
    face_lost: bool,
    stats: RunStats,
}

impl<F, P, I, S, N> Pipeline<F, P, I, S, N>
where
    F: FrameSource,
    P: ContextProbe,
    I: InputSink,
    S: ScreenshotSink,
    N: Notifier,
{
    pub fn new(
        source: F,
        engine: GestureEngine,
        gate: ContextGate,
        probe: P,
        dispatcher: ActionDispatcher<I, S, N>,
    ) -> Self {
        Self {
            source,
            validator: FrameValidator::new(),
            engine,
            gate,
            probe,
            dispatcher,
            startup_beep: false,
            face_lost: false,
            stats: RunStats::default(),
        }
    }

    /// Beep once when `run` starts
    pub fn with_startup_beep(mut self, enabled: bool) -> Self {
        self.startup_beep = enabled;
        self
    }

    /// Process exactly one frame. Only capture errors escape.
    pub fn step(&mut self) -> Result<StepOutcome, CaptureError> {
        let sample = self.source.next_frame()?;
        self.validator.check_timestamp(&sample)?;

        if let Err(e) = self.validator.validate(&sample) {
            return Ok(self.skip("invalid", e.to_string()));
        }

        let analysis = match self.engine.process(&sample) {
            Ok(analysis) => analysis,
            Err(GestureError::NoLandmarks) => {
                if !self.face_lost {
                    warn!("Face lost at frame {}", sample.sequence);
                    self.face_lost = true;
                }
                return Ok(self.skip("no_face", "no face detected".to_string()));
            }
            Err(e) => return Ok(self.skip("landmarks", e.to_string())),
        };

        if self.face_lost {
            info!("Face reacquired at frame {}", sample.sequence);
            self.face_lost = false;
        }
        self.stats.frames += 1;
        metrics::counter!("frames_processed_total").increment(1);

        if let Err(e) = self.dispatcher.move_cursor(analysis.cursor) {
            warn!("Cursor move failed: {}", e);
            metrics::counter!("sink_failures_total", "sink" => "cursor").increment(1);
        }

        let context = self.probe.active_context();
        let gated = self.gate.filter(&analysis.events, context.as_deref());

        for event in gated.iter().copied().filter(|e| *e != GestureEvent::None) {
            self.stats.events += 1;
            match self.dispatcher.dispatch(event, analysis.timestamp_ns) {
                DispatchOutcome::Dispatched => self.stats.dispatched += 1,
                DispatchOutcome::Failed(_) => self.stats.failures += 1,
                DispatchOutcome::CoolingDown | DispatchOutcome::Ignored => {}
            }
        }

        trace!(?analysis, context = context.as_deref(), "frame complete");
        Ok(StepOutcome::Processed { analysis, gated })
    }

    fn skip(&mut self, reason: &'static str, detail: String) -> StepOutcome {
        debug!("Skipping frame: {}", detail);
        self.stats.skipped += 1;
        metrics::counter!("frames_skipped_total", "reason" => reason).increment(1);
        StepOutcome::Skipped(detail)
    }

    /// Run until `quit` is set or the source fails
    pub fn run(&mut self, quit: &AtomicBool) -> ExitReason {
        info!("Gesture pipeline started");
        if self.startup_beep {
            if let Err(e) = self.dispatcher.startup_beep() {
                warn!("Startup beep failed: {}", e);
            }
        }

        let reason = loop {
            if let Err(e) = self.step() {
                error!("Frame capture failed: {}", e);
                break ExitReason::CaptureFailed(e);
            }
            if quit.load(Ordering::SeqCst) {
                break ExitReason::Quit;
            }
        };

        info!(
            "Gesture pipeline stopped after {} frames ({} skipped, {} actions, {} failures)",
            self.stats.frames, self.stats.skipped, self.stats.dispatched, self.stats.failures
        );
        reason
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<I, S, N> {
        &self.dispatcher
    }
}
