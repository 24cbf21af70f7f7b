//! Frame Source Library for Eye Gesture Control
//!
//! Delivers one `FrameSample` per camera frame. Camera access and the
//! face-mesh model live outside this workspace; samples arrive already
//! reduced to normalized landmarks:
//! - JSON-lines landmark streams (file or stdin) written by a detector sidecar
//! - Scripted in-memory sequences for tests and replays
//! - Sample validation (finite coordinates, monotonic timestamps)

pub mod frame;
pub mod stream;
pub mod validator;

pub use frame::{FrameSample, Landmark};
pub use stream::{LandmarkStream, ScriptedSource};
pub use validator::{FrameValidator, ValidationError};

use thiserror::Error;

/// Capture error types
///
/// Every variant is fatal for the frame loop.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Frame stream ended")]
    EndOfStream,

    #[error("Failed to read frame: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to decode frame at line {line}: {reason}")]
    Decode { line: u64, reason: String },

    #[error("Timestamp went backwards: {previous_ns}ns -> {current_ns}ns")]
    NonMonotonic { previous_ns: u64, current_ns: u64 },
}

/// Blocking producer of landmark frames
pub trait FrameSource {
    /// Block until the next frame is available.
    fn next_frame(&mut self) -> Result<FrameSample, CaptureError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> Result<FrameSample, CaptureError> {
        (**self).next_frame()
    }
}
