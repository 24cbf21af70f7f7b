//! Frame sources: JSON-lines landmark streams and scripted sequences

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::{CaptureError, FrameSample, FrameSource};

/// Reads one JSON-encoded `FrameSample` per line
///
/// Blank lines are ignored. End of input is reported as
/// `CaptureError::EndOfStream`.
pub struct LandmarkStream<R> {
    reader: R,
    line: u64,
    buf: String,
}

impl<R: BufRead> LandmarkStream<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl LandmarkStream<BufReader<File>> {
    /// Open a recorded landmark stream
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        info!("Opening landmark stream {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FrameSource for LandmarkStream<R> {
    fn next_frame(&mut self) -> Result<FrameSample, CaptureError> {
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                debug!("Landmark stream exhausted after {} lines", self.line);
                return Err(CaptureError::EndOfStream);
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            return serde_json::from_str(trimmed).map_err(|e| CaptureError::Decode {
                line: self.line,
                reason: e.to_string(),
            });
        }
    }
}

/// In-memory frame sequence, replayed in order
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<FrameSample>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = FrameSample>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<FrameSample, CaptureError> {
        self.frames.pop_front().ok_or(CaptureError::EndOfStream)
    }
}
