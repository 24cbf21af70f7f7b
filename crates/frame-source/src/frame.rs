//! Landmark frame types

use serde::{Deserialize, Serialize};

/// Normalized facial landmark (x, y in [0, 1] of the frame)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth, unused by the gesture engine
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// Create a landmark at a normalized position
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// One camera frame reduced to its face-mesh landmarks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSample {
    /// Capture timestamp (nanoseconds, monotonic)
    pub timestamp_ns: u64,
    /// Frame sequence number
    #[serde(default)]
    pub sequence: u32,
    /// Source frame width in pixels
    pub width: u32,
    /// Source frame height in pixels
    pub height: u32,
    /// Landmarks indexed by mesh topology id; empty when no face was found
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl FrameSample {
    /// Create a new sample
    pub fn new(
        timestamp_ns: u64,
        sequence: u32,
        width: u32,
        height: u32,
        landmarks: Vec<Landmark>,
    ) -> Self {
        Self {
            timestamp_ns,
            sequence,
            width,
            height,
            landmarks,
        }
    }

    /// A frame in which the detector found no face
    pub fn empty(timestamp_ns: u64, sequence: u32, width: u32, height: u32) -> Self {
        Self::new(timestamp_ns, sequence, width, height, Vec::new())
    }

    /// Whether the detector reported a face in this frame
    pub fn has_face(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// Number of landmarks carried
    pub fn landmark_count(&self) -> usize {
        self.landmarks.len()
    }
}
