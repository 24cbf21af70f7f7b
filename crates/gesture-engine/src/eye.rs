//! Eye metrics extraction from face-mesh landmarks

use frame_source::Landmark;

/// Landmark ids describing one eye in the 478-point refined face mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeLandmarks {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
    pub iris: usize,
}

/// Subject's left eye (image right after mirroring)
pub const LEFT_EYE: EyeLandmarks = EyeLandmarks {
    top: 159,
    bottom: 145,
    left: 33,
    right: 133,
    iris: 468,
};

pub const RIGHT_EYE: EyeLandmarks = EyeLandmarks {
    top: 386,
    bottom: 374,
    left: 362,
    right: 263,
    iris: 473,
};

/// Minimum landmark count a sample must carry (highest index used + 1)
pub const REQUIRED_LANDMARKS: usize = 474;

/// Normalized 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl From<&Landmark> for Point2D {
    fn from(lm: &Landmark) -> Self {
        Self { x: lm.x, y: lm.y }
    }
}

/// Per-frame eye openness and iris position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EyeMetrics {
    pub left_ear: f32,
    pub right_ear: f32,
    pub left_iris: Point2D,
    pub right_iris: Point2D,
}

/// Eye aspect ratio: vertical lid gap over horizontal corner span.
/// Zero when the corners coincide.
pub fn eye_aspect_ratio(top: &Landmark, bottom: &Landmark, left: &Landmark, right: &Landmark) -> f32 {
    let vertical = (top.y - bottom.y).abs();
    let horizontal = (left.x - right.x).abs();
    if horizontal > 0.0 {
        vertical / horizontal
    } else {
        0.0
    }
}

impl EyeMetrics {
    /// Extract metrics from a landmark list. Returns `None` when the list is
    /// shorter than `REQUIRED_LANDMARKS`.
    pub fn extract(landmarks: &[Landmark]) -> Option<Self> {
        if landmarks.len() < REQUIRED_LANDMARKS {
            return None;
        }

        let ear = |eye: &EyeLandmarks| {
            eye_aspect_ratio(
                &landmarks[eye.top],
                &landmarks[eye.bottom],
                &landmarks[eye.left],
                &landmarks[eye.right],
            )
        };

        Some(Self {
            left_ear: ear(&LEFT_EYE),
            right_ear: ear(&RIGHT_EYE),
            left_iris: Point2D::from(&landmarks[LEFT_EYE.iris]),
            right_iris: Point2D::from(&landmarks[RIGHT_EYE.iris]),
        })
    }

    /// Average vertical iris position in frame pixels
    pub fn eye_y_px(&self, frame_height: u32) -> i32 {
        (((self.left_iris.y + self.right_iris.y) / 2.0) * frame_height as f32) as i32
    }
}
