//! Sample validation before gesture evaluation

use thiserror::Error;
use tracing::warn;

use crate::{CaptureError, FrameSample};

/// Recoverable problems with a single frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Landmark coordinate is NaN or infinite
    #[error("Landmark {index} has non-finite coordinates ({x}, {y})")]
    NonFinite { index: usize, x: f32, y: f32 },

    /// Frame reports a zero-sized image
    #[error("Invalid frame dimensions {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// Stateful validator tracking the timestamp of the previous frame
#[derive(Debug, Default)]
pub struct FrameValidator {
    last_timestamp_ns: Option<u64>,
}

impl FrameValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce non-decreasing timestamps across the stream
    pub fn check_timestamp(&mut self, sample: &FrameSample) -> Result<(), CaptureError> {
        if let Some(previous_ns) = self.last_timestamp_ns {
            if sample.timestamp_ns < previous_ns {
                return Err(CaptureError::NonMonotonic {
                    previous_ns,
                    current_ns: sample.timestamp_ns,
                });
            }
        }
        self.last_timestamp_ns = Some(sample.timestamp_ns);
        Ok(())
    }

    /// Check sample contents. Coordinates slightly outside [0, 1] are
    /// accepted since the mesh extrapolates points past the frame edge.
    pub fn validate(&self, sample: &FrameSample) -> Result<(), ValidationError> {
        if sample.width == 0 || sample.height == 0 {
            return Err(ValidationError::ZeroDimension {
                width: sample.width,
                height: sample.height,
            });
        }

        if let Some((index, lm)) = sample
            .landmarks
            .iter()
            .enumerate()
            .find(|(_, lm)| !lm.x.is_finite() || !lm.y.is_finite())
        {
            warn!("Frame {} carries a non-finite landmark", sample.sequence);
            return Err(ValidationError::NonFinite {
                index,
                x: lm.x,
                y: lm.y,
            });
        }

        Ok(())
    }

    /// Timestamp of the last accepted frame
    pub fn last_timestamp_ns(&self) -> Option<u64> {
        self.last_timestamp_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Landmark;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_backwards_timestamp() {
        let mut validator = FrameValidator::new();
        validator.check_timestamp(&FrameSample::empty(100, 0, 640, 480)).unwrap();
        validator.check_timestamp(&FrameSample::empty(100, 1, 640, 480)).unwrap();

        let err = validator
            .check_timestamp(&FrameSample::empty(99, 2, 640, 480))
            .unwrap_err();
        assert!(matches!(
            err,
            CaptureError::NonMonotonic { previous_ns: 100, current_ns: 99 }
        ));
        assert_eq!(validator.last_timestamp_ns(), Some(100));
    }

    #[test]
    fn test_rejects_nan_landmark() {
        let validator = FrameValidator::new();
        let sample = FrameSample::new(
            0,
            0,
            640,
            480,
            vec![Landmark::new(0.2, 0.3), Landmark::new(f32::NAN, 0.3)],
        );
        assert!(matches!(
            validator.validate(&sample),
            Err(ValidationError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let validator = FrameValidator::new();
        let sample = FrameSample::empty(0, 0, 0, 480);
        assert!(matches!(
            validator.validate(&sample),
            Err(ValidationError::ZeroDimension { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_sorted_timestamps_always_accepted(mut stamps in prop::collection::vec(any::<u64>(), 1..50)) {
            stamps.sort_unstable();
            let mut validator = FrameValidator::new();
            for (i, ts) in stamps.into_iter().enumerate() {
                prop_assert!(validator.check_timestamp(&FrameSample::empty(ts, i as u32, 640, 480)).is_ok());
            }
        }

        #[test]
        fn prop_out_of_frame_points_accepted(x in -0.5f32..1.5, y in -0.5f32..1.5) {
            let validator = FrameValidator::new();
            let sample = FrameSample::new(0, 0, 640, 480, vec![Landmark::new(x, y)]);
            prop_assert!(validator.validate(&sample).is_ok());
        }
    }
}
