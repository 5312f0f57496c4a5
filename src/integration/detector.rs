//! Trait for object detection inference backends.

use crate::tracker::RawDetection;

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the tracker. Boxes are
/// returned unvalidated and unfiltered; the pipeline applies class, confidence,
/// area and shape checks before tracking.
///
/// # Example
///
/// ```ignore
/// use centroid_track::{DetectionSource, RawDetection};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<RawDetection>, Self::Error> {
///         // Run inference and return pixel-space boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<RawDetection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `RawDetection`.
pub trait IntoRawDetections {
    fn into_raw_detections(self) -> Vec<RawDetection>;
}

impl IntoRawDetections for Vec<RawDetection> {
    fn into_raw_detections(self) -> Vec<RawDetection> {
        self
    }
}

/// `(x, y, width, height, score, class_id)` tuples, as most detector bindings emit.
impl IntoRawDetections for Vec<(i32, i32, i32, i32, f32, u32)> {
    fn into_raw_detections(self) -> Vec<RawDetection> {
        self.into_iter()
            .map(|(x, y, w, h, score, class_id)| RawDetection::new(x, y, w, h, score, class_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_conversion() {
        let raw = vec![(1, 2, 3, 4, 0.5, 0u32)].into_raw_detections();
        assert_eq!(raw, vec![RawDetection::new(1, 2, 3, 4, 0.5, 0)]);
    }
}
