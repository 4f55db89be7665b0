//! Traits for the detector and depth-sensor collaborators.

use crate::tracker::{Detection, DistanceGrid};

/// Trait for object detection backends.
///
/// Implement this trait to connect any face or object detector to the
/// presence tracker. Detections carry no identity across frames; the
/// tracker supplies it.
///
/// # Example
///
/// ```ignore
/// use presence_track::{DetectionSource, Detection};
///
/// struct MyCascade {
///     // Your classifier here
/// }
///
/// impl DetectionSource for MyCascade {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run detection on raw image data and return rectangles in frame order.
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
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Trait for depth sensors providing world distances.
///
/// The grid must be addressable at the tracker's depth scale relative to the
/// detector's pixel space (one quarter of the linear resolution by default).
/// Samples are signed millimeters; `NO_READING` marks missing data.
pub trait DepthSource {
    /// Error type for depth read failures.
    type Error;

    /// Distance grid for the current frame.
    fn distance_grid(&mut self) -> Result<DistanceGrid, Self::Error>;
}

/// Helper trait for converting detector-specific outputs to `Detection`.
///
/// Implement this for your detector's output format to enable easy conversion.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// TLWH integer boxes, as emitted by cascade classifiers.
impl IntoDetections for Vec<[i32; 4]> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|[x, y, w, h]| Detection::new(x as f32, y as f32, w as f32, h as f32))
            .collect()
    }
}
