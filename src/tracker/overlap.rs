//! Overlap-based identity matching between tracked regions and detections.
//!
//! Two rectangles refer to the same object when their extents intersect on
//! both axes. Any overlap counts, touching edges included; there is no
//! IoU threshold.
//!
//! When several detections overlap one tracked object, the first one in frame
//! order wins and the scan stops. This is a known limitation: a closer or
//! larger detection later in the list is never preferred.

use crate::tracker::rect::Rect;

/// Detection input for the tracker: one rectangle reported for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Bounding box in TLWH format
    pub bbox: Rect,
}

impl Detection {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bbox: Rect::new(x, y, width, height),
        }
    }

    pub fn from_rect(bbox: Rect) -> Self {
        Self { bbox }
    }
}

/// Returns true when `a` and `b` intersect on both axes.
///
/// Rectangles with non-finite coordinates or negative size overlap nothing.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.is_valid()
        && b.is_valid()
        && !(a.right() < b.left())
        && !(a.left() > b.right())
        && !(a.bottom() < b.top())
        && !(a.top() > b.bottom())
}

/// Index of the first detection overlapping `region`, in frame order.
pub fn first_overlapping(region: &Rect, detections: &[Detection]) -> Option<usize> {
    detections.iter().position(|d| overlaps(region, &d.bbox))
}

/// Whether `region` overlaps any of `regions`.
pub fn overlaps_any<'a>(region: &Rect, mut regions: impl Iterator<Item = &'a Rect>) -> bool {
    regions.any(|r| overlaps(region, r))
}
