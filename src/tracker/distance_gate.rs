//! Distance-gated admission of new detections.

use ndarray::Array2;

use crate::error::GridError;
use crate::tracker::rect::Rect;

/// Linear downsampling factor between detector pixels and distance samples.
pub const DEFAULT_DEPTH_SCALE: usize = 4;

/// Sample value reported by the depth provider when it has no reading.
pub const NO_READING: i32 = 0;

/// Per-frame grid of world distances in millimeters.
///
/// Indexed `[row, column]`, i.e. `(y, x)`, with shape `(height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceGrid {
    samples: Array2<i32>,
}

impl DistanceGrid {
    pub fn new(samples: Array2<i32>) -> Self {
        Self { samples }
    }

    /// Build a grid from row-major samples.
    pub fn from_vec(width: usize, height: usize, samples: Vec<i32>) -> Result<Self, GridError> {
        let expected = width * height;
        if samples.len() != expected {
            return Err(GridError::LengthMismatch {
                width,
                height,
                expected,
                got: samples.len(),
            });
        }
        let samples = Array2::from_shape_vec((height, width), samples)?;
        Ok(Self { samples })
    }

    /// Grid where every sample holds `distance`.
    pub fn filled(width: usize, height: usize, distance: i32) -> Self {
        Self {
            samples: Array2::from_elem((height, width), distance),
        }
    }

    pub fn width(&self) -> usize {
        self.samples.ncols()
    }

    pub fn height(&self) -> usize {
        self.samples.nrows()
    }

    /// Sample at column `x`, row `y`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        self.samples.get((y, x)).copied()
    }

    /// Overwrite a single sample. Returns false when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, distance: i32) -> bool {
        match self.samples.get_mut((y, x)) {
            Some(sample) => {
                *sample = distance;
                true
            }
            None => false,
        }
    }
}

/// Admission filter on the distance at a rectangle's center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceGate {
    min_dist: i32,
    max_dist: i32,
    scale: usize,
}

impl DistanceGate {
    pub fn new(min_dist: i32, max_dist: i32, scale: usize) -> Self {
        Self {
            min_dist,
            max_dist,
            scale: scale.max(1),
        }
    }

    /// Distance sampled under the center of `rect`, if the center falls on the grid.
    pub fn distance_at(&self, rect: &Rect, grid: &DistanceGrid) -> Option<i32> {
        let (cx, cy) = grid_cell(rect, self.scale)?;
        grid.get(cx, cy)
    }

    /// True iff the center distance lies strictly inside `(min_dist, max_dist)`.
    pub fn admissible(&self, rect: &Rect, grid: &DistanceGrid) -> bool {
        match self.distance_at(rect, grid) {
            Some(NO_READING) | None => false,
            Some(d) => self.min_dist < d && d < self.max_dist,
        }
    }
}

/// Admissibility at the default 4x downsampling.
pub fn admissible(rect: &Rect, grid: &DistanceGrid, min_dist: i32, max_dist: i32) -> bool {
    DistanceGate::new(min_dist, max_dist, DEFAULT_DEPTH_SCALE).admissible(rect, grid)
}

fn grid_cell(rect: &Rect, scale: usize) -> Option<(usize, usize)> {
    let cx = (rect.x + (rect.width / 2.0).floor()).floor();
    let cy = (rect.y + (rect.height / 2.0).floor()).floor();
    if !cx.is_finite() || !cy.is_finite() || cx < 0.0 || cy < 0.0 {
        return None;
    }
    Some((cx as usize / scale, cy as usize / scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(x: usize, y: usize, distance: i32) -> DistanceGrid {
        let mut grid = DistanceGrid::filled(160, 120, NO_READING);
        assert!(grid.set(x, y, distance));
        grid
    }

    #[test]
    fn test_center_is_downsampled() {
        // Center (110, 70) lands on cell (27, 17).
        let rect = Rect::new(100.0, 60.0, 20.0, 20.0);
        let grid = grid_with(27, 17, 800);
        let gate = DistanceGate::new(500, 1500, DEFAULT_DEPTH_SCALE);

        assert_eq!(gate.distance_at(&rect, &grid), Some(800));
        assert!(gate.admissible(&rect, &grid));
    }

    #[test]
    fn test_odd_width_rounds_down() {
        // x + 31/2 = 10 + 15 = 25 -> cell 6.
        let rect = Rect::new(10.0, 0.0, 31.0, 2.0);
        let grid = grid_with(6, 0, 900);
        assert!(admissible(&rect, &grid, 500, 1500));
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        let gate = DistanceGate::new(500, 1500, DEFAULT_DEPTH_SCALE);

        assert!(!gate.admissible(&rect, &grid_with(1, 1, 500)));
        assert!(!gate.admissible(&rect, &grid_with(1, 1, 1500)));
        assert!(gate.admissible(&rect, &grid_with(1, 1, 501)));
        assert!(gate.admissible(&rect, &grid_with(1, 1, 1499)));
    }

    #[test]
    fn test_out_of_grid_fails_closed() {
        let grid = DistanceGrid::filled(160, 120, 1000);
        let gate = DistanceGate::new(500, 1500, DEFAULT_DEPTH_SCALE);

        assert!(!gate.admissible(&Rect::new(700.0, 10.0, 10.0, 10.0), &grid));
        assert!(!gate.admissible(&Rect::new(10.0, 500.0, 10.0, 10.0), &grid));
        assert!(!gate.admissible(&Rect::new(-40.0, 10.0, 10.0, 10.0), &grid));
        assert!(!gate.admissible(&Rect::new(f32::NAN, 10.0, 10.0, 10.0), &grid));
    }

    #[test]
    fn test_no_reading_is_inadmissible() {
        let grid = DistanceGrid::filled(160, 120, NO_READING);
        let gate = DistanceGate::new(-100, 1500, DEFAULT_DEPTH_SCALE);
        assert!(!gate.admissible(&Rect::new(10.0, 10.0, 10.0, 10.0), &grid));
    }

    #[test]
    fn test_from_vec_shape() {
        let grid = DistanceGrid::from_vec(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(2, 0), Some(3));
        assert_eq!(grid.get(0, 1), Some(4));
        assert_eq!(grid.get(3, 0), None);

        assert!(matches!(
            DistanceGrid::from_vec(3, 2, vec![1, 2, 3]),
            Err(GridError::LengthMismatch { expected: 6, got: 3, .. })
        ));
    }
}
