//! Error types for configuration, distance grids and the capture pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected configuration. Raised before any tracker is constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("min_dist ({min_dist}) must be below max_dist ({max_dist})")]
    EmptyDistanceRange { min_dist: i32, max_dist: i32 },

    #[error("{name} must be a finite, non-negative number of seconds, got {value}")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("depth_scale must be at least 1")]
    ZeroDepthScale,
}

/// Malformed distance grid input.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("a {width}x{height} grid needs {expected} samples, got {got}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Failure of one of the pipeline's collaborators for the current frame.
#[derive(Debug, Error)]
pub enum PipelineError<D, P> {
    #[error("detection failed: {0}")]
    Detection(D),

    #[error("depth read failed: {0}")]
    Depth(P),
}
