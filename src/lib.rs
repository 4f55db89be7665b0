//! Presence tracking for noisy per-frame detections.
//!
//! Detections from an external detector are matched across frames by
//! rectangle overlap. New objects are admitted only when the depth sensor
//! places them inside a distance band. An object becomes *confirmed* after
//! being re-detected for a dwell period, and each confirmed presence is
//! counted once, when it ends.
//!
//! ```ignore
//! use std::time::Duration;
//! use presence_track::{Detection, DistanceGrid, FrameProcessor, TrackerConfig};
//!
//! let mut processor = FrameProcessor::new(TrackerConfig::default())?;
//! let grid = DistanceGrid::filled(160, 120, 1000);
//! let detections = [Detection::new(100.0, 100.0, 40.0, 40.0)];
//! let result = processor.process_frame(&detections, &grid, Duration::ZERO);
//! println!("confirmed so far: {}", result.total_count);
//! ```

pub mod config;
pub mod error;
pub mod integration;
pub mod tracker;

pub use config::PresenceSettings;
pub use error::{ConfigError, GridError, PipelineError};
pub use integration::{
    Clock, CountReporter, DepthSource, DetectionBuilder, DetectionSource, IntoDetections,
    MonotonicClock, PresencePipeline, SteppedClock,
};
pub use tracker::{
    Detection, DistanceGate, DistanceGrid, FrameProcessor, FrameResult, LifecycleRegistry,
    ObjectId, Rect, Tier, TierTransition, TrackedObject, TrackerConfig, TransitionKind,
};
