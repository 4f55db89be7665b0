//! Integration module for connecting detectors and depth sensors with the
//! presence tracker.
//!
//! This module provides the collaborator traits, frame clocks, a periodic
//! count reporter and a pipeline that drives one frame end to end.

mod builder;
mod clock;
mod detector;
mod pipeline;
mod report;

pub use builder::DetectionBuilder;
pub use clock::{Clock, MonotonicClock, SteppedClock};
pub use detector::{DepthSource, DetectionSource, IntoDetections};
pub use pipeline::PresencePipeline;
pub use report::CountReporter;
