mod distance_gate;
mod frame_processor;
mod overlap;
mod rect;
mod registry;
mod tier;
mod tracked_object;

pub use distance_gate::{DEFAULT_DEPTH_SCALE, DistanceGate, DistanceGrid, NO_READING, admissible};
pub use frame_processor::{FrameProcessor, FrameResult};
pub use overlap::{Detection, first_overlapping, overlaps};
pub use rect::Rect;
pub use registry::{LifecycleRegistry, TierTransition, TrackerConfig, TransitionKind};
pub use tier::Tier;
pub use tracked_object::{ObjectId, TrackedObject};
