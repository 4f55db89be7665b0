//! Per-frame orchestration: re-validate, promote and evict, then admit.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::ConfigError;
use crate::tracker::distance_gate::{DistanceGate, DistanceGrid};
use crate::tracker::overlap::Detection;
use crate::tracker::rect::Rect;
use crate::tracker::registry::{LifecycleRegistry, TierTransition, TrackerConfig, TransitionKind};
use crate::tracker::tracked_object::TrackedObject;

/// Outcome of one processed frame.
#[derive(Debug, Clone, Default)]
pub struct FrameResult {
    /// Provisional objects after this frame
    pub provisional: Vec<TrackedObject>,
    /// Confirmed objects after this frame
    pub confirmed: Vec<TrackedObject>,
    /// Increase of the confirmed count caused by this frame
    pub count_delta: u64,
    /// Confirmed count after this frame
    pub total_count: u64,
    /// Tier changes in the order they happened
    pub transitions: Vec<TierTransition>,
}

impl FrameResult {
    pub fn provisional_regions(&self) -> Vec<Rect> {
        self.provisional.iter().map(|obj| obj.region).collect()
    }

    pub fn confirmed_regions(&self) -> Vec<Rect> {
        self.confirmed.iter().map(|obj| obj.region).collect()
    }

    /// Transitions of one kind, e.g. promotions for a confirmation flash.
    pub fn transitions_of(&self, kind: TransitionKind) -> impl Iterator<Item = &TierTransition> {
        self.transitions.iter().filter(move |t| t.kind == kind)
    }
}

/// Drives the lifecycle registry once per frame.
///
/// `now` must be non-decreasing across calls. A timestamp earlier than the
/// previous frame panics in debug builds; release builds clamp it to the
/// previous frame's timestamp.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    registry: LifecycleRegistry,
    gate: DistanceGate,
    last_frame: Option<Duration>,
}

impl FrameProcessor {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: LifecycleRegistry::new(config),
            gate: DistanceGate::new(config.min_dist, config.max_dist, config.depth_scale),
            last_frame: None,
        })
    }

    pub fn registry(&self) -> &LifecycleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TrackerConfig {
        self.registry.config()
    }

    pub fn confirmed_count(&self) -> u64 {
        self.registry.confirmed_count()
    }

    pub fn process_frame(
        &mut self,
        detections: &[Detection],
        grid: &DistanceGrid,
        now: Duration,
    ) -> FrameResult {
        let now = self.advance_clock(now);
        let mut transitions = Vec::new();

        // A non-finite or negative-size box would overlap everything.
        let detections: Vec<Detection> = detections
            .iter()
            .filter(|det| {
                let valid = det.bbox.is_valid();
                if !valid {
                    debug!(region = ?det.bbox, "discarding malformed detection");
                }
                valid
            })
            .copied()
            .collect();

        let count_delta = self.registry.revalidate(&detections, now, &mut transitions);

        // Admission sees regions updated above and objects admitted earlier
        // in this loop.
        for det in &detections {
            if self.registry.is_tracked(&det.bbox) {
                continue;
            }
            if !self.gate.admissible(&det.bbox, grid) {
                trace!(
                    region = ?det.bbox,
                    distance = ?self.gate.distance_at(&det.bbox, grid),
                    "detection outside distance gate"
                );
                continue;
            }
            let id = self.registry.admit(det.bbox, now);
            transitions.push(TierTransition {
                id,
                region: det.bbox,
                kind: TransitionKind::Admitted,
            });
        }

        FrameResult {
            provisional: self.registry.provisional().to_vec(),
            confirmed: self.registry.confirmed().to_vec(),
            count_delta,
            total_count: self.registry.confirmed_count(),
            transitions,
        }
    }

    fn advance_clock(&mut self, now: Duration) -> Duration {
        let now = match self.last_frame {
            Some(last) if now < last => {
                debug_assert!(now >= last, "frame time went backwards: {now:?} < {last:?}");
                warn!(?now, ?last, "frame time went backwards, clamping");
                last
            }
            _ => now,
        };
        self.last_frame = Some(now);
        now
    }
}
