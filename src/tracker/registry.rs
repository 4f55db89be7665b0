//! Two-tier lifecycle registry: provisional and confirmed presences.

use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;
use crate::tracker::distance_gate::DEFAULT_DEPTH_SCALE;
use crate::tracker::overlap::{self, Detection};
use crate::tracker::rect::Rect;
use crate::tracker::tier::Tier;
use crate::tracker::tracked_object::{ObjectId, TrackedObject};

/// Configuration for the presence tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Exclusive lower bound on admission distance, in millimeters
    pub min_dist: i32,
    /// Exclusive upper bound on admission distance, in millimeters
    pub max_dist: i32,
    /// Linear downsampling from detector pixels to distance samples
    pub depth_scale: usize,
    /// Time a provisional object must be re-matched before promotion
    pub promotion_dwell: Duration,
    /// Unmatched time tolerated before a provisional object is dropped
    pub provisional_grace: Duration,
    /// Unmatched time tolerated before a confirmed object is counted and evicted
    pub confirmed_grace: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_dist: 500,
            max_dist: 1500,
            depth_scale: DEFAULT_DEPTH_SCALE,
            promotion_dwell: Duration::from_secs(2),
            provisional_grace: Duration::from_millis(500),
            confirmed_grace: Duration::from_secs(2),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dist <= self.min_dist {
            return Err(ConfigError::EmptyDistanceRange {
                min_dist: self.min_dist,
                max_dist: self.max_dist,
            });
        }
        if self.depth_scale == 0 {
            return Err(ConfigError::ZeroDepthScale);
        }
        Ok(())
    }

    fn grace(&self, tier: Tier) -> Duration {
        match tier {
            Tier::Provisional => self.provisional_grace,
            Tier::Confirmed => self.confirmed_grace,
        }
    }
}

/// What happened to a tracked object during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Entered the provisional tier
    Admitted,
    /// Moved from provisional to confirmed
    Promoted,
    /// Evicted from provisional; not counted
    Dropped,
    /// Evicted from confirmed; counted once
    Counted,
}

/// A tier change of one object in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierTransition {
    pub id: ObjectId,
    pub region: Rect,
    pub kind: TransitionKind,
}

impl TierTransition {
    fn of(obj: &TrackedObject, kind: TransitionKind) -> Self {
        Self {
            id: obj.id,
            region: obj.region,
            kind,
        }
    }
}

/// Owner of all tracked objects and the cumulative confirmed count.
///
/// Collections are rebuilt by partitioning each frame, so eviction never
/// shifts indices under an ongoing scan.
#[derive(Debug, Clone)]
pub struct LifecycleRegistry {
    provisional: Vec<TrackedObject>,
    confirmed: Vec<TrackedObject>,
    confirmed_count: u64,
    next_id: u64,
    config: TrackerConfig,
}

impl LifecycleRegistry {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            provisional: Vec::new(),
            confirmed: Vec::new(),
            confirmed_count: 0,
            next_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn provisional(&self) -> &[TrackedObject] {
        &self.provisional
    }

    pub fn confirmed(&self) -> &[TrackedObject] {
        &self.confirmed
    }

    /// Confirmed presences that have ended so far.
    pub fn confirmed_count(&self) -> u64 {
        self.confirmed_count
    }

    pub fn len(&self) -> usize {
        self.provisional.len() + self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provisional.is_empty() && self.confirmed.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&TrackedObject> {
        self.iter().find(|obj| obj.id == id)
    }

    /// All live objects, provisional first.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> {
        self.provisional.iter().chain(self.confirmed.iter())
    }

    /// Re-match every live object against this frame's detections, then
    /// promote and evict. Returns the increase of the confirmed count.
    ///
    /// The provisional tier is evaluated first. Objects promoted here join the
    /// confirmed tier only after the confirmed tier has been evaluated, so
    /// each object is evaluated exactly once per frame.
    pub fn revalidate(
        &mut self,
        detections: &[Detection],
        now: Duration,
        transitions: &mut Vec<TierTransition>,
    ) -> u64 {
        let config = self.config;

        // Step 1: provisional tier
        let mut promoted = Vec::new();
        let mut kept = Vec::with_capacity(self.provisional.len());
        for mut obj in self.provisional.drain(..) {
            rematch(&mut obj, detections, now);

            if obj.matched_this_frame && obj.dwell(now) > config.promotion_dwell {
                obj.promote(now);
                debug!(id = %obj.id, region = ?obj.region, "presence confirmed");
                transitions.push(TierTransition::of(&obj, TransitionKind::Promoted));
                promoted.push(obj);
            } else if obj.is_stale(now, config.promotion_dwell, config.grace(Tier::Provisional)) {
                debug!(id = %obj.id, "provisional presence dropped");
                transitions.push(TierTransition::of(&obj, TransitionKind::Dropped));
            } else {
                kept.push(obj);
            }
        }
        self.provisional = kept;

        // Step 2: confirmed tier
        let mut counted = 0;
        let mut kept = Vec::with_capacity(self.confirmed.len() + promoted.len());
        for mut obj in self.confirmed.drain(..) {
            rematch(&mut obj, detections, now);

            if obj.is_stale(now, config.promotion_dwell, config.grace(Tier::Confirmed)) {
                counted += 1;
                debug!(
                    id = %obj.id,
                    present_for = ?obj.last_seen_time.saturating_sub(obj.start_time),
                    "confirmed presence ended"
                );
                transitions.push(TierTransition::of(&obj, TransitionKind::Counted));
            } else {
                kept.push(obj);
            }
        }
        kept.extend(promoted);
        self.confirmed = kept;

        self.confirmed_count += counted;
        counted
    }

    /// Whether `region` overlaps any live object in either tier.
    pub fn is_tracked(&self, region: &Rect) -> bool {
        overlap::overlaps_any(region, self.iter().map(|obj| &obj.region))
    }

    /// Start tracking `region` as a new provisional object.
    pub fn admit(&mut self, region: Rect, now: Duration) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        debug!(id = %id, region = ?region, "presence admitted");
        self.provisional.push(TrackedObject::new(id, region, now));
        id
    }
}

fn rematch(obj: &mut TrackedObject, detections: &[Detection], now: Duration) {
    obj.reset_match();
    if let Some(idx) = overlap::first_overlapping(&obj.region, detections) {
        obj.update(detections[idx].bbox, now);
    }
}
