//! A single tracked presence and its per-tier timing.

use std::time::Duration;

use crate::tracker::rect::Rect;
use crate::tracker::tier::Tier;

/// Stable identifier of a tracked object, unique within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Single tracked object.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedObject {
    /// Unique identifier, never reused after eviction
    pub id: ObjectId,
    /// Last matched rectangle
    pub region: Rect,
    /// Current lifecycle tier
    pub tier: Tier,
    /// When the object entered its current tier
    pub start_time: Duration,
    /// Most recent frame in which it matched a detection
    pub last_seen_time: Duration,
    /// Whether it matched a detection in the frame being evaluated
    pub matched_this_frame: bool,
}

impl TrackedObject {
    /// Create a provisional object admitted at `now`.
    pub fn new(id: ObjectId, region: Rect, now: Duration) -> Self {
        Self {
            id,
            region,
            tier: Tier::Provisional,
            start_time: now,
            last_seen_time: now,
            matched_this_frame: true,
        }
    }

    pub fn reset_match(&mut self) {
        self.matched_this_frame = false;
    }

    /// Record a match against `region` at `now`.
    pub fn update(&mut self, region: Rect, now: Duration) {
        self.region = region;
        self.last_seen_time = now;
        self.matched_this_frame = true;
    }

    /// Move into the confirmed tier; the dwell clock restarts.
    pub fn promote(&mut self, now: Duration) {
        debug_assert_eq!(self.tier, Tier::Provisional);
        self.tier = Tier::Confirmed;
        self.start_time = now;
        self.last_seen_time = now;
    }

    /// Time spent in the current tier.
    pub fn dwell(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start_time)
    }

    /// Time since the last match.
    pub fn unseen_for(&self, now: Duration) -> Duration {
        now.saturating_sub(self.last_seen_time)
    }

    /// Unmatched past `grace`, after the tier's minimum `dwell` has elapsed.
    pub fn is_stale(&self, now: Duration, dwell: Duration, grace: Duration) -> bool {
        !self.matched_this_frame && self.dwell(now) > dwell && self.unseen_for(now) > grace
    }
}
