//! Single tracked identity.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::tracker::matching::Detection;
use crate::tracker::rect::BoundingBox;
use crate::tracker::track_state::TrackState;

/// Unique track identifier, assigned in creation order.
pub type TrackId = u64;

/// Monotonic time in seconds, supplied by the caller.
pub type Timestamp = f64;

/// Single object track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,
    /// Centroid of the most recently matched box
    pub center: Point2<i32>,
    /// Most recently matched box
    pub bbox: BoundingBox,
    /// Time the track was created
    pub start_time: Timestamp,
    /// Time of the most recent match
    pub last_seen: Timestamp,
    /// Number of matched frames, including the creating one
    pub frames_seen: u32,
    /// Consecutive frames without a match
    pub missed: u32,
    /// Matched frames counted towards confirmation
    pub confirm_frames: u32,
    /// Set once `confirm_frames` reaches the threshold; never cleared
    pub confirmed: bool,
}

impl Track {
    /// Start a new track from an unclaimed detection.
    pub fn new(id: TrackId, detection: &Detection, now: Timestamp, confirm_threshold: u32) -> Self {
        Self {
            id,
            center: detection.center(),
            bbox: detection.bbox,
            start_time: now,
            last_seen: now,
            frames_seen: 1,
            missed: 0,
            confirm_frames: 1,
            confirmed: confirm_threshold <= 1,
        }
    }

    pub fn state(&self) -> TrackState {
        if self.confirmed {
            TrackState::Confirmed
        } else {
            TrackState::Tentative
        }
    }

    /// Time elapsed since creation.
    #[inline]
    pub fn age(&self, now: Timestamp) -> f64 {
        now - self.start_time
    }

    /// Time elapsed since the last match.
    #[inline]
    pub fn time_since_seen(&self, now: Timestamp) -> f64 {
        now - self.last_seen
    }

    /// Apply a matched detection. Returns true if this match confirmed the track.
    pub fn update(&mut self, detection: &Detection, now: Timestamp, confirm_threshold: u32) -> bool {
        self.center = detection.center();
        self.bbox = detection.bbox;
        self.last_seen = now;
        self.frames_seen += 1;
        self.missed = 0;
        self.confirm_frames += 1;

        if !self.confirmed && self.confirm_frames >= confirm_threshold {
            self.confirmed = true;
            return true;
        }
        false
    }

    /// Record a frame without a match.
    pub fn mark_missed(&mut self) {
        self.missed += 1;
    }

    /// Whether the track has run out of misses or time.
    pub fn is_expired(&self, now: Timestamp, max_missed: u32, max_lost_time: f64) -> bool {
        self.missed > max_missed || self.time_since_seen(now) > max_lost_time
    }
}
