//! Main centroid tracker: the track store and its per-frame update cycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::tracker::matching::{self, AssignmentResult, Detection};
use crate::tracker::track::{Timestamp, Track, TrackId};
use crate::{Error, Result};

/// Configuration for the CentroidTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Centroid distance (pixels) a match must stay strictly below
    pub max_distance: f64,
    /// Seconds an unmatched track may go unseen before removal
    pub max_lost_time: f64,
    /// Consecutive misses tolerated before removal
    pub max_missed: u32,
    /// Matched frames needed before a track is confirmed
    pub confirm_threshold: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_distance: 60.0,
            max_lost_time: 2.0,
            max_missed: 10,
            confirm_threshold: 2,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_distance must be positive and finite, got {}",
                self.max_distance
            )));
        }
        if self.max_lost_time.is_nan() || self.max_lost_time < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_lost_time must be non-negative, got {}",
                self.max_lost_time
            )));
        }
        Ok(())
    }
}

/// Tracks present after an update cycle, ordered by ascending id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    tracks: Vec<Track>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks
            .binary_search_by_key(&id, |t| t.id)
            .ok()
            .map(|i| &self.tracks[i])
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks.iter().map(|t| t.id)
    }

    /// Confirmed tracks only, still in id order.
    pub fn confirmed(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.confirmed)
    }

    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    pub fn into_vec(self) -> Vec<Track> {
        self.tracks
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

/// Greedy nearest-centroid tracker.
///
/// Owns every track of a single stream. Independent streams need independent
/// instances; nothing is shared between them. The tracker is not `Clone`, since a
/// copy would hand out the same ids as the original:
///
/// ```compile_fail
/// use centroid_track::CentroidTracker;
///
/// let tracker = CentroidTracker::default();
/// let _copy: CentroidTracker = tracker.clone();
/// ```
#[derive(Debug)]
pub struct CentroidTracker {
    tracks: BTreeMap<TrackId, Track>,
    next_id: TrackId,
    config: TrackerConfig,
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: BTreeMap::new(),
            next_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next `update`.
    pub fn set_config(&mut self, config: TrackerConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Id the next created track will receive.
    pub fn next_id(&self) -> TrackId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Live tracks in ascending id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tracks: self.tracks.values().cloned().collect(),
        }
    }

    /// Run one frame through the tracker and return the resulting snapshot.
    ///
    /// Existing tracks are matched in ascending id order; unmatched tracks age and
    /// may be removed; every detection left unclaimed starts a new track.
    pub fn update(&mut self, detections: &[Detection], now: Timestamp) -> Snapshot {
        // Step 1: Greedy association over the id-ordered track list
        let track_centers: Vec<_> = self.tracks.values().map(|t| t.center).collect();
        let det_centers: Vec<_> = detections.iter().map(Detection::center).collect();
        let dists = matching::centroid_distance(&track_centers, &det_centers);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&dists, self.config.max_distance);

        trace!(
            tracks = track_centers.len(),
            detections = detections.len(),
            matched = matches.len(),
            unmatched_tracks = unmatched_tracks.len(),
            "association done"
        );

        let mut assigned = vec![None; track_centers.len()];
        for (row, col) in matches {
            assigned[row] = Some(col);
        }

        // Step 2: Apply matches and misses; expire in the same pass
        let config = &self.config;
        let mut row = 0;
        self.tracks.retain(|&id, track| {
            let assignment = assigned[row];
            row += 1;

            match assignment {
                Some(col) => {
                    let was_confirmed = track.confirmed;
                    if track.update(&detections[col], now, config.confirm_threshold) {
                        debug!(track_id = id, frames = track.frames_seen, "track confirmed");
                    }
                    assert!(
                        !was_confirmed || track.confirmed,
                        "track {id} reverted from confirmed"
                    );
                    true
                }
                None => {
                    track.mark_missed();
                    if track.is_expired(now, config.max_missed, config.max_lost_time) {
                        debug!(
                            track_id = id,
                            missed = track.missed,
                            unseen_for = track.time_since_seen(now),
                            confirmed = track.confirmed,
                            "track removed"
                        );
                        false
                    } else {
                        true
                    }
                }
            }
        });

        // Step 3: Init new tracks
        for col in unmatched_detections {
            let id = self.next_id;
            self.next_id += 1;

            assert!(
                self.tracks.keys().next_back().is_none_or(|&last| id > last),
                "track id {id} issued at or below a live id"
            );
            let track = Track::new(id, &detections[col], now, self.config.confirm_threshold);
            debug!(
                track_id = id,
                cx = track.center.x,
                cy = track.center.y,
                confirmed = track.confirmed,
                "track created"
            );
            let previous = self.tracks.insert(id, track);
            assert!(previous.is_none(), "track id {id} issued twice");
        }

        self.snapshot()
    }
}
