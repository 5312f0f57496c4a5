//! TrackerPipeline for combining detection with tracking and anomaly rules.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::Result;
use crate::anomaly::RuleSet;
use crate::config::{ParamUpdate, TrackingParams};
use crate::presentation::deduplicate;
use crate::tracker::{CentroidTracker, RawDetection, Snapshot, Timestamp, Track, TrackId};

use super::DetectionSource;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// All live tracks, confirmed or not
    pub snapshot: Snapshot,
    /// `track_id -> reason` for every track with a firing rule
    pub anomalies: BTreeMap<TrackId, String>,
    /// Confirmed, spatially deduplicated tracks in creation order
    pub rendered: Vec<Track>,
}

/// A combined tracker that bundles detection inference with the centroid tracker.
///
/// One pipeline serves one stream. Detector failures never reach the tracker: the
/// frame is processed as if nothing was detected, so existing tracks age normally.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: CentroidTracker,
    params: TrackingParams,
    rules: RuleSet,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given detector and parameters.
    pub fn new(detector: D, params: TrackingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            detector,
            tracker: CentroidTracker::new(params.tracker_config()),
            rules: params.rule_set(),
            params,
        })
    }

    /// Create a new tracking pipeline with default parameters.
    pub fn with_default_params(detector: D) -> Self {
        let params = TrackingParams::default();
        Self {
            detector,
            tracker: CentroidTracker::new(params.tracker_config()),
            rules: params.rule_set(),
            params,
        }
    }

    /// Process a single frame.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `now` - Monotonic capture time of the frame, in seconds
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        now: Timestamp,
    ) -> FrameReport {
        let raw = match self.detector.detect(input, width, height) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "detector failed, treating frame as empty");
                Vec::new()
            }
        };
        self.process_detections(&raw, now)
    }

    /// Run already-detected boxes through filter, tracker, rules and dedup.
    pub fn process_detections(&mut self, raw: &[RawDetection], now: Timestamp) -> FrameReport {
        let detections = self.params.detection_filter().apply(raw);
        let snapshot = self.tracker.update(&detections, now);
        let anomalies = self.rules.evaluate(&snapshot, now);
        let rendered = deduplicate(&snapshot, self.params.spatial_threshold);

        FrameReport {
            snapshot,
            anomalies,
            rendered,
        }
    }

    pub fn params(&self) -> &TrackingParams {
        &self.params
    }

    /// Replace all parameters. Effective from the next frame.
    pub fn set_params(&mut self, params: TrackingParams) -> Result<()> {
        params.validate()?;
        self.tracker.set_config(params.tracker_config())?;
        self.rules.set_loiter_time(params.loiter_time);
        self.params = params;
        Ok(())
    }

    /// Apply a partial, clamped parameter update. Effective from the next frame.
    pub fn update_params(&mut self, update: &ParamUpdate) -> Result<()> {
        let mut params = self.params.clone();
        params.apply(update)?;
        self.set_params(params)
    }

    /// Replace the anomaly rules, e.g. to add rules beyond loitering.
    ///
    /// The set is kept across parameter changes; `loiter_time` only retunes its
    /// built-in loitering rule.
    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }
}
