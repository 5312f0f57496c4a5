//! Runtime-tunable tracking parameters.
//!
//! Every value here may be changed between frames; the pipeline reads them at the
//! start of each cycle, so a change lands on the next frame without a restart.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::anomaly::RuleSet;
use crate::tracker::{DetectionFilter, TrackerConfig};
use crate::{Error, Result};

/// Range `spatial_threshold` is clamped to by [`ParamUpdate`].
pub const SPATIAL_THRESHOLD_RANGE: RangeInclusive<f64> = 20.0..=100.0;

/// Range `min_area` is clamped to by [`ParamUpdate`].
pub const MIN_AREA_RANGE: RangeInclusive<i64> = 100..=5000;

/// Full parameter set for the detection filter, tracker, rules and display dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingParams {
    /// Minimum `width * height` forwarded to the tracker
    pub min_area: i64,
    /// Per-axis pixel distance under which confirmed tracks are merged for display
    pub spatial_threshold: f64,
    /// Maximum centroid distance for a match (exclusive)
    pub max_distance: f64,
    /// Seconds an unmatched track survives without a match
    pub max_lost_time: f64,
    /// Consecutive misses tolerated before removal
    pub max_missed: u32,
    /// Matched frames needed for confirmation
    pub confirm_threshold: u32,
    /// Dwell time in seconds before a track is flagged as loitering
    pub loiter_time: f64,
    /// Minimum detector confidence
    pub confidence_threshold: f32,
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            min_area: 500,
            spatial_threshold: 55.0,
            max_distance: 60.0,
            max_lost_time: 2.0,
            max_missed: 10,
            confirm_threshold: 2,
            loiter_time: 10.0,
            confidence_threshold: 0.35,
        }
    }
}

impl TrackingParams {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.tracker_config().validate()?;

        if self.min_area < 0 {
            return Err(Error::InvalidConfig(format!(
                "min_area must be non-negative, got {}",
                self.min_area
            )));
        }
        if self.spatial_threshold.is_nan() || self.spatial_threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "spatial_threshold must be non-negative, got {}",
                self.spatial_threshold
            )));
        }
        if self.loiter_time.is_nan() || self.loiter_time < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "loiter_time must be non-negative, got {}",
                self.loiter_time
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            max_distance: self.max_distance,
            max_lost_time: self.max_lost_time,
            max_missed: self.max_missed,
            confirm_threshold: self.confirm_threshold,
        }
    }

    /// Person-class filter using this parameter set's area and confidence gates.
    pub fn detection_filter(&self) -> DetectionFilter {
        DetectionFilter {
            min_area: self.min_area,
            min_confidence: self.confidence_threshold,
            ..DetectionFilter::default()
        }
    }

    pub fn rule_set(&self) -> RuleSet {
        RuleSet::loitering(self.loiter_time)
    }

    /// Apply a partial update. Either every field lands or none does.
    pub fn apply(&mut self, update: &ParamUpdate) -> Result<()> {
        let mut next = self.clone();

        if let Some(v) = update.min_area {
            next.min_area = v.clamp(*MIN_AREA_RANGE.start(), *MIN_AREA_RANGE.end());
        }
        if let Some(v) = update.spatial_threshold {
            if v.is_nan() {
                return Err(Error::InvalidConfig("spatial_threshold is NaN".to_string()));
            }
            next.spatial_threshold =
                v.clamp(*SPATIAL_THRESHOLD_RANGE.start(), *SPATIAL_THRESHOLD_RANGE.end());
        }
        if let Some(v) = update.max_distance {
            next.max_distance = v;
        }
        if let Some(v) = update.max_lost_time {
            next.max_lost_time = v;
        }
        if let Some(v) = update.max_missed {
            next.max_missed = v;
        }
        if let Some(v) = update.confirm_threshold {
            next.confirm_threshold = v;
        }
        if let Some(v) = update.loiter_time {
            next.loiter_time = v;
        }
        if let Some(v) = update.confidence_threshold {
            next.confidence_threshold = v;
        }

        next.validate()?;
        info!(
            min_area = next.min_area,
            spatial_threshold = next.spatial_threshold,
            max_distance = next.max_distance,
            max_lost_time = next.max_lost_time,
            max_missed = next.max_missed,
            confirm_threshold = next.confirm_threshold,
            loiter_time = next.loiter_time,
            "params updated"
        );
        *self = next;
        Ok(())
    }
}

/// Partial parameter change, e.g. decoded from a tuning form or JSON body.
///
/// `min_area` and `spatial_threshold` are clamped into their UI ranges; the other
/// fields are validated as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamUpdate {
    pub min_area: Option<i64>,
    pub spatial_threshold: Option<f64>,
    pub max_distance: Option<f64>,
    pub max_lost_time: Option<f64>,
    pub max_missed: Option<u32>,
    pub confirm_threshold: Option<u32>,
    pub loiter_time: Option<f64>,
    pub confidence_threshold: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = TrackingParams::default();
        params.validate().unwrap();
        assert_eq!(params.tracker_config(), TrackerConfig::default());
        assert_eq!(params.detection_filter(), DetectionFilter::default());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let params = TrackingParams::from_json_str(r#"{"max_distance": 80, "loiter_time": 5.5}"#)
            .unwrap();
        assert_eq!(params.max_distance, 80.0);
        assert_eq!(params.loiter_time, 5.5);
        assert_eq!(params.min_area, 500);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            TrackingParams::from_json_str(r#"{"max_distance": -1}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            TrackingParams::from_json_str("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        assert!(matches!(
            TrackingParams::from_json_file("/nonexistent/params.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_update_clamps_ui_ranges() {
        let mut params = TrackingParams::default();
        params
            .apply(&ParamUpdate {
                min_area: Some(10),
                spatial_threshold: Some(500.0),
                ..ParamUpdate::default()
            })
            .unwrap();
        assert_eq!(params.min_area, 100);
        assert_eq!(params.spatial_threshold, 100.0);
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut params = TrackingParams::default();
        let result = params.apply(&ParamUpdate {
            min_area: Some(1000),
            max_distance: Some(0.0),
            ..ParamUpdate::default()
        });
        assert!(result.is_err());
        assert_eq!(params, TrackingParams::default());
    }

    #[test]
    fn test_update_from_json() {
        let update: ParamUpdate =
            serde_json::from_str(r#"{"confirm_threshold": 3, "loiter_time": 30}"#).unwrap();
        let mut params = TrackingParams::default();
        params.apply(&update).unwrap();
        assert_eq!(params.confirm_threshold, 3);
        assert_eq!(params.loiter_time, 30.0);
        assert_eq!(params.max_missed, 10);
    }
}
