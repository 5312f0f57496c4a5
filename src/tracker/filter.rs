//! Pre-tracker detection filtering.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::tracker::matching::Detection;
use crate::tracker::rect::BoundingBox;

/// Unvalidated detector output in pixel space (TLWH).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub score: f32,
    pub class_id: u32,
}

impl RawDetection {
    pub fn new(x: i32, y: i32, width: i32, height: i32, score: f32, class_id: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score,
            class_id,
        }
    }

    /// Validate the box. Non-positive dimensions are rejected, never clamped.
    pub fn validate(&self) -> Result<Detection> {
        let bbox = BoundingBox::new(self.x, self.y, self.width, self.height)?;
        Ok(Detection::new(bbox, self.score, self.class_id))
    }
}

/// Keep only detections with `width * height >= min_area`.
pub fn filter_by_area(detections: Vec<Detection>, min_area: i64) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| d.bbox.area() >= min_area)
        .collect()
}

/// Stateless gate between the detector and the tracker.
///
/// A raw box is forwarded when it is valid, belongs to `target_class` (if set),
/// scores at least `min_confidence` and covers at least `min_area` pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionFilter {
    pub min_area: i64,
    pub min_confidence: f32,
    pub target_class: Option<u32>,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            min_area: 500,
            min_confidence: 0.35,
            // COCO "person"
            target_class: Some(0),
        }
    }
}

impl DetectionFilter {
    pub fn accepts(&self, detection: &Detection) -> bool {
        self.target_class.is_none_or(|c| c == detection.class_id)
            && detection.score >= self.min_confidence
            && detection.bbox.area() >= self.min_area
    }

    /// Validate and filter one frame of raw detections, preserving input order.
    pub fn apply(&self, raw: &[RawDetection]) -> Vec<Detection> {
        let mut kept = Vec::with_capacity(raw.len());
        for r in raw {
            match r.validate() {
                Ok(det) if self.accepts(&det) => kept.push(det),
                Ok(_) => {}
                Err(err) => debug!(%err, x = r.x, y = r.y, "dropping invalid detection"),
            }
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(w: i32, h: i32, score: f32, class_id: u32) -> RawDetection {
        RawDetection::new(10, 10, w, h, score, class_id)
    }

    #[test]
    fn test_filter_by_area_inclusive() {
        let dets: Vec<_> = [(10, 10), (25, 20), (30, 30)]
            .iter()
            .map(|&(w, h)| raw(w, h, 0.9, 0).validate().unwrap())
            .collect();
        let kept = filter_by_area(dets, 500);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].bbox.area(), 500);
    }

    #[test]
    fn test_apply_rejects_invalid_boxes() {
        let filter = DetectionFilter {
            min_area: 0,
            ..DetectionFilter::default()
        };
        let kept = filter.apply(&[raw(0, 10, 0.9, 0), raw(-5, 10, 0.9, 0), raw(4, 4, 0.9, 0)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox.width(), 4);
    }

    #[test]
    fn test_apply_drops_boxes_past_coordinate_range() {
        let filter = DetectionFilter::default();
        let kept = filter.apply(&[
            RawDetection::new(i32::MAX - 5, 0, 100, 100, 0.9, 0),
            RawDetection::new(0, i32::MAX - 50, 100, 100, 0.9, 0),
            RawDetection::new(100, 100, 40, 80, 0.9, 0),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox.x(), 100);
    }

    #[test]
    fn test_apply_class_and_confidence() {
        let filter = DetectionFilter::default();
        let kept = filter.apply(&[
            raw(40, 80, 0.9, 0),
            raw(40, 80, 0.9, 2),
            raw(40, 80, 0.2, 0),
            raw(40, 80, 0.35, 0),
        ]);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|d| d.class_id == 0));
    }

    #[test]
    fn test_any_class_when_unset() {
        let filter = DetectionFilter {
            target_class: None,
            ..DetectionFilter::default()
        };
        assert_eq!(filter.apply(&[raw(40, 80, 0.9, 7)]).len(), 1);
    }
}
