//! Matching utilities for centroid tracking.

use nalgebra::Point2;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::tracker::rect::{BoundingBox, euclidean};

/// Validated detection input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in TLWH format
    pub bbox: BoundingBox,
    /// Detection confidence score
    pub score: f32,
    /// Detector class id
    pub class_id: u32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, score: f32, class_id: u32) -> Self {
        Self {
            bbox,
            score,
            class_id,
        }
    }

    #[inline]
    pub fn center(&self) -> Point2<i32> {
        self.bbox.center()
    }
}

/// Compute the Euclidean centroid distance matrix, rows are tracks and columns detections.
pub fn centroid_distance(track_centers: &[Point2<i32>], det_centers: &[Point2<i32>]) -> Array2<f64> {
    let mut dists = Array2::zeros((track_centers.len(), det_centers.len()));
    for (i, t) in track_centers.iter().enumerate() {
        for (j, d) in det_centers.iter().enumerate() {
            dists[[i, j]] = euclidean(t, d);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    /// `(row, column)` pairs in row order
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy, row-ordered assignment.
///
/// Rows are visited top to bottom. Each row takes the cheapest column not already
/// claimed by an earlier row, provided that cost is strictly below `max_distance`.
/// Equal costs resolve to the lower column index. The result depends on row order
/// and is not a minimum-total-cost assignment.
pub fn greedy_assignment(cost_matrix: &Array2<f64>, max_distance: f64) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut claimed = vec![false; num_cols];
    let mut matches = Vec::new();
    let mut unmatched_tracks = Vec::new();

    for row in 0..num_rows {
        let mut best: Option<(usize, f64)> = None;
        for col in 0..num_cols {
            if claimed[col] {
                continue;
            }
            let cost = cost_matrix[[row, col]];
            if best.is_none_or(|(_, min)| cost < min) {
                best = Some((col, cost));
            }
        }

        match best {
            Some((col, cost)) if cost < max_distance => {
                claimed[col] = true;
                matches.push((row, col));
            }
            _ => unmatched_tracks.push(row),
        }
    }

    let unmatched_detections = claimed
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| if c { None } else { Some(i) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}
