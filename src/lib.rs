//! # centroid-track
//!
//! Frame-by-frame identity tracking over pixel-space detections, with rule-based
//! anomaly flags (loitering) and a display-only spatial deduplication filter.
//!
//! The core is a greedy nearest-centroid tracker: every cycle, existing tracks are
//! visited in ascending id order and each one claims the closest unclaimed detection
//! within `max_distance`. Unclaimed detections spawn new tracks; tracks that miss too
//! many frames, or go unseen for too long, are dropped.
//!
//! ## Example
//!
//! ```rust
//! use centroid_track::{BoundingBox, CentroidTracker, Detection, TrackerConfig};
//!
//! let mut tracker = CentroidTracker::new(TrackerConfig::default());
//! let det = Detection::new(BoundingBox::new(100, 100, 40, 80).unwrap(), 0.9, 0);
//!
//! let snapshot = tracker.update(&[det], 0.0);
//! assert_eq!(snapshot.len(), 1);
//! ```

pub mod anomaly;
pub mod config;
pub mod integration;
pub mod presentation;
pub mod tracker;

pub use anomaly::{AnomalyRule, Loitering, RuleSet};
pub use config::{ParamUpdate, TrackingParams};
pub use integration::{DetectionBuilder, DetectionSource, FrameReport, TrackerPipeline};
pub use presentation::deduplicate;
pub use tracker::{
    BoundingBox, CentroidTracker, Detection, DetectionFilter, RawDetection, Snapshot,
    Timestamp, Track, TrackId, TrackState, TrackerConfig,
};

pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors surfaced by the tracking crate.
    ///
    /// Tracker invariant violations are not represented here; they panic.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid detection: width and height must be positive, got {width}x{height}")]
        InvalidDetection { width: i32, height: i32 },

        #[error("Detection out of range: box at ({x}, {y}) with size {width}x{height} overflows pixel coordinates")]
        DetectionOutOfRange { x: i64, y: i64, width: i64, height: i64 },

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }

    /// Result type for tracking operations
    pub type Result<T> = std::result::Result<T, Error>;
}
