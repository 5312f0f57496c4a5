//! Integration module for connecting an object detector with the centroid tracker.
//!
//! The detector is an external collaborator: anything implementing
//! [`DetectionSource`] can feed a [`TrackerPipeline`], which runs filtering,
//! tracking, anomaly rules and display deduplication for each frame.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoRawDetections};
pub use pipeline::{FrameReport, TrackerPipeline};
