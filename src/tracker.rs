mod centroid_tracker;
mod filter;
mod matching;
pub(crate) mod rect;
mod track;
mod track_state;

pub use centroid_tracker::{CentroidTracker, Snapshot, TrackerConfig};
pub use filter::{DetectionFilter, RawDetection, filter_by_area};
pub use matching::{AssignmentResult, Detection, centroid_distance, greedy_assignment};
pub use rect::BoundingBox;
pub use track::{Timestamp, Track, TrackId};
pub use track_state::TrackState;
