use serde::{Deserialize, Serialize};

/// Lifecycle state of a live track.
///
/// Removal is not a state: a removed track is dropped from the store and its id
/// is never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackState {
    /// Newly created track, not yet matched on enough frames
    #[default]
    Tentative,
    /// Matched on at least `confirm_threshold` frames; never reverts
    Confirmed,
}
