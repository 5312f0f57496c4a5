//! Display-only spatial deduplication of confirmed tracks.

use nalgebra::Point2;

use crate::tracker::Track;
use crate::tracker::rect::within_axes;

/// Pick the confirmed tracks to render for one frame.
///
/// Tracks are walked in the order given (creation order for a [`Snapshot`]).
/// Unconfirmed tracks are skipped outright. A confirmed track is dropped when its
/// center lies strictly within `spatial_threshold` of an already accepted center on
/// both axes. The tracker itself is never touched.
///
/// [`Snapshot`]: crate::tracker::Snapshot
pub fn deduplicate<'a, I>(tracks: I, spatial_threshold: f64) -> Vec<Track>
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut accepted: Vec<Point2<i32>> = Vec::new();
    let mut rendered = Vec::new();

    for track in tracks.into_iter().filter(|t| t.confirmed) {
        if accepted
            .iter()
            .any(|c| within_axes(&track.center, c, spatial_threshold))
        {
            continue;
        }
        accepted.push(track.center);
        rendered.push(track.clone());
    }

    rendered
}
