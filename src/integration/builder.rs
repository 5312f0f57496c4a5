//! Builder for creating RawDetection objects from various input formats.

use crate::tracker::RawDetection;

/// Builder for creating `RawDetection` objects from various box formats.
///
/// Float coordinates are truncated towards zero, matching how pixel boxes are
/// usually cast out of model outputs.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: f32,
    class_id: u32,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Set the detector class id.
    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Build the final `RawDetection`.
    pub fn build(self) -> RawDetection {
        let x1 = self.x1 as i32;
        let y1 = self.y1 as i32;
        let x2 = self.x2 as i32;
        let y2 = self.y2 as i32;
        RawDetection::new(x1, y1, span(x1, x2), span(y1, y2), self.score, self.class_id)
    }
}

/// `end - start`, saturated into `i32` instead of wrapping.
fn span(start: i32, end: i32) -> i32 {
    let extent = i64::from(end) - i64::from(start);
    extent.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
