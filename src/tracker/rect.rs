use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Axis-aligned pixel box in TLWH format (top-left x, top-left y, width, height).
///
/// Width and height are always positive; construction through [`BoundingBox::new`]
/// rejects anything else, so a zero or negative area can never reach the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl BoundingBox {
    /// Create a box from top-left coordinates and dimensions (TLWH format).
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDetection { width, height });
        }
        if x.checked_add(width).is_none() || y.checked_add(height).is_none() {
            return Err(Error::DetectionOutOfRange {
                x: x.into(),
                y: y.into(),
                width: width.into(),
                height: height.into(),
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Create a box from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    pub fn from_tlbr(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self> {
        let width = i64::from(x2) - i64::from(x1);
        let height = i64::from(y2) - i64::from(y1);
        match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) => Self::new(x1, y1, w, h),
            _ => Err(Error::DetectionOutOfRange {
                x: x1.into(),
                y: y1.into(),
                width,
                height,
            }),
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [i32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Integer centroid, rounding the half-extent down.
    #[inline]
    pub fn center(&self) -> Point2<i32> {
        Point2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Area in square pixels. Widened so large boxes cannot overflow.
    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }
}

impl TryFrom<[i32; 4]> for BoundingBox {
    type Error = Error;

    fn try_from([x, y, width, height]: [i32; 4]) -> Result<Self> {
        Self::new(x, y, width, height)
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_tlwh()
    }
}

/// Euclidean distance between two integer centroids.
pub fn euclidean(a: &Point2<i32>, b: &Point2<i32>) -> f64 {
    let a = Point2::new(f64::from(a.x), f64::from(a.y));
    let b = Point2::new(f64::from(b.x), f64::from(b.y));
    nalgebra::distance(&a, &b)
}

/// Per-axis proximity: true when both `|dx|` and `|dy|` are strictly below `threshold`.
///
/// This is a square neighbourhood, not a circle.
pub fn within_axes(a: &Point2<i32>, b: &Point2<i32>, threshold: f64) -> bool {
    let dx = (i64::from(a.x) - i64::from(b.x)).abs() as f64;
    let dy = (i64::from(a.y) - i64::from(b.y)).abs() as f64;
    dx < threshold && dy < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversions() {
        let rect = BoundingBox::new(10, 20, 30, 40).unwrap();

        assert_eq!(rect.to_tlwh(), [10, 20, 30, 40]);
        assert_eq!(rect.to_tlbr(), [10, 20, 40, 60]);
        assert_eq!(rect.area(), 1200);
    }

    #[test]
    fn test_from_tlbr() {
        let rect = BoundingBox::from_tlbr(10, 20, 40, 60).unwrap();
        assert_eq!(rect.to_tlwh(), [10, 20, 30, 40]);
    }

    #[test]
    fn test_center_rounds_down() {
        let rect = BoundingBox::new(0, 0, 5, 7).unwrap();
        assert_eq!(rect.center(), Point2::new(2, 3));
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert!(matches!(
            BoundingBox::new(0, 0, 0, 10),
            Err(Error::InvalidDetection { width: 0, height: 10 })
        ));
        assert!(BoundingBox::new(0, 0, 10, -3).is_err());
        assert!(BoundingBox::from_tlbr(50, 50, 40, 60).is_err());
    }

    #[test]
    fn test_rejects_boxes_past_coordinate_range() {
        assert!(matches!(
            BoundingBox::new(i32::MAX - 5, 0, 100, 100),
            Err(Error::DetectionOutOfRange { .. })
        ));
        assert!(BoundingBox::new(0, i32::MAX, 10, 1).is_err());

        // Touching the edge exactly is still representable.
        let edge = BoundingBox::new(i32::MAX - 100, 0, 100, 100).unwrap();
        assert_eq!(edge.to_tlbr()[2], i32::MAX);
        assert_eq!(edge.center().x, i32::MAX - 50);
    }

    #[test]
    fn test_from_tlbr_wide_span() {
        assert!(matches!(
            BoundingBox::from_tlbr(i32::MIN, 0, i32::MAX, 10),
            Err(Error::DetectionOutOfRange { .. })
        ));
        let rect = BoundingBox::from_tlbr(-1_000_000_000, 0, 1_000_000_000, 10).unwrap();
        assert_eq!(rect.width(), 2_000_000_000);
    }

    #[test]
    fn test_within_axes_far_apart_extremes() {
        let left = Point2::new(-2_000_000_000, 0);
        let right = Point2::new(2_000_000_000, 0);
        assert!(!within_axes(&left, &right, 55.0));
        assert!(!within_axes(&right, &left, 55.0));
    }

    #[test]
    fn test_serde_validates() {
        let rect: BoundingBox = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(rect.to_tlwh(), [1, 2, 3, 4]);
        assert!(serde_json::from_str::<BoundingBox>("[1, 2, 0, 4]").is_err());
    }

    #[test]
    fn test_euclidean() {
        let d = euclidean(&Point2::new(0, 0), &Point2::new(3, 4));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_within_axes_is_square_not_circle() {
        let origin = Point2::new(0, 0);
        // Euclidean distance ~12.7, but each axis is within 10.
        assert!(within_axes(&origin, &Point2::new(9, 9), 10.0));
        // One axis at the threshold is not within.
        assert!(!within_axes(&origin, &Point2::new(10, 0), 10.0));
        assert!(!within_axes(&origin, &Point2::new(2, 11), 10.0));
    }
}
