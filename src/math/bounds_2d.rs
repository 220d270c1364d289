use super::{Point2, Vector2};

/// An axis-aligned bounding box in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb2 {
    /// Creates a bounding box from two corners, normalizing their order.
    #[must_use]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a bounding box from its center and full size.
    #[must_use]
    pub fn from_center_size(center: Point2, size: Vector2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Computes the bounding box of a point set, or `None` if it is empty.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bb = Self {
            min: *first,
            max: *first,
        };
        for p in rest {
            bb.min.x = bb.min.x.min(p.x);
            bb.min.y = bb.min.y.min(p.y);
            bb.max.x = bb.max.x.max(p.x);
            bb.max.y = bb.max.y.max(p.y);
        }
        Some(bb)
    }

    /// Width and height of the box.
    #[must_use]
    pub fn size(&self) -> Vector2 {
        self.max - self.min
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }
}
