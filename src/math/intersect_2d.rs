use super::{Point2, TOLERANCE};

/// How two closed segments relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentContact {
    /// The segments share no point.
    Disjoint,
    /// The segments meet at a single point that is an endpoint of at least one of them.
    Touch,
    /// The segment interiors cross at a single point.
    Cross,
    /// The segments are collinear and share a stretch of positive length.
    Overlap,
}

impl SegmentContact {
    /// Returns `true` if the contact cannot be represented by a planar
    /// straight-line graph without splitting either segment.
    #[must_use]
    pub fn is_conflict(self) -> bool {
        matches!(self, Self::Cross | Self::Overlap)
    }
}

/// 2D cross product of `(b - a)` and `(c - a)`.
///
/// Positive when `a, b, c` turn counter-clockwise.
#[must_use]
pub fn orient_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Sign of [`orient_2d`], treating distances of `c` from line `ab` below
/// [`TOLERANCE`] as zero.
fn orient_sign(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    let len = (b - a).norm();
    let o = orient_2d(a, b, c);
    if o.abs() <= TOLERANCE * len.max(1.0) {
        0
    } else if o > 0.0 {
        1
    } else {
        -1
    }
}

/// Returns `true` if `p` (known to be collinear with `a`–`b`) lies within the
/// segment's bounding box.
fn within_box(p: &Point2, a: &Point2, b: &Point2) -> bool {
    p.x >= a.x.min(b.x) - TOLERANCE
        && p.x <= a.x.max(b.x) + TOLERANCE
        && p.y >= a.y.min(b.y) - TOLERANCE
        && p.y <= a.y.max(b.y) + TOLERANCE
}

/// Classifies the contact between segments `a0`–`a1` and `b0`–`b1`.
#[must_use]
pub fn segment_contact_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> SegmentContact {
    let d1 = orient_sign(b0, b1, a0);
    let d2 = orient_sign(b0, b1, a1);
    let d3 = orient_sign(a0, a1, b0);
    let d4 = orient_sign(a0, a1, b1);

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return SegmentContact::Cross;
    }

    if d1 == 0 && d2 == 0 && d3 == 0 && d4 == 0 {
        return collinear_contact(a0, a1, b0, b1);
    }

    let touches = (d1 == 0 && within_box(a0, b0, b1))
        || (d2 == 0 && within_box(a1, b0, b1))
        || (d3 == 0 && within_box(b0, a0, a1))
        || (d4 == 0 && within_box(b1, a0, a1));
    if touches {
        SegmentContact::Touch
    } else {
        SegmentContact::Disjoint
    }
}

/// Contact between two collinear segments, measured along their common direction.
fn collinear_contact(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> SegmentContact {
    let dir = if (a1 - a0).norm_squared() >= (b1 - b0).norm_squared() {
        a1 - a0
    } else {
        b1 - b0
    };
    let len = dir.norm();
    if len < TOLERANCE {
        return if (a0 - b0).norm() < TOLERANCE {
            SegmentContact::Touch
        } else {
            SegmentContact::Disjoint
        };
    }
    let axis = dir / len;
    let param = |p: &Point2| (p - a0).dot(&axis);

    let (a_lo, a_hi) = min_max(param(a0), param(a1));
    let (b_lo, b_hi) = min_max(param(b0), param(b1));
    let overlap = a_hi.min(b_hi) - a_lo.max(b_lo);

    if overlap > TOLERANCE {
        SegmentContact::Overlap
    } else if overlap >= -TOLERANCE {
        SegmentContact::Touch
    } else {
        SegmentContact::Disjoint
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
