use crate::math::intersect_2d::{segment_contact_2d, SegmentContact};
use crate::math::{Point2, TOLERANCE};

/// Returns the first pair of point indices whose positions coincide within
/// [`TOLERANCE`].
#[must_use]
pub fn find_duplicate_points(points: &[Point2]) -> Option<(usize, usize)> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .x
            .total_cmp(&points[b].x)
            .then(points[a].y.total_cmp(&points[b].y))
    });

    for (k, &i) in order.iter().enumerate() {
        for &j in &order[k + 1..] {
            if points[j].x - points[i].x > TOLERANCE {
                break;
            }
            if (points[j].y - points[i].y).abs() <= TOLERANCE {
                return Some((i.min(j), i.max(j)));
            }
        }
    }
    None
}

/// Returns the first pair of segment indices whose segments cross or overlap,
/// together with the kind of contact.
///
/// Segments that merely share an endpoint, or where one ends on the other,
/// are not reported.
#[must_use]
pub fn find_crossing_segments(
    points: &[Point2],
    segments: &[[usize; 2]],
) -> Option<(usize, usize, SegmentContact)> {
    let boxes: Vec<(Point2, Point2)> = segments
        .iter()
        .map(|&[a, b]| {
            let (p, q) = (points[a], points[b]);
            (
                Point2::new(p.x.min(q.x), p.y.min(q.y)),
                Point2::new(p.x.max(q.x), p.y.max(q.y)),
            )
        })
        .collect();

    for i in 0..segments.len() {
        for j in i + 1..segments.len() {
            let (lo_i, hi_i) = boxes[i];
            let (lo_j, hi_j) = boxes[j];
            if lo_i.x > hi_j.x + TOLERANCE
                || lo_j.x > hi_i.x + TOLERANCE
                || lo_i.y > hi_j.y + TOLERANCE
                || lo_j.y > hi_i.y + TOLERANCE
            {
                continue;
            }
            let [a0, a1] = segments[i];
            let [b0, b1] = segments[j];
            let contact =
                segment_contact_2d(&points[a0], &points[a1], &points[b0], &points[b1]);
            if contact.is_conflict() {
                return Some((i, j, contact));
            }
        }
    }
    None
}
