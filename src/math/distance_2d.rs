use super::Point2;

/// Returns the minimum distance from point `p` to the line segment `a`–`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    point_to_segment_dist_sq(p, a, b).sqrt()
}

/// Squared variant of [`point_to_segment_dist`].
#[must_use]
pub fn point_to_segment_dist_sq(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm_squared();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let closest = a + d * t;

    (p - closest).norm_squared()
}

/// Returns the Euclidean distance between two points.
#[must_use]
pub fn point_dist(a: &Point2, b: &Point2) -> f64 {
    nalgebra::distance(a, b)
}
