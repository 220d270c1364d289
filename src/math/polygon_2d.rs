use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Reverses `points` in place if the polygon winds clockwise.
pub fn make_counter_clockwise(points: &mut [Point2]) {
    if signed_area_2d(points) < -TOLERANCE {
        points.reverse();
    }
}

/// Returns the signed area of triangle `a, b, c`.
#[must_use]
pub fn triangle_area_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    super::intersect_2d::orient_2d(a, b, c) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_ccw() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        let area = signed_area_2d(&unit_square_ccw());
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square_ccw();
        pts.reverse();
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn clockwise_polygon_is_reversed() {
        let mut pts = unit_square_ccw();
        pts.reverse();
        make_counter_clockwise(&mut pts);
        assert!(signed_area_2d(&pts) > 0.0);
    }

    #[test]
    fn triangle_area_half_unit() {
        let a = triangle_area_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
        );
        assert!((a - 0.5).abs() < TOLERANCE);
    }
}
