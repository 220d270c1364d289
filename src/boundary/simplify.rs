//! Douglas-Peucker simplification of closed polygons.

use crate::error::{ConfigError, InputError, Result};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::Point2;

/// Simplifies a closed polygon with the Douglas-Peucker algorithm.
///
/// The loop is split at two far-apart anchor points and each half is reduced
/// independently, which avoids artifacts at the arbitrary start point. A
/// point is dropped only if it lies strictly closer than `tolerance` to the
/// chord that replaces it, so a zero tolerance keeps every point. Surviving
/// points keep their original order.
///
/// # Errors
///
/// Returns `InputError::EmptyPolyline` for an empty polygon and
/// `ConfigError::InvalidParameter` for a negative or non-finite tolerance.
pub fn simplify_closed(polygon: &[Point2], tolerance: f64) -> Result<Vec<Point2>> {
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(ConfigError::InvalidParameter {
            parameter: "simplify_tolerance",
            value: tolerance,
            reason: "must be finite and non-negative",
        }
        .into());
    }
    if polygon.is_empty() {
        return Err(InputError::EmptyPolyline.into());
    }
    let n = polygon.len();
    if n <= 3 {
        return Ok(polygon.to_vec());
    }

    let (i1, i2) = anchor_pair(polygon);
    let mut keep = vec![false; n];
    keep[i1] = true;
    keep[i2] = true;

    // First half walks i1..=i2, second half walks i2..n and wraps to ..=i1.
    let first: Vec<usize> = (i1..=i2).collect();
    let second: Vec<usize> = (i2..n).chain(0..=i1).collect();
    mark_kept(polygon, &first, tolerance, &mut keep);
    mark_kept(polygon, &second, tolerance, &mut keep);

    Ok(polygon
        .iter()
        .zip(&keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect())
}

/// Picks two far-apart points: the point furthest from the first vertex, and
/// the point furthest from that one. Returned in ascending index order.
fn anchor_pair(polygon: &[Point2]) -> (usize, usize) {
    let furthest_from = |origin: usize| -> usize {
        let o = polygon[origin];
        let mut best = origin;
        let mut best_d = 0.0;
        for (i, p) in polygon.iter().enumerate() {
            let d = (p - o).norm_squared();
            if d > best_d {
                best_d = d;
                best = i;
            }
        }
        best
    };

    let a = furthest_from(0);
    let mut b = furthest_from(a);
    if a == b {
        // Every point coincides.
        b = (a + polygon.len() / 2) % polygon.len();
    }
    (a.min(b), a.max(b))
}

/// Runs Douglas-Peucker over the open path `polygon[path[0]] .. polygon[path[last]]`,
/// setting `keep` for each retained interior point.
fn mark_kept(polygon: &[Point2], path: &[usize], tolerance: f64, keep: &mut [bool]) {
    if path.len() <= 2 {
        return;
    }
    let mut stack = vec![(0, path.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let a = polygon[path[start]];
        let b = polygon[path[end]];

        let mut max_idx = start + 1;
        let mut max_d = f64::NEG_INFINITY;
        for (k, &pi) in path.iter().enumerate().take(end).skip(start + 1) {
            let d = point_to_segment_dist(&polygon[pi], &a, &b);
            if d > max_d {
                max_d = d;
                max_idx = k;
            }
        }

        if max_d >= tolerance {
            keep[path[max_idx]] = true;
            stack.push((start, max_idx));
            stack.push((max_idx, end));
        }
    }
}
