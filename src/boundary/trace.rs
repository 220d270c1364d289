//! Marching squares silhouette tracing.
//!
//! Samples sit at pixel centers, so pixel `(x, y)` is sampled at
//! `(x + 0.5, y + 0.5)`. Everything outside the mask is treated as
//! transparent, which closes every contour.

use std::collections::HashMap;

use crate::error::{InputError, Result};
use crate::math::polygon_2d::{make_counter_clockwise, signed_area_2d};
use crate::math::Point2;

use super::AlphaMask;

/// Edge segment within a cell, in cell-local coordinates `[0, 1]`.
type CellSegment = ((f64, f64), (f64, f64));

/// Marching squares lookup table.
///
/// Corner bits: 1 = top-left, 2 = top-right, 4 = bottom-left, 8 = bottom-right.
/// Saddle cases (6 and 9) keep the opaque diagonal connected.
const EDGE_TABLE: [&[CellSegment]; 16] = [
    &[],
    &[((0.0, 0.5), (0.5, 1.0))],
    &[((0.5, 1.0), (1.0, 0.5))],
    &[((0.0, 0.5), (1.0, 0.5))],
    &[((0.5, 0.0), (0.0, 0.5))],
    &[((0.5, 0.0), (0.5, 1.0))],
    &[((0.0, 0.5), (0.5, 1.0)), ((0.5, 0.0), (1.0, 0.5))],
    &[((0.5, 0.0), (1.0, 0.5))],
    &[((1.0, 0.5), (0.5, 0.0))],
    &[((0.0, 0.5), (0.5, 0.0)), ((0.5, 1.0), (1.0, 0.5))],
    &[((0.5, 1.0), (0.5, 0.0))],
    &[((0.0, 0.5), (0.5, 0.0))],
    &[((1.0, 0.5), (0.0, 0.5))],
    &[((0.5, 1.0), (1.0, 0.5))],
    &[((0.0, 0.5), (0.5, 1.0))],
    &[],
];

/// Extracts every closed contour of the mask, in pixel coordinates.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
pub fn trace_contours<M: AlphaMask + ?Sized>(mask: &M) -> Vec<Vec<Point2>> {
    let w = mask.width() as isize;
    let h = mask.height() as isize;
    let sample = |x: isize, y: isize| -> bool {
        x >= 0 && y >= 0 && x < w && y < h && mask.opaque(x.unsigned_abs(), y.unsigned_abs())
    };

    let mut segments: Vec<(Point2, Point2)> = Vec::new();
    for cy in -1..h {
        for cx in -1..w {
            let bl = sample(cx, cy);
            let br = sample(cx + 1, cy);
            let tl = sample(cx, cy + 1);
            let tr = sample(cx + 1, cy + 1);
            let case = usize::from(tl)
                | (usize::from(tr) << 1)
                | (usize::from(bl) << 2)
                | (usize::from(br) << 3);

            let ox = cx as f64 + 0.5;
            let oy = cy as f64 + 0.5;
            for &((x1, y1), (x2, y2)) in EDGE_TABLE[case] {
                segments.push((
                    Point2::new(ox + x1, oy + y1),
                    Point2::new(ox + x2, oy + y2),
                ));
            }
        }
    }

    connect_segments(&segments)
}

/// Traces the outer silhouette: the contour enclosing the largest area,
/// oriented counter-clockwise.
///
/// # Errors
///
/// Returns `InputError::DegenerateTrace` if the mask has no opaque pixel.
pub fn trace_outer_boundary<M: AlphaMask + ?Sized>(mask: &M) -> Result<Vec<Point2>> {
    let contours = trace_contours(mask);
    let count = contours.len();
    let mut outer = contours
        .into_iter()
        .max_by(|a, b| signed_area_2d(a).abs().total_cmp(&signed_area_2d(b).abs()))
        .ok_or_else(|| {
            InputError::DegenerateTrace(format!(
                "no opaque pixels in {}x{} mask",
                mask.width(),
                mask.height()
            ))
        })?;
    make_counter_clockwise(&mut outer);
    tracing::debug!(contours = count, points = outer.len(), "traced outer boundary");
    Ok(outer)
}

/// Exact key for a half-pixel lattice point.
#[allow(clippy::cast_possible_truncation)]
fn grid_key(p: &Point2) -> (i64, i64) {
    ((p.x * 2.0).round() as i64, (p.y * 2.0).round() as i64)
}

/// Chains cell segments into closed loops by matching endpoints.
fn connect_segments(segments: &[(Point2, Point2)]) -> Vec<Vec<Point2>> {
    let mut adjacency: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, (start, end)) in segments.iter().enumerate() {
        adjacency.entry(grid_key(start)).or_default().push(i);
        adjacency.entry(grid_key(end)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut loops = Vec::new();

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;
        let (first, mut cursor) = segments[start_idx];
        let mut polyline = vec![first];

        loop {
            let key = grid_key(&cursor);
            if key == grid_key(&first) {
                break;
            }
            polyline.push(cursor);
            let next = adjacency
                .get(&key)
                .and_then(|cands| cands.iter().copied().find(|&i| !used[i]));
            let Some(idx) = next else {
                break;
            };
            used[idx] = true;
            let (a, b) = segments[idx];
            cursor = if grid_key(&a) == key { b } else { a };
        }

        if polyline.len() >= 3 {
            loops.push(polyline);
        }
    }

    loops
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::boundary::AlphaBitmap;

    #[test]
    fn empty_mask_has_no_contours() {
        let bmp = AlphaBitmap::from_fn(4, 4, |_, _| false);
        assert!(trace_contours(&bmp).is_empty());
        assert!(trace_outer_boundary(&bmp).is_err());
    }

    #[test]
    fn single_pixel_is_a_diamond() {
        let bmp = AlphaBitmap::from_fn(3, 3, |x, y| x == 1 && y == 1);
        let contours = trace_contours(&bmp);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        assert!((signed_area_2d(&contours[0]).abs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn full_mask_spans_to_the_edges() {
        let bmp = AlphaBitmap::from_fn(4, 3, |_, _| true);
        let outer = trace_outer_boundary(&bmp).unwrap();
        let xs = outer.iter().map(|p| p.x);
        let ys = outer.iter().map(|p| p.y);
        assert!((xs.clone().fold(f64::INFINITY, f64::min)).abs() < 1e-12);
        assert!((xs.fold(f64::NEG_INFINITY, f64::max) - 4.0).abs() < 1e-12);
        assert!((ys.fold(f64::NEG_INFINITY, f64::max) - 3.0).abs() < 1e-12);
        assert!(signed_area_2d(&outer) > 0.0);
    }

    #[test]
    fn outer_boundary_prefers_largest_island() {
        let bmp = AlphaBitmap::from_fn(12, 6, |x, y| {
            (1..3).contains(&x) && (1..3).contains(&y) || (5..11).contains(&x) && (1..5).contains(&y)
        });
        assert_eq!(trace_contours(&bmp).len(), 2);
        let outer = trace_outer_boundary(&bmp).unwrap();
        assert!(outer.iter().all(|p| p.x > 4.0));
    }

    #[test]
    fn ring_yields_outer_and_inner_contours() {
        let bmp = AlphaBitmap::from_fn(7, 7, |x, y| {
            let inside = (1..6).contains(&x) && (1..6).contains(&y);
            let hole = (3..4).contains(&x) && (3..4).contains(&y);
            inside && !hole
        });
        let contours = trace_contours(&bmp);
        assert_eq!(contours.len(), 2);
        let outer = trace_outer_boundary(&bmp).unwrap();
        assert!(signed_area_2d(&outer) > 10.0);
    }
}
