use crate::error::{InputError, Result};
use crate::math::{Aabb2, Point2, TOLERANCE};

/// Stretches `points` so their bounding box matches `target`.
///
/// X and Y are scaled independently, then the result is recentered on the
/// target's center.
///
/// # Errors
///
/// Returns `InputError::DegenerateTrace` if the points are empty or their
/// bounding box has zero width or height.
pub fn fit_to_bounds(points: &[Point2], target: &Aabb2) -> Result<Vec<Point2>> {
    let bb = Aabb2::from_points(points)
        .ok_or_else(|| InputError::DegenerateTrace("no points to fit".into()))?;
    let size = bb.size();
    if size.x < TOLERANCE || size.y < TOLERANCE {
        return Err(InputError::DegenerateTrace(format!(
            "traced outline has zero extent ({} x {})",
            size.x, size.y
        ))
        .into());
    }

    let target_size = target.size();
    let sx = target_size.x / size.x;
    let sy = target_size.y / size.y;
    let from = bb.center();
    let to = target.center();

    Ok(points
        .iter()
        .map(|p| Point2::new(to.x + (p.x - from.x) * sx, to.y + (p.y - from.y) * sy))
        .collect())
}
