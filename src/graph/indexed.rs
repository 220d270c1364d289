use crate::math::Point2;

use super::VertexId;

/// A contiguously indexed snapshot of a [`PolygonGraph`](super::PolygonGraph).
///
/// Indices are only meaningful for the graph state the snapshot was taken
/// from; any structural edit to the graph invalidates them.
#[derive(Debug, Clone, Default)]
pub struct IndexedGraph {
    /// Vertex positions, in live insertion order.
    pub points: Vec<Point2>,
    /// The graph vertex each point was taken from (`ids[i]` ↔ `points[i]`).
    pub ids: Vec<VertexId>,
    /// Live segments as pairs of indices into `points`.
    pub segments: Vec<[usize; 2]>,
    /// Hole seed points.
    pub holes: Vec<Point2>,
}

impl IndexedGraph {
    /// Returns `true` if the snapshot contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the index assigned to `id`, if it was live when the snapshot was taken.
    #[must_use]
    pub fn index_of(&self, id: VertexId) -> Option<usize> {
        self.ids.iter().position(|&v| v == id)
    }
}
