use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a segment in a polygon graph.
    pub struct SegmentId;
}

/// A required (constrained) edge between two graph vertices.
///
/// The pair is unordered: `{first, second}` and `{second, first}` denote the
/// same segment.
#[derive(Debug, Clone)]
pub struct SegmentData {
    /// One endpoint.
    pub first: VertexId,
    /// The other endpoint.
    pub second: VertexId,
    /// Tombstone flag for explicit removal.
    pub deleted: bool,
}

impl SegmentData {
    /// Creates a new live segment.
    #[must_use]
    pub fn new(first: VertexId, second: VertexId) -> Self {
        Self {
            first,
            second,
            deleted: false,
        }
    }

    /// Returns the endpoint opposite to `v`, or `None` if `v` is not an endpoint.
    #[must_use]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.first == v {
            Some(self.second)
        } else if self.second == v {
            Some(self.first)
        } else {
            None
        }
    }

    /// Order-independent key for this vertex pair.
    #[must_use]
    pub fn key(&self) -> (VertexId, VertexId) {
        pair_key(self.first, self.second)
    }
}

/// Normalizes an unordered vertex pair to `(min, max)`.
#[must_use]
pub fn pair_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
