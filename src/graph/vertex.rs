use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a polygon graph.
    pub struct VertexId;
}

/// Data associated with a graph vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Position in editing space.
    pub position: Point2,
    /// Tombstone flag. Set on removal; the slot is only freed by `purge`.
    pub deleted: bool,
}

impl VertexData {
    /// Creates a new live vertex at the given position.
    #[must_use]
    pub fn new(position: Point2) -> Self {
        Self {
            position,
            deleted: false,
        }
    }
}
