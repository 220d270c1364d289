use crate::error::Result;
use crate::graph::{PolygonGraph, VertexId};
use crate::math::AffineMapping;

use super::SpriteMesh;

/// Rebuilds an editable [`PolygonGraph`] from a triangle mesh.
///
/// This is the inverse of triangulation: every mesh vertex becomes a graph
/// vertex (mapped back into editing space) and every distinct triangle edge
/// becomes a segment. Hole seeds are not recoverable from triangles, so the
/// new graph has none.
pub struct Reimport<'a> {
    mapping: &'a dyn AffineMapping,
}

impl<'a> Reimport<'a> {
    /// Creates a new `Reimport` operation.
    #[must_use]
    pub fn new(mapping: &'a dyn AffineMapping) -> Self {
        Self { mapping }
    }

    /// Executes the re-import.
    ///
    /// # Errors
    ///
    /// Returns `InputError::IndexOutOfRange` if a triangle references a
    /// missing vertex.
    pub fn execute(&self, mesh: &SpriteMesh) -> Result<PolygonGraph> {
        mesh.validate()?;

        let mut graph = PolygonGraph::new();
        let ids: Vec<VertexId> = mesh
            .vertices
            .iter()
            .map(|v| graph.add_vertex(self.mapping.to_world_space(v)))
            .collect();

        for tri in &mesh.indices {
            for k in 0..3 {
                let a = tri[k] as usize;
                let b = tri[(k + 1) % 3] as usize;
                if a != b {
                    graph.add_segment(ids[a], ids[b])?;
                }
            }
        }

        tracing::debug!(
            vertices = graph.vertex_count(),
            segments = graph.segment_count(),
            "re-imported mesh into polygon graph"
        );
        Ok(graph)
    }
}
