mod reimport;
mod subdivide;

pub use reimport::Reimport;
pub use subdivide::Subdivide;

use std::collections::BTreeSet;

use crate::error::{InputError, Result};
use crate::math::Point2;

/// A planar triangle mesh in mesh-local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteMesh {
    /// Vertex positions.
    pub vertices: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
    /// UV coordinates, one per vertex once projected; empty before that.
    pub uvs: Vec<Point2>,
}

impl SpriteMesh {
    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns `true` if every vertex has a UV pair.
    #[must_use]
    pub fn has_uvs(&self) -> bool {
        !self.vertices.is_empty() && self.uvs.len() == self.vertices.len()
    }

    /// Distinct undirected triangle edges, each as `(min, max)`.
    ///
    /// Edges of degenerate triangles that repeat a vertex index are skipped.
    #[must_use]
    pub fn edges(&self) -> BTreeSet<(u32, u32)> {
        let mut edges = BTreeSet::new();
        for tri in &self.indices {
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                if a != b {
                    edges.insert((a.min(b), a.max(b)));
                }
            }
        }
        edges
    }

    /// Checks that every triangle index refers to an existing vertex.
    ///
    /// # Errors
    ///
    /// Returns `InputError::IndexOutOfRange` for the first offending index.
    pub fn validate(&self) -> Result<()> {
        let n = self.vertices.len();
        for (t, tri) in self.indices.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&i| i as usize >= n) {
                return Err(InputError::IndexOutOfRange {
                    triangle: t,
                    index: bad,
                    vertex_count: n,
                }
                .into());
            }
        }
        Ok(())
    }
}
