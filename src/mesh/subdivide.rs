use std::collections::HashMap;

use crate::error::{InputError, Result};
use crate::math::Point2;

use super::SpriteMesh;

/// Uniformly refines a triangle mesh.
///
/// Every edge is split into `factor` equal parts and every triangle into
/// `factor²` triangles of the same winding. Points on shared edges are shared
/// between the adjacent triangles, and the original vertices keep their
/// indices at the front of the vertex list. The result carries no UVs.
pub struct Subdivide {
    factor: usize,
}

/// Identifies a generated vertex so that neighbours reuse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GridKey {
    /// A point on the edge `lo`–`hi`, `step` parts away from `lo`.
    Edge { lo: u32, hi: u32, step: usize },
    /// A point strictly inside triangle `tri`.
    Interior { tri: usize, i: usize, j: usize },
}

impl Subdivide {
    /// Creates a new `Subdivide` operation.
    #[must_use]
    pub fn new(factor: usize) -> Self {
        Self { factor }
    }

    /// Executes the subdivision, returning a new mesh.
    ///
    /// # Errors
    ///
    /// Returns `InputError::ZeroSubdivision` for a zero factor, or
    /// `InputError::IndexOutOfRange` if the mesh references missing vertices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, mesh: &SpriteMesh) -> Result<SpriteMesh> {
        if self.factor == 0 {
            return Err(InputError::ZeroSubdivision(self.factor).into());
        }
        mesh.validate()?;

        let n = self.factor;
        let mut out = SpriteMesh {
            vertices: mesh.vertices.clone(),
            indices: Vec::with_capacity(mesh.indices.len() * n * n),
            uvs: Vec::new(),
        };
        let mut generated: HashMap<GridKey, u32> = HashMap::new();

        for (t, tri) in mesh.indices.iter().enumerate() {
            // Grid point (i, j) has barycentric weights (n - i - j, i, j) on (a, b, c).
            let mut grid = |i: usize, j: usize| -> u32 {
                let weights = [(tri[0], n - i - j), (tri[1], i), (tri[2], j)];
                grid_vertex(&mut out.vertices, &mut generated, t, i, j, n, weights)
            };

            for i in 0..n {
                for j in 0..n - i {
                    let p00 = grid(i, j);
                    let p10 = grid(i + 1, j);
                    let p01 = grid(i, j + 1);
                    out.indices.push([p00, p10, p01]);
                    if j + 1 < n - i {
                        let p11 = grid(i + 1, j + 1);
                        out.indices.push([p10, p11, p01]);
                    }
                }
            }
        }

        tracing::debug!(
            factor = n,
            triangles_in = mesh.indices.len(),
            triangles_out = out.indices.len(),
            vertices_out = out.vertices.len(),
            "subdivided mesh"
        );
        Ok(out)
    }
}

/// Returns the vertex index for a grid point, creating it on first use.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn grid_vertex(
    vertices: &mut Vec<Point2>,
    generated: &mut HashMap<GridKey, u32>,
    tri: usize,
    i: usize,
    j: usize,
    n: usize,
    weights: [(u32, usize); 3],
) -> u32 {
    // Merge weights of repeated indices and drop zero weights, in index order,
    // so that both triangles sharing an edge compute bit-identical positions.
    let mut terms: Vec<(u32, usize)> = Vec::with_capacity(3);
    let mut sorted = weights;
    sorted.sort_unstable_by_key(|&(v, _)| v);
    for (v, w) in sorted {
        if w == 0 {
            continue;
        }
        match terms.last_mut() {
            Some(last) if last.0 == v => last.1 += w,
            _ => terms.push((v, w)),
        }
    }

    let key = match terms.as_slice() {
        [(v, _)] => return *v,
        [(lo, _), (hi, w_hi)] => GridKey::Edge {
            lo: *lo,
            hi: *hi,
            step: *w_hi,
        },
        _ => GridKey::Interior { tri, i, j },
    };

    *generated.entry(key).or_insert_with(|| {
        let inv = 1.0 / n as f64;
        let mut pos = Point2::origin();
        for &(v, w) in &terms {
            pos += vertices[v as usize].coords * (w as f64 * inv);
        }
        vertices.push(pos);
        (vertices.len() - 1) as u32
    })
}
