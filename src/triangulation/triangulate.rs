use std::collections::HashMap;

use spade::{AngleLimit, InsertionError, Point2 as SpadePoint2, RefinementParameters, Triangulation};

use crate::error::{InputError, Result, TriangulationError};
use crate::graph::IndexedGraph;
use crate::math::intersect_2d::SegmentContact;
use crate::math::polygon_2d::triangle_area_2d;
use crate::math::{AffineMapping, Point2};
use crate::mesh::SpriteMesh;

use super::classify::{excluded_faces, Cdt};
use super::validate::{find_crossing_segments, find_duplicate_points};
use super::{TriangulationParams, Winding};

const OPERATION: &str = "triangulate";

/// Triangulates an indexed polygon graph under its segment constraints.
///
/// Every segment appears in the output either as a triangle edge or as a
/// chain of collinear sub-edges through vertices lying on it. Regions
/// reachable from a hole seed, and (when the graph has segments) regions
/// outside the constrained boundary, are left out.
pub struct Triangulate {
    params: TriangulationParams,
}

impl Triangulate {
    /// Creates a new `Triangulate` operation.
    #[must_use]
    pub fn new(params: TriangulationParams) -> Self {
        Self { params }
    }

    /// Executes the triangulation.
    ///
    /// Output vertices are the input points in index order, mapped into
    /// mesh-local space, followed by any Steiner points used by the kept
    /// triangles. No UVs are computed.
    ///
    /// # Errors
    ///
    /// Returns `TriangulationError::Topology` if two points coincide or two
    /// segments cross, and `TriangulationError::Failed` if the input holds
    /// non-finite coordinates or out-of-range segment indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, graph: &IndexedGraph, mapping: &dyn AffineMapping) -> Result<SpriteMesh> {
        if graph.is_empty() {
            return Ok(SpriteMesh::default());
        }
        check_topology(graph)?;

        let mut cdt = Cdt::new();
        let mut handles = Vec::with_capacity(graph.points.len());
        for p in &graph.points {
            let h = cdt
                .insert(SpadePoint2::new(p.x, p.y))
                .map_err(|e: InsertionError| TriangulationError::Failed {
                    operation: OPERATION,
                    reason: format!("vertex ({}, {}) rejected: {e}", p.x, p.y),
                })?;
            handles.push(h);
        }
        if cdt.num_vertices() != graph.points.len() {
            return Err(topology("two vertices share a position".into()).into());
        }

        for (s, &[a, b]) in graph.segments.iter().enumerate() {
            if !cdt.can_add_constraint(handles[a], handles[b]) {
                return Err(topology(format!(
                    "segment {s} ({a}-{b}) intersects another segment; remove or split intersecting edges"
                ))
                .into());
            }
            cdt.add_constraint(handles[a], handles[b]);
        }

        let carve_exterior = !graph.segments.is_empty();
        if let Some(settings) = self.params.refinement {
            let mut refinement = RefinementParameters::<f64>::new()
                .with_angle_limit(AngleLimit::from_deg(settings.min_angle_deg))
                .with_max_additional_vertices(settings.max_additional_vertices)
                .exclude_outer_faces(carve_exterior);
            if let Some(area) = settings.max_area {
                refinement = refinement.with_max_allowed_area(area);
            }
            let result = cdt.refine(refinement);
            tracing::debug!(
                complete = result.refinement_complete,
                vertices = cdt.num_vertices(),
                "refined triangulation"
            );
        }

        let excluded = excluded_faces(&cdt, &graph.holes, carve_exterior);

        let mut mesh = SpriteMesh {
            vertices: graph.points.iter().map(|p| mapping.to_mesh_space(p)).collect(),
            indices: Vec::new(),
            uvs: Vec::new(),
        };
        let mut vertex_map: HashMap<usize, u32> = handles
            .iter()
            .enumerate()
            .map(|(i, h)| (h.index(), i as u32))
            .collect();

        for face in cdt.inner_faces() {
            if excluded.contains(&face.fix().index()) {
                continue;
            }
            let mut tri = [0u32; 3];
            for (k, vh) in face.vertices().iter().enumerate() {
                let idx = vh.fix().index();
                tri[k] = *vertex_map.entry(idx).or_insert_with(|| {
                    let pos = vh.position();
                    mesh.vertices.push(mapping.to_mesh_space(&Point2::new(pos.x, pos.y)));
                    (mesh.vertices.len() - 1) as u32
                });
            }
            orient(&mut tri, &mesh.vertices, self.params.winding);
            mesh.indices.push(tri);
        }

        tracing::debug!(
            points = graph.points.len(),
            segments = graph.segments.len(),
            holes = graph.holes.len(),
            vertices = mesh.vertices.len(),
            triangles = mesh.indices.len(),
            "triangulated polygon graph"
        );
        Ok(mesh)
    }
}

fn topology(cause: String) -> TriangulationError {
    TriangulationError::Topology {
        operation: OPERATION,
        cause,
    }
}

/// Rejects inputs the constrained triangulation cannot represent.
fn check_topology(graph: &IndexedGraph) -> Result<()> {
    let n = graph.points.len();
    for (s, &[a, b]) in graph.segments.iter().enumerate() {
        if a >= n || b >= n {
            return Err(TriangulationError::Failed {
                operation: OPERATION,
                reason: format!("segment {s} references point {} of {n}", a.max(b)),
            }
            .into());
        }
        if a == b {
            return Err(InputError::SelfReferentialSegment.into());
        }
    }

    if let Some((i, j)) = find_duplicate_points(&graph.points) {
        let err = topology(format!(
            "points {i} and {j} share position ({}, {})",
            graph.points[i].x, graph.points[i].y
        ));
        tracing::warn!(%err, "rejected graph");
        return Err(err.into());
    }

    if let Some((s, t, contact)) = find_crossing_segments(&graph.points, &graph.segments) {
        let [a0, a1] = graph.segments[s];
        let [b0, b1] = graph.segments[t];
        let err = topology(format!(
            "segments {a0}-{a1} and {b0}-{b1} {} (likely intersecting edges; remove or split them)",
            if contact == SegmentContact::Overlap {
                "overlap"
            } else {
                "cross"
            }
        ));
        tracing::warn!(%err, "rejected graph");
        return Err(err.into());
    }
    Ok(())
}

/// Reorders `tri` so it winds as requested in mesh-local space.
fn orient(tri: &mut [u32; 3], vertices: &[Point2], winding: Winding) {
    let area = triangle_area_2d(
        &vertices[tri[0] as usize],
        &vertices[tri[1] as usize],
        &vertices[tri[2] as usize],
    );
    let ccw = area >= 0.0;
    if ccw != (winding == Winding::CounterClockwise) {
        tri.swap(1, 2);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SpriteMeshError;
    use crate::graph::PolygonGraph;
    use crate::math::{SpriteTransform, Vector2};
    use crate::triangulation::RefinementSettings;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn identity() -> SpriteTransform {
        SpriteTransform::identity()
    }

    fn loop_graph(points: &[Point2]) -> IndexedGraph {
        PolygonGraph::from_closed_loop(points).unwrap().reindex()
    }

    fn centroid(mesh: &SpriteMesh, tri: &[u32; 3]) -> Point2 {
        let a = mesh.vertices[tri[0] as usize];
        let b = mesh.vertices[tri[1] as usize];
        let c = mesh.vertices[tri[2] as usize];
        p((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    fn total_area(mesh: &SpriteMesh) -> f64 {
        mesh.indices
            .iter()
            .map(|t| {
                triangle_area_2d(
                    &mesh.vertices[t[0] as usize],
                    &mesh.vertices[t[1] as usize],
                    &mesh.vertices[t[2] as usize],
                )
                .abs()
            })
            .sum()
    }

    #[test]
    fn empty_graph_gives_empty_mesh() {
        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&IndexedGraph::default(), &identity())
            .unwrap();
        assert!(mesh.vertices.is_empty());
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn triangle_produces_1_triangle() {
        let g = loop_graph(&[p(0.0, 0.0), p(4.0, 0.0), p(2.0, 3.0)]);
        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&g, &identity())
            .unwrap();
        assert_eq!(mesh.indices.len(), 1);
        assert_eq!(mesh.vertices.len(), 3);
        assert!(mesh.uvs.is_empty());
    }

    #[test]
    fn l_shape_concave_tessellates() {
        let g = loop_graph(&[
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 4.0),
            p(0.0, 4.0),
        ]);
        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&g, &identity())
            .unwrap();
        // The notch (2..4, 2..4) lies outside the loop and must be carved away.
        assert_eq!(mesh.indices.len(), 4);
        assert_relative_eq!(total_area(&mesh), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn points_without_segments_fill_convex_hull() {
        let g = IndexedGraph {
            points: vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(1.0, 1.0)],
            ..IndexedGraph::default()
        };
        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&g, &identity())
            .unwrap();
        assert_eq!(mesh.indices.len(), 4);
        assert_relative_eq!(total_area(&mesh), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn hole_seed_excludes_enclosed_region() {
        let mut graph = PolygonGraph::from_closed_loop(&[
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
        ])
        .unwrap();
        let inner: Vec<_> = [p(3.0, 3.0), p(7.0, 3.0), p(7.0, 7.0), p(3.0, 7.0)]
            .iter()
            .map(|&q| graph.add_vertex(q))
            .collect();
        for i in 0..4 {
            graph.add_segment(inner[i], inner[(i + 1) % 4]).unwrap();
        }
        graph.add_or_toggle_hole(p(5.0, 5.0), 0.1);

        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&graph.reindex(), &identity())
            .unwrap();
        for tri in &mesh.indices {
            let c = centroid(&mesh, tri);
            let in_hole = c.x > 3.0 && c.x < 7.0 && c.y > 3.0 && c.y < 7.0;
            assert!(!in_hole, "triangle centroid ({}, {}) is inside the hole", c.x, c.y);
        }
        assert_relative_eq!(total_area(&mesh), 100.0 - 16.0, epsilon = 1e-9);
    }

    #[test]
    fn inner_loop_without_hole_is_kept() {
        let mut graph = PolygonGraph::from_closed_loop(&[
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
        ])
        .unwrap();
        let inner: Vec<_> = [p(3.0, 3.0), p(7.0, 3.0), p(7.0, 7.0), p(3.0, 7.0)]
            .iter()
            .map(|&q| graph.add_vertex(q))
            .collect();
        for i in 0..4 {
            graph.add_segment(inner[i], inner[(i + 1) % 4]).unwrap();
        }
        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&graph.reindex(), &identity())
            .unwrap();
        assert_relative_eq!(total_area(&mesh), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn crossing_segments_are_topology_error() {
        let g = IndexedGraph {
            points: vec![p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(1.0, 0.0)],
            segments: vec![[0, 1], [2, 3]],
            ..IndexedGraph::default()
        };
        let err = Triangulate::new(TriangulationParams::default())
            .execute(&g, &identity())
            .unwrap_err();
        match err {
            SpriteMeshError::Triangulation(TriangulationError::Topology { operation, cause }) => {
                assert_eq!(operation, "triangulate");
                assert!(cause.contains("intersecting"), "cause: {cause}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_positions_are_topology_error() {
        let g = IndexedGraph {
            points: vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 0.0)],
            ..IndexedGraph::default()
        };
        let err = Triangulate::new(TriangulationParams::default())
            .execute(&g, &identity())
            .unwrap_err();
        assert!(matches!(
            err,
            SpriteMeshError::Triangulation(TriangulationError::Topology { .. })
        ));
    }

    #[test]
    fn non_finite_point_fails() {
        let g = IndexedGraph {
            points: vec![p(0.0, 0.0), p(f64::NAN, 0.0), p(0.0, 1.0)],
            ..IndexedGraph::default()
        };
        assert!(Triangulate::new(TriangulationParams::default())
            .execute(&g, &identity())
            .is_err());
    }

    #[test]
    fn vertex_on_segment_splits_constraint() {
        // Point 4 lies on the bottom edge 0-1; the edge becomes two sub-edges.
        let g = IndexedGraph {
            points: vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0), p(2.0, 0.0)],
            segments: vec![[0, 1], [1, 2], [2, 3], [3, 0]],
            ..IndexedGraph::default()
        };
        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&g, &identity())
            .unwrap();
        let edges = mesh.edges();
        assert!(edges.contains(&(0, 4)));
        assert!(edges.contains(&(1, 4)));
        assert!(!edges.contains(&(0, 1)));
        assert_relative_eq!(total_area(&mesh), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn winding_follows_params() {
        let g = loop_graph(&[p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]);
        for winding in [Winding::CounterClockwise, Winding::Clockwise] {
            let params = TriangulationParams {
                winding,
                ..TriangulationParams::default()
            };
            let mesh = Triangulate::new(params).execute(&g, &identity()).unwrap();
            for t in &mesh.indices {
                let a = triangle_area_2d(
                    &mesh.vertices[t[0] as usize],
                    &mesh.vertices[t[1] as usize],
                    &mesh.vertices[t[2] as usize],
                );
                assert_eq!(a > 0.0, winding == Winding::CounterClockwise);
            }
        }
    }

    #[test]
    fn output_is_in_mesh_space() {
        let g = loop_graph(&[p(10.0, 10.0), p(14.0, 10.0), p(12.0, 13.0)]);
        let t = SpriteTransform::from_trs(Vector2::new(10.0, 10.0), 0.0, Vector2::new(1.0, 1.0))
            .unwrap();
        let mesh = Triangulate::new(TriangulationParams::default())
            .execute(&g, &t)
            .unwrap();
        assert_relative_eq!(mesh.vertices[0], p(0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[2], p(2.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn refinement_adds_steiner_points_inside() {
        let g = loop_graph(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)]);
        let params = TriangulationParams {
            refinement: Some(RefinementSettings {
                max_area: Some(2.0),
                ..RefinementSettings::default()
            }),
            ..TriangulationParams::default()
        };
        let mesh = Triangulate::new(params).execute(&g, &identity()).unwrap();
        assert!(mesh.vertices.len() > 4);
        assert!(mesh.indices.len() > 2);
        assert_relative_eq!(total_area(&mesh), 100.0, epsilon = 1e-6);
        for v in &mesh.vertices {
            assert!(v.x >= -1e-9 && v.x <= 10.0 + 1e-9 && v.y >= -1e-9 && v.y <= 10.0 + 1e-9);
        }
    }
}
