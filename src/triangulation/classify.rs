use std::collections::{HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint2, PositionInTriangulation, Triangulation};

use crate::math::Point2;

pub(super) type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Collects the inner faces that must not appear in the output mesh.
///
/// A face is excluded when it can be reached without crossing a constraint
/// edge either from the convex hull (only when `carve_exterior` is set) or
/// from the face containing a hole seed.
pub(super) fn excluded_faces(cdt: &Cdt, holes: &[Point2], carve_exterior: bool) -> HashSet<usize> {
    let mut excluded = HashSet::new();
    let mut queue: VecDeque<FixedFaceHandle<InnerTag>> = VecDeque::new();

    if carve_exterior {
        let outer_fix = cdt.outer_face().fix();
        for edge in cdt.directed_edges() {
            if edge.face().fix() != outer_fix || cdt.is_constraint_edge(edge.as_undirected().fix()) {
                continue;
            }
            if let Some(inner) = edge.rev().face().as_inner() {
                seed(inner.fix(), &mut excluded, &mut queue);
            }
        }
    }

    for hole in holes {
        match cdt.locate(SpadePoint2::new(hole.x, hole.y)) {
            PositionInTriangulation::OnFace(face) => seed(face, &mut excluded, &mut queue),
            PositionInTriangulation::OnEdge(edge) => {
                let edge = cdt.directed_edge(edge);
                for side in [edge, edge.rev()] {
                    if let Some(inner) = side.face().as_inner() {
                        seed(inner.fix(), &mut excluded, &mut queue);
                    }
                }
            }
            PositionInTriangulation::OnVertex(_) => {
                tracing::warn!(x = hole.x, y = hole.y, "hole seed sits on a vertex; ignored");
            }
            PositionInTriangulation::OutsideOfConvexHull(_)
            | PositionInTriangulation::NoTriangulation => {}
        }
    }

    // Flood fill across unconstrained edges.
    while let Some(face_fix) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                continue;
            }
            if let Some(neighbor) = edge.rev().face().as_inner() {
                seed(neighbor.fix(), &mut excluded, &mut queue);
            }
        }
    }

    excluded
}

fn seed(
    face: FixedFaceHandle<InnerTag>,
    excluded: &mut HashSet<usize>,
    queue: &mut VecDeque<FixedFaceHandle<InnerTag>>,
) {
    if excluded.insert(face.index()) {
        queue.push_back(face);
    }
}
