pub mod indexed;
pub mod segment;
pub mod vertex;

pub use indexed::IndexedGraph;
pub use segment::{pair_key, SegmentData, SegmentId};
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{GraphError, InputError, Result};
use crate::math::distance_2d::{point_dist, point_to_segment_dist};
use crate::math::Point2;

/// Outcome of [`PolygonGraph::add_or_toggle_hole`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoleToggle {
    /// A new hole was placed at the query point.
    Added,
    /// An existing hole near the query point was removed.
    Removed(Point2),
}

/// Editable planar graph of vertices, required segments and hole seeds.
///
/// Vertices and segments live in generational arenas. Removal sets a
/// tombstone and drops the entity from the live sequence, but keeps the slot
/// so that stale [`VertexId`]s and [`SegmentId`]s held elsewhere still report
/// as deleted. A segment whose endpoint is deleted is itself deleted, without
/// any eager cascade.
#[derive(Debug, Clone, Default)]
pub struct PolygonGraph {
    vertices: SlotMap<VertexId, VertexData>,
    segments: SlotMap<SegmentId, SegmentData>,
    live_vertices: Vec<VertexId>,
    live_segments: Vec<SegmentId>,
    pair_index: HashMap<(VertexId, VertexId), SegmentId>,
    holes: Vec<Point2>,
}

impl PolygonGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a single closed loop through `points`, in order.
    ///
    /// # Errors
    ///
    /// Returns `InputError::DegenerateTrace` if fewer than 3 points are given.
    pub fn from_closed_loop(points: &[Point2]) -> Result<Self> {
        if points.len() < 3 {
            return Err(InputError::DegenerateTrace(format!(
                "a closed loop needs at least 3 points, got {}",
                points.len()
            ))
            .into());
        }
        let mut graph = Self::new();
        let ids: Vec<VertexId> = points.iter().map(|&p| graph.add_vertex(p)).collect();
        for i in 0..ids.len() {
            graph.add_segment(ids[i], ids[(i + 1) % ids.len()])?;
        }
        Ok(graph)
    }

    // --- Vertex operations ---

    /// Appends a new live vertex and returns its ID.
    pub fn add_vertex(&mut self, position: Point2) -> VertexId {
        let id = self.vertices.insert(VertexData::new(position));
        self.live_vertices.push(id);
        id
    }

    /// Tombstones a vertex and removes it from the live sequence.
    ///
    /// Segments attached to it become deleted implicitly. Returns `false` if
    /// the vertex was already deleted or never existed.
    pub fn remove_vertex(&mut self, id: VertexId) -> bool {
        match self.vertices.get_mut(id) {
            Some(v) if !v.deleted => {
                v.deleted = true;
                self.live_vertices.retain(|&l| l != id);
                true
            }
            _ => false,
        }
    }

    /// Returns the vertex data, including tombstoned vertices that were not yet purged.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot no longer exists.
    pub fn vertex(&self, id: VertexId) -> std::result::Result<&VertexData, GraphError> {
        self.vertices
            .get(id)
            .ok_or(GraphError::EntityNotFound("vertex"))
    }

    /// Returns the position of a live vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing or deleted.
    pub fn position(&self, id: VertexId) -> std::result::Result<Point2, GraphError> {
        let v = self.vertex(id)?;
        if v.deleted {
            return Err(GraphError::Deleted("vertex"));
        }
        Ok(v.position)
    }

    /// Moves a live vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing or deleted.
    pub fn set_vertex_position(
        &mut self,
        id: VertexId,
        position: Point2,
    ) -> std::result::Result<(), GraphError> {
        match self.vertices.get_mut(id) {
            Some(v) if !v.deleted => {
                v.position = position;
                Ok(())
            }
            Some(_) => Err(GraphError::Deleted("vertex")),
            None => Err(GraphError::EntityNotFound("vertex")),
        }
    }

    /// Returns `true` if the vertex is tombstoned or no longer exists.
    #[must_use]
    pub fn is_vertex_deleted(&self, id: VertexId) -> bool {
        self.vertices.get(id).is_none_or(|v| v.deleted)
    }

    /// Iterates live vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> + '_ {
        self.live_vertices
            .iter()
            .filter_map(|&id| self.vertices.get(id).map(|v| (id, v)))
    }

    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.live_vertices.len()
    }

    // --- Segment operations ---

    /// Connects two live vertices with a segment.
    ///
    /// If a live segment already joins the pair (in either order) its ID is
    /// returned and nothing is added.
    ///
    /// # Errors
    ///
    /// Returns `InputError::SelfReferentialSegment` if `a == b`, or a graph
    /// error if either endpoint is missing or deleted.
    pub fn add_segment(&mut self, a: VertexId, b: VertexId) -> Result<SegmentId> {
        if a == b {
            return Err(InputError::SelfReferentialSegment.into());
        }
        self.position(a)?;
        self.position(b)?;

        if let Some(existing) = self.segment_between(a, b) {
            return Ok(existing);
        }

        let id = self.segments.insert(SegmentData::new(a, b));
        self.live_segments.push(id);
        self.pair_index.insert(pair_key(a, b), id);
        Ok(id)
    }

    /// Tombstones a segment and removes it from the live sequence.
    ///
    /// Returns `false` if it was already deleted.
    pub fn remove_segment(&mut self, id: SegmentId) -> bool {
        let Some(seg) = self.segments.get_mut(id) else {
            return false;
        };
        if seg.deleted {
            return false;
        }
        seg.deleted = true;
        let key = seg.key();
        self.live_segments.retain(|&l| l != id);
        if self.pair_index.get(&key) == Some(&id) {
            self.pair_index.remove(&key);
        }
        true
    }

    /// Removes the live segment joining `a` and `b`, if any.
    pub fn remove_segment_between(&mut self, a: VertexId, b: VertexId) -> Option<SegmentId> {
        let id = self.segment_between(a, b)?;
        self.remove_segment(id);
        Some(id)
    }

    /// Returns the live segment joining `a` and `b` in either order.
    #[must_use]
    pub fn segment_between(&self, a: VertexId, b: VertexId) -> Option<SegmentId> {
        self.pair_index
            .get(&pair_key(a, b))
            .copied()
            .filter(|&id| !self.is_segment_deleted(id))
    }

    /// Returns the segment data, including tombstoned segments that were not yet purged.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot no longer exists.
    pub fn segment(&self, id: SegmentId) -> std::result::Result<&SegmentData, GraphError> {
        self.segments
            .get(id)
            .ok_or(GraphError::EntityNotFound("segment"))
    }

    /// Returns `true` if the segment was removed, or either endpoint was.
    #[must_use]
    pub fn is_segment_deleted(&self, id: SegmentId) -> bool {
        self.segments.get(id).is_none_or(|s| {
            s.deleted || self.is_vertex_deleted(s.first) || self.is_vertex_deleted(s.second)
        })
    }

    /// Iterates live segments in insertion order, skipping implicitly deleted ones.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, &SegmentData)> + '_ {
        self.live_segments.iter().filter_map(|&id| {
            if self.is_segment_deleted(id) {
                None
            } else {
                self.segments.get(id).map(|s| (id, s))
            }
        })
    }

    /// Number of live segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    // --- Hole operations ---

    /// Removes the first hole within `tolerance` of `point`, or places a new
    /// hole there if none is close enough.
    pub fn add_or_toggle_hole(&mut self, point: Point2, tolerance: f64) -> HoleToggle {
        if let Some(i) = self
            .holes
            .iter()
            .position(|h| point_dist(h, &point) < tolerance)
        {
            HoleToggle::Removed(self.holes.remove(i))
        } else {
            self.holes.push(point);
            HoleToggle::Added
        }
    }

    /// Hole seed points.
    #[must_use]
    pub fn holes(&self) -> &[Point2] {
        &self.holes
    }

    // --- Queries ---

    /// Returns the closest live vertex within `tolerance` of `point`.
    ///
    /// Among equally close vertices the earliest inserted wins.
    #[must_use]
    pub fn nearest_vertex(&self, point: &Point2, tolerance: f64) -> Option<VertexId> {
        nearest_within(
            self.vertices()
                .map(|(id, v)| (id, point_dist(&v.position, point))),
            tolerance,
        )
    }

    /// Returns the closest live segment within `tolerance` of `point`.
    #[must_use]
    pub fn nearest_segment(&self, point: &Point2, tolerance: f64) -> Option<SegmentId> {
        nearest_within(
            self.segments().filter_map(|(id, s)| {
                let a = self.vertices.get(s.first)?.position;
                let b = self.vertices.get(s.second)?.position;
                Some((id, point_to_segment_dist(point, &a, &b)))
            }),
            tolerance,
        )
    }

    /// Assigns contiguous zero-based indices to the live vertices and returns
    /// the resulting snapshot.
    ///
    /// Must be called again after every structural edit; indices from an
    /// earlier snapshot do not survive changes to the vertex set.
    #[must_use]
    pub fn reindex(&self) -> IndexedGraph {
        let mut index: SecondaryMap<VertexId, usize> = SecondaryMap::new();
        let mut points = Vec::with_capacity(self.live_vertices.len());
        let mut ids = Vec::with_capacity(self.live_vertices.len());
        for (i, (id, v)) in self.vertices().enumerate() {
            index.insert(id, i);
            points.push(v.position);
            ids.push(id);
        }

        let segments = self
            .segments()
            .filter_map(|(_, s)| Some([*index.get(s.first)?, *index.get(s.second)?]))
            .collect();

        IndexedGraph {
            points,
            ids,
            segments,
            holes: self.holes.clone(),
        }
    }

    /// Frees the arena slots of tombstoned vertices and deleted segments.
    ///
    /// IDs of purged entities resolve to "not found" afterwards, which all
    /// queries treat the same as deleted.
    pub fn purge(&mut self) {
        let dead_segments: Vec<SegmentId> = self
            .segments
            .keys()
            .filter(|&id| self.is_segment_deleted(id))
            .collect();
        for id in dead_segments {
            if let Some(seg) = self.segments.remove(id) {
                let key = seg.key();
                if self.pair_index.get(&key) == Some(&id) {
                    self.pair_index.remove(&key);
                }
            }
        }
        self.live_segments.retain(|&id| self.segments.contains_key(id));
        self.vertices.retain(|_, v| !v.deleted);
    }

    /// Removes every vertex, segment and hole.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Picks the entry with the smallest distance below `tolerance`, keeping the
/// first on ties.
fn nearest_within<K>(candidates: impl Iterator<Item = (K, f64)>, tolerance: f64) -> Option<K> {
    let mut best: Option<(K, f64)> = None;
    for (id, d) in candidates {
        if d >= tolerance {
            continue;
        }
        if best.as_ref().is_none_or(|(_, bd)| d < *bd) {
            best = Some((id, d));
        }
    }
    best.map(|(id, _)| id)
}
