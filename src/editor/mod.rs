//! Interactive editing session over a polygon graph.
//!
//! [`MeshEditor`] turns pointer gestures into graph edits and keeps a cached
//! mesh that is rebuilt on demand after any structural change. Gestures that
//! cannot be applied are logged and ignored; only whole-graph operations
//! (loading a boundary, re-importing, subdividing) and mesh generation return
//! errors, and those leave the session usable.

use crate::boundary::{AlphaMask, BoundaryParams, ExtractBoundary};
use crate::error::{ConfigError, Result};
use crate::graph::{HoleToggle, PolygonGraph, SegmentId, VertexId};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{AffineMapping, Point2};
use crate::mesh::{Reimport, SpriteMesh, Subdivide};
use crate::texture::{ProjectUvs, SpriteMetrics};
use crate::triangulation::{Triangulate, TriangulationParams};

/// Receives the finished mesh when a session is saved.
pub trait MeshSink {
    /// Takes a copy of `mesh`.
    ///
    /// # Errors
    ///
    /// Implementations report their own storage failures.
    fn accept(&mut self, mesh: &SpriteMesh) -> Result<()>;
}

impl MeshSink for Vec<SpriteMesh> {
    fn accept(&mut self, mesh: &SpriteMesh) -> Result<()> {
        self.push(mesh.clone());
        Ok(())
    }
}

/// Parameters of an editing session.
#[derive(Debug, Clone, Copy)]
pub struct EditorParams {
    /// Hit-test radius for vertices, ghost segments and holes, in editing-space units.
    pub select_distance: f64,
    pub boundary: BoundaryParams,
    pub triangulation: TriangulationParams,
}

impl Default for EditorParams {
    fn default() -> Self {
        Self {
            select_distance: 0.3,
            boundary: BoundaryParams::default(),
            triangulation: TriangulationParams::default(),
        }
    }
}

/// Builder for [`MeshEditor`].
#[derive(Default)]
pub struct MeshEditorBuilder {
    mapping: Option<Box<dyn AffineMapping>>,
    metrics: Option<SpriteMetrics>,
    params: EditorParams,
}

impl MeshEditorBuilder {
    /// Sets the mapping between editing space and mesh-local space.
    #[must_use]
    pub fn transform(mut self, mapping: impl AffineMapping + 'static) -> Self {
        self.mapping = Some(Box::new(mapping));
        self
    }

    /// Sets the sprite metrics used for boundary extraction and UVs.
    #[must_use]
    pub fn metrics(mut self, metrics: SpriteMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn params(mut self, params: EditorParams) -> Self {
        self.params = params;
        self
    }

    /// Builds the session with an empty graph.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingTransform` if no transform was set, and
    /// `ConfigError::InvalidParameter` for a non-positive select distance.
    pub fn build(self) -> Result<MeshEditor> {
        let mapping = self.mapping.ok_or(ConfigError::MissingTransform)?;
        let d = self.params.select_distance;
        if !(d.is_finite() && d > 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "select_distance",
                value: d,
                reason: "must be finite and positive",
            }
            .into());
        }
        Ok(MeshEditor {
            graph: PolygonGraph::new(),
            mapping,
            metrics: self.metrics,
            params: self.params,
            selected: None,
            mesh: SpriteMesh::default(),
            dirty: false,
        })
    }
}

/// An editing session: a polygon graph, its selection and a cached mesh.
pub struct MeshEditor {
    graph: PolygonGraph,
    mapping: Box<dyn AffineMapping>,
    metrics: Option<SpriteMetrics>,
    params: EditorParams,
    selected: Option<VertexId>,
    mesh: SpriteMesh,
    dirty: bool,
}

impl MeshEditor {
    #[must_use]
    pub fn builder() -> MeshEditorBuilder {
        MeshEditorBuilder::default()
    }

    #[must_use]
    pub fn graph(&self) -> &PolygonGraph {
        &self.graph
    }

    #[must_use]
    pub fn params(&self) -> &EditorParams {
        &self.params
    }

    /// The selected vertex, if it is still live.
    #[must_use]
    pub fn selected(&self) -> Option<VertexId> {
        self.selected.filter(|&id| !self.graph.is_vertex_deleted(id))
    }

    /// Returns `true` if the cached mesh no longer reflects the graph.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // --- Gestures ---

    /// Adds a vertex at `point` and selects it.
    pub fn add_vertex_at(&mut self, point: Point2) -> VertexId {
        let id = self.graph.add_vertex(point);
        self.selected = Some(id);
        self.dirty = true;
        id
    }

    /// Selects the vertex nearest to `point`, or clears the selection if none
    /// is within reach.
    pub fn select_at(&mut self, point: Point2) -> Option<VertexId> {
        self.selected = self
            .graph
            .nearest_vertex(&point, self.params.select_distance);
        self.selected
    }

    /// Deletes the vertex nearest to `point` and clears the selection.
    pub fn delete_vertex_at(&mut self, point: Point2) -> Option<VertexId> {
        let Some(id) = self
            .graph
            .nearest_vertex(&point, self.params.select_distance)
        else {
            tracing::warn!(x = point.x, y = point.y, "no vertex to delete");
            return None;
        };
        self.graph.remove_vertex(id);
        self.selected = None;
        self.dirty = true;
        Some(id)
    }

    /// Connects the selected vertex to the first vertex whose ghost segment
    /// passes within reach of `point`.
    pub fn connect_selected_at(&mut self, point: Point2) -> Option<SegmentId> {
        let (from, to) = self.ghost_hit(&point, false)?;
        if let Some(existing) = self.graph.segment_between(from, to) {
            return Some(existing);
        }
        match self.graph.add_segment(from, to) {
            Ok(id) => {
                self.dirty = true;
                Some(id)
            }
            Err(err) => {
                tracing::warn!(%err, "cannot connect vertices");
                None
            }
        }
    }

    /// Removes the segment between the selected vertex and the first
    /// connected vertex whose segment passes within reach of `point`.
    pub fn disconnect_selected_at(&mut self, point: Point2) -> Option<SegmentId> {
        let (from, to) = self.ghost_hit(&point, true)?;
        let removed = self.graph.remove_segment_between(from, to)?;
        self.dirty = true;
        Some(removed)
    }

    /// Places a hole seed at `point`, or removes the one already there.
    pub fn toggle_hole_at(&mut self, point: Point2) -> HoleToggle {
        self.dirty = true;
        self.graph
            .add_or_toggle_hole(point, self.params.select_distance)
    }

    /// Moves a vertex to `point`. Returns `false` for a deleted or unknown vertex.
    pub fn move_vertex(&mut self, id: VertexId, point: Point2) -> bool {
        match self.graph.set_vertex_position(id, point) {
            Ok(()) => {
                self.dirty = true;
                true
            }
            Err(err) => {
                tracing::warn!(%err, "cannot move vertex");
                false
            }
        }
    }

    /// Discards every vertex, segment and hole.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.selected = None;
        self.dirty = true;
    }

    // --- Whole-graph operations ---

    /// Replaces the graph with the outline traced from `texture`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingMetrics` if no metrics were supplied,
    /// or any boundary extraction error. The graph is untouched on failure.
    pub fn load_boundary<M: AlphaMask + ?Sized>(&mut self, texture: &M) -> Result<()> {
        let Some(metrics) = &self.metrics else {
            return Err(ConfigError::MissingMetrics.into());
        };
        let graph = ExtractBoundary::new(metrics, self.params.boundary)
            .execute(texture, &*self.mapping)?;
        self.replace_graph(graph);
        Ok(())
    }

    /// Replaces the graph with the vertices and edges of `mesh`.
    ///
    /// # Errors
    ///
    /// Returns an input error if the mesh references missing vertices.
    pub fn reimport(&mut self, mesh: &SpriteMesh) -> Result<()> {
        let graph = Reimport::new(&*self.mapping).execute(mesh)?;
        self.replace_graph(graph);
        Ok(())
    }

    /// Subdivides the current mesh by `factor` and re-imports the result.
    ///
    /// Hole seeds are lost, as with any re-import.
    ///
    /// # Errors
    ///
    /// Returns `InputError::ZeroSubdivision` for a zero factor, or any error
    /// raised while building the current mesh.
    pub fn subdivide(&mut self, factor: usize) -> Result<()> {
        let refined = Subdivide::new(factor).execute(self.mesh()?)?;
        self.reimport(&refined)
    }

    /// Returns the mesh for the current graph, rebuilding it if needed.
    ///
    /// # Errors
    ///
    /// Returns triangulation errors for graphs with crossing segments or
    /// coincident vertices, and projection errors for unusable metrics. The
    /// session stays dirty after a failure.
    pub fn mesh(&mut self) -> Result<&SpriteMesh> {
        if self.dirty {
            let indexed = self.graph.reindex();
            let mut mesh = Triangulate::new(self.params.triangulation)
                .execute(&indexed, &*self.mapping)?;
            if let Some(metrics) = &self.metrics {
                ProjectUvs::new(metrics).apply(&mut mesh)?;
            }
            self.mesh = mesh;
            self.dirty = false;
        }
        Ok(&self.mesh)
    }

    /// Builds the final mesh and hands it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns mesh generation errors and whatever the sink reports.
    pub fn save(&mut self, sink: &mut dyn MeshSink) -> Result<()> {
        let mesh = self.mesh()?;
        tracing::debug!(
            vertices = mesh.vertices.len(),
            triangles = mesh.indices.len(),
            "saving mesh"
        );
        sink.accept(mesh)
    }

    fn replace_graph(&mut self, graph: PolygonGraph) {
        self.graph = graph;
        self.selected = None;
        self.dirty = true;
    }

    /// Finds the first live vertex whose ghost segment from the selected
    /// vertex lies within reach of `point`. With `connected` set, only
    /// vertices already joined to the selection are considered.
    fn ghost_hit(&self, point: &Point2, connected: bool) -> Option<(VertexId, VertexId)> {
        let Some(from) = self.selected() else {
            tracing::warn!("no vertex selected");
            return None;
        };
        let origin = self.graph.position(from).ok()?;
        let hit = self
            .graph
            .vertices()
            .filter(|&(id, _)| id != from)
            .filter(|&(id, _)| !connected || self.graph.segment_between(from, id).is_some())
            .find(|(_, v)| {
                point_to_segment_dist(point, &origin, &v.position) < self.params.select_distance
            })
            .map(|(id, _)| (from, id));
        if hit.is_none() {
            tracing::warn!(x = point.x, y = point.y, "no segment under cursor");
        }
        hit
    }
}
