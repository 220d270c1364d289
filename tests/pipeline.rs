#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use approx::assert_relative_eq;
use spritemesh::boundary::{AlphaBitmap, BoundaryParams, ExtractBoundary};
use spritemesh::editor::{EditorParams, MeshEditor};
use spritemesh::error::TriangulationError;
use spritemesh::graph::{IndexedGraph, PolygonGraph};
use spritemesh::math::{Point2, SpriteTransform, Vector2};
use spritemesh::mesh::{Reimport, SpriteMesh, Subdivide};
use spritemesh::texture::{ProjectUvs, SpriteMetrics};
use spritemesh::triangulation::{RefinementSettings, Triangulate, TriangulationParams};
use spritemesh::SpriteMeshError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A 32x32 sprite shaped like a thick ring, with alpha stored bottom row first.
fn ring_sprite() -> AlphaBitmap {
    AlphaBitmap::from_fn(32, 32, |x, y| {
        #[allow(clippy::cast_precision_loss)]
        let (dx, dy) = (x as f64 + 0.5 - 16.0, y as f64 + 0.5 - 16.0);
        let r2 = dx * dx + dy * dy;
        (36.0..=196.0).contains(&r2)
    })
}

fn transform() -> SpriteTransform {
    SpriteTransform::from_trs(
        Vector2::new(3.0, -1.0),
        std::f64::consts::FRAC_PI_6,
        Vector2::new(2.0, 2.0),
    )
    .unwrap()
}

fn edge_set(graph: &PolygonGraph) -> BTreeSet<(usize, usize)> {
    let indexed = graph.reindex();
    indexed
        .segments
        .iter()
        .map(|&[a, b]| (a.min(b), a.max(b)))
        .collect()
}

#[test]
fn extract_triangulate_reimport_round_trip() {
    init_tracing();
    let metrics = SpriteMetrics::full_texture(32, 32, 16.0);
    let t = transform();

    let graph = ExtractBoundary::new(&metrics, BoundaryParams::default())
        .execute(&ring_sprite(), &t)
        .unwrap();
    let mut mesh = Triangulate::new(TriangulationParams::default())
        .execute(&graph.reindex(), &t)
        .unwrap();
    ProjectUvs::new(&metrics).apply(&mut mesh).unwrap();
    mesh.validate().unwrap();
    assert!(mesh.has_uvs());
    for uv in &mesh.uvs {
        assert!((-1e-9..=1.0 + 1e-9).contains(&uv.x));
        assert!((-1e-9..=1.0 + 1e-9).contains(&uv.y));
    }

    let back = Reimport::new(&t).execute(&mesh).unwrap();
    assert_eq!(back.vertex_count(), mesh.vertices.len());
    let mesh_edges: BTreeSet<(usize, usize)> = mesh
        .edges()
        .into_iter()
        .map(|(a, b)| (a as usize, b as usize))
        .collect();
    assert_eq!(edge_set(&back), mesh_edges);

    // Re-imported positions are back in editing space.
    let original = graph.reindex();
    let reimported = back.reindex();
    for (p, q) in original.points.iter().zip(&reimported.points) {
        assert_relative_eq!(*p, *q, epsilon = 1e-9);
    }
}

#[test]
fn reimported_mesh_triangulates_to_the_same_triangles() {
    init_tracing();
    let metrics = SpriteMetrics::full_texture(32, 32, 16.0);
    let t = SpriteTransform::identity();
    let graph = ExtractBoundary::new(&metrics, BoundaryParams::default())
        .execute(&ring_sprite(), &t)
        .unwrap();
    let params = TriangulationParams::default();
    let first = Triangulate::new(params).execute(&graph.reindex(), &t).unwrap();
    let back = Reimport::new(&t).execute(&first).unwrap();
    let second = Triangulate::new(params).execute(&back.reindex(), &t).unwrap();
    assert_eq!(first.vertices, second.vertices);
    assert_eq!(first.edges(), second.edges());
}

#[test]
fn crossing_diagonals_surface_topology_error() {
    init_tracing();
    let graph = IndexedGraph {
        points: vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ],
        segments: vec![[0, 1], [2, 3]],
        ..IndexedGraph::default()
    };
    let err = Triangulate::new(TriangulationParams::default())
        .execute(&graph, &SpriteTransform::identity())
        .unwrap_err();
    assert!(matches!(
        err,
        SpriteMeshError::Triangulation(TriangulationError::Topology { .. })
    ));
}

#[test]
fn subdivision_survives_reimport() {
    init_tracing();
    let t = SpriteTransform::identity();
    let graph = PolygonGraph::from_closed_loop(&[
        Point2::new(0.0, 0.0),
        Point2::new(3.0, 0.0),
        Point2::new(0.0, 3.0),
    ])
    .unwrap();
    let mesh = Triangulate::new(TriangulationParams::default())
        .execute(&graph.reindex(), &t)
        .unwrap();
    let refined = Subdivide::new(2).execute(&mesh).unwrap();
    assert_eq!(refined.indices.len(), 4);
    assert_eq!(&refined.vertices[..3], &mesh.vertices[..]);

    let back = Reimport::new(&t).execute(&refined).unwrap();
    let again = Triangulate::new(TriangulationParams::default())
        .execute(&back.reindex(), &t)
        .unwrap();
    assert_eq!(again.indices.len(), 4);
}

#[test]
fn refined_mesh_stays_inside_the_outline() {
    init_tracing();
    let metrics = SpriteMetrics::full_texture(32, 32, 16.0);
    let t = SpriteTransform::identity();
    let graph = ExtractBoundary::new(&metrics, BoundaryParams::default())
        .execute(&AlphaBitmap::from_fn(32, 32, |_, _| true), &t)
        .unwrap();
    let params = TriangulationParams {
        refinement: Some(RefinementSettings {
            max_area: Some(0.05),
            ..RefinementSettings::default()
        }),
        ..TriangulationParams::default()
    };
    let mesh = Triangulate::new(params).execute(&graph.reindex(), &t).unwrap();
    assert!(mesh.vertices.len() > graph.vertex_count());
    for v in &mesh.vertices {
        assert!(v.x.abs() <= 1.0 + 1e-9 && v.y.abs() <= 1.0 + 1e-9);
    }
}

#[test]
fn editing_session_saves_textured_mesh() {
    init_tracing();
    let mut editor = MeshEditor::builder()
        .transform(transform())
        .metrics(SpriteMetrics::full_texture(32, 32, 16.0))
        .params(EditorParams::default())
        .build()
        .unwrap();
    editor.load_boundary(&ring_sprite()).unwrap();

    let loaded = editor.graph().vertex_count();
    assert!(loaded >= 3);

    let mut sink: Vec<SpriteMesh> = Vec::new();
    editor.save(&mut sink).unwrap();
    assert_eq!(sink.len(), 1);
    let saved = &sink[0];
    assert!(!saved.is_empty());
    assert_eq!(saved.vertices.len(), loaded);
    assert_eq!(saved.uvs.len(), saved.vertices.len());
    assert!(!editor.is_dirty());
}
