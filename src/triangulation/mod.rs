mod classify;
mod triangulate;
mod validate;

pub use triangulate::Triangulate;
pub use validate::{find_crossing_segments, find_duplicate_points};

/// Vertex order of output triangles, as seen in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    #[default]
    CounterClockwise,
    Clockwise,
}

/// Quality refinement by Steiner point insertion.
#[derive(Debug, Clone, Copy)]
pub struct RefinementSettings {
    /// Smallest interior angle to aim for, in degrees.
    pub min_angle_deg: f64,
    /// Largest allowed triangle area, in editing-space units.
    pub max_area: Option<f64>,
    /// Upper bound on inserted Steiner points.
    pub max_additional_vertices: usize,
}

impl Default for RefinementSettings {
    fn default() -> Self {
        Self {
            min_angle_deg: 25.0,
            max_area: None,
            max_additional_vertices: 10_000,
        }
    }
}

/// Parameters controlling triangulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangulationParams {
    /// Winding order of emitted triangles.
    pub winding: Winding,
    /// Optional quality refinement. `None` keeps only the input points.
    pub refinement: Option<RefinementSettings>,
}
