use thiserror::Error;

/// Top-level error type for sprite mesh authoring.
#[derive(Debug, Error)]
pub enum SpriteMeshError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

/// Errors caused by geometrically unusable input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("degenerate boundary trace: {0}")]
    DegenerateTrace(String),

    #[error("alpha buffer holds {actual} values, expected {expected} for the given size")]
    BitmapSize { expected: usize, actual: usize },

    #[error("cannot simplify an empty polyline")]
    EmptyPolyline,

    #[error("segment endpoints must be distinct vertices")]
    SelfReferentialSegment,

    #[error("subdivision factor must be at least 1, got {0}")]
    ZeroSubdivision(usize),

    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Errors caused by invalid parameters or missing collaborators.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroTextureSize { width: u32, height: u32 },

    #[error("no texture-to-world transform was provided")]
    MissingTransform,

    #[error("no sprite metrics were provided")]
    MissingMetrics,

    #[error("transform matrix is not invertible")]
    SingularTransform,

    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Errors related to polygon graph lookups.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("{0} has been deleted")]
    Deleted(&'static str),
}

/// Errors raised while building a constrained triangulation.
#[derive(Debug, Error)]
pub enum TriangulationError {
    #[error("{operation}: invalid topology ({cause})")]
    Topology {
        operation: &'static str,
        cause: String,
    },

    #[error("{operation} failed: {reason}")]
    Failed {
        operation: &'static str,
        reason: String,
    },
}

/// Convenience type alias for results using [`SpriteMeshError`].
pub type Result<T> = std::result::Result<T, SpriteMeshError>;
