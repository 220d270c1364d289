mod fit;
mod mask;
mod simplify;
mod trace;

pub use fit::fit_to_bounds;
pub use mask::{AlphaBitmap, AlphaMask, TexelCrop};
pub use simplify::simplify_closed;
pub use trace::{trace_contours, trace_outer_boundary};

use crate::error::{InputError, Result};
use crate::graph::PolygonGraph;
use crate::math::{AffineMapping, Point2};
use crate::texture::SpriteMetrics;

/// Parameters controlling boundary extraction.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryParams {
    /// Douglas-Peucker tolerance in texture pixels. Zero keeps the raw trace.
    pub simplify_tolerance: f64,
}

impl Default for BoundaryParams {
    fn default() -> Self {
        Self {
            simplify_tolerance: 1.0,
        }
    }
}

/// Builds a closed polygon graph from a sprite's opaque silhouette.
pub struct ExtractBoundary<'a> {
    metrics: &'a SpriteMetrics,
    params: BoundaryParams,
}

impl<'a> ExtractBoundary<'a> {
    /// Creates a new `ExtractBoundary` operation.
    #[must_use]
    pub fn new(metrics: &'a SpriteMetrics, params: BoundaryParams) -> Self {
        Self { metrics, params }
    }

    /// Traces, simplifies and rescales the silhouette of the sprite's texel
    /// rectangle within `texture`, returning the outline in mesh-local space.
    ///
    /// # Errors
    ///
    /// Returns an input error if the silhouette is empty or collapses below
    /// three points, and a configuration error for an invalid tolerance.
    pub fn outline<M: AlphaMask + ?Sized>(&self, texture: &M) -> Result<Vec<Point2>> {
        let crop = TexelCrop::new(texture, &self.metrics.texel_rect);
        let traced = trace_outer_boundary(&crop)?;
        let simplified = simplify_closed(&traced, self.params.simplify_tolerance)?;
        tracing::debug!(
            traced = traced.len(),
            simplified = simplified.len(),
            tolerance = self.params.simplify_tolerance,
            "simplified boundary"
        );
        if simplified.len() < 3 {
            return Err(InputError::DegenerateTrace(format!(
                "only {} points left after simplification at tolerance {}",
                simplified.len(),
                self.params.simplify_tolerance
            ))
            .into());
        }
        fit_to_bounds(&simplified, &self.metrics.physical_bounds)
    }

    /// Executes the extraction, producing a fresh graph holding one closed
    /// loop in editing space and no holes.
    ///
    /// # Errors
    ///
    /// See [`ExtractBoundary::outline`].
    pub fn execute<M: AlphaMask + ?Sized>(
        &self,
        texture: &M,
        mapping: &dyn AffineMapping,
    ) -> Result<PolygonGraph> {
        let outline = self.outline(texture)?;
        let world: Vec<Point2> = outline.iter().map(|p| mapping.to_world_space(p)).collect();
        PolygonGraph::from_closed_loop(&world)
    }
}
