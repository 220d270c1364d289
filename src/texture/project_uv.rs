use crate::error::Result;
use crate::math::Point2;
use crate::mesh::SpriteMesh;

use super::SpriteMetrics;

/// Projects mesh-local vertex positions into normalized texture coordinates.
///
/// The projection is done in un-rotated texture space: the bottom-left corner
/// of the sprite's physical bounds maps to the texel rectangle origin, and
/// one mesh unit spans `pixels_per_unit` texels.
pub struct ProjectUvs<'a> {
    metrics: &'a SpriteMetrics,
}

impl<'a> ProjectUvs<'a> {
    /// Creates a new `ProjectUvs` operation.
    #[must_use]
    pub fn new(metrics: &'a SpriteMetrics) -> Self {
        Self { metrics }
    }

    /// Computes one UV pair per vertex, in the same order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the texture is empty or the pixel
    /// density is unusable.
    pub fn execute(&self, vertices: &[Point2]) -> Result<Vec<Point2>> {
        self.metrics.validate()?;

        let m = self.metrics;
        let bottom_left = m.physical_bounds.min;
        let tex_w = f64::from(m.texture_width);
        let tex_h = f64::from(m.texture_height);

        Ok(vertices
            .iter()
            .map(|v| {
                let px = (v.x - bottom_left.x) * m.pixels_per_unit;
                let py = (v.y - bottom_left.y) * m.pixels_per_unit;
                Point2::new((px + m.texel_rect.x) / tex_w, (py + m.texel_rect.y) / tex_h)
            })
            .collect())
    }

    /// Replaces the UVs of `mesh` with a fresh projection of its vertices.
    ///
    /// # Errors
    ///
    /// See [`ProjectUvs::execute`].
    pub fn apply(&self, mesh: &mut SpriteMesh) -> Result<()> {
        mesh.uvs = self.execute(&mesh.vertices)?;
        Ok(())
    }
}
