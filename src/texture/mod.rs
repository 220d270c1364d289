mod project_uv;

pub use project_uv::ProjectUvs;

use crate::error::{ConfigError, Result};
use crate::math::{Aabb2, Point2};

/// A rectangle in texture pixels, with `y` measured up from the bottom row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TexelRect {
    /// Creates a texel rectangle.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Texture and placement metrics of a sprite, as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteMetrics {
    /// Width of the whole texture in pixels.
    pub texture_width: u32,
    /// Height of the whole texture in pixels.
    pub texture_height: u32,
    /// The sprite's region within the texture.
    pub texel_rect: TexelRect,
    /// Texture pixels per world unit.
    pub pixels_per_unit: f64,
    /// The sprite's physical bounds in mesh-local space.
    pub physical_bounds: Aabb2,
}

impl SpriteMetrics {
    /// Metrics for a sprite covering a whole `width`×`height` texture, with
    /// its bounds centered on the local origin.
    #[must_use]
    pub fn full_texture(width: u32, height: u32, pixels_per_unit: f64) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        let half_w = w / pixels_per_unit * 0.5;
        let half_h = h / pixels_per_unit * 0.5;
        Self {
            texture_width: width,
            texture_height: height,
            texel_rect: TexelRect::new(0.0, 0.0, w, h),
            pixels_per_unit,
            physical_bounds: Aabb2::new(
                Point2::new(-half_w, -half_h),
                Point2::new(half_w, half_h),
            ),
        }
    }

    /// Checks that the metrics can be used for projection.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroTextureSize` for an empty texture and
    /// `ConfigError::InvalidParameter` for a non-positive or non-finite
    /// pixel density.
    pub fn validate(&self) -> Result<()> {
        if self.texture_width == 0 || self.texture_height == 0 {
            return Err(ConfigError::ZeroTextureSize {
                width: self.texture_width,
                height: self.texture_height,
            }
            .into());
        }
        if !(self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "pixels_per_unit",
                value: self.pixels_per_unit,
                reason: "must be positive and finite",
            }
            .into());
        }
        Ok(())
    }
}
