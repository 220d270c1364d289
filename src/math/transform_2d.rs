use super::{Matrix3, Point2, Vector2, TOLERANCE};
use crate::error::{ConfigError, Result};

/// Maps points between mesh-local space and world (editing) space.
///
/// Implementations must be a consistent inverse pair for the lifetime of an
/// editing session.
pub trait AffineMapping {
    /// Maps a world-space point into mesh-local space.
    fn to_mesh_space(&self, world: &Point2) -> Point2;

    /// Maps a mesh-local point into world space.
    fn to_world_space(&self, local: &Point2) -> Point2;
}

/// An invertible 2D affine transform from mesh-local space to world space.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTransform {
    local_to_world: Matrix3,
    world_to_local: Matrix3,
}

impl SpriteTransform {
    /// The identity mapping: mesh-local and world space coincide.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            local_to_world: Matrix3::identity(),
            world_to_local: Matrix3::identity(),
        }
    }

    /// Builds a transform applying `scale`, then `rotation` (radians, CCW),
    /// then `translation`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SingularTransform` if either scale component is zero.
    pub fn from_trs(translation: Vector2, rotation: f64, scale: Vector2) -> Result<Self> {
        let m = Matrix3::new_translation(&translation)
            * Matrix3::new_rotation(rotation)
            * Matrix3::new_nonuniform_scaling(&scale);
        Self::from_matrix(m)
    }

    /// Builds a transform from a homogeneous local-to-world matrix.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SingularTransform` if the matrix is not invertible.
    pub fn from_matrix(local_to_world: Matrix3) -> Result<Self> {
        let linear_det = local_to_world[(0, 0)] * local_to_world[(1, 1)]
            - local_to_world[(0, 1)] * local_to_world[(1, 0)];
        if linear_det.abs() < TOLERANCE || !linear_det.is_finite() {
            return Err(ConfigError::SingularTransform.into());
        }
        let world_to_local = local_to_world
            .try_inverse()
            .ok_or(ConfigError::SingularTransform)?;
        Ok(Self {
            local_to_world,
            world_to_local,
        })
    }

    /// The local-to-world matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix3 {
        &self.local_to_world
    }
}

impl Default for SpriteTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMapping for SpriteTransform {
    fn to_mesh_space(&self, world: &Point2) -> Point2 {
        self.world_to_local.transform_point(world)
    }

    fn to_world_space(&self, local: &Point2) -> Point2 {
        self.local_to_world.transform_point(local)
    }
}
