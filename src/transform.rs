//! Camera-space to world-space composition of normalized poses.

use crate::pose::PoseMatrix;
use nalgebra::Matrix4;

/// Composes camera-space poses with the camera's world transform
#[derive(Debug, Default, Clone, Copy)]
pub struct SpaceTransformer;

impl SpaceTransformer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// World transform of the anchor: `camera_world * pose`.
    ///
    /// The camera transform is applied last; the reverse order only agrees
    /// with this one while the camera sits at the identity.
    #[must_use]
    pub fn compose(&self, camera_world: &Matrix4<f32>, pose: &PoseMatrix) -> Matrix4<f32> {
        camera_world * pose.as_matrix()
    }
}
