//! Isotropic scale normalization for raw head pose matrices.
//!
//! The detector folds its head-shape estimate into the pose scale, which is
//! rarely equal on all three axes. Applied to a rigid asset that shows up as
//! vertical or horizontal stretching, so the pose is rebuilt with the mean
//! scale on every axis while translation and rotation are kept as they are.

use crate::pose::PoseMatrix;
use nalgebra::{Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3};

/// Translation, rotation and per-axis scale of a pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseComponents {
    /// Translation in camera space
    pub translation: Vector3<f32>,
    /// Orientation
    pub rotation: UnitQuaternion<f32>,
    /// Scale along the local x, y and z axes
    pub scale: Vector3<f32>,
}

impl PoseComponents {
    /// Mean of the three scale factors
    #[must_use]
    pub fn mean_scale(&self) -> f32 {
        (self.scale.x + self.scale.y + self.scale.z) / 3.0
    }

    /// Recompose into a homogeneous matrix, `T * R * S`
    #[must_use]
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Replaces anisotropic pose scale with its arithmetic mean
#[derive(Debug, Default, Clone, Copy)]
pub struct PoseNormalizer;

impl PoseNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Split a pose into translation, rotation and scale.
    ///
    /// Scale is the length of each basis column; a negative determinant flips
    /// the sign of the x scale so the remaining rotation stays proper. A zero
    /// scale axis produces non-finite rotation values.
    #[must_use]
    pub fn decompose(&self, pose: &PoseMatrix) -> PoseComponents {
        let m = pose.as_matrix();
        let basis: Matrix3<f32> = m.fixed_view::<3, 3>(0, 0).into_owned();

        let mut sx = basis.column(0).norm();
        let sy = basis.column(1).norm();
        let sz = basis.column(2).norm();
        if basis.determinant() < 0.0 {
            sx = -sx;
        }

        let mut rotation = basis;
        rotation.column_mut(0).unscale_mut(sx);
        rotation.column_mut(1).unscale_mut(sy);
        rotation.column_mut(2).unscale_mut(sz);

        PoseComponents {
            translation: pose.translation(),
            rotation: UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation)),
            scale: Vector3::new(sx, sy, sz),
        }
    }

    /// Rebuild the pose with a uniform scale equal to the mean of its axes
    #[must_use]
    pub fn normalize(&self, pose: &PoseMatrix) -> PoseMatrix {
        let mut components = self.decompose(pose);
        let mean = components.mean_scale();
        components.scale = Vector3::repeat(mean);
        PoseMatrix::from_matrix(components.to_matrix())
    }
}
