//! Head pose matrices as produced by the face tracking model.

use crate::{constants::POSE_MATRIX_LEN, Error, Result};
use nalgebra::{Matrix4, Vector3};

/// A 4x4 homogeneous camera-space transform of a tracked face.
///
/// Values are stored exactly as the detector produced them, so a matrix may
/// hold NaN or infinite components; use [`crate::validity::ValidityGuard`]
/// before feeding it to the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseMatrix(Matrix4<f32>);

impl PoseMatrix {
    /// Build a pose from 16 column-major values
    ///
    /// # Errors
    ///
    /// Returns an error if the slice does not hold exactly 16 values
    pub fn from_column_slice(data: &[f32]) -> Result<Self> {
        if data.len() != POSE_MATRIX_LEN {
            return Err(Error::InvalidInput(format!(
                "Expected {} pose matrix values, got {}",
                POSE_MATRIX_LEN,
                data.len()
            )));
        }
        Ok(Self(Matrix4::from_column_slice(data)))
    }

    #[must_use]
    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        Self(matrix)
    }

    #[must_use]
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Borrow the underlying matrix
    #[must_use]
    pub fn as_matrix(&self) -> &Matrix4<f32> {
        &self.0
    }

    /// Column-major copy of the 16 values
    #[must_use]
    pub fn to_column_array(&self) -> [f32; POSE_MATRIX_LEN] {
        let mut out = [0.0; POSE_MATRIX_LEN];
        out.copy_from_slice(self.0.as_slice());
        out
    }

    /// Translation column
    #[must_use]
    pub fn translation(&self) -> Vector3<f32> {
        Vector3::new(self.0[(0, 3)], self.0[(1, 3)], self.0[(2, 3)])
    }

    /// True when every component is a finite number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<Matrix4<f32>> for PoseMatrix {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_column_slice_layout() {
        let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let pose = PoseMatrix::from_column_slice(&data).unwrap();

        // Column-major: the fourth column carries 12, 13, 14
        let t = pose.translation();
        assert_eq!(t, Vector3::new(12.0, 13.0, 14.0));
        assert_eq!(pose.as_matrix()[(1, 0)], 1.0);
        assert_eq!(pose.to_column_array().to_vec(), data);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(PoseMatrix::from_column_slice(&[0.0; 15]).is_err());
        assert!(PoseMatrix::from_column_slice(&[0.0; 17]).is_err());
        assert!(PoseMatrix::from_column_slice(&[]).is_err());
    }

    #[test]
    fn test_is_finite() {
        assert!(PoseMatrix::identity().is_finite());

        let mut data = PoseMatrix::identity().to_column_array();
        data[7] = f32::NAN;
        assert!(!PoseMatrix::from_column_slice(&data).unwrap().is_finite());

        data[7] = f32::NEG_INFINITY;
        assert!(!PoseMatrix::from_column_slice(&data).unwrap().is_finite());
    }
}
