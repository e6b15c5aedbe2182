//! Rejection of poses carrying non-finite values.
//!
//! Detector dropouts and occlusion show up as NaN or infinite matrix entries.
//! Rejected frames leave the anchor where it was instead of snapping it to the
//! origin or to garbage.

use crate::pose::PoseMatrix;
use log::debug;

/// Accepts a pose only if all 16 components are finite
#[derive(Debug, Default)]
pub struct ValidityGuard {
    rejected: u64,
    consecutive_rejections: u32,
}

impl ValidityGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a pose, recording the outcome
    pub fn accept(&mut self, pose: &PoseMatrix) -> bool {
        if pose.is_finite() {
            self.consecutive_rejections = 0;
            return true;
        }

        self.rejected += 1;
        self.consecutive_rejections = self.consecutive_rejections.saturating_add(1);
        debug!(
            "Rejected non-finite pose ({} in a row, {} total)",
            self.consecutive_rejections, self.rejected
        );
        false
    }

    /// Total number of rejected poses
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Rejections since the last accepted pose
    #[must_use]
    pub fn consecutive_rejections(&self) -> u32 {
        self.consecutive_rejections
    }
}
