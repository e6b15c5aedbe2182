//! Render camera kept in sync with the video frame dimensions.
//!
//! The capture device's true resolution is only known once the first frame
//! arrives, and it may change when the stream restarts. Every time the
//! reported dimensions change the perspective camera is rebuilt: aspect
//! follows the frame, and portrait frames get a wider field of view so the
//! anchored asset stays in frame.

use crate::{
    config::CameraConfig,
    constants::{DIMENSION_EPSILON, PORTRAIT_ASPECT_THRESHOLD},
};
use log::{debug, info};
use nalgebra::{Isometry3, Matrix4, Perspective3};

/// Pixel dimensions of the active video frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Returns `None` unless both dimensions are finite and positive and
    /// their ratio is a usable, nonzero `f32` aspect
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Checked for overflow below
    pub fn new(width: f64, height: f64) -> Option<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return None;
        }
        let aspect = (width / height) as f32;
        if aspect.is_finite() && aspect > f32::EPSILON {
            Some(Self { width, height })
        } else {
            None
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Aspect ratios are small
    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// True when both dimensions match within floating tolerance
    #[must_use]
    pub fn same_size(&self, other: &Viewport) -> bool {
        (self.width - other.width).abs() < DIMENSION_EPSILON && (self.height - other.height).abs() < DIMENSION_EPSILON
    }
}

/// Frame orientation, decided by aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Aspect ratio >= 1
    Landscape,
    /// Aspect ratio < 1
    Portrait,
}

impl Orientation {
    #[must_use]
    pub fn from_aspect(aspect: f32) -> Self {
        if aspect < PORTRAIT_ASPECT_THRESHOLD {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }
}

/// Perspective camera definition for one viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Camera-to-world transform
    pub world: Isometry3<f32>,
    /// Viewport the camera was built for
    pub viewport: Viewport,
}

impl CameraState {
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        Orientation::from_aspect(self.aspect)
    }

    /// Camera-to-world transform as a homogeneous matrix
    #[must_use]
    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world.to_homogeneous()
    }

    #[must_use]
    pub fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect, self.fov_deg.to_radians(), self.near, self.far)
    }

    /// Combined projection and view matrix
    #[must_use]
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection().to_homogeneous() * self.world.inverse().to_homogeneous()
    }
}

/// Result of reporting viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportUpdate {
    /// First camera built for this session
    Configured,
    /// Dimensions changed and the camera was rebuilt
    Reconfigured,
    /// Dimensions match the current camera
    Unchanged,
    /// Non-finite or non-positive dimensions, camera kept as it was
    Ignored,
}

impl ViewportUpdate {
    /// True when the camera was (re)built and the surface needs resizing
    #[must_use]
    pub fn is_rebuilt(self) -> bool {
        matches!(self, Self::Configured | Self::Reconfigured)
    }
}

/// Rebuilds the camera whenever the viewport changes
#[derive(Debug)]
pub struct ViewportCameraSync {
    config: CameraConfig,
    camera: Option<CameraState>,
}

impl ViewportCameraSync {
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        Self { config, camera: None }
    }

    /// Camera definition for the given viewport under this policy
    #[must_use]
    pub fn camera_for(&self, viewport: Viewport) -> CameraState {
        let aspect = viewport.aspect();
        let fov_deg = match Orientation::from_aspect(aspect) {
            Orientation::Portrait => self.config.portrait_fov_deg,
            Orientation::Landscape => self.config.landscape_fov_deg,
        };
        let [x, y, z] = self.config.position;

        CameraState {
            fov_deg,
            aspect,
            near: self.config.near,
            far: self.config.far,
            world: Isometry3::translation(x, y, z),
            viewport,
        }
    }

    /// Report viewport dimensions, rebuilding the camera if they changed
    pub fn configure(&mut self, width: f64, height: f64) -> ViewportUpdate {
        let Some(viewport) = Viewport::new(width, height) else {
            debug!("Ignoring degenerate viewport {}x{}", width, height);
            return ViewportUpdate::Ignored;
        };

        let update = match &self.camera {
            Some(current) if current.viewport.same_size(&viewport) => return ViewportUpdate::Unchanged,
            Some(_) => ViewportUpdate::Reconfigured,
            None => ViewportUpdate::Configured,
        };

        let camera = self.camera_for(viewport);
        info!(
            "Camera {:?}: {}x{}, aspect {:.4}, fov {}°",
            update, width, height, camera.aspect, camera.fov_deg
        );
        self.camera = Some(camera);
        update
    }

    #[must_use]
    pub fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }

    /// Drop the camera; the next viewport report configures a fresh one
    pub fn reset(&mut self) {
        self.camera = None;
    }
}
