//! The anchored node: world transform, visibility and mounted asset.

use crate::{config::AssetConfig, normalizer::PoseComponents};
use log::{debug, info};
use nalgebra::{Matrix4, UnitQuaternion, Vector3};

/// How the anchor's world matrix is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    /// Derived from the node's own translation, rotation and scale
    Auto,
    /// Assigned directly by pose tracking
    External,
}

/// Opaque renderable handed over by the asset provider
#[derive(Debug, Clone, PartialEq)]
pub struct AssetNode {
    /// Asset identifier, usually its file name
    pub name: String,
    /// Placement relative to the anchor
    pub local: Matrix4<f32>,
}

impl AssetNode {
    /// Asset with an identity placement
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Matrix4::identity(),
        }
    }

    /// Apply the configured offset, tilt and uniform scale
    #[must_use]
    pub fn mounted(mut self, config: &AssetConfig) -> Self {
        let placement = PoseComponents {
            translation: Vector3::from(config.offset),
            rotation: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), config.tilt_x_rad),
            scale: Vector3::repeat(config.scale),
        };
        self.local = placement.to_matrix();
        self
    }
}

/// Source of the anchored asset, which may arrive at any point in the session
pub trait AssetProvider {
    /// The asset once it is ready, `None` while it is still loading
    fn poll(&mut self) -> Option<AssetNode>;
}

/// Current transform and visibility of the anchored object
#[derive(Debug, Clone)]
pub struct AnchorState {
    mode: TransformMode,
    local: PoseComponents,
    matrix: Matrix4<f32>,
    visible: bool,
    asset: Option<AssetNode>,
}

impl Default for AnchorState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: TransformMode::Auto,
            local: PoseComponents {
                translation: Vector3::zeros(),
                rotation: UnitQuaternion::identity(),
                scale: Vector3::repeat(1.0),
            },
            matrix: Matrix4::identity(),
            visible: true,
            asset: None,
        }
    }

    /// Assign the world matrix directly and hand control to pose tracking
    pub(crate) fn set_transform(&mut self, matrix: Matrix4<f32>) {
        if self.mode == TransformMode::Auto {
            debug!("Anchor switched to externally driven transform");
            self.mode = TransformMode::External;
        }
        self.matrix = matrix;
    }

    /// Return to the node's own components, dropping the tracked matrix
    pub(crate) fn release_transform(&mut self) {
        self.mode = TransformMode::Auto;
        self.matrix = self.local.to_matrix();
    }

    /// Set the node's own translation, rotation and scale.
    ///
    /// These drive the world matrix in `Auto` mode, before the first tracked
    /// pose and again after the tracked transform is released.
    pub fn set_local(&mut self, components: PoseComponents) {
        self.local = components;
    }

    #[must_use]
    pub fn local(&self) -> &PoseComponents {
        &self.local
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// World matrix for the current mode
    #[must_use]
    pub fn world_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            TransformMode::Auto => self.local.to_matrix(),
            TransformMode::External => self.matrix,
        }
    }

    /// Parent an asset under the anchor, replacing any previous one
    pub fn attach_asset(&mut self, asset: AssetNode) {
        info!("Asset '{}' attached to anchor", asset.name);
        self.asset = Some(asset);
    }

    #[must_use]
    pub fn asset(&self) -> Option<&AssetNode> {
        self.asset.as_ref()
    }

    /// World matrix of the mounted asset, if any
    #[must_use]
    pub fn asset_world_matrix(&self) -> Option<Matrix4<f32>> {
        self.asset.as_ref().map(|asset| self.world_matrix() * asset.local)
    }
}
