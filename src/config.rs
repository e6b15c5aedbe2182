//! Configuration management for the head pose anchor pipeline

use crate::{
    constants::{
        DEFAULT_ASSET_NAME, DEFAULT_ASSET_OFFSET, DEFAULT_ASSET_SCALE, DEFAULT_ASSET_TILT_X_RAD,
        DEFAULT_CAMERA_POSITION, DEFAULT_FAR_CLIP, DEFAULT_LANDSCAPE_FOV_DEG, DEFAULT_NEAR_CLIP,
        DEFAULT_PORTRAIT_FOV_DEG,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render camera policy
    pub camera: CameraConfig,

    /// Placement of the anchored asset
    pub asset: AssetConfig,
}

/// Render camera policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view for landscape frames, in degrees
    pub landscape_fov_deg: f32,

    /// Vertical field of view for portrait frames, in degrees
    pub portrait_fov_deg: f32,

    /// Near clip plane
    pub near: f32,

    /// Far clip plane
    pub far: f32,

    /// Fixed camera position in world space
    pub position: [f32; 3],
}

/// Placement of the anchored asset relative to the anchor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset identifier
    pub name: String,

    /// Offset from the anchor origin
    pub offset: [f32; 3],

    /// Tilt about the local X axis, in radians
    pub tilt_x_rad: f32,

    /// Uniform scale
    pub scale: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            landscape_fov_deg: DEFAULT_LANDSCAPE_FOV_DEG,
            portrait_fov_deg: DEFAULT_PORTRAIT_FOV_DEG,
            near: DEFAULT_NEAR_CLIP,
            far: DEFAULT_FAR_CLIP,
            position: DEFAULT_CAMERA_POSITION,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ASSET_NAME.to_string(),
            offset: DEFAULT_ASSET_OFFSET,
            tilt_x_rad: DEFAULT_ASSET_TILT_X_RAD,
            scale: DEFAULT_ASSET_SCALE,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;
        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;
        Ok(())
    }

    /// Serialize configuration to YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        for (name, fov) in [
            ("Landscape", camera.landscape_fov_deg),
            ("Portrait", camera.portrait_fov_deg),
        ] {
            if !(fov > 0.0 && fov < 180.0) {
                return Err(Error::ConfigError(format!(
                    "{name} field of view must be between 0 and 180 degrees"
                )));
            }
        }
        if !(camera.near.is_finite() && camera.near > 0.0) {
            return Err(Error::ConfigError("Near clip plane must be greater than 0".to_string()));
        }
        if !(camera.far.is_finite() && camera.far > camera.near) {
            return Err(Error::ConfigError(
                "Far clip plane must be greater than the near clip plane".to_string(),
            ));
        }
        if !camera.position.iter().all(|v| v.is_finite()) {
            return Err(Error::ConfigError("Camera position must be finite".to_string()));
        }

        let asset = &self.asset;
        if !(asset.scale.is_finite() && asset.scale > 0.0) {
            return Err(Error::ConfigError("Asset scale must be greater than 0".to_string()));
        }
        if !asset.tilt_x_rad.is_finite() || !asset.offset.iter().all(|v| v.is_finite()) {
            return Err(Error::ConfigError("Asset placement must be finite".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Pose Anchor Configuration

# Render camera policy
camera:
  landscape_fov_deg: 50.0
  portrait_fov_deg: 65.0
  near: 0.1
  far: 1000.0
  position: [0.0, 0.0, 5.0]

# Anchored asset placement
asset:
  name: "hat_glb_bej.glb"
  offset: [0.0, 8.0, -7.5]
  tilt_x_rad: 0.1
  scale: 2.7
"#;
