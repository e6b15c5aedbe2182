//! Constants used throughout the pipeline

/// Number of values in a column-major 4x4 pose matrix
pub const POSE_MATRIX_LEN: usize = 16;

/// Vertical field of view for landscape frames (aspect >= 1), in degrees
pub const DEFAULT_LANDSCAPE_FOV_DEG: f32 = 50.0;

/// Vertical field of view for portrait frames (aspect < 1), in degrees
pub const DEFAULT_PORTRAIT_FOV_DEG: f32 = 65.0;

/// Camera clip planes
pub const DEFAULT_NEAR_CLIP: f32 = 0.1;
pub const DEFAULT_FAR_CLIP: f32 = 1000.0;

/// Fixed camera position in world space
pub const DEFAULT_CAMERA_POSITION: [f32; 3] = [0.0, 0.0, 5.0];

/// Aspect ratio at which a frame stops being portrait
pub const PORTRAIT_ASPECT_THRESHOLD: f32 = 1.0;

/// Default asset placement relative to the anchor
pub const DEFAULT_ASSET_NAME: &str = "hat_glb_bej.glb";
pub const DEFAULT_ASSET_OFFSET: [f32; 3] = [0.0, 8.0, -7.5];
pub const DEFAULT_ASSET_TILT_X_RAD: f32 = 0.1;
pub const DEFAULT_ASSET_SCALE: f32 = 2.7;

/// Milliseconds per second, for presentation timestamp conversion
pub const MS_PER_SECOND: f64 = 1000.0;

/// Tolerance used when comparing floating point viewport dimensions
pub const DIMENSION_EPSILON: f64 = 1e-9;
