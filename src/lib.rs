//! Head pose anchoring library for placing a 3D object on a tracked head.
//!
//! An external face tracking model reports one 4x4 camera-space transform per
//! face and video frame. This library turns that transform into the world
//! transform of an anchored object and keeps the render camera matched to
//! the video feed:
//! 1. The camera is rebuilt whenever the video frame dimensions change
//! 2. Poses with non-finite values are rejected, keeping the last good one
//! 3. Anisotropic pose scale is replaced by its mean
//! 4. The normalized pose is composed with the camera's world transform
//! 5. A render loop redraws the anchor every tick, independent of detection
//!
//! # Examples
//!
//! ## Pose pipeline
//!
//! ```no_run
//! use head_pose_anchor::{
//!     config::Config,
//!     pose::PoseMatrix,
//!     render::{RenderFrame, RenderSurface},
//!     session::{AnchorSession, PoseUpdate},
//! };
//!
//! struct Canvas;
//!
//! impl RenderSurface for Canvas {
//!     fn resize(&mut self, _width: u32, _height: u32) -> head_pose_anchor::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn draw(&mut self, frame: &RenderFrame) -> head_pose_anchor::Result<()> {
//!         println!("anchor: {}", frame.anchor_world);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = AnchorSession::new(Config::default(), Canvas);
//!
//! // The first frame tells us the real capture resolution
//! session.on_viewport_change(1920.0, 1080.0);
//!
//! // Feed the face transform reported by the tracker
//! let raw = [1.0, 0.0, 0.0, 0.0, 0.0, 1.2, 0.0, 0.0, 0.0, 0.0, 0.8, 0.0, 0.0, 0.0, -40.0, 1.0];
//! let update = session.on_pose_result(Some(PoseMatrix::from_column_slice(&raw)?));
//! assert_eq!(update, PoseUpdate::Applied);
//!
//! // Draw on every display refresh
//! session.tick(1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Normalizing a pose on its own
//!
//! ```no_run
//! use head_pose_anchor::{normalizer::PoseNormalizer, pose::PoseMatrix};
//!
//! let normalizer = PoseNormalizer::new();
//! let normalized = normalizer.normalize(&PoseMatrix::identity());
//! let parts = normalizer.decompose(&normalized);
//! println!("uniform scale: {}", parts.mean_scale());
//! ```

/// Head pose matrices from the face tracker
pub mod pose;

/// Isotropic scale normalization of poses
pub mod normalizer;

/// Rejection of non-finite poses
pub mod validity;

/// Camera-space to world-space composition
pub mod transform;

/// Render camera synchronized with the video frame size
pub mod camera;

/// Anchored node state and asset mounting
pub mod anchor;

/// Render loop state machine
pub mod render;

/// Detection cycle and detector interface
pub mod detection;

/// Session context object exposed to collaborators
pub mod session;

/// Recorded session traces
pub mod trace;

/// Utility functions for dimension and timestamp conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Headless replay application
pub mod app;

/// Constants used throughout the pipeline
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
