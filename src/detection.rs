//! Detection cycle: runs the pose detector once per new video frame.
//!
//! The detector is an external collaborator. It starts out in still-image
//! mode and has to be switched to video mode before per-frame detection; the
//! switch costs one step. After that a frame is only handed to the detector
//! when its presentation timestamp has moved since the last detection.

use crate::{pose::PoseMatrix, Result};
use log::{debug, info, warn};

/// Detector operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningMode {
    /// Single still images
    Image,
    /// A stream of frames with timestamps
    Video,
}

/// One frame from the video source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoFrame {
    /// Frame width in pixels
    pub width: f64,
    /// Frame height in pixels
    pub height: f64,
    /// Presentation timestamp in seconds, non-decreasing
    pub timestamp: f64,
}

/// Normalized image-space landmark.
///
/// Landmarks are carried through for debug overlays drawn by the caller; the
/// anchor pipeline only consumes the transformation matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Detector output for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    /// Landmarks per detected face, passed through untouched
    pub face_landmarks: Vec<Vec<Landmark>>,
    /// One column-major 4x4 matrix per detected face
    pub facial_transformation_matrixes: Vec<Vec<f32>>,
}

impl DetectionResult {
    /// Pose of the first detected face.
    ///
    /// Only the first face drives the anchor. A matrix with the wrong number of
    /// values is treated as missing.
    #[must_use]
    pub fn primary_pose(&self) -> Option<PoseMatrix> {
        let data = self.facial_transformation_matrixes.first()?;
        match PoseMatrix::from_column_slice(data) {
            Ok(pose) => Some(pose),
            Err(e) => {
                warn!("Discarding malformed face transform: {}", e);
                None
            }
        }
    }
}

/// Face tracking model
pub trait PoseDetector {
    /// Switch the detector between image and video operation
    ///
    /// # Errors
    ///
    /// Returns an error if the detector cannot change mode
    fn set_running_mode(&mut self, mode: RunningMode) -> Result<()>;

    /// Run detection on a video frame
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails
    fn detect_for_video(&mut self, frame: &VideoFrame, now_ms: f64) -> Result<Option<DetectionResult>>;
}

/// Outcome of one detection step
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionStep {
    /// Detection is switched off
    Stopped,
    /// No detector installed yet
    NoDetector,
    /// Detector was moved to video mode; detection resumes next step
    ModeSwitched,
    /// Presentation timestamp has not advanced
    Skipped,
    /// Detector failed on this frame
    Failed,
    /// Detector ran; pose of the first face if one was found
    Detected(Option<PoseMatrix>),
}

/// Running state and frame bookkeeping of the detection cycle
#[derive(Debug)]
pub struct DetectionLoop {
    running: bool,
    mode: RunningMode,
    last_video_time: Option<f64>,
    detections: u64,
}

impl Default for DetectionLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionLoop {
    #[must_use]
    pub fn new() -> Self {
        Self {
            running: false,
            mode: RunningMode::Image,
            last_video_time: None,
            detections: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("Detection started");
            self.running = true;
        }
    }

    /// Stop detection; takes effect on the next step
    pub fn stop(&mut self) {
        if self.running {
            info!("Detection stopped");
            self.running = false;
        }
    }

    /// Flip the running state, returning the new one
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
        self.running
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn mode(&self) -> RunningMode {
        self.mode
    }

    /// Number of frames handed to the detector
    #[must_use]
    pub fn detections(&self) -> u64 {
        self.detections
    }

    /// Forget the detector's running mode and the last detected timestamp.
    ///
    /// Called when a detector is installed; the next step switches it to
    /// video mode before any detection.
    pub fn reset_mode(&mut self) {
        self.mode = RunningMode::Image;
        self.last_video_time = None;
    }

    /// Run one step of the detection cycle for `frame`
    pub fn step(&mut self, frame: &VideoFrame, detector: Option<&mut dyn PoseDetector>, now_ms: f64) -> DetectionStep {
        if !self.running {
            return DetectionStep::Stopped;
        }
        let Some(detector) = detector else {
            debug!("No detector available, skipping frame");
            return DetectionStep::NoDetector;
        };

        if self.mode == RunningMode::Image {
            if let Err(e) = detector.set_running_mode(RunningMode::Video) {
                warn!("Failed to switch detector to video mode: {}", e);
                return DetectionStep::Failed;
            }
            self.mode = RunningMode::Video;
            return DetectionStep::ModeSwitched;
        }

        // Exact comparison: any change in presentation time is a new frame
        let unchanged = self.last_video_time.is_some_and(|last| last.to_bits() == frame.timestamp.to_bits());
        if unchanged {
            return DetectionStep::Skipped;
        }
        self.last_video_time = Some(frame.timestamp);
        self.detections += 1;

        match detector.detect_for_video(frame, now_ms) {
            Ok(result) => DetectionStep::Detected(result.as_ref().and_then(DetectionResult::primary_pose)),
            Err(e) => {
                warn!("Pose detection failed at t={:.3}s: {}", frame.timestamp, e);
                DetectionStep::Failed
            }
        }
    }
}
