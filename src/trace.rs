//! Recorded session traces for headless replay.
//!
//! A trace is a YAML document listing what the browser side of a session
//! reported, in order: viewport sizes, video frames with the detector's
//! face transform, display ticks, and the user's button presses.

use crate::{
    detection::{DetectionResult, Landmark, PoseDetector, RunningMode, VideoFrame},
    Error, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One recorded event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Video dimensions were reported ahead of a frame
    Viewport { width: f64, height: f64 },
    /// A video frame arrived
    Frame {
        timestamp: f64,
        width: f64,
        height: f64,
        /// Column-major face transform, absent when no face was found
        #[serde(default)]
        pose: Option<Vec<f32>>,
        /// Face landmarks as `[x, y, z]`, recorded for overlay replay
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        landmarks: Vec<[f32; 3]>,
    },
    /// Display refresh ticks
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },
    /// Visibility button
    Visible { visible: bool },
    /// Webcam button switched detection on
    Start,
    /// Webcam button switched detection off
    Stop,
    /// Face tracking model finished loading
    DetectorReady,
    /// Asset finished loading
    AssetReady,
    /// Session shut down
    Teardown,
}

fn default_tick_count() -> u32 {
    1
}

/// Ordered list of recorded events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTrace {
    pub events: Vec<TraceEvent>,
}

impl SessionTrace {
    /// Load a trace from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a trace from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid trace
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::TraceError(format!("Failed to parse trace: {}", e)))
    }

    /// Detector answering with the poses and landmarks recorded in this trace
    #[must_use]
    pub fn detector(&self) -> TraceDetector {
        let mut faces = HashMap::new();
        for event in &self.events {
            if let TraceEvent::Frame {
                timestamp,
                pose,
                landmarks,
                ..
            } = event
            {
                faces.entry(timestamp.to_bits()).or_insert_with(|| RecordedFace {
                    pose: pose.clone(),
                    landmarks: landmarks.iter().map(|&[x, y, z]| Landmark { x, y, z }).collect(),
                });
            }
        }
        TraceDetector { faces, mode: None }
    }
}

#[derive(Debug, Clone)]
struct RecordedFace {
    pose: Option<Vec<f32>>,
    landmarks: Vec<Landmark>,
}

/// Pose detector replaying recorded face transforms by frame timestamp
#[derive(Debug)]
pub struct TraceDetector {
    faces: HashMap<u64, RecordedFace>,
    mode: Option<RunningMode>,
}

impl PoseDetector for TraceDetector {
    fn set_running_mode(&mut self, mode: RunningMode) -> Result<()> {
        debug!("Trace detector running mode: {:?}", mode);
        self.mode = Some(mode);
        Ok(())
    }

    fn detect_for_video(&mut self, frame: &VideoFrame, _now_ms: f64) -> Result<Option<DetectionResult>> {
        if self.mode != Some(RunningMode::Video) {
            return Err(Error::DetectorError("Detector is not in video mode".to_string()));
        }
        let Some(recorded) = self.faces.get(&frame.timestamp.to_bits()) else {
            return Ok(None);
        };
        let face_landmarks = if recorded.landmarks.is_empty() {
            Vec::new()
        } else {
            vec![recorded.landmarks.clone()]
        };
        Ok(Some(DetectionResult {
            face_landmarks,
            facial_transformation_matrixes: recorded.pose.iter().cloned().collect(),
        }))
    }
}
