//! Session context tying the camera, pose pipeline and loops together.
//!
//! All mutable pipeline state lives here and is owned by the caller. The
//! camera does not exist until the first viewport report. Render and
//! detection are driven independently through [`AnchorSession::tick`] and
//! [`AnchorSession::process_video_frame`]; they only meet through the camera
//! and anchor state held by the session.

use crate::{
    anchor::{AnchorState, AssetProvider},
    camera::{CameraState, ViewportCameraSync, ViewportUpdate},
    config::Config,
    detection::{DetectionLoop, DetectionStep, PoseDetector, VideoFrame},
    normalizer::{PoseComponents, PoseNormalizer},
    pose::PoseMatrix,
    render::{LoopState, RenderLoop, RenderSurface, TickOutcome},
    transform::SpaceTransformer,
    utils::safe_cast::f64_to_pixels,
    validity::ValidityGuard,
};
use log::{debug, info, warn};

/// Outcome of feeding a pose result into the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseUpdate {
    /// Anchor transform updated
    Applied,
    /// Pose had non-finite values; previous transform kept
    Rejected,
    /// No camera yet; pose discarded
    NoCamera,
    /// No face in this result
    NoPose,
}

/// Outcome of processing one video frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Camera change caused by the frame dimensions
    pub viewport: ViewportUpdate,
    /// Detection step result
    pub detection: DetectionStep,
    /// Pose update, when detection produced a result
    pub pose: Option<PoseUpdate>,
}

/// Counters for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub poses_applied: u64,
    pub poses_rejected: u64,
    pub poses_without_camera: u64,
    pub frames_skipped: u64,
    pub camera_rebuilds: u64,
}

/// Anchor pipeline state for one tracking session
pub struct AnchorSession<S: RenderSurface> {
    config: Config,
    camera_sync: ViewportCameraSync,
    normalizer: PoseNormalizer,
    guard: ValidityGuard,
    transformer: SpaceTransformer,
    anchor: AnchorState,
    render_loop: RenderLoop,
    detection: DetectionLoop,
    surface: S,
    detector: Option<Box<dyn PoseDetector>>,
    asset_provider: Option<Box<dyn AssetProvider>>,
    stats: SessionStats,
}

impl<S: RenderSurface> AnchorSession<S> {
    /// Create a session drawing to `surface`
    pub fn new(config: Config, surface: S) -> Self {
        info!("Initializing anchor session");
        Self {
            camera_sync: ViewportCameraSync::new(config.camera.clone()),
            config,
            normalizer: PoseNormalizer::new(),
            guard: ValidityGuard::new(),
            transformer: SpaceTransformer::new(),
            anchor: AnchorState::new(),
            render_loop: RenderLoop::new(),
            detection: DetectionLoop::new(),
            surface,
            detector: None,
            asset_provider: None,
            stats: SessionStats::default(),
        }
    }

    /// Install the face tracking model once it has loaded.
    ///
    /// Replaces any previous detector; the new one starts in image mode and
    /// is switched to video mode on the next frame.
    pub fn install_detector(&mut self, detector: Box<dyn PoseDetector>) {
        info!("Pose detector installed");
        self.detector = Some(detector);
        self.detection.reset_mode();
    }

    /// Install the source of the anchored asset
    pub fn install_asset_provider(&mut self, provider: Box<dyn AssetProvider>) {
        self.asset_provider = Some(provider);
    }

    /// Report new viewport dimensions.
    ///
    /// Rebuilds the camera and resizes the render surface when the
    /// dimensions changed; the first valid report activates rendering.
    pub fn on_viewport_change(&mut self, width: f64, height: f64) -> ViewportUpdate {
        let update = self.camera_sync.configure(width, height);
        if !update.is_rebuilt() {
            return update;
        }
        self.stats.camera_rebuilds += 1;

        match (f64_to_pixels(width), f64_to_pixels(height)) {
            (Ok(w), Ok(h)) => {
                if let Err(e) = self.surface.resize(w, h) {
                    warn!("Failed to resize render surface to {}x{}: {}", w, h, e);
                }
            }
            (Err(e), _) | (_, Err(e)) => warn!("Render surface left at previous size: {}", e),
        }

        self.render_loop.activate();
        update
    }

    /// Feed one pose result through validation, normalization and composition
    pub fn on_pose_result(&mut self, pose: Option<PoseMatrix>) -> PoseUpdate {
        let Some(pose) = pose else {
            return PoseUpdate::NoPose;
        };
        let Some(camera) = self.camera_sync.camera() else {
            debug!("Pose received before camera configuration, discarding");
            self.stats.poses_without_camera += 1;
            return PoseUpdate::NoCamera;
        };

        if !self.guard.accept(&pose) {
            self.stats.poses_rejected += 1;
            return PoseUpdate::Rejected;
        }

        let normalized = self.normalizer.normalize(&pose);
        let world = PoseMatrix::from_matrix(self.transformer.compose(&camera.world_matrix(), &normalized));
        // Degenerate scale can still blow up during normalization
        if !self.guard.accept(&world) {
            self.stats.poses_rejected += 1;
            return PoseUpdate::Rejected;
        }

        self.anchor.set_transform(*world.as_matrix());
        self.stats.poses_applied += 1;
        PoseUpdate::Applied
    }

    /// Handle a video frame: sync the camera to its size, then run detection
    pub fn process_video_frame(&mut self, frame: &VideoFrame, now_ms: f64) -> FrameOutcome {
        let viewport = self.on_viewport_change(frame.width, frame.height);

        let detector = self.detector.as_mut().map(|d| &mut **d as &mut dyn PoseDetector);
        let detection = self.detection.step(frame, detector, now_ms);

        let pose = match &detection {
            DetectionStep::Detected(pose) => Some(self.on_pose_result(*pose)),
            DetectionStep::Skipped => {
                self.stats.frames_skipped += 1;
                None
            }
            _ => None,
        };

        FrameOutcome {
            viewport,
            detection,
            pose,
        }
    }

    /// Render tick: mount the asset if it just arrived, then draw
    pub fn tick(&mut self, tick: u64) -> TickOutcome {
        if self.anchor.asset().is_none() {
            if let Some(asset) = self.asset_provider.as_mut().and_then(|p| p.poll()) {
                self.anchor.attach_asset(asset.mounted(&self.config.asset));
            }
        }

        self.render_loop
            .tick(tick, self.camera_sync.camera(), &self.anchor, &mut self.surface)
    }

    /// Rest placement of the anchor, used until tracking takes over and
    /// again after teardown
    pub fn set_anchor_local(&mut self, components: PoseComponents) {
        self.anchor.set_local(components);
    }

    /// User visibility toggle
    pub fn set_visible(&mut self, visible: bool) {
        debug!("Anchor visibility set to {}", visible);
        self.anchor.set_visible(visible);
    }

    /// Start the detection cycle
    pub fn start(&mut self) {
        self.detection.start();
    }

    /// Stop the detection cycle; rendering continues with the last anchor
    pub fn stop(&mut self) {
        self.detection.stop();
    }

    /// Flip the detection running state, returning the new one
    pub fn toggle_detection(&mut self) -> bool {
        self.detection.toggle()
    }

    /// Tear down the camera, stop detection and idle the render loop
    pub fn teardown(&mut self) {
        info!("Tearing down anchor session");
        self.detection.stop();
        self.camera_sync.reset();
        self.render_loop.deactivate();
        self.anchor.release_transform();
    }

    #[must_use]
    pub fn camera(&self) -> Option<&CameraState> {
        self.camera_sync.camera()
    }

    #[must_use]
    pub fn anchor(&self) -> &AnchorState {
        &self.anchor
    }

    #[must_use]
    pub fn render_state(&self) -> LoopState {
        self.render_loop.state()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.detection.is_running()
    }

    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.render_loop.frames_drawn()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
