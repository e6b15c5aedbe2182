//! Headless application replaying recorded sessions through the pipeline.

use crate::{
    anchor::{AssetNode, AssetProvider},
    config::Config,
    detection::VideoFrame,
    error::Result,
    render::{RenderFrame, RenderSurface, TickOutcome},
    session::{AnchorSession, PoseUpdate, SessionStats},
    trace::{SessionTrace, TraceDetector, TraceEvent},
    utils::safe_cast::seconds_to_ms,
};
use log::{debug, info, warn};
use nalgebra::Matrix4;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Recorded session to replay
    pub trace_path: PathBuf,
    /// Pipeline configuration
    pub pipeline: Config,
}

/// Render surface that records what it was asked to draw
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    size: Option<(u32, u32)>,
    last_frame: Option<RenderFrame>,
    draws: u64,
}

impl HeadlessSurface {
    #[must_use]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RenderSurface for HeadlessSurface {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        info!("Render surface resized to {}x{}", width, height);
        self.size = Some((width, height));
        Ok(())
    }

    fn draw(&mut self, frame: &RenderFrame) -> Result<()> {
        debug!(
            "Tick {}: anchor at ({:.3}, {:.3}, {:.3}), visible {}",
            frame.tick,
            frame.anchor_world[(0, 3)],
            frame.anchor_world[(1, 3)],
            frame.anchor_world[(2, 3)],
            frame.visible
        );
        self.last_frame = Some(frame.clone());
        self.draws += 1;
        Ok(())
    }
}

/// Asset provider handing over one preloaded asset
struct LoadedAsset(Option<AssetNode>);

impl AssetProvider for LoadedAsset {
    fn poll(&mut self) -> Option<AssetNode> {
        self.0.take()
    }
}

/// What a replay produced
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    /// Pipeline counters
    pub stats: SessionStats,
    /// Frames drawn by the render loop
    pub frames_drawn: u64,
    /// Anchor world matrix after the last event
    pub anchor_world: Matrix4<f32>,
    /// Mounted asset world matrix after the last event
    pub asset_world: Option<Matrix4<f32>>,
    /// Anchor visibility after the last event
    pub visible: bool,
    /// Final render surface size
    pub surface_size: Option<(u32, u32)>,
}

/// Main application struct
pub struct HeadPoseAnchorApp {
    events: Vec<TraceEvent>,
    detector: Option<TraceDetector>,
    session: AnchorSession<HeadlessSurface>,
    next_tick: u64,
}

impl HeadPoseAnchorApp {
    /// Create the application from a trace file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the trace cannot be loaded
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Loading session trace from {}", config.trace_path.display());
        let trace = SessionTrace::from_file(&config.trace_path)?;
        Self::from_trace(trace, config.pipeline)
    }

    /// Create the application from an already loaded trace
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn from_trace(trace: SessionTrace, pipeline: Config) -> Result<Self> {
        pipeline.validate()?;
        info!("Replaying {} events", trace.events.len());
        Ok(Self {
            detector: Some(trace.detector()),
            events: trace.events,
            session: AnchorSession::new(pipeline, HeadlessSurface::default()),
            next_tick: 0,
        })
    }

    /// Replay every event in order
    ///
    /// # Errors
    ///
    /// Returns an error if a frame carries an invalid presentation timestamp
    pub fn run(&mut self) -> Result<ReplaySummary> {
        let events = self.events.clone();
        for event in &events {
            self.apply(event)?;
        }

        let stats = self.session.stats();
        info!(
            "Replay finished: {} poses applied, {} rejected, {} frames drawn",
            stats.poses_applied,
            stats.poses_rejected,
            self.session.frames_drawn()
        );

        let anchor = self.session.anchor();
        Ok(ReplaySummary {
            stats,
            frames_drawn: self.session.frames_drawn(),
            anchor_world: anchor.world_matrix(),
            asset_world: anchor.asset_world_matrix(),
            visible: anchor.is_visible(),
            surface_size: self.session.surface().size(),
        })
    }

    fn apply(&mut self, event: &TraceEvent) -> Result<()> {
        match event {
            TraceEvent::Viewport { width, height } => {
                self.session.on_viewport_change(*width, *height);
            }
            TraceEvent::Frame {
                timestamp,
                width,
                height,
                ..
            } => {
                let frame = VideoFrame {
                    width: *width,
                    height: *height,
                    timestamp: *timestamp,
                };
                let outcome = self.session.process_video_frame(&frame, seconds_to_ms(*timestamp)?);
                if outcome.pose == Some(PoseUpdate::Rejected) {
                    warn!("Frame at t={:.3}s carried a non-finite pose, anchor kept", timestamp);
                }
            }
            TraceEvent::Tick { count } => {
                for _ in 0..*count {
                    self.next_tick += 1;
                    if self.session.tick(self.next_tick) == TickOutcome::Failed {
                        warn!("Tick {} was not drawn", self.next_tick);
                    }
                }
            }
            TraceEvent::Visible { visible } => self.session.set_visible(*visible),
            TraceEvent::Start => self.session.start(),
            TraceEvent::Stop => self.session.stop(),
            TraceEvent::DetectorReady => match self.detector.take() {
                Some(detector) => self.session.install_detector(Box::new(detector)),
                None => debug!("Detector already installed"),
            },
            TraceEvent::AssetReady => {
                let name = self.session.config().asset.name.clone();
                self.session.install_asset_provider(Box::new(LoadedAsset(Some(AssetNode::new(name)))));
            }
            TraceEvent::Teardown => self.session.teardown(),
        }
        Ok(())
    }

    /// Pipeline session driven by this app
    #[must_use]
    pub fn session(&self) -> &AnchorSession<HeadlessSurface> {
        &self.session
    }
}
