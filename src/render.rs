//! Render loop: redraws the scene on every display refresh tick.
//!
//! Rendering is decoupled from detection. Once a camera exists every tick
//! draws the last known anchor state, whether or not a new pose arrived
//! since the previous tick.

use crate::{anchor::AnchorState, camera::CameraState, Result};
use log::{debug, info, warn};
use nalgebra::Matrix4;

/// Snapshot handed to the render surface for one draw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Display tick this frame belongs to
    pub tick: u64,
    /// Camera used for the draw
    pub camera: CameraState,
    /// World matrix of the anchor
    pub anchor_world: Matrix4<f32>,
    /// World matrix of the mounted asset, if it has arrived
    pub asset_world: Option<Matrix4<f32>>,
    /// Whether the anchored object should be drawn
    pub visible: bool,
}

/// Drawable target sized to the viewport
pub trait RenderSurface {
    /// Resize the backing buffer to match the viewport
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be resized
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Draw one frame
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails
    fn draw(&mut self, frame: &RenderFrame) -> Result<()>;
}

/// Render loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No camera configured, nothing drawn
    Idle,
    /// Camera configured, drawing every tick
    Active,
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame drawn
    Drawn,
    /// Loop is idle
    Idle,
    /// This tick number was already drawn
    Duplicate,
    /// Surface reported an error
    Failed,
}

/// Idle/active state machine driving the render surface
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    last_tick: Option<u64>,
    frames_drawn: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            last_tick: None,
            frames_drawn: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Enter the active state; called once a camera exists
    pub fn activate(&mut self) {
        if self.state == LoopState::Idle {
            info!("Render loop active");
            self.state = LoopState::Active;
        }
    }

    /// Return to idle when the camera is torn down.
    ///
    /// Tick history is cleared, so a restarted session may count ticks from 1.
    pub fn deactivate(&mut self) {
        if self.state == LoopState::Active {
            info!("Render loop idle after {} frames", self.frames_drawn);
            self.state = LoopState::Idle;
        }
        self.last_tick = None;
    }

    /// Draw tick `tick` if the loop is active.
    ///
    /// Each tick number is drawn at most once. A failed draw still consumes
    /// its tick; the next tick retries with fresh state.
    pub fn tick(
        &mut self,
        tick: u64,
        camera: Option<&CameraState>,
        anchor: &AnchorState,
        surface: &mut dyn RenderSurface,
    ) -> TickOutcome {
        if self.state == LoopState::Idle {
            return TickOutcome::Idle;
        }
        let Some(camera) = camera else {
            warn!("Render loop active without a camera, going idle");
            self.state = LoopState::Idle;
            self.last_tick = None;
            return TickOutcome::Idle;
        };
        if self.last_tick.is_some_and(|last| tick <= last) {
            debug!("Tick {} already handled", tick);
            return TickOutcome::Duplicate;
        }
        self.last_tick = Some(tick);

        let frame = RenderFrame {
            tick,
            camera: *camera,
            anchor_world: anchor.world_matrix(),
            asset_world: anchor.asset_world_matrix(),
            visible: anchor.is_visible(),
        };

        match surface.draw(&frame) {
            Ok(()) => {
                self.frames_drawn += 1;
                TickOutcome::Drawn
            }
            Err(e) => {
                warn!("Draw failed on tick {}: {}", tick, e);
                TickOutcome::Failed
            }
        }
    }
}
