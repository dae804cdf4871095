//! Video surface state
//!
//! Sits between the media engine, which reports frame sizes from its capture
//! thread, and the renderer, which reads the draw rectangle and transform.
//! Observers registered through [`VideoSurface::subscribe`] receive the new
//! dimensions whenever an accepted report differs from the previous one.

use crate::config::SurfaceConfig;
use crate::error::{Error, Result};
use crate::viewport::{compute_draw_rect, Dimensions, FitMode, Rect, Size, Transform};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Result of feeding one frame-size report to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSizeOutcome {
    /// Width or height `<= 1`; state untouched
    Rejected,
    /// Same as the last accepted dimensions
    Unchanged,
    /// New dimensions stored, draw rectangle recomputed, observers notified
    Changed(Dimensions),
}

/// Point-in-time view of the surface, as handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSnapshot {
    pub dimensions: Option<Dimensions>,
    pub viewport: Size,
    pub fit_mode: FitMode,
    pub draw_rect: Option<Rect>,
    pub transform: Transform,
}

struct SurfaceState {
    dimensions: Option<Dimensions>,
    viewport: Size,
    fit_mode: FitMode,
    draw_rect: Option<Rect>,
    mirror: bool,
    observers: Vec<mpsc::UnboundedSender<Dimensions>>,
}

impl SurfaceState {
    fn recompute(&mut self) {
        if let Some(dimensions) = self.dimensions {
            self.draw_rect = Some(compute_draw_rect(dimensions, self.viewport, self.fit_mode));
        }
    }

    fn notify(&mut self, dimensions: Dimensions) {
        self.observers.retain(|tx| tx.send(dimensions).is_ok());
    }
}

/// Renders one remote or local video track into a viewport
pub struct VideoSurface {
    state: Mutex<SurfaceState>,
}

impl VideoSurface {
    #[must_use]
    pub fn new(viewport: Size, fit_mode: FitMode) -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                dimensions: None,
                viewport,
                fit_mode,
                draw_rect: None,
                mirror: false,
                observers: Vec::new(),
            }),
        }
    }

    pub fn from_config(config: &SurfaceConfig) -> Result<Self> {
        let viewport = Size::new(config.viewport_width, config.viewport_height).ok_or_else(|| {
            Error::InvalidInput(format!(
                "viewport must be positive, got {}x{}",
                config.viewport_width, config.viewport_height
            ))
        })?;
        let surface = Self::new(viewport, config.fit_mode);
        surface.set_mirror(config.mirror);
        Ok(surface)
    }

    /// Register an observer for dimension changes
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Dimensions> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().observers.push(tx);
        rx
    }

    /// Handle a frame-size report from the media engine
    pub fn on_frame_size(&self, width: i32, height: i32) -> FrameSizeOutcome {
        let Some(dimensions) = Dimensions::from_report(width, height) else {
            return FrameSizeOutcome::Rejected;
        };

        let mut state = self.state.lock();
        if state.dimensions == Some(dimensions) {
            return FrameSizeOutcome::Unchanged;
        }

        debug!(
            old = ?state.dimensions,
            width = dimensions.width(),
            height = dimensions.height(),
            "Video dimensions changed"
        );
        state.dimensions = Some(dimensions);
        state.recompute();
        state.notify(dimensions);

        FrameSizeOutcome::Changed(dimensions)
    }

    /// Update the viewport after a layout pass
    pub fn set_viewport(&self, viewport: Size) {
        let mut state = self.state.lock();
        if state.viewport != viewport {
            state.viewport = viewport;
            state.recompute();
        }
    }

    pub fn set_fit_mode(&self, fit_mode: FitMode) {
        let mut state = self.state.lock();
        if state.fit_mode != fit_mode {
            state.fit_mode = fit_mode;
            state.recompute();
        }
    }

    /// Toggle the horizontal flip. Returns whether the transform changed.
    pub fn set_mirror(&self, mirror: bool) -> bool {
        let mut state = self.state.lock();
        if state.mirror == mirror {
            return false;
        }
        state.mirror = mirror;
        debug!(mirror, "Video mirror toggled");
        true
    }

    #[must_use]
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.state.lock().dimensions
    }

    /// Last computed draw rectangle; `None` until the first accepted report
    #[must_use]
    pub fn draw_rect(&self) -> Option<Rect> {
        self.state.lock().draw_rect
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::for_mirror(self.state.lock().mirror)
    }

    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.state.lock().mirror
    }

    #[must_use]
    pub fn fit_mode(&self) -> FitMode {
        self.state.lock().fit_mode
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.state.lock().viewport
    }

    #[must_use]
    pub fn snapshot(&self) -> SurfaceSnapshot {
        let state = self.state.lock();
        SurfaceSnapshot {
            dimensions: state.dimensions,
            viewport: state.viewport,
            fit_mode: state.fit_mode,
            draw_rect: state.draw_rect,
            transform: Transform::for_mirror(state.mirror),
        }
    }
}
