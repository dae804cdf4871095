//! Session script replay
//!
//! A script is a JSON-lines recording of what a client saw during a call:
//! signaling events for the room and frame-size/layout events for one video
//! surface. Blank lines and `#` comments are skipped.

use anyhow::{Context, Result};
use roomkit_core::{
    FitMode, FrameSizeOutcome, Peer, PeerRegistry, RegistryStats, RoomEvent, Size,
    SurfaceSnapshot, VideoSurface,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One line of a session script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScriptStep {
    Room { event: RoomEvent },
    FrameSize { width: i32, height: i32 },
    Viewport { width: f64, height: f64 },
    FitMode { mode: FitMode },
    Mirror { enabled: bool },
}

/// Parse a script, reporting the 1-based line of the first malformed entry
pub fn parse_script(input: &str) -> Result<Vec<ScriptStep>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid script entry on line {}", index + 1))
        })
        .collect()
}

/// Counters gathered while replaying
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayCounters {
    pub room_events: usize,
    pub failed_room_events: usize,
    pub frame_reports: usize,
    pub rejected_frame_reports: usize,
    pub dimension_changes: usize,
    pub rejected_viewports: usize,
}

/// Final state printed after a replay
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub peers: Vec<Peer>,
    pub stats: RegistryStats,
    pub surface: SurfaceSnapshot,
    pub counters: ReplayCounters,
}

/// Applies script steps to a room registry and a video surface
pub struct Replay {
    registry: PeerRegistry,
    surface: VideoSurface,
    counters: ReplayCounters,
}

impl Replay {
    #[must_use]
    pub fn new(surface: VideoSurface) -> Self {
        Self {
            registry: PeerRegistry::new(),
            surface,
            counters: ReplayCounters::default(),
        }
    }

    /// Apply one step. Failing room events and rejected frame sizes are
    /// logged and counted; they do not stop the replay.
    pub fn step(&mut self, step: ScriptStep) {
        match step {
            ScriptStep::Room { event } => {
                self.counters.room_events += 1;
                let peer_id = event.peer_id().clone();
                if let Err(e) = self.registry.apply(event) {
                    self.counters.failed_room_events += 1;
                    warn!(peer_id = %peer_id, error = %e, "Room event failed");
                }
            }
            ScriptStep::FrameSize { width, height } => {
                self.counters.frame_reports += 1;
                match self.surface.on_frame_size(width, height) {
                    FrameSizeOutcome::Rejected => {
                        self.counters.rejected_frame_reports += 1;
                        warn!(width, height, "Discarding invalid frame size report");
                    }
                    FrameSizeOutcome::Unchanged => {}
                    FrameSizeOutcome::Changed(dimensions) => {
                        self.counters.dimension_changes += 1;
                        debug!(
                            width = dimensions.width(),
                            height = dimensions.height(),
                            "Surface dimensions changed"
                        );
                    }
                }
            }
            ScriptStep::Viewport { width, height } => match Size::new(width, height) {
                Some(viewport) => self.surface.set_viewport(viewport),
                None => {
                    self.counters.rejected_viewports += 1;
                    warn!(width, height, "Discarding invalid viewport");
                }
            },
            ScriptStep::FitMode { mode } => self.surface.set_fit_mode(mode),
            ScriptStep::Mirror { enabled } => {
                if self.surface.set_mirror(enabled) {
                    info!(enabled, "Mirror changed");
                }
            }
        }
    }

    pub fn run(&mut self, steps: impl IntoIterator<Item = ScriptStep>) {
        for step in steps {
            self.step(step);
        }
    }

    #[must_use]
    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary {
            peers: self.registry.peers(),
            stats: self.registry.stats(),
            surface: self.surface.snapshot(),
            counters: self.counters.clone(),
        }
    }
}
