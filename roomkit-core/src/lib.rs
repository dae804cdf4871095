//! `roomkit` client core
//!
//! Platform-independent state of a video conferencing client: who is in the
//! room, what they publish, and how their video lands on screen.
//!
//! ## Architecture
//!
//! - **`Peer`**: Immutable participant value with peer and per-track metadata
//! - **`PeerRegistry`**: Room peer set, updated by swapping in new `Peer` values
//! - **`RoomEvent`**: Signaling events applied to the registry
//! - **`VideoSurface`**: Frame-size event filter and draw rectangle for one track
//! - **`compute_draw_rect`**: Fit/fill geometry
//!
//! ## Usage
//!
//! ```rust
//! use roomkit_core::{Metadata, Peer, PeerId, PeerRegistry, TrackId, TrackMetadata};
//!
//! let registry = PeerRegistry::new();
//! let alice = PeerId::new("alice")?;
//! registry.insert(Peer::with_tracks(alice.clone(), Metadata::new(), TrackMetadata::new()));
//! registry.update(&alice, |peer| peer.with_track(TrackId::from("cam"), Metadata::new()))?;
//! assert_eq!(registry.track_owner(&TrackId::from("cam")), Some(alice));
//! # Ok::<(), roomkit_core::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod logging;

mod error;
mod events;
mod metadata;
mod peer;
mod registry;
mod surface;
mod track;
mod types;
mod viewport;

pub use config::{Config, LoggingConfig, SurfaceConfig};
pub use error::{Error, Result};
pub use events::RoomEvent;
pub use metadata::{Metadata, DISPLAY_NAME_KEY};
pub use peer::{Peer, PeerUpdate};
pub use registry::{PeerRegistry, RegistryStats};
pub use surface::{FrameSizeOutcome, SurfaceSnapshot, VideoSurface};
pub use track::TrackMetadata;
pub use types::{PeerId, TrackId};
pub use viewport::{compute_draw_rect, Dimensions, FitMode, Rect, Size, Transform, MIN_VALID_DIMENSION};
