//! Room participant model
//!
//! This module handles:
//! - The immutable `Peer` value (id, peer metadata, track metadata)
//! - Partial updates through `PeerUpdate`
//! - Track publication and removal as value transformations
//!
//! Every operation takes `&self` and returns a new `Peer`; callers replace the
//! stored value (see `PeerRegistry`) instead of mutating it.

use crate::metadata::Metadata;
use crate::track::TrackMetadata;
use crate::types::{PeerId, TrackId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A conference participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    id: PeerId,

    #[serde(default)]
    metadata: Metadata,

    /// `None`: no tracks published. `Some(empty)`: tracks tracked, none with
    /// metadata yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    track_id_to_metadata: Option<TrackMetadata>,
}

/// Partial update applied by [`Peer::with`]. Unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct PeerUpdate {
    id: Option<PeerId>,
    metadata: Option<Metadata>,
    track_id_to_metadata: Option<Option<TrackMetadata>>,
}

impl PeerUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(mut self, id: PeerId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[must_use]
    pub fn track_id_to_metadata(mut self, tracks: impl Into<TrackMetadata>) -> Self {
        self.track_id_to_metadata = Some(Some(tracks.into()));
        self
    }

    /// Reset the track mapping to "no tracks published"
    #[must_use]
    pub fn without_track_mapping(mut self) -> Self {
        self.track_id_to_metadata = Some(None);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_none() && self.metadata.is_none() && self.track_id_to_metadata.is_none()
    }
}

impl Peer {
    /// Create a peer with no track mapping
    #[must_use]
    pub fn new(id: PeerId, metadata: Metadata) -> Self {
        Self {
            id,
            metadata,
            track_id_to_metadata: None,
        }
    }

    #[must_use]
    pub fn with_tracks(id: PeerId, metadata: Metadata, tracks: impl Into<TrackMetadata>) -> Self {
        Self {
            id,
            metadata,
            track_id_to_metadata: Some(tracks.into()),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &PeerId {
        &self.id
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub const fn track_id_to_metadata(&self) -> Option<&TrackMetadata> {
        self.track_id_to_metadata.as_ref()
    }

    #[must_use]
    pub fn track_metadata(&self, track_id: &TrackId) -> Option<&Metadata> {
        self.track_id_to_metadata.as_ref()?.get(track_id)
    }

    #[must_use]
    pub fn has_track(&self, track_id: &TrackId) -> bool {
        self.track_id_to_metadata
            .as_ref()
            .is_some_and(|tracks| tracks.contains(track_id))
    }

    /// Sorted track ids; empty when the mapping is absent
    #[must_use]
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.track_id_to_metadata
            .as_ref()
            .map(TrackMetadata::track_ids)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.track_id_to_metadata.as_ref().map_or(0, TrackMetadata::len)
    }

    /// Apply a partial update
    #[must_use]
    pub fn with(&self, update: PeerUpdate) -> Self {
        let PeerUpdate {
            id,
            metadata,
            track_id_to_metadata,
        } = update;

        Self {
            id: id.unwrap_or_else(|| self.id.clone()),
            metadata: metadata.unwrap_or_else(|| self.metadata.clone()),
            track_id_to_metadata: track_id_to_metadata
                .unwrap_or_else(|| self.track_id_to_metadata.clone()),
        }
    }

    /// Add or replace the metadata of one track.
    ///
    /// Has no effect on the mapping while it is absent: the caller has to
    /// establish one with `PeerUpdate::track_id_to_metadata` first.
    #[must_use]
    pub fn with_track(&self, track_id: TrackId, metadata: Metadata) -> Self {
        let Some(tracks) = &self.track_id_to_metadata else {
            debug!(
                peer_id = %self.id,
                track_id = %track_id,
                "Track mapping absent, track metadata not recorded"
            );
            return self.clone();
        };

        Self {
            track_id_to_metadata: Some(tracks.inserted(track_id, metadata)),
            ..self.clone()
        }
    }

    /// Drop one track; a no-op when the mapping or the key is absent
    #[must_use]
    pub fn without_track(&self, track_id: &TrackId) -> Self {
        Self {
            track_id_to_metadata: self
                .track_id_to_metadata
                .as_ref()
                .map(|tracks| tracks.removed(track_id)),
            ..self.clone()
        }
    }
}
