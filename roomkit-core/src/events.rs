use crate::metadata::Metadata;
use crate::peer::Peer;
use crate::types::{PeerId, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Room membership and track changes reported by the signaling layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RoomEvent {
    /// Peer joined the room (or was re-announced with fresh state)
    PeerJoined { peer: Peer },

    /// Peer left the room
    PeerLeft { peer_id: PeerId },

    /// Peer-level metadata changed
    PeerUpdated { peer_id: PeerId, metadata: Metadata },

    /// Peer published new tracks
    TracksAdded {
        peer_id: PeerId,
        track_id_to_metadata: HashMap<TrackId, Metadata>,
    },

    /// Peer stopped publishing tracks
    TracksRemoved {
        peer_id: PeerId,
        track_ids: Vec<TrackId>,
    },

    /// Metadata of a single published track changed
    TrackUpdated {
        peer_id: PeerId,
        track_id: TrackId,
        metadata: Metadata,
    },
}

impl RoomEvent {
    /// Peer the event is about
    #[must_use]
    pub const fn peer_id(&self) -> &PeerId {
        match self {
            Self::PeerJoined { peer } => peer.id(),
            Self::PeerLeft { peer_id }
            | Self::PeerUpdated { peer_id, .. }
            | Self::TracksAdded { peer_id, .. }
            | Self::TracksRemoved { peer_id, .. }
            | Self::TrackUpdated { peer_id, .. } => peer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let event: RoomEvent = serde_json::from_value(json!({
            "type": "tracksAdded",
            "peerId": "alice",
            "trackIdToMetadata": {"cam": {"type": "camera"}}
        }))
        .unwrap();

        match &event {
            RoomEvent::TracksAdded {
                peer_id,
                track_id_to_metadata,
            } => {
                assert_eq!(peer_id.as_str(), "alice");
                assert_eq!(track_id_to_metadata.len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let left = RoomEvent::PeerLeft {
            peer_id: PeerId::new("bob").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&left).unwrap(),
            json!({"type": "peerLeft", "peerId": "bob"})
        );
    }

    #[test]
    fn test_peer_id_accessor() {
        let event: RoomEvent = serde_json::from_value(json!({
            "type": "peerJoined",
            "peer": {"id": "carol", "metadata": {}}
        }))
        .unwrap();
        assert_eq!(event.peer_id().as_str(), "carol");
    }
}
