//! Integration tests for roomkit-core
//!
//! These tests drive the public API the way a client session does: signaling
//! events into the registry, frame-size reports into a surface.
//!
//! Run with: cargo test --test integration_tests

use roomkit_core::{
    codec, compute_draw_rect, Dimensions, FitMode, FrameSizeOutcome, Metadata, Peer, PeerId,
    PeerRegistry, PeerUpdate, Rect, RoomEvent, Size, TrackId, TrackMetadata, Transform,
    VideoSurface,
};
use serde_json::json;

fn peer_id(id: &str) -> PeerId {
    PeerId::new(id).unwrap()
}

#[test]
fn test_session_from_wire_events() {
    let registry = PeerRegistry::new();

    let events = [
        json!({"type": "peerJoined", "peer": {"id": "alice", "metadata": {"displayName": "Alice"}, "trackIdToMetadata": {}}}),
        json!({"type": "peerJoined", "peer": {"id": "bob", "metadata": {"displayName": "Bob"}}}),
        json!({"type": "tracksAdded", "peerId": "alice", "trackIdToMetadata": {"cam": {"type": "camera"}}}),
        json!({"type": "tracksAdded", "peerId": "bob", "trackIdToMetadata": {"mic": {"type": "microphone"}}}),
        json!({"type": "peerUpdated", "peerId": "bob", "metadata": {"displayName": "Robert"}}),
    ];
    for event in events {
        let event: RoomEvent = serde_json::from_value(event).unwrap();
        registry.apply(event).unwrap();
    }

    let alice = registry.get(&peer_id("alice")).unwrap();
    assert_eq!(alice.track_ids(), vec![TrackId::from("cam")]);

    // Bob never got a track mapping, so his track write was dropped
    let bob = registry.get(&peer_id("bob")).unwrap();
    assert_eq!(bob.track_id_to_metadata(), None);
    assert_eq!(bob.metadata().display_name(), Some("Robert"));

    let stats = registry.stats();
    assert_eq!(stats.peer_count, 2);
    assert_eq!(stats.track_count, 1);
}

#[test]
fn test_snapshot_preserves_absent_and_empty_mappings() {
    let registry = PeerRegistry::new();
    registry.insert(Peer::new(peer_id("absent"), Metadata::new()));
    registry.insert(Peer::with_tracks(peer_id("empty"), Metadata::new(), TrackMetadata::new()));

    let restored = codec::decode_peers(&registry.snapshot_json().unwrap()).unwrap();
    assert_eq!(restored, registry.peers());
    assert_eq!(restored[0].track_id_to_metadata(), None);
    assert_eq!(restored[1].track_id_to_metadata(), Some(&TrackMetadata::new()));
}

#[test]
fn test_update_algebra_properties() {
    let peers = [
        Peer::new(peer_id("a"), Metadata::new()),
        Peer::with_tracks(peer_id("b"), Metadata::from(json!({"x": 1})), TrackMetadata::new()),
        Peer::with_tracks(peer_id("c"), Metadata::new(), TrackMetadata::new())
            .with_track(TrackId::from("t1"), Metadata::new()),
    ];

    for peer in &peers {
        assert_eq!(&peer.with(PeerUpdate::new()), peer);

        let removed = peer.without_track(&TrackId::from("t1"));
        assert_eq!(removed.without_track(&TrackId::from("t1")), removed);

        let added = peer.with_track(TrackId::from("t2"), Metadata::from(json!({"k": "v"})));
        match peer.track_id_to_metadata() {
            None => assert_eq!(added.track_id_to_metadata(), None),
            Some(before) => {
                let after = added.track_id_to_metadata().unwrap();
                assert_eq!(after.len(), before.len() + 1);
                for (track_id, metadata) in before.iter() {
                    assert_eq!(after.get(track_id), Some(metadata));
                }
            }
        }

        assert_eq!(&codec::decode(&codec::encode(peer).unwrap()).unwrap(), peer);
    }
}

#[test]
fn test_surface_follows_engine_reports() {
    let surface = VideoSurface::new(Size::new(200.0, 200.0).unwrap(), FitMode::Fill);
    let mut observer = surface.subscribe();

    let reports = [(100, 50), (100, 50), (1, 1), (0, 0), (50, 100)];
    let outcomes: Vec<FrameSizeOutcome> = reports
        .iter()
        .map(|&(w, h)| surface.on_frame_size(w, h))
        .collect();

    assert_eq!(
        outcomes,
        vec![
            FrameSizeOutcome::Changed(Dimensions::new(100, 50).unwrap()),
            FrameSizeOutcome::Unchanged,
            FrameSizeOutcome::Rejected,
            FrameSizeOutcome::Rejected,
            FrameSizeOutcome::Changed(Dimensions::new(50, 100).unwrap()),
        ]
    );

    assert_eq!(observer.try_recv().unwrap(), Dimensions::new(100, 50).unwrap());
    assert_eq!(observer.try_recv().unwrap(), Dimensions::new(50, 100).unwrap());
    assert!(observer.try_recv().is_err());

    assert_eq!(surface.draw_rect(), Some(Rect::new(0.0, -100.0, 200.0, 400.0)));
    assert_eq!(
        surface.draw_rect(),
        Some(compute_draw_rect(Dimensions::new(50, 100).unwrap(), Size::new(200.0, 200.0).unwrap(), FitMode::Fill))
    );

    assert!(surface.set_mirror(true));
    assert!(!surface.set_mirror(true));
    assert_eq!(surface.transform(), Transform::MIRRORED);
}
