//! Room peer set
//!
//! Holds the current `Peer` value for every participant of a room, keyed by
//! peer id. Updates never hand out a mutable reference to a stored peer: the
//! new value is computed from a borrowed snapshot and swapped in under the
//! entry lock.

use crate::codec;
use crate::error::{Error, Result};
use crate::events::RoomEvent;
use crate::peer::{Peer, PeerUpdate};
use crate::types::{PeerId, TrackId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Peers currently known in a room
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: DashMap<PeerId, Peer>,
}

impl PeerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a peer, returning the value it replaced
    pub fn insert(&self, peer: Peer) -> Option<Peer> {
        self.peers.insert(peer.id().clone(), peer)
    }

    #[must_use]
    pub fn get(&self, peer_id: &PeerId) -> Option<Peer> {
        self.peers.get(peer_id).map(|entry| entry.value().clone())
    }

    #[must_use]
    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    pub fn remove(&self, peer_id: &PeerId) -> Option<Peer> {
        self.peers.remove(peer_id).map(|(_, peer)| peer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Snapshot of all peers, sorted by id
    #[must_use]
    pub fn peers(&self) -> Vec<Peer> {
        let mut peers: Vec<Peer> = self.peers.iter().map(|entry| entry.value().clone()).collect();
        peers.sort_by(|a, b| a.id().cmp(b.id()));
        peers
    }

    #[must_use]
    pub fn peer_ids(&self) -> Vec<PeerId> {
        let mut ids: Vec<PeerId> = self.peers.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Replace the stored peer with `f(current)`.
    ///
    /// If `f` assigns a new id the entry is moved to the new key. Moving onto
    /// an id that is already present fails with [`Error::InvalidInput`] and
    /// leaves both peers untouched; a concurrent write to the old entry while
    /// it is being moved fails with [`Error::OptimisticLockConflict`].
    pub fn update<F>(&self, peer_id: &PeerId, f: F) -> Result<Peer>
    where
        F: FnOnce(&Peer) -> Peer,
    {
        let (snapshot, updated) = {
            let mut entry = self
                .peers
                .get_mut(peer_id)
                .ok_or_else(|| Error::NotFound(format!("peer {peer_id}")))?;
            let next = f(entry.value());
            if next.id() == peer_id {
                *entry.value_mut() = next.clone();
                return Ok(next);
            }
            (entry.value().clone(), next)
        };

        // The guard above is released: DashMap shards deadlock if one entry is
        // held while another key of the same shard is locked.
        let new_id = updated.id().clone();
        if self.peers.contains_key(&new_id) {
            return Err(already_exists(&new_id));
        }

        let Some((_, previous)) = self.peers.remove_if(peer_id, |_, current| current == &snapshot)
        else {
            return Err(Error::OptimisticLockConflict);
        };

        match self.peers.entry(new_id) {
            Entry::Vacant(slot) => {
                slot.insert(updated.clone());
            }
            Entry::Occupied(taken) => {
                let new_id = taken.key().clone();
                drop(taken);
                self.peers.insert(peer_id.clone(), previous);
                return Err(already_exists(&new_id));
            }
        }

        debug!(old_peer_id = %peer_id, new_peer_id = %updated.id(), "Peer re-keyed");
        Ok(updated)
    }

    /// Peer that currently publishes `track_id`
    #[must_use]
    pub fn track_owner(&self, track_id: &TrackId) -> Option<PeerId> {
        self.peers
            .iter()
            .find(|entry| entry.value().has_track(track_id))
            .map(|entry| entry.key().clone())
    }

    /// Apply a signaling event to the room state
    pub fn apply(&self, event: RoomEvent) -> Result<()> {
        match event {
            RoomEvent::PeerJoined { peer } => {
                let peer_id = peer.id().clone();
                let track_count = peer.track_count();
                if self.insert(peer).is_some() {
                    debug!(peer_id = %peer_id, "Replaced stale peer entry");
                }
                info!(peer_id = %peer_id, track_count, peer_count = self.len(), "Peer joined");
            }
            RoomEvent::PeerLeft { peer_id } => {
                self.remove(&peer_id)
                    .ok_or_else(|| Error::NotFound(format!("peer {peer_id}")))?;
                info!(peer_id = %peer_id, peer_count = self.len(), "Peer left");
            }
            RoomEvent::PeerUpdated { peer_id, metadata } => {
                self.update(&peer_id, |peer| peer.with(PeerUpdate::new().metadata(metadata)))?;
                debug!(peer_id = %peer_id, "Peer metadata updated");
            }
            RoomEvent::TracksAdded {
                peer_id,
                track_id_to_metadata,
            } => {
                let added = track_id_to_metadata.len();
                let peer = self.update(&peer_id, |peer| {
                    track_id_to_metadata
                        .into_iter()
                        .fold(peer.clone(), |peer, (track_id, metadata)| {
                            peer.with_track(track_id, metadata)
                        })
                })?;
                if peer.track_id_to_metadata().is_none() && added > 0 {
                    warn!(
                        peer_id = %peer_id,
                        dropped = added,
                        "Peer has no track mapping, added tracks were not recorded"
                    );
                } else {
                    debug!(peer_id = %peer_id, added, track_count = peer.track_count(), "Tracks added");
                }
            }
            RoomEvent::TracksRemoved { peer_id, track_ids } => {
                let peer = self.update(&peer_id, |peer| {
                    track_ids
                        .iter()
                        .fold(peer.clone(), |peer, track_id| peer.without_track(track_id))
                })?;
                debug!(peer_id = %peer_id, track_count = peer.track_count(), "Tracks removed");
            }
            RoomEvent::TrackUpdated {
                peer_id,
                track_id,
                metadata,
            } => {
                let peer = self.update(&peer_id, |peer| peer.with_track(track_id.clone(), metadata))?;
                if !peer.has_track(&track_id) {
                    warn!(
                        peer_id = %peer_id,
                        track_id = %track_id,
                        "Peer has no track mapping, track update was not recorded"
                    );
                }
            }
        }

        Ok(())
    }

    /// Encoded snapshot of the room (see [`codec::encode_peers`])
    pub fn snapshot_json(&self) -> Result<String> {
        codec::encode_peers(&self.peers())
    }

    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.peers.iter().fold(RegistryStats::default(), |mut stats, entry| {
            let peer = entry.value();
            stats.peer_count += 1;
            stats.track_count += peer.track_count();
            if peer.track_id_to_metadata().is_none() {
                stats.peers_without_track_mapping += 1;
            }
            stats
        })
    }
}

fn already_exists(peer_id: &PeerId) -> Error {
    Error::InvalidInput(format!("peer {peer_id} already exists"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RegistryStats {
    pub peer_count: usize,
    pub track_count: usize,
    pub peers_without_track_mapping: usize,
}
