//! Per-track metadata mapping
//!
//! A peer's published tracks are tracked as a map from track id to the
//! metadata the publisher attached to it. The map is shared between peer
//! versions and only copied when a new version changes it.

use crate::metadata::Metadata;
use crate::types::TrackId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Copy-on-write map from track id to track metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata(Arc<HashMap<TrackId, Metadata>>);

impl TrackMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, track_id: &TrackId) -> Option<&Metadata> {
        self.0.get(track_id)
    }

    #[must_use]
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.0.contains_key(track_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrackId, &Metadata)> {
        self.0.iter()
    }

    /// Track ids in a stable (sorted) order
    #[must_use]
    pub fn track_ids(&self) -> Vec<TrackId> {
        let mut ids: Vec<TrackId> = self.0.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// New mapping with `track_id` set to `metadata`
    #[must_use]
    pub fn inserted(&self, track_id: TrackId, metadata: Metadata) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).insert(track_id, metadata);
        next
    }

    /// New mapping without `track_id`; shares storage when nothing changes
    #[must_use]
    pub fn removed(&self, track_id: &TrackId) -> Self {
        if !self.0.contains_key(track_id) {
            return self.clone();
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).remove(track_id);
        next
    }

    #[cfg(test)]
    pub(crate) fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<HashMap<TrackId, Metadata>> for TrackMetadata {
    fn from(map: HashMap<TrackId, Metadata>) -> Self {
        Self(Arc::new(map))
    }
}

impl FromIterator<(TrackId, Metadata)> for TrackMetadata {
    fn from_iter<I: IntoIterator<Item = (TrackId, Metadata)>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl Serialize for TrackMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TrackMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        HashMap::<TrackId, Metadata>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inserted_copies_on_write() {
        let empty = TrackMetadata::new();
        let one = empty.inserted(TrackId::from("cam"), Metadata::from(json!({"type": "camera"})));

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert!(one.contains(&TrackId::from("cam")));
        assert!(!one.shares_storage_with(&empty));
    }

    #[test]
    fn test_removed_missing_key_shares_storage() {
        let tracks: TrackMetadata = [(TrackId::from("mic"), Metadata::new())].into_iter().collect();
        let same = tracks.removed(&TrackId::from("cam"));
        assert!(same.shares_storage_with(&tracks));

        let without = tracks.removed(&TrackId::from("mic"));
        assert!(without.is_empty());
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_track_ids_sorted() {
        let tracks: TrackMetadata = ["b", "c", "a"]
            .into_iter()
            .map(|id| (TrackId::from(id), Metadata::new()))
            .collect();
        let ids: Vec<String> = tracks.track_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
