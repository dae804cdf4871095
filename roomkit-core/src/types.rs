//! Identifier types shared by the peer model and the registry

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a conference participant.
///
/// Never empty: every constructor rejects an empty string, including
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidInput("peer id must not be empty".to_string()));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PeerId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for PeerId {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl From<PeerId> for String {
    fn from(id: PeerId) -> Self {
        id.0
    }
}

/// Identifier of a published media track
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_rejects_empty() {
        assert!(PeerId::new("").is_err());
        assert!(PeerId::try_from("").is_err());
        assert_eq!(PeerId::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_peer_id_serde() {
        let id: PeerId = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(id.to_string(), "bob");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"bob\"");

        let err = serde_json::from_str::<PeerId>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_track_id_conversions() {
        let a = TrackId::from("cam");
        let b = TrackId::new(String::from("cam"));
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"cam\"");
    }
}
