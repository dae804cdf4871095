//! Signaling encoding of peers
//!
//! Peers travel as plain JSON objects:
//!
//! ```json
//! {"id": "alice", "metadata": {"displayName": "Alice"}, "trackIdToMetadata": {"cam": {}}}
//! ```
//!
//! An absent track mapping is written by omitting `trackIdToMetadata`; a
//! missing key and `null` both decode to absent, `{}` decodes to an empty
//! mapping.

use crate::error::Result;
use crate::peer::Peer;
use serde_json::Value as JsonValue;

pub fn encode(peer: &Peer) -> Result<String> {
    Ok(serde_json::to_string(peer)?)
}

pub fn decode(input: &str) -> Result<Peer> {
    Ok(serde_json::from_str(input)?)
}

pub fn to_value(peer: &Peer) -> Result<JsonValue> {
    Ok(serde_json::to_value(peer)?)
}

pub fn from_value(value: JsonValue) -> Result<Peer> {
    Ok(serde_json::from_value(value)?)
}

/// Encode a room snapshot as a JSON array of peers
pub fn encode_peers(peers: &[Peer]) -> Result<String> {
    Ok(serde_json::to_string(peers)?)
}

pub fn decode_peers(input: &str) -> Result<Vec<Peer>> {
    Ok(serde_json::from_str(input)?)
}
