//! Opaque metadata documents attached to peers and tracks

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Key conventionally used by clients for the participant's display name
pub const DISPLAY_NAME_KEY: &str = "displayName";

/// Free-form JSON document owned by the application.
///
/// The core never interprets the shape beyond a couple of convenience
/// accessors; an empty object is the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(JsonValue);

impl Default for Metadata {
    fn default() -> Self {
        Self(JsonValue::Object(Map::new()))
    }
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn from_value(value: JsonValue) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &JsonValue {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> JsonValue {
        self.0
    }

    /// Look up a top-level key. Non-object documents have no keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.as_object().and_then(|map| map.get(key))
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.get(DISPLAY_NAME_KEY).and_then(JsonValue::as_str)
    }

    /// Return a copy with `key` set to `value`.
    ///
    /// A document that is not an object is replaced by a single-key object.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: JsonValue) -> Self {
        let mut map = self.0.as_object().cloned().unwrap_or_default();
        map.insert(key.into(), value);
        Self(JsonValue::Object(map))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            JsonValue::Object(map) => map.is_empty(),
            JsonValue::Null => true,
            _ => false,
        }
    }
}

impl From<JsonValue> for Metadata {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

impl From<Metadata> for JsonValue {
    fn from(metadata: Metadata) -> Self {
        metadata.0
    }
}
