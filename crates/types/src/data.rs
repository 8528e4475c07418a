use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resolved data value.
///
/// The payload is opaque to choice resolution; callers decide how to interpret it.
/// Resolution hands values out behind an `Arc`, so a `Data` is never mutated once a
/// choice holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Data {
    /// Plain text content (literal resource text or a fetched document body).
    Text(String),
    /// Structured JSON content.
    Json(Value),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Data {
    /// Convenience constructor for text content.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Returns the text content when this value is [`Data::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Size of the payload in bytes, used for log fields.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Json(value) => value.to_string().len(),
            Self::Bytes(bytes) => bytes.len(),
        }
    }
}
