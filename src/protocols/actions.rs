use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One frontend-consumable instruction, serialized as
/// `{"type": "<action-name>", "data": {...}}` — one JSON object per line
/// on the wire.
///
/// The payload stays an open `Value` so the dispatch table remains
/// pluggable: registering a new tag handler needs no new wire type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// A markdown text action.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new("text", json!({ "content": content.into() }))
    }

    /// A content-update action for an open tag. Consumers append each
    /// delta to the content already rendered for that tag instance.
    pub fn stream_delta(tag: &str, delta: impl Into<String>) -> Self {
        Self::new("stream_delta", json!({ "tag": tag, "delta": delta.into() }))
    }

    /// A first-class error surfaced to the frontend instead of a
    /// broken stream.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", json!({ "message": message.into() }))
    }
}
