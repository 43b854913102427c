use serde::{Deserialize, Serialize};

/// One chat message in an LLM request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-compatible chat completion request (the subset we send).
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One streamed chat completion chunk (the subset we consume; unknown
/// fields are ignored on deserialization).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionStreamResponse {
    pub choices: Vec<ChatStreamChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamChoice {
    pub delta: ChatMessageDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Delta structure for streaming chat completion responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatMessageDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
