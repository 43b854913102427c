use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use thiserror::Error;

use crate::protocols::chat::ChatMessage;

/// Prefix marking a mid-stream transport error chunk.
///
/// A chunk starting with this is not model content; the remainder is an
/// error message the consumer should surface as a first-class action.
pub const ERROR_SENTINEL: &str = "[ERROR] ";

/// Ordered content deltas from a streaming completion.
pub type ChunkStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Result type for LLM client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while opening a streaming completion. Errors after the
/// stream is open arrive in-band as sentinel-prefixed chunks instead.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

/// A streaming chat completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Open a streaming completion for `messages`.
    ///
    /// The returned stream yields content deltas in order; chunk
    /// boundaries are arbitrary and bear no relation to any syntactic
    /// unit in the content.
    async fn stream_chat(&self, messages: &[ChatMessage]) -> ClientResult<ChunkStream>;
}
