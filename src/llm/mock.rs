use async_trait::async_trait;

use crate::{
    llm::client::{ChunkStream, ClientResult, LlmClient},
    protocols::chat::ChatMessage,
};

/// Scripted client replaying a fixed chunk sequence, for tests and
/// offline development. Chunk boundaries are reproduced exactly as
/// given, which is the whole point: they exercise the parser's
/// chunk-boundary handling.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    chunks: Vec<String>,
}

impl MockLlmClient {
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn stream_chat(&self, _messages: &[ChatMessage]) -> ClientResult<ChunkStream> {
        Ok(Box::pin(tokio_stream::iter(self.chunks.clone())))
    }
}
