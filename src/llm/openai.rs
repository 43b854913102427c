use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::{
    config::LlmConfig,
    llm::client::{ChunkStream, ClientError, ClientResult, LlmClient, ERROR_SENTINEL},
    protocols::chat::{ChatCompletionRequest, ChatCompletionStreamResponse, ChatMessage},
};

/// OpenAI-compatible streaming chat client.
///
/// Speaks `/chat/completions` with `stream: true` and decodes the SSE
/// `data:` lines into content deltas. Transport failures after the
/// stream is open are forwarded in-band as sentinel-prefixed chunks so
/// the consumer's state machine sees them in order.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> ClientResult<Self> {
        if config.base_url.is_empty() {
            return Err(ClientError::Config("base_url must not be empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn stream_chat(&self, messages: &[ChatMessage]) -> ClientResult<ChunkStream> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            stream: true,
            temperature: None,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.http.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut pending = String::new();
            while let Some(item) = bytes.next().await {
                match item {
                    Ok(chunk) => {
                        pending.push_str(&String::from_utf8_lossy(&chunk));
                        while let Some(pos) = pending.find('\n') {
                            let rest = pending.split_off(pos + 1);
                            let line = std::mem::replace(&mut pending, rest);
                            if let Some(delta) = decode_sse_line(line.trim_end()) {
                                if tx.send(delta).is_err() {
                                    return; // consumer went away
                                }
                            }
                        }
                    }
                    Err(error) => {
                        tracing::warn!(%error, "chat completion stream broke mid-flight");
                        let _ = tx.send(format!("{ERROR_SENTINEL}{error}"));
                        return;
                    }
                }
            }
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }
}

/// Extract the content delta from one SSE line, if it carries one.
fn decode_sse_line(line: &str) -> Option<String> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }
    match serde_json::from_str::<ChatCompletionStreamResponse>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty()),
        Err(error) => {
            tracing::debug!(%error, "skipping undecodable stream line");
            None
        }
    }
}
