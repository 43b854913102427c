/// LLM streaming client boundary
pub mod client;
pub mod mock;
pub mod openai;

pub use client::{ChunkStream, ClientError, ClientResult, LlmClient, ERROR_SENTINEL};
pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
