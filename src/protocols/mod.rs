/// Wire types exchanged with the frontend and the LLM backend
pub mod actions;
pub mod chat;

pub use actions::Action;
pub use chat::{ChatCompletionRequest, ChatCompletionStreamResponse, ChatMessage};
