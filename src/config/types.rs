use serde::{Deserialize, Serialize};

use crate::stream_parser::ParserConfig;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind address for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// Upstream LLM backend
    pub llm: LlmConfig,
    /// Tag parser tuning
    #[serde(default)]
    pub parser: ParserConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3010,
            llm: LlmConfig::default(),
            parser: ParserConfig::default(),
        }
    }
}

/// Connection settings for the OpenAI-compatible backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL up to and including the API version segment,
    /// e.g. `http://127.0.0.1:8000/v1`
    pub base_url: String,
    /// Bearer token, if the backend requires one
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier passed through to the backend
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    600
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/v1".to_string(),
            api_key: None,
            model: "default".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
