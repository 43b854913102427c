/// Gateway configuration
pub mod types;

pub use types::{GatewayConfig, LlmConfig};
