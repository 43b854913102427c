use std::sync::Arc;

use clap::Parser;
use tracing::Level;

use nbg::{
    action_mapper::ActionMapper,
    agent::{AgentStreamDriver, NotebookAgent},
    config::{GatewayConfig, LlmConfig},
    llm::OpenAiClient,
    logging::{self, LoggingConfig},
    server::{self, AppContext},
};

#[derive(Parser, Debug)]
#[command(name = "notebook-gateway")]
#[command(about = "Streams tagged LLM output into notebook actions")]
struct CliArgs {
    /// Bind address for the HTTP server
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Bind port for the HTTP server
    #[arg(long, default_value_t = 3010)]
    port: u16,

    /// Base URL of the OpenAI-compatible backend, including /v1
    #[arg(long, default_value = "http://127.0.0.1:8000/v1")]
    llm_base_url: String,

    /// Bearer token for the backend
    #[arg(long, env = "NBG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier passed through to the backend
    #[arg(long, default_value = "default")]
    model: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Directory for rolling log files (stdout only if unset)
    #[arg(long)]
    log_dir: Option<String>,

    /// Emit JSON-formatted logs
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = args
        .log_level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    let _log_guard = logging::init_logging(LoggingConfig {
        level,
        json_format: args.json_logs,
        log_dir: args.log_dir.clone(),
        log_file_name: "notebook-gateway".to_string(),
        ..Default::default()
    });

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        llm: LlmConfig {
            base_url: args.llm_base_url,
            api_key: args.api_key,
            model: args.model,
            ..Default::default()
        },
        ..Default::default()
    };

    let client = Arc::new(OpenAiClient::new(&config.llm)?);
    let mapper = Arc::new(ActionMapper::with_defaults());
    let agent = Arc::new(NotebookAgent::new());
    let driver = AgentStreamDriver::new(client, mapper, agent)
        .with_parser_config(config.parser.clone());

    let context = Arc::new(AppContext { driver });
    server::serve(&config, context).await
}
