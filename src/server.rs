use std::{convert::Infallible, sync::Arc};

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Deserialize;
use tokio_stream::StreamExt;

use crate::{agent::AgentStreamDriver, config::GatewayConfig};

/// Shared per-process state handed to every request handler.
pub struct AppContext {
    pub driver: AgentStreamDriver,
}

#[derive(Debug, Deserialize)]
pub struct AgentStreamRequest {
    pub query: String,
}

/// Build the gateway's router.
pub fn build_app(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/agent/stream", post(agent_stream))
        .with_state(context)
}

async fn health() -> &'static str {
    "ok"
}

/// Stream notebook actions for one query as newline-delimited JSON.
async fn agent_stream(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<AgentStreamRequest>,
) -> Response {
    let lines = context.driver.stream(request.query);
    let body = Body::from_stream(
        lines.map(|line| Ok::<_, Infallible>(Bytes::from(format!("{line}\n")))),
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        body,
    )
        .into_response()
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &GatewayConfig, context: Arc<AppContext>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "notebook gateway listening");
    axum::serve(listener, build_app(context)).await?;
    Ok(())
}
