use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    action_mapper::{ActionMapper, AgentState},
    agent::traits::StreamableAgent,
    llm::client::{LlmClient, ERROR_SENTINEL},
    protocols::actions::Action,
    stream_parser::{ParserConfig, StreamEvent, StreamTokenizer},
};

/// Drives one agent's LLM stream through the tag parser and yields the
/// resulting actions as JSON lines.
///
/// Each request gets its own tokenizer and `AgentState`; the driver
/// itself is shared and stateless across requests.
pub struct AgentStreamDriver {
    client: Arc<dyn LlmClient>,
    mapper: Arc<ActionMapper>,
    agent: Arc<dyn StreamableAgent>,
    parser_config: ParserConfig,
}

impl AgentStreamDriver {
    pub fn new(
        client: Arc<dyn LlmClient>,
        mapper: Arc<ActionMapper>,
        agent: Arc<dyn StreamableAgent>,
    ) -> Self {
        Self {
            client,
            mapper,
            agent,
            parser_config: ParserConfig::default(),
        }
    }

    pub fn with_parser_config(mut self, parser_config: ParserConfig) -> Self {
        self.parser_config = parser_config;
        self
    }

    /// Stream the actions for one query, one serialized JSON object per
    /// item, in source order. Dropping the receiver cancels the request.
    pub fn stream(&self, query: String) -> UnboundedReceiverStream<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Arc::clone(&self.client);
        let mapper = Arc::clone(&self.mapper);
        let agent = Arc::clone(&self.agent);
        let parser_config = self.parser_config.clone();
        let request_id = Uuid::new_v4();

        let span = tracing::info_span!(
            "agent_stream",
            %request_id,
            agent = agent.name(),
        );
        tokio::spawn(
            async move {
                run_stream(client, mapper, agent, parser_config, query, tx).await;
            }
            .instrument(span),
        );

        UnboundedReceiverStream::new(rx)
    }
}

async fn run_stream(
    client: Arc<dyn LlmClient>,
    mapper: Arc<ActionMapper>,
    agent: Arc<dyn StreamableAgent>,
    parser_config: ParserConfig,
    query: String,
    tx: UnboundedSender<String>,
) {
    let messages = agent.build_messages(&query);
    let mut chunks = match client.stream_chat(&messages).await {
        Ok(stream) => stream,
        Err(error) => {
            tracing::error!(%error, "failed to open completion stream");
            send_action(&tx, &Action::error(error.to_string()));
            return;
        }
    };

    let mut tokenizer = StreamTokenizer::new(parser_config);
    let mut state = AgentState::new();

    while let Some(chunk) = chunks.next().await {
        // transport errors arrive in-band; surface them as actions and
        // keep reading in case the stream recovers
        if let Some(message) = chunk.strip_prefix(ERROR_SENTINEL) {
            if !send_action(&tx, &Action::error(message)) {
                return;
            }
            continue;
        }

        match tokenizer.parse_chunk(&chunk) {
            Ok(events) => {
                if !forward_events(&tx, &mapper, agent.as_ref(), &events, &mut state) {
                    return;
                }
            }
            Err(error) => {
                tracing::error!(%error, "aborting parse for this request");
                send_action(&tx, &Action::error(error.to_string()));
                return;
            }
        }
    }

    let events = tokenizer.finalize();
    forward_events(&tx, &mapper, agent.as_ref(), &events, &mut state);
}

/// Forward mapped actions in order; false once the receiver is gone.
fn forward_events(
    tx: &UnboundedSender<String>,
    mapper: &ActionMapper,
    agent: &dyn StreamableAgent,
    events: &[StreamEvent],
    state: &mut AgentState,
) -> bool {
    for event in events {
        if let StreamEvent::TagClose { tag } = event {
            if !agent.validate_operation(&tag.name) {
                tracing::warn!(tag = %tag.name, "tag outside this agent's protocol");
            }
        }
        for action in mapper.map_event(event, state) {
            if !send_action(tx, &action) {
                return false;
            }
        }
    }
    true
}

fn send_action(tx: &UnboundedSender<String>, action: &Action) -> bool {
    match serde_json::to_string(action) {
        Ok(line) => tx.send(line).is_ok(),
        Err(error) => {
            tracing::warn!(%error, "failed to serialize action, dropping it");
            true
        }
    }
}
