use crate::{
    action_mapper::{
        registry::{ActionRegistry, HandlerFn},
        state::AgentState,
    },
    protocols::actions::Action,
    stream_parser::{AttributeMap, StreamEvent},
};

/// Maps tokenizer events onto frontend actions through the registry.
///
/// One malformed tag never aborts the rest of the stream: unknown tags
/// degrade to a labeled text action, and a failing handler is replaced
/// by a visible error-text action.
pub struct ActionMapper {
    registry: ActionRegistry,
}

impl ActionMapper {
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    /// A mapper over the built-in notebook vocabulary.
    pub fn with_defaults() -> Self {
        Self::new(ActionRegistry::with_default_handlers())
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Map one event to zero or more actions, in source order.
    pub fn map_event(&self, event: &StreamEvent, state: &mut AgentState) -> Vec<Action> {
        match event {
            StreamEvent::Text { content } => vec![Action::text(content.clone())],
            StreamEvent::RawTail { content } => vec![Action::text(content.clone())],
            StreamEvent::TagOpen { name, attributes } => {
                match self.registry.get(name).and_then(|h| h.on_open.as_ref()) {
                    Some(handler) => self.invoke(name, handler, "", attributes, state),
                    None => Vec::new(),
                }
            }
            StreamEvent::TagContent { name, delta } => {
                let streams = self
                    .registry
                    .get(name)
                    .map(|h| h.stream_content)
                    .unwrap_or(false);
                if streams {
                    vec![Action::stream_delta(name, delta.clone())]
                } else {
                    Vec::new()
                }
            }
            StreamEvent::TagClose { tag } => match self.registry.get(&tag.name) {
                Some(handler) => self.invoke(
                    &tag.name,
                    &handler.on_complete,
                    &tag.content,
                    &tag.attributes,
                    state,
                ),
                None => {
                    tracing::debug!(tag = %tag.name, "unknown tag, using fallback text action");
                    vec![Action::text(format!("[{}] {}", tag.name, tag.content))]
                }
            },
        }
    }

    /// Map a batch of events, preserving order.
    pub fn map_events(&self, events: &[StreamEvent], state: &mut AgentState) -> Vec<Action> {
        events
            .iter()
            .flat_map(|event| self.map_event(event, state))
            .collect()
    }

    fn invoke(
        &self,
        name: &str,
        handler: &HandlerFn,
        content: &str,
        attributes: &AttributeMap,
        state: &mut AgentState,
    ) -> Vec<Action> {
        match handler(content, attributes, state) {
            Ok(action) => vec![action],
            Err(error) => {
                tracing::warn!(tag = name, %error, "tag handler failed");
                vec![Action::text(format!("[Error processing {name}] {content}"))]
            }
        }
    }
}

impl Default for ActionMapper {
    fn default() -> Self {
        Self::with_defaults()
    }
}
