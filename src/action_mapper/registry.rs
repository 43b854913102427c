use std::{collections::HashMap, sync::Arc};

use crate::{
    action_mapper::{errors::ActionResult, handlers, state::AgentState},
    protocols::actions::Action,
    stream_parser::AttributeMap,
};

/// A tag handler: `(content, attributes, state) -> Action`.
pub type HandlerFn =
    Arc<dyn Fn(&str, &AttributeMap, &mut AgentState) -> ActionResult<Action> + Send + Sync>;

/// Dispatch entry for one tag name.
pub struct TagHandler {
    /// Produces the terminal action once the tag closes
    pub on_complete: HandlerFn,
    /// Optional action emitted when the tag opens mid-stream
    pub on_open: Option<HandlerFn>,
    /// Whether content deltas are forwarded while the tag is open
    pub stream_content: bool,
}

impl TagHandler {
    /// A tag that maps only on completion.
    pub fn complete_only<F>(on_complete: F) -> Self
    where
        F: Fn(&str, &AttributeMap, &mut AgentState) -> ActionResult<Action>
            + Send
            + Sync
            + 'static,
    {
        Self {
            on_complete: Arc::new(on_complete),
            on_open: None,
            stream_content: false,
        }
    }

    /// A tag whose content streams live: an open action, forwarded
    /// deltas, then the terminal action.
    pub fn streaming<O, F>(on_open: O, on_complete: F) -> Self
    where
        O: Fn(&str, &AttributeMap, &mut AgentState) -> ActionResult<Action>
            + Send
            + Sync
            + 'static,
        F: Fn(&str, &AttributeMap, &mut AgentState) -> ActionResult<Action>
            + Send
            + Sync
            + 'static,
    {
        Self {
            on_complete: Arc::new(on_complete),
            on_open: Some(Arc::new(on_open)),
            stream_content: true,
        }
    }
}

/// Registry mapping tag names to handlers.
///
/// Built by explicit `register` calls at construction time; immutable
/// afterwards and shared across requests behind an `Arc` (handlers are
/// stateless — all mutation goes through the per-request `AgentState`).
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, TagHandler>,
}

impl ActionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in notebook tag vocabulary.
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        handlers::install_default_handlers(&mut registry);
        registry
    }

    /// Register a handler for a tag name. Re-registering replaces the
    /// previous entry.
    pub fn register(&mut self, name: impl Into<String>, handler: TagHandler) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&TagHandler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered tag names, for protocol introspection.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ActionRegistry::new();
        assert!(!registry.contains("custom"));

        registry.register(
            "custom",
            TagHandler::complete_only(|content, _attrs, _state| {
                Ok(Action::new("custom", json!({ "content": content })))
            }),
        );
        assert!(registry.contains("custom"));
        assert!(registry.get("custom").is_some());
        assert!(!registry.get("custom").unwrap().stream_content);
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = ActionRegistry::new();
        registry.register(
            "t",
            TagHandler::complete_only(|_, _, _| Ok(Action::new("first", json!({})))),
        );
        registry.register(
            "t",
            TagHandler::complete_only(|_, _, _| Ok(Action::new("second", json!({})))),
        );

        let handler = registry.get("t").unwrap();
        let mut state = AgentState::new();
        let action = (handler.on_complete)("", &AttributeMap::new(), &mut state).unwrap();
        assert_eq!(action.kind, "second");
    }

    #[test]
    fn test_default_vocabulary_present() {
        let registry = ActionRegistry::with_default_handlers();
        for name in [
            "update-title",
            "new-chapter",
            "new-section",
            "add-text",
            "add-code",
            "thinking",
            "call-execute",
            "get-variable",
            "set-variable",
            "remember",
            "update-todo",
            "answer",
            "draw-image",
            "create-video",
            "communicate",
            "ask-for-help",
        ] {
            assert!(registry.contains(name), "missing handler for {name}");
        }
    }
}
