//! Built-in notebook tag vocabulary.
//!
//! Each handler is a pure function over `(content, attributes, state)`;
//! orchestration side effects go through the request's `AgentState`.

use serde_json::{json, Value};

use crate::{
    action_mapper::{
        errors::{ActionError, ActionResult},
        registry::{ActionRegistry, TagHandler},
        state::AgentState,
    },
    protocols::actions::Action,
    stream_parser::AttributeMap,
};

fn attr<'a>(attrs: &'a AttributeMap, key: &'static str) -> ActionResult<&'a str> {
    attrs
        .get(key)
        .map(String::as_str)
        .ok_or(ActionError::MissingAttribute(key))
}

fn attr_or<'a>(attrs: &'a AttributeMap, key: &str, default: &'a str) -> &'a str {
    attrs.get(key).map(String::as_str).unwrap_or(default)
}

/// Coerce a raw attribute value into a typed JSON value.
///
/// `str` is the default; unknown type names also fall back to string so
/// a model inventing a type does not break the stream.
fn coerce_value(raw: &str, type_name: &str) -> ActionResult<Value> {
    let invalid = |message: String| ActionError::InvalidValue {
        attribute: "value",
        message,
    };
    match type_name {
        "int" => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| invalid(format!("`{raw}` is not an integer: {e}"))),
        "float" => raw
            .trim()
            .parse::<f64>()
            .map(Value::from)
            .map_err(|e| invalid(format!("`{raw}` is not a float: {e}"))),
        "bool" => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            other => Err(invalid(format!("`{other}` is not a boolean"))),
        },
        "json" => serde_json::from_str(raw)
            .map_err(|e| invalid(format!("`{raw}` is not valid JSON: {e}"))),
        _ => Ok(Value::String(raw.to_string())),
    }
}

/// Install the built-in vocabulary into `registry`.
pub fn install_default_handlers(registry: &mut ActionRegistry) {
    registry.register(
        "update-title",
        TagHandler::complete_only(|content, _attrs, state| {
            let title = content.trim().to_string();
            state.title = Some(title.clone());
            Ok(Action::new("update_title", json!({ "title": title })))
        }),
    );

    registry.register(
        "new-chapter",
        TagHandler::complete_only(|content, _attrs, _state| {
            Ok(Action::new("new_chapter", json!({ "title": content.trim() })))
        }),
    );

    registry.register(
        "new-section",
        TagHandler::complete_only(|content, _attrs, _state| {
            Ok(Action::new("new_section", json!({ "title": content.trim() })))
        }),
    );

    registry.register(
        "add-text",
        TagHandler::streaming(
            |_content, _attrs, _state| {
                Ok(Action::new(
                    "cell_start",
                    json!({ "tag": "add-text", "cell_type": "markdown" }),
                ))
            },
            |content, _attrs, _state| {
                Ok(Action::new(
                    "add_cell",
                    json!({ "cell_type": "markdown", "content": content }),
                ))
            },
        ),
    );

    registry.register(
        "add-code",
        TagHandler::streaming(
            |_content, attrs, _state| {
                Ok(Action::new(
                    "cell_start",
                    json!({
                        "tag": "add-code",
                        "cell_type": "code",
                        "language": attr_or(attrs, "language", "python"),
                    }),
                ))
            },
            |content, attrs, _state| {
                Ok(Action::new(
                    "add_cell",
                    json!({
                        "cell_type": "code",
                        "language": attr_or(attrs, "language", "python"),
                        "content": content,
                    }),
                ))
            },
        ),
    );

    registry.register(
        "thinking",
        TagHandler::streaming(
            |_content, _attrs, _state| {
                Ok(Action::new("thinking_start", json!({ "tag": "thinking" })))
            },
            |content, _attrs, _state| {
                Ok(Action::new("thinking", json!({ "content": content.trim() })))
            },
        ),
    );

    registry.register(
        "answer",
        TagHandler::streaming(
            |_content, _attrs, _state| {
                Ok(Action::new("answer_start", json!({ "tag": "answer" })))
            },
            |content, _attrs, _state| {
                Ok(Action::new("answer", json!({ "content": content.trim() })))
            },
        ),
    );

    registry.register(
        "call-execute",
        TagHandler::complete_only(|_content, attrs, _state| {
            Ok(Action::new(
                "execute",
                json!({ "event": attr_or(attrs, "event", "run") }),
            ))
        }),
    );

    registry.register(
        "set-variable",
        TagHandler::complete_only(|content, attrs, state| {
            let name = attr(attrs, "variable")?.to_string();
            let raw = attrs
                .get("value")
                .map(String::as_str)
                .unwrap_or_else(|| content.trim());
            let value = coerce_value(raw, attr_or(attrs, "type", "str"))?;
            state.set_variable(&name, value.clone());
            Ok(Action::new(
                "variable_set",
                json!({ "variable": name, "value": value }),
            ))
        }),
    );

    registry.register(
        "get-variable",
        TagHandler::complete_only(|_content, attrs, state| {
            let name = attr(attrs, "variable")?;
            let value = state
                .variable(name)
                .cloned()
                .or_else(|| attrs.get("default").map(|d| Value::String(d.clone())))
                .unwrap_or(Value::Null);
            Ok(Action::new(
                "variable_value",
                json!({ "variable": name, "value": value }),
            ))
        }),
    );

    registry.register(
        "remember",
        TagHandler::complete_only(|content, attrs, _state| {
            Ok(Action::new(
                "remember",
                json!({
                    "kind": attr_or(attrs, "type", "note"),
                    "content": content.trim(),
                }),
            ))
        }),
    );

    registry.register(
        "update-todo",
        TagHandler::complete_only(|content, attrs, state| {
            let action = attr_or(attrs, "action", "add").to_string();
            let event = attrs
                .get("event")
                .map(String::as_str)
                .unwrap_or_else(|| content.trim())
                .to_string();
            match action.as_str() {
                "add" => state.add_todo(event.clone()),
                "done" => {
                    state.complete_todo(&event);
                }
                "remove" => {
                    state.remove_todo(&event);
                }
                other => {
                    return Err(ActionError::InvalidValue {
                        attribute: "action",
                        message: format!("unknown todo action `{other}`"),
                    })
                }
            }
            Ok(Action::new(
                "todo_update",
                json!({ "action": action, "event": event, "todos": &state.todos }),
            ))
        }),
    );

    registry.register(
        "draw-image",
        TagHandler::complete_only(|content, _attrs, _state| {
            Ok(Action::new("draw_image", json!({ "prompt": content.trim() })))
        }),
    );

    registry.register(
        "create-video",
        TagHandler::complete_only(|content, _attrs, _state| {
            Ok(Action::new(
                "create_video",
                json!({ "prompt": content.trim() }),
            ))
        }),
    );

    registry.register(
        "communicate",
        TagHandler::complete_only(|content, attrs, _state| {
            Ok(Action::new(
                "communicate",
                json!({ "to": attr(attrs, "to")?, "content": content.trim() }),
            ))
        }),
    );

    registry.register(
        "ask-for-help",
        TagHandler::complete_only(|content, attrs, _state| {
            Ok(Action::new(
                "ask_for_help",
                json!({ "to": attr(attrs, "to")?, "content": content.trim() }),
            ))
        }),
    );
}
