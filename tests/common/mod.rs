//! Shared helpers for the integration suites.
#![allow(dead_code)]

pub mod streaming_helpers;

use nbg::{
    action_mapper::{ActionMapper, AgentState},
    protocols::Action,
    stream_parser::{ParserConfig, StreamTokenizer},
};

/// Feed `chunks` through a fresh tokenizer + default mapper and return
/// every action produced, including the finalize flush.
pub fn run_pipeline(chunks: &[&str]) -> Vec<Action> {
    run_pipeline_with(ParserConfig::default(), chunks)
}

pub fn run_pipeline_with(config: ParserConfig, chunks: &[&str]) -> Vec<Action> {
    let mut tokenizer = StreamTokenizer::new(config);
    let mapper = ActionMapper::with_defaults();
    let mut state = AgentState::new();
    let mut actions = Vec::new();
    for chunk in chunks {
        let events = tokenizer.parse_chunk(chunk).expect("parse_chunk failed");
        actions.extend(mapper.map_events(&events, &mut state));
    }
    actions.extend(mapper.map_events(&tokenizer.finalize(), &mut state));
    actions
}

/// Collapse an action sequence to its terminal fingerprint: partial
/// actions dropped, adjacent text actions concatenated and trimmed.
/// Two chunkings of the same input must agree on this.
pub fn terminal_fingerprint(actions: &[Action]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for action in actions {
        match action.kind.as_str() {
            "stream_delta" | "cell_start" | "thinking_start" | "answer_start" => continue,
            "text" => {
                let content = action.data["content"].as_str().unwrap_or_default();
                match out.last_mut() {
                    Some(last) if last.starts_with("text:") => last.push_str(content),
                    _ => out.push(format!("text:{content}")),
                }
            }
            kind => out.push(format!("{kind}:{}", action.data)),
        }
    }
    for item in &mut out {
        if let Some(content) = item.strip_prefix("text:") {
            *item = format!("text:{}", content.trim());
        }
    }
    out
}

/// Concatenation of all `stream_delta` payloads for one tag name.
pub fn collect_deltas(actions: &[Action], tag: &str) -> String {
    actions
        .iter()
        .filter(|a| a.kind == "stream_delta" && a.data["tag"] == tag)
        .filter_map(|a| a.data["delta"].as_str())
        .collect()
}
