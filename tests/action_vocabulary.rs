//! Behavior of the built-in tag vocabulary, end to end through the
//! parser and mapper.

mod common;

use common::run_pipeline;
use serde_json::json;

#[test]
fn test_update_title() {
    let actions = run_pipeline(&["<update-title> Quarterly Report </update-title>"]);
    assert_eq!(actions[0].kind, "update_title");
    assert_eq!(actions[0].data["title"], "Quarterly Report");
}

#[test]
fn test_chapter_and_section() {
    let actions = run_pipeline(&[
        "<new-chapter>Exploration</new-chapter><new-section>Outliers</new-section>",
    ]);
    assert_eq!(actions[0].kind, "new_chapter");
    assert_eq!(actions[0].data["title"], "Exploration");
    assert_eq!(actions[1].kind, "new_section");
    assert_eq!(actions[1].data["title"], "Outliers");
}

#[test]
fn test_add_code_streams_with_language() {
    let actions = run_pipeline(&["<add-code language=\"rust\">fn main() {}</add-code>"]);
    assert_eq!(actions[0].kind, "cell_start");
    assert_eq!(actions[0].data["language"], "rust");

    let cell = actions.iter().find(|a| a.kind == "add_cell").unwrap();
    assert_eq!(cell.data["cell_type"], "code");
    assert_eq!(cell.data["language"], "rust");
    assert_eq!(cell.data["content"], "fn main() {}");
}

#[test]
fn test_add_code_defaults_to_python() {
    let actions = run_pipeline(&["<add-code>print(1)</add-code>"]);
    let cell = actions.iter().find(|a| a.kind == "add_cell").unwrap();
    assert_eq!(cell.data["language"], "python");
}

#[test]
fn test_thinking_and_answer() {
    let actions = run_pipeline(&["<thinking>hmm</thinking><answer>42</answer>"]);
    let kinds: Vec<&str> = actions.iter().map(|a| a.kind.as_str()).collect();
    assert_eq!(kinds, vec!["thinking", "answer"]);
    assert_eq!(actions[0].data["content"], "hmm");
    assert_eq!(actions[1].data["content"], "42");
}

#[test]
fn test_call_execute() {
    let actions = run_pipeline(&["<call-execute event=\"cell-7\"/>"]);
    assert_eq!(actions[0].kind, "execute");
    assert_eq!(actions[0].data["event"], "cell-7");
}

#[test]
fn test_call_execute_defaults() {
    let actions = run_pipeline(&["<call-execute/>"]);
    assert_eq!(actions[0].data["event"], "run");
}

#[test]
fn test_set_then_get_variable() {
    let actions = run_pipeline(&[
        r#"<set-variable variable="threshold" value="0.75" type="float"/>"#,
        r#"<get-variable variable="threshold"/>"#,
    ]);
    assert_eq!(actions[0].kind, "variable_set");
    assert_eq!(actions[0].data["value"], json!(0.75));
    assert_eq!(actions[1].kind, "variable_value");
    assert_eq!(actions[1].data["value"], json!(0.75));
}

#[test]
fn test_get_variable_default_fallback() {
    let actions = run_pipeline(&[r#"<get-variable variable="missing" default="none"/>"#]);
    assert_eq!(actions[0].data["value"], "none");
}

#[test]
fn test_get_variable_without_default_is_null() {
    let actions = run_pipeline(&[r#"<get-variable variable="missing"/>"#]);
    assert_eq!(actions[0].data["value"], json!(null));
}

#[test]
fn test_set_variable_json_type() {
    let actions = run_pipeline(&[
        r#"<set-variable variable="cfg" value='{"bins": 20}' type="json"/>"#,
    ]);
    assert_eq!(actions[0].data["value"], json!({"bins": 20}));
}

#[test]
fn test_set_variable_value_from_content() {
    let actions = run_pipeline(&[r#"<set-variable variable="note" type="str">keep this</set-variable>"#]);
    assert_eq!(actions[0].kind, "variable_set");
    assert_eq!(actions[0].data["value"], "keep this");
}

#[test]
fn test_set_variable_bad_int_is_contained() {
    let actions = run_pipeline(&[
        r#"<set-variable variable="n" value="abc" type="int"/><answer>still here</answer>"#,
    ]);
    assert_eq!(actions[0].kind, "text");
    assert!(actions[0].data["content"]
        .as_str()
        .unwrap()
        .starts_with("[Error processing set-variable]"));
    // one malformed tag never aborts the rest of the stream
    assert_eq!(actions[1].kind, "answer");
}

#[test]
fn test_remember() {
    let actions = run_pipeline(&["<remember type=\"preference\">dark mode plots</remember>"]);
    assert_eq!(actions[0].kind, "remember");
    assert_eq!(actions[0].data["kind"], "preference");
    assert_eq!(actions[0].data["content"], "dark mode plots");
}

#[test]
fn test_update_todo_lifecycle() {
    let actions = run_pipeline(&[
        r#"<update-todo action="add" event="load data"/>"#,
        r#"<update-todo action="add" event="plot"/>"#,
        r#"<update-todo action="done" event="load data"/>"#,
        r#"<update-todo action="remove" event="plot"/>"#,
    ]);
    assert!(actions.iter().all(|a| a.kind == "todo_update"));

    let after_done = &actions[2].data["todos"];
    assert_eq!(after_done[0]["event"], "load data");
    assert_eq!(after_done[0]["done"], true);

    let after_remove = &actions[3].data["todos"];
    assert_eq!(after_remove.as_array().unwrap().len(), 1);
}

#[test]
fn test_update_todo_unknown_action_is_contained() {
    let actions = run_pipeline(&[r#"<update-todo action="explode" event="x"/>"#]);
    assert_eq!(actions[0].kind, "text");
    assert!(actions[0].data["content"]
        .as_str()
        .unwrap()
        .starts_with("[Error processing update-todo]"));
}

#[test]
fn test_media_tags() {
    let actions = run_pipeline(&[
        "<draw-image>a cat on a keyboard</draw-image><create-video>zoom into a fractal</create-video>",
    ]);
    assert_eq!(actions[0].kind, "draw_image");
    assert_eq!(actions[0].data["prompt"], "a cat on a keyboard");
    assert_eq!(actions[1].kind, "create_video");
    assert_eq!(actions[1].data["prompt"], "zoom into a fractal");
}

#[test]
fn test_communicate_and_ask_for_help() {
    let actions = run_pipeline(&[
        r#"<communicate to="debugger">trace cell 3</communicate><ask-for-help to="user">which column?</ask-for-help>"#,
    ]);
    assert_eq!(actions[0].kind, "communicate");
    assert_eq!(actions[0].data["to"], "debugger");
    assert_eq!(actions[1].kind, "ask_for_help");
    assert_eq!(actions[1].data["content"], "which column?");
}

#[test]
fn test_communicate_missing_recipient_is_contained() {
    let actions = run_pipeline(&["<communicate>hello</communicate>"]);
    assert_eq!(actions[0].kind, "text");
    assert!(actions[0].data["content"]
        .as_str()
        .unwrap()
        .starts_with("[Error processing communicate]"));
}
