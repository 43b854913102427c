//! Chunk-boundary invariance: streaming must be observably equivalent to
//! non-streaming for terminal results, however the input is fragmented.

mod common;

use common::{
    collect_deltas, run_pipeline, terminal_fingerprint,
    streaming_helpers::{all_two_way_splits, create_char_chunks, create_realistic_chunks},
};

const MIXED_CORPUS: &str = "Let me set that up for you.\
<update-title>Sales Analysis</update-title>\
<new-chapter>Data Loading</new-chapter>\
<add-text>We start by loading the CSV into a frame.</add-text>\
<add-code language=\"python\">import pandas as pd\ndf = pd.read_csv(\"sales.csv\")\nprint(df.shape)</add-code>\
<call-execute event=\"cell-1\"/>\
<set-variable variable=\"rows\" value=\"1200\" type=\"int\"/>\
Now the interesting part. <answer>The dataset has 1200 rows.</answer> Done.";

#[test]
fn test_single_chunk_baseline() {
    let actions = run_pipeline(&[MIXED_CORPUS]);
    let fingerprint = terminal_fingerprint(&actions);
    assert_eq!(fingerprint.len(), 10);
    assert_eq!(fingerprint[0], "text:Let me set that up for you.");
    assert!(fingerprint[1].starts_with("update_title:"));
    assert!(fingerprint[3].starts_with("add_cell:"));
    assert!(fingerprint[4].starts_with("add_cell:"));
    assert!(fingerprint[8].starts_with("answer:"));
    assert_eq!(fingerprint[9], "text:Done.");
}

#[test]
fn test_every_two_way_split_matches_single_chunk() {
    let baseline = terminal_fingerprint(&run_pipeline(&[MIXED_CORPUS]));
    for (head, tail) in all_two_way_splits(MIXED_CORPUS) {
        let split = terminal_fingerprint(&run_pipeline(&[&head, &tail]));
        assert_eq!(
            split, baseline,
            "split after {} bytes diverged",
            head.len()
        );
    }
}

#[test]
fn test_realistic_token_chunks_match_single_chunk() {
    let baseline = terminal_fingerprint(&run_pipeline(&[MIXED_CORPUS]));
    let chunks = create_realistic_chunks(MIXED_CORPUS);
    let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    assert_eq!(terminal_fingerprint(&run_pipeline(&refs)), baseline);
}

#[test]
fn test_char_at_a_time_matches_single_chunk() {
    let baseline = terminal_fingerprint(&run_pipeline(&[MIXED_CORPUS]));
    let chunks = create_char_chunks(MIXED_CORPUS, 1);
    let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    assert_eq!(terminal_fingerprint(&run_pipeline(&refs)), baseline);
}

#[test]
fn test_self_closing_tag_split_is_idempotent() {
    let whole = run_pipeline(&[r#"<set-variable variable="x" value="1" type="str"/>"#]);
    let split = run_pipeline(&[
        r#"<set-variable vari"#,
        r#"able="x" value="1" type="str"/>"#,
    ]);
    assert_eq!(whole, split);
    assert_eq!(whole.len(), 1);
    assert_eq!(whole[0].kind, "variable_set");
    assert_eq!(whole[0].data["variable"], "x");
}

#[test]
fn test_partial_content_monotonicity() {
    let code = "import numpy as np\nfor i in range(100):\n    print(np.sqrt(i))\n";
    let input = format!("<add-code language=\"python\">{code}</add-code>");
    let chunks = create_char_chunks(&input, 4);
    let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let actions = run_pipeline(&refs);

    // deltas concatenate to the content exactly once: no gaps, no repeats
    assert_eq!(collect_deltas(&actions, "add-code"), code);

    let terminal = actions.iter().find(|a| a.kind == "add_cell").unwrap();
    assert_eq!(terminal.data["content"], code);
    assert_eq!(terminal.data["language"], "python");
}

#[test]
fn test_example_end_to_end_scenario() {
    let actions = run_pipeline(&["Hello ", "<add-text>wor", "ld</add-text> bye"]);
    let fingerprint = terminal_fingerprint(&actions);
    assert_eq!(
        fingerprint,
        vec![
            "text:Hello".to_string(),
            r#"add_cell:{"cell_type":"markdown","content":"world"}"#.to_string(),
            "text:bye".to_string(),
        ]
    );
}

#[test]
fn test_long_text_run_streams_eagerly() {
    let prose = "word ".repeat(30); // 150 chars, no tags
    let chunks = create_char_chunks(&prose, 7);
    let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let actions = run_pipeline(&refs);

    // several text actions, not one giant buffer at finalize
    let text_actions = actions.iter().filter(|a| a.kind == "text").count();
    assert!(text_actions > 1, "expected eager text flushes");

    let joined: String = actions
        .iter()
        .filter_map(|a| a.data["content"].as_str())
        .collect();
    assert_eq!(joined.trim(), prose.trim());
}
