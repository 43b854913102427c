//! Utilities for creating realistic streaming chunks that simulate how
//! LLM tokens actually arrive (a few characters at a time).

/// Split input into small char-level chunks (2-3 chars, deterministic).
pub fn create_realistic_chunks(input: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let chunk_size = if i + 3 <= chars.len() && chars[i].is_ascii_alphanumeric() {
            3
        } else {
            2
        };
        let end = (i + chunk_size).min(chars.len());
        chunks.push(chars[i..end].iter().collect());
        i = end;
    }

    chunks
}

/// Split input into fixed-size char chunks.
pub fn create_char_chunks(input: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

/// Every two-way split of the input at a char boundary, including the
/// degenerate whole-string split.
pub fn all_two_way_splits(input: &str) -> Vec<(String, String)> {
    let mut splits = vec![(input.to_string(), String::new())];
    for (idx, _) in input.char_indices().skip(1) {
        splits.push((input[..idx].to_string(), input[idx..].to_string()));
    }
    splits
}
