use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Attributes parsed from a tag header, in source order. Duplicate keys
/// overwrite (last occurrence wins).
pub type AttributeMap = IndexMap<String, String>;

/// A fully closed tag: either self-closing or end-tag matched.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTag {
    /// Tag name as written in the stream (case-sensitive)
    pub name: String,
    /// `key="value"` pairs from the tag header
    pub attributes: AttributeMap,
    /// Everything between the header `>` and the matching end tag;
    /// empty for self-closing tags
    pub content: String,
}

/// One structured event produced by the tokenizer.
///
/// Ordering matches source order exactly; `TagContent` deltas for a tag
/// concatenate (with the content already carried by `TagClose`) to the
/// tag's full content with no duplication and no gaps.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A flushed run of plain text (trimmed at boundaries, never empty)
    Text { content: String },
    /// An open tag whose end has not arrived yet
    TagOpen { name: String, attributes: AttributeMap },
    /// New safely-flushable content of the currently open tag
    TagContent { name: String, delta: String },
    /// Terminal event for a tag (self-closing, or end tag matched)
    TagClose { tag: ParsedTag },
    /// Raw remainder dumped by `finalize()`: pending buffer content,
    /// including an unterminated tag's literal source. Never trimmed.
    RawTail { content: String },
}

/// Configuration for tokenizer behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Pending plain text is flushed eagerly once it exceeds this many bytes.
    pub text_flush_threshold: usize,

    /// Bytes of pending text withheld from an eager flush, guarding a
    /// tag start split across chunk boundaries.
    pub text_hold_back: usize,

    /// Floor for the in-tag safety margin. The effective margin for an
    /// open tag is the larger of this and its closing-marker length - 1.
    pub tag_safety_margin: usize,

    /// Maximum buffer size in bytes.
    pub max_buffer_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            text_flush_threshold: 50,
            text_hold_back: 20,
            tag_safety_margin: 5,
            max_buffer_size: 262144, // 256KB
        }
    }
}

/// State of the single tag currently being streamed (tags do not nest).
#[derive(Debug, Clone)]
pub(crate) struct OpenTagState {
    pub name: String,
    pub attributes: AttributeMap,
    /// Literal open-tag source, kept so `finalize()` can dump an
    /// unterminated tag verbatim
    pub raw_header: String,
    /// Precompiled whitespace-tolerant end-tag pattern
    pub close_re: Regex,
    /// Bytes of content already emitted as `TagContent` deltas
    pub emitted: usize,
    /// Effective safety margin for this tag
    pub safety_margin: usize,
}
