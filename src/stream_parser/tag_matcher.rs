use once_cell::sync::Lazy;
use regex::Regex;

use crate::stream_parser::{
    attributes::parse_attributes,
    types::{AttributeMap, ParsedTag},
};

/// Open-tag header: name, attribute section (quote-aware so `>` inside a
/// quoted value does not end the header), optional self-closing slash.
static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<([A-Za-z][A-Za-z0-9_-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
        .expect("valid open tag pattern")
});

/// Classification of the buffer head.
#[derive(Debug, Clone)]
pub enum TagMatch {
    /// No `<` that could start a tag; the whole buffer is plain text
    NoTag,
    /// `len` bytes of plain text precede the next possible tag start
    TextPrefix { len: usize },
    /// A closing tag with no matching open tag; consume and discard
    StrayClose { consumed: usize },
    /// `<name .../>` — complete with empty content
    SelfClosing { tag: ParsedTag, consumed: usize },
    /// `<name ...>content</name>` fully present in the buffer
    Complete { tag: ParsedTag, consumed: usize },
    /// Open tag header complete, end tag not yet in the buffer
    Open {
        name: String,
        attributes: AttributeMap,
        raw_header: String,
        header_len: usize,
        close_re: Regex,
    },
    /// The buffer head is ambiguous; wait for more input
    Pending,
}

/// Whitespace-tolerant end-tag pattern for `name`, e.g. `</  name  >`.
pub fn close_tag_regex(name: &str) -> Regex {
    Regex::new(&format!(r"</\s*{}\s*>", regex::escape(name))).expect("valid close tag pattern")
}

/// Classify the head of `buffer`.
///
/// Matching for complete pairs uses the first occurrence of the end tag;
/// same-name nesting inside content is not supported by this protocol.
pub fn match_buffer(buffer: &str) -> TagMatch {
    let Some(lt) = buffer.find('<') else {
        return TagMatch::NoTag;
    };
    if lt > 0 {
        return TagMatch::TextPrefix { len: lt };
    }

    let Some(next) = buffer[1..].chars().next() else {
        // lone '<' at the end of the buffer
        return TagMatch::Pending;
    };

    if next == '/' {
        // closing tag without a matching open tag
        return match buffer.find('>') {
            Some(gt) => TagMatch::StrayClose { consumed: gt + 1 },
            None => TagMatch::Pending,
        };
    }

    if !next.is_ascii_alphabetic() {
        // a '<' that can never start a tag is literal text
        return match buffer[1..].find('<') {
            Some(i) => TagMatch::TextPrefix { len: 1 + i },
            None => TagMatch::NoTag,
        };
    }

    let Some(caps) = OPEN_TAG_RE.captures(buffer) else {
        // header has not fully arrived
        return TagMatch::Pending;
    };

    let name = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let attributes = parse_attributes(caps.get(2).map(|m| m.as_str()).unwrap_or_default());
    let header_len = caps.get(0).map(|m| m.end()).unwrap_or_default();
    let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());

    if self_closing {
        return TagMatch::SelfClosing {
            tag: ParsedTag {
                name,
                attributes,
                content: String::new(),
            },
            consumed: header_len,
        };
    }

    let close_re = close_tag_regex(&name);
    if let Some(m) = close_re.find(&buffer[header_len..]) {
        let content = buffer[header_len..header_len + m.start()].to_string();
        return TagMatch::Complete {
            tag: ParsedTag {
                name,
                attributes,
                content,
            },
            consumed: header_len + m.end(),
        };
    }

    TagMatch::Open {
        raw_header: buffer[..header_len].to_string(),
        name,
        attributes,
        header_len,
        close_re,
    }
}
