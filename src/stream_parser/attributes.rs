use once_cell::sync::Lazy;
use regex::Regex;

use crate::stream_parser::types::AttributeMap;

/// `key="value"` or `key='value'`; quote styles may differ per attribute.
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute pattern")
});

/// Parse the attribute section of a tag header.
///
/// Anything not matching the `key="value"` shape is skipped silently;
/// malformed attributes degrade to "missing". Duplicate keys overwrite,
/// so the last occurrence wins.
pub fn parse_attributes(raw: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    for cap in ATTRIBUTE_RE.captures_iter(raw) {
        let Some(key) = cap.get(1) else { continue };
        let value = cap
            .get(2)
            .or_else(|| cap.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        attributes.insert(key.as_str().to_string(), value.to_string());
    }
    attributes
}
