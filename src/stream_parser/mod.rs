/// Streaming tag parser for LLM output
///
/// Converts an arbitrarily chunked character stream containing free text
/// interleaved with XML-like tags into an ordered sequence of structured
/// events, without requiring a complete message.
// Core modules
pub mod attributes;
pub mod errors;
pub mod helpers;
pub mod tag_matcher;
pub mod tokenizer;
pub mod types;

// Re-export types used outside this module
pub use attributes::parse_attributes;
pub use errors::{ParserError, ParserResult};
pub use tag_matcher::TagMatch;
pub use tokenizer::StreamTokenizer;
pub use types::{AttributeMap, ParsedTag, ParserConfig, StreamEvent};
