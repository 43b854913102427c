use thiserror::Error;

/// Result type for stream parser operations
pub type ParserResult<T> = Result<T, ParserError>;

/// Errors that can occur during stream parsing
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Buffer overflow: {0} bytes exceeds maximum")]
    BufferOverflow(usize),

    #[error("Parsing failed: {0}")]
    ParsingFailed(String),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}
