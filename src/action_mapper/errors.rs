use thiserror::Error;

/// Result type for tag handler execution
pub type ActionResult<T> = Result<T, ActionError>;

/// Errors a tag handler can raise; each is contained per-tag and turned
/// into a visible error-text action by the mapper
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),

    #[error("invalid value for `{attribute}`: {message}")]
    InvalidValue {
        attribute: &'static str,
        message: String,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
