use thiserror::Error;

/// Failures surfaced to callers of the reply pipeline.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// Rejected before any generation work starts.
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// The generation provider was unreachable or returned a failure.
    #[error("generation provider failed: {0:#}")]
    Provider(anyhow::Error),

    /// A prompt could not be assembled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<askama::Error> for ReplyError {
    fn from(e: askama::Error) -> Self {
        ReplyError::Internal(format!("prompt template rendering failed: {}", e))
    }
}
