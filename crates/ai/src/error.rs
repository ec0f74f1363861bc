use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    /// No credentials; the service was never called.
    #[error("AI service not configured: {0}")]
    NotConfigured(String),

    /// Transport failure or non-success status.
    #[error("AI service call failed: {0}")]
    Service(String),

    /// The service answered but not in the expected shape.
    #[error("malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("invalid job input: {0}")]
    InvalidInput(String),
}
