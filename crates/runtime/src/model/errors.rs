use thiserror::Error;

/// Errors from chat-completion calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The endpoint could not be reached.
    #[error("network: {0}")]
    Network(String),

    /// The endpoint rejected the API key.
    #[error("unauthorized: check OPENAI_API_KEY ({0})")]
    Unauthorized(String),

    /// The endpoint answered with an error status.
    #[error("completion api: {0}")]
    Api(String),

    /// The response body could not be parsed or had no choices.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}
