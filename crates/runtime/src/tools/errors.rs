use thiserror::Error;

/// Errors that can occur while invoking a tool.
///
/// None of these abort a run: they are rendered into the tool message the
/// model sees.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("tool reported an error: {0}")]
    Reported(String),
    #[error("execution failed: {0}")]
    Execution(String),
}
