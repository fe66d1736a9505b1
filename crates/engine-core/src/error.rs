use model::execution::outcome::FailureReason;
use thiserror::Error;

/// Errors raised by an item transform.
///
/// Only [`TransformError::ToolMissing`] is fatal for the batch; everything
/// else is confined to the item that produced it.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("{0}")]
    Skipped(String),

    #[error("{0}")]
    Failed(String),

    #[error("Required tool '{tool}' is not available: {detail}")]
    ToolMissing { tool: String, detail: String },

    #[error("'{tool}' exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransformError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransformError::ToolMissing { .. })
    }

    /// Converts a non-fatal error into the reason stored on the item outcome.
    pub fn into_reason(self) -> FailureReason {
        match self {
            TransformError::Skipped(reason) => FailureReason::Skipped(reason),
            other => FailureReason::Failed(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Batch has no input items")]
    EmptySelection,
}
