use thiserror::Error;

/// Top-level errors for running a batch.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Nothing was selected; no batch was started.
    #[error("No input items were selected")]
    EmptySelection,

    /// The worker task itself died outside any single transform.
    /// This usually indicates that the task was cancelled or panicked.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
