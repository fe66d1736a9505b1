use serde::Serialize;
use std::{fmt, path::PathBuf};

/// Why an item did not produce an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// The item does not match what the transform expects.
    Skipped(String),
    /// The transform ran and failed for this item only.
    Failed(String),
    /// The transform panicked; the message is whatever the panic carried.
    Unexpected(String),
}

impl FailureReason {
    pub fn is_skip(&self) -> bool {
        matches!(self, FailureReason::Skipped(_))
    }

    pub fn detail(&self) -> &str {
        match self {
            FailureReason::Skipped(d) | FailureReason::Failed(d) | FailureReason::Unexpected(d) => d,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Skipped(d) => write!(f, "skipped: {d}"),
            FailureReason::Failed(d) => write!(f, "failed: {d}"),
            FailureReason::Unexpected(d) => write!(f, "unexpected error: {d}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Success { output: PathBuf },
    Failure { reason: FailureReason },
}

impl ItemOutcome {
    pub fn success(output: impl Into<PathBuf>) -> Self {
        ItemOutcome::Success {
            output: output.into(),
        }
    }

    pub fn failure(reason: FailureReason) -> Self {
        ItemOutcome::Failure { reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success { .. })
    }
}

/// Outcome of one attempted item, tied back to its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    /// 1-based position in the input list.
    pub index: usize,
    pub input: PathBuf,
    pub label: String,
    pub outcome: ItemOutcome,
}
