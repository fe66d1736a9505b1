use crate::execution::outcome::{FailureReason, ItemOutcome, ItemRecord};
use serde::Serialize;
use std::{fmt, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub index: usize,
    pub label: String,
    pub reason: FailureReason,
}

/// Final tally of a batch, derived once after the last outcome is recorded.
///
/// Skipped items count as failures; `skipped` is the subset of `failed` that
/// was skipped rather than attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<FailedItem>,
    /// Set when a fatal condition stopped the batch early.
    pub aborted: Option<String>,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.aborted.is_none()
    }

    /// Items that were never attempted because the batch stopped early.
    pub fn unattempted(&self) -> usize {
        self.total.saturating_sub(self.attempted)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed ({} skipped) out of {}",
            self.succeeded, self.failed, self.skipped, self.total
        )?;
        if let Some(reason) = &self.aborted {
            write!(f, "; stopped early, {} not attempted: {reason}", self.unattempted())?;
        }
        Ok(())
    }
}

/// Aggregates per-item records into a [`BatchSummary`].
///
/// `total` is the size of the original input list, which can exceed
/// `records.len()` when the batch was aborted.
pub fn summarize(records: &[ItemRecord], total: usize, aborted: Option<String>) -> BatchSummary {
    let mut summary = BatchSummary {
        total,
        attempted: records.len(),
        aborted,
        ..Default::default()
    };

    for record in records {
        match &record.outcome {
            ItemOutcome::Success { output } => {
                summary.succeeded += 1;
                summary.outputs.push(output.clone());
            }
            ItemOutcome::Failure { reason } => {
                summary.failed += 1;
                if reason.is_skip() {
                    summary.skipped += 1;
                }
                summary.failures.push(FailedItem {
                    index: record.index,
                    label: record.label.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }

    summary
}
