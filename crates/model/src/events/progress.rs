use serde::Serialize;
use std::fmt;

/// Event pushed by the batch runner to the progress reporter.
///
/// `Item` events arrive in index order. `Done` is the last event of a batch
/// and is sent exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    Item {
        /// 1-based position of the item in the input list.
        index: usize,
        total: usize,
        message: String,
    },
    Done,
}

impl ProgressEvent {
    pub fn item(index: usize, total: usize, message: impl Into<String>) -> Self {
        ProgressEvent::Item {
            index,
            total,
            message: message.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, ProgressEvent::Done)
    }

    /// Completed fraction in `[0.0, 1.0]`. `Done` always reports `1.0`.
    pub fn fraction(&self) -> f64 {
        match self {
            ProgressEvent::Item { index, total, .. } if *total > 0 => {
                (*index as f64 / *total as f64).clamp(0.0, 1.0)
            }
            ProgressEvent::Item { .. } => 0.0,
            ProgressEvent::Done => 1.0,
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Item {
                index,
                total,
                message,
            } => write!(f, "[{index}/{total}] {message}"),
            ProgressEvent::Done => f.write_str("done"),
        }
    }
}
