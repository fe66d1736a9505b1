use crate::error::ReportGenerationError;
use chrono::{DateTime, Utc};
use engine_core::metrics::MetricsSnapshot;
use model::{core::identifiers::RunId, execution::summary::BatchSummary};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Machine-readable record of one finished batch.
#[derive(Serialize, Debug, Clone)]
pub struct SummaryReport {
    pub run_id: RunId,
    pub transform: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub summary: BatchSummary,
    pub metrics: MetricsSnapshot,
}

impl SummaryReport {
    pub fn new(
        run_id: RunId,
        transform: impl Into<String>,
        started_at: DateTime<Utc>,
        summary: BatchSummary,
        metrics: MetricsSnapshot,
    ) -> Self {
        let finished_at = Utc::now();
        SummaryReport {
            run_id,
            transform: transform.into(),
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds(),
            summary,
            metrics,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportGenerationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub async fn write(&self, path: &Path) -> Result<(), ReportGenerationError> {
        let json = self.to_json()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| ReportGenerationError::Write {
                path: path.display().to_string(),
                source,
            })?;
        info!(path = %path.display(), "Report written");
        Ok(())
    }
}
