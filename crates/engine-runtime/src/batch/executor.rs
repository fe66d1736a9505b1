use crate::{
    batch::{
        reporter::ProgressReporter,
        runner::{BatchReport, BatchRunner},
    },
    error::RunnerError,
};
use engine_core::{
    context::batch::BatchContextBuilder,
    error::ContextError,
    notify::{ProgressDisplay, StatusNotifier},
    progress::progress_channel,
    transform::ItemTransform,
};
use model::execution::summary::BatchSummary;
use std::{fmt::Write, time::Duration};
use tracing::{info, warn};

pub const EMPTY_SELECTION_TITLE: &str = "Nothing to process";

/// Runs one batch end to end: the runner on a worker task, the reporter on
/// the calling task, then the final notices.
///
/// An empty selection never starts the worker: the notifier gets a single
/// warning and no progress event is produced.
pub async fn execute<T, D>(
    transform: T,
    builder: BatchContextBuilder<T::Params>,
    display: D,
    notifier: &dyn StatusNotifier,
    poll_interval: Duration,
) -> Result<BatchReport, RunnerError>
where
    T: ItemTransform,
    D: ProgressDisplay,
{
    let ctx = match builder.build() {
        Ok(ctx) => ctx,
        Err(ContextError::EmptySelection) => {
            warn!("Empty selection, batch not started");
            notifier.warning(EMPTY_SELECTION_TITLE, "No input files were selected.");
            return Err(RunnerError::EmptySelection);
        }
    };

    let runner = BatchRunner::new(transform);
    info!(run_id = %ctx.run_id, transform = runner.transform_name(), "Batch queued");

    let (tx, rx) = progress_channel();
    let worker = tokio::spawn(async move { runner.run(&ctx, tx).await });

    ProgressReporter::new(display, rx)
        .with_poll_interval(poll_interval)
        .run()
        .await;
    let report = worker.await?;

    if let Some(reason) = &report.summary.aborted {
        notifier.error("Batch stopped", reason);
    }
    let summary = &report.summary;
    if summary.failed == 0 {
        let title = if summary.aborted.is_some() {
            "Batch stopped early"
        } else {
            "Batch complete"
        };
        notifier.info(title, &summary.to_string());
    } else {
        notifier.warning("Batch finished with failures", &failure_detail(summary));
    }

    Ok(report)
}

fn failure_detail(summary: &BatchSummary) -> String {
    let mut detail = summary.to_string();
    for failed in &summary.failures {
        let _ = write!(detail, "\n  #{} {}: {}", failed.index, failed.label, failed.reason);
    }
    detail
}
