use chrono::{DateTime, Utc};
use engine_core::{
    context::batch::BatchContext, error::TransformError, metrics::MetricsSnapshot,
    progress::ProgressSender, transform::ItemTransform,
};
use model::{
    core::identifiers::RunId,
    execution::{
        item::InputItem,
        outcome::{FailureReason, ItemOutcome, ItemRecord},
        params::FailurePolicy,
        summary::{BatchSummary, summarize},
    },
};
use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};
use tracing::{debug, error, info, warn};

/// Everything one finished batch produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub run_id: RunId,
    pub transform: &'static str,
    pub started_at: DateTime<Utc>,
    /// One record per attempted item, in input order.
    pub records: Vec<ItemRecord>,
    pub summary: BatchSummary,
    pub metrics: MetricsSnapshot,
}

enum Plan {
    Skip(String),
    Apply(String),
}

enum ItemStep {
    Recorded(ItemOutcome),
    Fatal(TransformError),
}

/// Runs one transform over every item of a batch, sequentially and in order.
pub struct BatchRunner<T: ItemTransform> {
    transform: Arc<T>,
}

impl<T: ItemTransform> BatchRunner<T> {
    pub fn new(transform: T) -> Self {
        BatchRunner {
            transform: Arc::new(transform),
        }
    }

    pub fn transform_name(&self) -> &'static str {
        self.transform.name()
    }

    /// Processes the batch and sends `Done` on `progress` when it returns.
    pub async fn run(&self, ctx: &BatchContext<T::Params>, mut progress: ProgressSender) -> BatchReport {
        let total = ctx.total();
        let name = self.transform.name();
        info!(run_id = %ctx.run_id, transform = name, total, "Starting batch");

        let mut records = Vec::with_capacity(total);
        let mut aborted = None;

        for (pos, item) in ctx.items.iter().enumerate() {
            let index = pos + 1;

            let step = match self.plan(item, ctx) {
                Ok(Plan::Skip(reason)) => {
                    progress.item(index, total, format!("Skipped: {}", item.label()));
                    ItemStep::Recorded(ItemOutcome::failure(FailureReason::Skipped(reason)))
                }
                Ok(Plan::Apply(message)) => {
                    progress.item(index, total, message);
                    self.apply_isolated(item, ctx).await
                }
                Err(message) => {
                    progress.item(index, total, format!("Failed: {}", item.label()));
                    error!(item = %item.label(), %message, "Transform panicked while preparing item");
                    ItemStep::Recorded(ItemOutcome::failure(FailureReason::Unexpected(message)))
                }
            };

            let outcome = match step {
                ItemStep::Recorded(outcome) => outcome,
                ItemStep::Fatal(err) => {
                    error!(index, total, error = %err, "Fatal error, stopping batch");
                    aborted = Some(err.to_string());
                    break;
                }
            };

            self.record_metrics(ctx, &outcome).await;
            match &outcome {
                ItemOutcome::Success { output } => {
                    info!(index, total, output = %output.display(), "Item done");
                }
                ItemOutcome::Failure { reason } if reason.is_skip() => {
                    debug!(index, total, %reason, "Item skipped");
                }
                ItemOutcome::Failure { reason } => {
                    warn!(index, total, %reason, "Item failed");
                }
            }

            let stop = ctx.policy == FailurePolicy::StopOnError
                && matches!(&outcome, ItemOutcome::Failure { reason } if !reason.is_skip());

            records.push(ItemRecord {
                index,
                input: item.path.clone(),
                label: item.label(),
                outcome,
            });

            if stop {
                warn!(index, total, "Stop-on-error is set, stopping batch");
                aborted = Some(format!("stopped after item {index} failed"));
                break;
            }
        }

        let summary = summarize(&records, total, aborted);
        info!(run_id = %ctx.run_id, %summary, "Batch finished");
        progress.finish();

        BatchReport {
            run_id: ctx.run_id.clone(),
            transform: name,
            started_at: ctx.started_at,
            records,
            summary,
            metrics: ctx.metrics.snapshot(),
        }
    }

    /// Decides between skipping and applying. A panic in the transform's
    /// synchronous hooks is caught and returned as its message.
    fn plan(&self, item: &InputItem, ctx: &BatchContext<T::Params>) -> Result<Plan, String> {
        catch_unwind(AssertUnwindSafe(|| {
            match self.transform.skip_reason(item, &ctx.params) {
                Some(reason) => Plan::Skip(reason),
                None => Plan::Apply(self.transform.describe(item)),
            }
        }))
        .map_err(panic_message)
    }

    /// Runs the transform on its own task so a panic stays inside this item.
    async fn apply_isolated(&self, item: &InputItem, ctx: &BatchContext<T::Params>) -> ItemStep {
        let transform = Arc::clone(&self.transform);
        let params = Arc::clone(&ctx.params);
        let owned = item.clone();

        let handle = tokio::spawn(async move { transform.apply(&owned, &params).await });

        match handle.await {
            Ok(Ok(output)) => ItemStep::Recorded(ItemOutcome::success(output)),
            Ok(Err(err)) if err.is_fatal() => ItemStep::Fatal(err),
            Ok(Err(err)) => ItemStep::Recorded(ItemOutcome::failure(err.into_reason())),
            Err(join) => {
                let message = if join.is_panic() {
                    panic_message(join.into_panic())
                } else {
                    join.to_string()
                };
                error!(item = %item.label(), %message, "Transform panicked");
                ItemStep::Recorded(ItemOutcome::failure(FailureReason::Unexpected(message)))
            }
        }
    }

    async fn record_metrics(&self, ctx: &BatchContext<T::Params>, outcome: &ItemOutcome) {
        ctx.metrics.increment_attempted();
        match outcome {
            ItemOutcome::Success { output } => {
                ctx.metrics.increment_succeeded();
                if let Ok(meta) = tokio::fs::metadata(output).await {
                    ctx.metrics.increment_bytes(meta.len());
                }
            }
            ItemOutcome::Failure { reason } => ctx.metrics.increment_failed(reason.is_skip()),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "transform panicked".to_string()
    }
}
