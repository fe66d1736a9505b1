use crate::{error::ContextError, metrics::Metrics};
use chrono::{DateTime, Utc};
use model::{
    core::identifiers::RunId,
    execution::{item::InputItem, params::FailurePolicy},
};
use std::sync::Arc;

/// Everything one batch needs, owned by the caller for the duration of a
/// single run and dropped once the summary exists.
#[derive(Debug)]
pub struct BatchContext<P> {
    pub run_id: RunId,
    pub items: Vec<InputItem>,
    pub params: Arc<P>,
    pub policy: FailurePolicy,
    pub metrics: Metrics,
    pub started_at: DateTime<Utc>,
}

impl<P> BatchContext<P> {
    pub fn builder(items: Vec<InputItem>, params: P) -> BatchContextBuilder<P> {
        BatchContextBuilder::new(items, params)
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }
}

pub struct BatchContextBuilder<P> {
    items: Vec<InputItem>,
    params: P,
    run_id: Option<RunId>,
    policy: FailurePolicy,
    metrics: Option<Metrics>,
}

impl<P> BatchContextBuilder<P> {
    fn new(items: Vec<InputItem>, params: P) -> Self {
        Self {
            items,
            params,
            run_id: None,
            policy: FailurePolicy::default(),
            metrics: None,
        }
    }

    pub fn run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Fails on an empty item list: an empty selection never starts a batch.
    pub fn build(self) -> Result<BatchContext<P>, ContextError> {
        if self.items.is_empty() {
            return Err(ContextError::EmptySelection);
        }

        Ok(BatchContext {
            run_id: self.run_id.unwrap_or_else(RunId::generate),
            items: self.items,
            params: Arc::new(self.params),
            policy: self.policy,
            metrics: self.metrics.unwrap_or_default(),
            started_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_rejected() {
        let result = BatchContext::builder(Vec::new(), ()).build();
        assert!(matches!(result, Err(ContextError::EmptySelection)));
    }

    #[test]
    fn builder_applies_overrides() {
        let ctx = BatchContext::builder(vec![InputItem::file("/in/a.pdf")], 7u8)
            .run_id(RunId::from("run-fixed"))
            .policy(FailurePolicy::StopOnError)
            .build()
            .unwrap();

        assert_eq!(ctx.run_id.as_str(), "run-fixed");
        assert_eq!(ctx.policy, FailurePolicy::StopOnError);
        assert_eq!(*ctx.params, 7);
        assert_eq!(ctx.total(), 1);
    }
}
