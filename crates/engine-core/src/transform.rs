use crate::error::TransformError;
use async_trait::async_trait;
use model::execution::item::InputItem;
use std::path::PathBuf;

/// Maps one input item plus the batch's shared parameters to one output.
///
/// The runner calls [`ItemTransform::skip_reason`] first; a `Some` records the
/// item as skipped without calling [`ItemTransform::apply`]. Implementations
/// only borrow the parameters and must confine side effects to the item.
#[async_trait]
pub trait ItemTransform: Send + Sync + 'static {
    type Params: Send + Sync + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn skip_reason(&self, _item: &InputItem, _params: &Self::Params) -> Option<String> {
        None
    }

    /// Status line shown while the item is being processed.
    fn describe(&self, item: &InputItem) -> String {
        format!("Processing: {}", item.label())
    }

    async fn apply(
        &self,
        item: &InputItem,
        params: &Self::Params,
    ) -> Result<PathBuf, TransformError>;
}
