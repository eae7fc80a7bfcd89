//! Join chunk summaries into one running summary.

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use super::str_list_field;
use crate::transform::{NodeTransform, TransformError};
use crate::types::{StateRecord, StateUpdate};

/// Joins `chunk_summaries` with single spaces into `current_summary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSummariesNode;

impl MergeSummariesNode {
  pub const NAME: &'static str = "merge_summaries";
}

#[async_trait]
impl NodeTransform for MergeSummariesNode {
  #[instrument(level = "trace", skip(self, state))]
  async fn transform(&self, state: &StateRecord) -> Result<StateUpdate, TransformError> {
    let merged = str_list_field(state, "chunk_summaries")?.join(" ");
    let mut update = StateUpdate::new();
    update.insert("current_summary".to_string(), json!(merged));
    Ok(update)
  }
}
