//! Shorten the running summary by one word.

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use super::str_field;
use crate::transform::{NodeTransform, TransformError};
use crate::types::{StateRecord, StateUpdate};

/// Drops the last word of `current_summary` when it has more than one word;
/// otherwise leaves it as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefineSummaryNode;

impl RefineSummaryNode {
  pub const NAME: &'static str = "refine_summary";
}

pub(crate) fn drop_last_word(summary: &str) -> String {
  let words: Vec<&str> = summary.split_whitespace().collect();
  if words.len() > 1 {
    words[..words.len() - 1].join(" ")
  } else {
    summary.to_string()
  }
}

#[async_trait]
impl NodeTransform for RefineSummaryNode {
  #[instrument(level = "trace", skip(self, state))]
  async fn transform(&self, state: &StateRecord) -> Result<StateUpdate, TransformError> {
    let current = str_field(state, "current_summary")?;
    let mut update = StateUpdate::new();
    update.insert("current_summary".to_string(), json!(drop_last_word(current)));
    Ok(update)
  }
}
