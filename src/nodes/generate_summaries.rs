//! Summarize each chunk by truncation.

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use super::str_list_field;
use crate::transform::{NodeTransform, TransformError};
use crate::types::{StateRecord, StateUpdate};

/// Words kept from each chunk.
const SUMMARY_WORDS: usize = 4;

/// Turns each of `chunks` into its first four words followed by `...`,
/// written to `chunk_summaries`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateSummariesNode;

impl GenerateSummariesNode {
  pub const NAME: &'static str = "generate_summaries";
}

pub(crate) fn summarize_chunk(chunk: &str) -> String {
  let head: Vec<&str> = chunk.split_whitespace().take(SUMMARY_WORDS).collect();
  format!("{}...", head.join(" "))
}

#[async_trait]
impl NodeTransform for GenerateSummariesNode {
  #[instrument(level = "trace", skip(self, state))]
  async fn transform(&self, state: &StateRecord) -> Result<StateUpdate, TransformError> {
    let summaries: Vec<String> = str_list_field(state, "chunks")?
      .into_iter()
      .map(summarize_chunk)
      .collect();
    let mut update = StateUpdate::new();
    update.insert("chunk_summaries".to_string(), json!(summaries));
    Ok(update)
  }
}
