//! Split `text` into sentence chunks.

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use super::str_field;
use crate::transform::{NodeTransform, TransformError};
use crate::types::{StateRecord, StateUpdate};

/// Splits `text` on `.`, trims each piece and drops empty ones into `chunks`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitTextNode;

impl SplitTextNode {
  pub const NAME: &'static str = "split_text";
}

pub(crate) fn split_sentences(text: &str) -> Vec<String> {
  text
    .split('.')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(String::from)
    .collect()
}

#[async_trait]
impl NodeTransform for SplitTextNode {
  #[instrument(level = "trace", skip(self, state))]
  async fn transform(&self, state: &StateRecord) -> Result<StateUpdate, TransformError> {
    let text = str_field(state, "text")?;
    let mut update = StateUpdate::new();
    update.insert("chunks".to_string(), json!(split_sentences(text)));
    Ok(update)
  }
}
