//! Built-in node transforms and routers for the rule-based summarization
//! workflow.
//!
//! State keys, by owning node:
//! - `split_text`: reads `text`, writes `chunks`
//! - `generate_summaries`: reads `chunks`, writes `chunk_summaries`
//! - `merge_summaries`: reads `chunk_summaries`, writes `current_summary`
//! - `refine_summary`: reads and writes `current_summary`
//! - `check_length` (router): reads `current_summary` and `max_length`

use serde_json::Value;

use crate::transform::TransformError;
use crate::types::StateRecord;

mod check_length;
mod generate_summaries;
mod merge_summaries;
mod refine_summary;
mod split_text;

pub use check_length::CheckLengthRouter;
pub use generate_summaries::GenerateSummariesNode;
pub use merge_summaries::MergeSummariesNode;
pub use refine_summary::RefineSummaryNode;
pub use split_text::SplitTextNode;

/// Reads `key` as a string; missing or null reads as `""`.
pub(crate) fn str_field<'a>(state: &'a StateRecord, key: &str) -> Result<&'a str, TransformError> {
  match state.get(key) {
    None | Some(Value::Null) => Ok(""),
    Some(Value::String(s)) => Ok(s.as_str()),
    Some(other) => Err(TransformError::new(format!(
      "'{}' must be a string, got {}",
      key,
      type_name(other)
    ))),
  }
}

/// Reads `key` as an array of strings; missing or null reads as empty.
pub(crate) fn str_list_field<'a>(
  state: &'a StateRecord,
  key: &str,
) -> Result<Vec<&'a str>, TransformError> {
  match state.get(key) {
    None | Some(Value::Null) => Ok(vec![]),
    Some(Value::Array(items)) => items
      .iter()
      .map(|item| {
        item.as_str().ok_or_else(|| {
          TransformError::new(format!(
            "'{}' items must be strings, got {}",
            key,
            type_name(item)
          ))
        })
      })
      .collect(),
    Some(other) => Err(TransformError::new(format!(
      "'{}' must be an array, got {}",
      key,
      type_name(other)
    ))),
  }
}

pub(crate) fn type_name(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
