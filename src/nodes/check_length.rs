//! Loop `refine_summary` until the summary fits `max_length` words.

use serde_json::Value;
use tracing::{instrument, warn};

use super::RefineSummaryNode;
use crate::transform::Router;
use crate::types::StateRecord;
use crate::workflow_graph::END;

/// Routes back to `refine_summary` while `current_summary` has more words than
/// `max_length`, otherwise to [END].
///
/// A missing or non-numeric `max_length` routes to [END].
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckLengthRouter;

impl CheckLengthRouter {
  pub const NAME: &'static str = "check_length";
}

impl Router for CheckLengthRouter {
  #[instrument(level = "trace", skip(self, state))]
  fn route(&self, state: &StateRecord) -> String {
    let words = match state.get("current_summary") {
      Some(Value::String(s)) => s.split_whitespace().count(),
      None | Some(Value::Null) => 0,
      Some(_) => {
        warn!("current_summary is not a string; treating as empty");
        0
      }
    };
    let Some(limit) = state.get("max_length").and_then(Value::as_f64) else {
      warn!("max_length missing or not a number; ending run");
      return END.to_string();
    };
    if words as f64 > limit {
      RefineSummaryNode::NAME.to_string()
    } else {
      END.to_string()
    }
  }
}
