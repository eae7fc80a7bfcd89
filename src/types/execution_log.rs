//! Ordered, append-only log of human-readable run events.
//!
//! Serializes as a plain JSON array of strings, e.g.
//! `["Executed split_text", "Error in refine_summary: ..."]`.

use serde::{Deserialize, Serialize};

/// Ordered, append-only log of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionLog {
  entries: Vec<String>,
}

impl ExecutionLog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a successful node execution.
  pub fn record_executed(&mut self, node: &str) {
    self.entries.push(format!("Executed {}", node));
  }

  /// Records a transform failure.
  pub fn record_error(&mut self, node: &str, message: &str) {
    self.entries.push(format!("Error in {}: {}", node, message));
  }

  pub fn record_step_limit(&mut self, limit: usize, node: &str) {
    self
      .entries
      .push(format!("Step limit of {} exceeded before {}", limit, node));
  }

  pub fn record_cancelled(&mut self, node: &str) {
    self.entries.push(format!("Run cancelled before {}", node));
  }

  pub fn record_timeout(&mut self, node: &str) {
    self.entries.push(format!("Run timed out at {}", node));
  }

  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  pub fn last(&self) -> Option<&str> {
    self.entries.last().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Number of `Executed <node>` entries for `node`.
  pub fn executed_count(&self, node: &str) -> usize {
    let needle = format!("Executed {}", node);
    self.entries.iter().filter(|e| **e == needle).count()
  }
}
