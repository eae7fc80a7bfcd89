//! Result of one pass of the execution loop.

use serde::Serialize;

use super::{ExecutionLog, RunStatus, RunTermination, StateRecord};

/// Final (best-effort) state, log and termination of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  /// State accumulated through the last successful merge.
  pub state: StateRecord,
  pub log: ExecutionLog,
  pub termination: RunTermination,
  /// Number of successful node executions.
  pub steps: usize,
}

impl RunReport {
  pub fn status(&self) -> RunStatus {
    self.termination.status()
  }

  pub fn is_completed(&self) -> bool {
    self.termination.is_completed()
  }
}
