//! Last recorded view of a run, as kept by the run store and returned by
//! "fetch run".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ExecutionLog, RunReport, RunStatus, RunTermination, StateRecord};

/// Last recorded status/state/log of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
  pub status: RunStatus,
  /// Initial state while running, final state once finished.
  pub state: StateRecord,
  pub logs: ExecutionLog,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub termination: Option<RunTermination>,
  pub started_at: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub finished_at: Option<DateTime<Utc>>,
}

impl RunSnapshot {
  /// Snapshot stored before the execution loop starts.
  pub fn running(initial_state: StateRecord) -> Self {
    Self {
      status: RunStatus::Running,
      state: initial_state,
      logs: ExecutionLog::new(),
      termination: None,
      started_at: Utc::now(),
      finished_at: None,
    }
  }

  /// Snapshot replacing a running one once the loop has returned.
  pub fn finished(report: RunReport, started_at: DateTime<Utc>) -> Self {
    Self {
      status: report.termination.status(),
      state: report.state,
      logs: report.log,
      termination: Some(report.termination),
      started_at,
      finished_at: Some(Utc::now()),
    }
  }

  pub fn is_finished(&self) -> bool {
    self.finished_at.is_some()
  }
}
