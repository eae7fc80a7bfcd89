//! Workflow engine types: the shared state record, the execution log, and the
//! reports/snapshots a run produces.
//!
//! The state record is schema-less JSON; node transforms communicate only
//! through it.

use serde_json::{Map, Value};

mod execution_log;
#[cfg(test)]
mod execution_log_test;
mod run_report;
mod run_snapshot;
mod run_status;
mod state_update;

pub use execution_log::ExecutionLog;
pub use run_report::RunReport;
pub use run_snapshot::RunSnapshot;
pub use run_status::{RunStatus, RunTermination};
pub use state_update::merge_update;

/// Key-value state record threaded through every node of a run.
pub type StateRecord = Map<String, Value>;

/// Partial update returned by a node transform and merged into the [StateRecord].
pub type StateUpdate = Map<String, Value>;
