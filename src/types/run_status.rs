//! How a run ended, and the coarse status reported for it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
  /// Snapshot recorded before the loop starts.
  Running,
  /// The terminal marker was reached.
  Completed,
  /// The run stopped anywhere other than the terminal marker.
  Halted,
}

impl fmt::Display for RunStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunStatus::Running => write!(f, "running"),
      RunStatus::Completed => write!(f, "completed"),
      RunStatus::Halted => write!(f, "halted"),
    }
  }
}

/// Why the execution loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunTermination {
  /// Current node became the terminal marker.
  Completed,
  /// `node` executed but has no outgoing edge of either kind.
  DeadEnd { node: String },
  /// The transform bound to `node` failed.
  NodeFailed { node: String, message: String },
  /// `node` was referenced (entry point or transition) but never registered.
  NodeNotFound { node: String },
  /// The configured step ceiling was reached.
  StepLimitExceeded { limit: usize },
  /// The run's cancellation token fired.
  Cancelled,
  /// The run's deadline elapsed.
  TimedOut,
}

impl RunTermination {
  /// Status reported for a run that stopped this way.
  pub fn status(&self) -> RunStatus {
    match self {
      RunTermination::Completed => RunStatus::Completed,
      _ => RunStatus::Halted,
    }
  }

  /// Whether the run reached the terminal marker.
  pub fn is_completed(&self) -> bool {
    matches!(self, RunTermination::Completed)
  }

  /// True for terminations that are a defect of the graph or a node rather than
  /// a normal stop (dead ends and completion are normal).
  pub fn is_error(&self) -> bool {
    matches!(
      self,
      RunTermination::NodeFailed { .. } | RunTermination::NodeNotFound { .. }
    )
  }
}

impl fmt::Display for RunTermination {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RunTermination::Completed => write!(f, "completed"),
      RunTermination::DeadEnd { node } => write!(f, "dead end at '{}'", node),
      RunTermination::NodeFailed { node, message } => {
        write!(f, "node '{}' failed: {}", node, message)
      }
      RunTermination::NodeNotFound { node } => write!(f, "node '{}' not found", node),
      RunTermination::StepLimitExceeded { limit } => write!(f, "step limit of {} exceeded", limit),
      RunTermination::Cancelled => write!(f, "cancelled"),
      RunTermination::TimedOut => write!(f, "timed out"),
    }
  }
}
