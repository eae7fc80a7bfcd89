//! Workflow execution loop: walks a [WorkflowGraph] against a state record
//! until the terminal marker, a node failure, or a dead end.
//!
//! The loop never returns an error. Every way a run can stop is reported
//! in-band through [RunTermination] together with the best-effort state and
//! the log accumulated so far.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::transform::{NodeTransform, TransformError};
use crate::types::{ExecutionLog, RunReport, RunTermination, StateRecord, StateUpdate, merge_update};
use crate::workflow_graph::{END, WorkflowGraph};

/// Optional ceilings on a run. The default has neither, so a router that
/// never returns [END] loops forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
  /// Maximum number of successful node executions.
  pub max_steps: Option<usize>,
  /// Wall-clock budget for the whole run.
  pub timeout: Option<Duration>,
}

impl RunLimits {
  /// No step ceiling and no timeout.
  pub fn unbounded() -> Self {
    Self::default()
  }

  /// Stops the run once `max_steps` nodes have executed.
  pub fn with_max_steps(mut self, max_steps: usize) -> Self {
    self.max_steps = Some(max_steps);
    self
  }

  /// Stops the run once `timeout` has elapsed since it started.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }
}

/// Outcome of invoking a single transform.
enum Invocation {
  Done(Result<StateUpdate, TransformError>),
  Cancelled,
  TimedOut,
}

async fn invoke(
  transform: &dyn NodeTransform,
  state: &StateRecord,
  deadline: Option<Instant>,
  cancel: &CancellationToken,
) -> Invocation {
  let bounded = async {
    let call = transform.transform(state);
    match deadline {
      Some(d) => match tokio::time::timeout_at(d, call).await {
        Ok(r) => Invocation::Done(r),
        Err(_) => Invocation::TimedOut,
      },
      None => Invocation::Done(call.await),
    }
  };
  tokio::select! {
    biased;
    _ = cancel.cancelled() => Invocation::Cancelled,
    outcome = bounded => outcome,
  }
}

/// Runs `graph` from its entry point against a copy of `initial_state` with no
/// limits and no cancellation.
pub async fn run_workflow(graph: &WorkflowGraph, initial_state: &StateRecord) -> RunReport {
  run_workflow_with(
    graph,
    initial_state,
    RunLimits::unbounded(),
    &CancellationToken::new(),
  )
  .await
}

/// Runs `graph` from its entry point against a copy of `initial_state`.
///
/// Per step: look up the current node (unregistered stops the run with
/// [RunTermination::NodeNotFound] and no log entry), invoke it, merge its
/// update and log `Executed <node>` (a failure logs `Error in <node>: <msg>`
/// and stops), then follow the conditional edge, else the static edge, else
/// stop at a dead end.
#[instrument(level = "trace", skip(graph, initial_state, cancel))]
pub async fn run_workflow_with(
  graph: &WorkflowGraph,
  initial_state: &StateRecord,
  limits: RunLimits,
  cancel: &CancellationToken,
) -> RunReport {
  let mut state = initial_state.clone();
  let mut log = ExecutionLog::new();
  let mut steps = 0usize;
  let deadline = limits.timeout.map(|t| Instant::now() + t);
  // An unset entry point is looked up like any other unknown name.
  let mut current = graph.entry_point().unwrap_or_default().to_string();

  let termination = loop {
    if current == END {
      break RunTermination::Completed;
    }
    if cancel.is_cancelled() {
      log.record_cancelled(&current);
      break RunTermination::Cancelled;
    }
    if let Some(limit) = limits.max_steps.filter(|&limit| steps >= limit) {
      warn!(node = %current, limit, "step limit reached");
      log.record_step_limit(limit, &current);
      break RunTermination::StepLimitExceeded { limit };
    }
    if deadline.is_some_and(|d| Instant::now() >= d) {
      log.record_timeout(&current);
      break RunTermination::TimedOut;
    }

    let Some(transform) = graph.node(&current) else {
      warn!(node = %current, "node not found");
      break RunTermination::NodeNotFound { node: current };
    };

    info!(node = %current, step = steps + 1, "executing node");
    match invoke(transform.as_ref(), &state, deadline, cancel).await {
      Invocation::Done(Ok(update)) => {
        merge_update(&mut state, update);
        log.record_executed(&current);
        steps += 1;
      }
      Invocation::Done(Err(e)) => {
        warn!(node = %current, error = %e, "node failed");
        log.record_error(&current, e.message());
        break RunTermination::NodeFailed {
          node: current,
          message: e.message().to_string(),
        };
      }
      Invocation::Cancelled => {
        log.record_cancelled(&current);
        break RunTermination::Cancelled;
      }
      Invocation::TimedOut => {
        warn!(node = %current, "run timed out");
        log.record_timeout(&current);
        break RunTermination::TimedOut;
      }
    }

    match graph.next_node(&current, &state) {
      Some(next) => current = next,
      None => break RunTermination::DeadEnd { node: current },
    }
  };

  info!(termination = %termination, steps, "run finished");
  RunReport {
    state,
    log,
    termination,
    steps,
  }
}
