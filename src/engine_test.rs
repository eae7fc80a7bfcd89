//! Tests for the workflow execution loop.

use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::engine::{RunLimits, run_workflow, run_workflow_with};
use crate::transform::{NodeTransform, TransformError, router_fn, transform_fn};
use crate::types::{RunStatus, RunTermination, StateRecord, StateUpdate};
use crate::workflow_graph::{END, WorkflowGraph};

fn obj(v: Value) -> StateRecord {
  v.as_object().cloned().unwrap()
}

/// Node that merges a fixed update.
fn set(update: Value) -> impl NodeTransform + 'static {
  let update = obj(update);
  transform_fn(move |_: &StateRecord| Ok::<_, TransformError>(update.clone()))
}

fn fail(message: &'static str) -> impl NodeTransform + 'static {
  transform_fn(move |_: &StateRecord| Err::<StateUpdate, _>(TransformError::new(message)))
}

/// Records the counter it was invoked with and advances it.
fn tick() -> impl NodeTransform + 'static {
  transform_fn(|s: &StateRecord| {
    let next = s.get("next").and_then(Value::as_i64).unwrap_or(0);
    Ok::<_, TransformError>(obj(json!({"counter": next, "next": next + 1})))
  })
}

fn loop_until(threshold: i64) -> impl crate::transform::Router + 'static {
  router_fn(move |s: &StateRecord| {
    let counter = s.get("counter").and_then(Value::as_i64).unwrap_or(0);
    if counter < threshold {
      "tick".to_string()
    } else {
      END.to_string()
    }
  })
}

struct Sleepy(Duration);

#[async_trait]
impl NodeTransform for Sleepy {
  async fn transform(&self, _state: &StateRecord) -> Result<StateUpdate, TransformError> {
    tokio::time::sleep(self.0).await;
    Ok(obj(json!({"slept": true})))
  }
}

fn self_loop() -> WorkflowGraph {
  let mut g = WorkflowGraph::new();
  g.add_node("spin", set(json!({"spun": true})))
    .unwrap()
    .set_entry_point("spin")
    .add_edge("spin", "spin");
  g
}

fn runtime() -> tokio::runtime::Runtime {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .unwrap()
}

#[tokio::test]
async fn reaching_end_completes() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({"a": 1})))
    .unwrap()
    .set_entry_point("a")
    .add_edge("a", END);
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert_eq!(report.termination, RunTermination::Completed);
  assert_eq!(report.status(), RunStatus::Completed);
  assert_eq!(report.log.entries(), &["Executed a"]);
  assert_eq!(report.steps, 1);
}

#[tokio::test]
async fn static_chain_halts_at_dead_end() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({"a": 1})))
    .unwrap()
    .add_node("b", set(json!({"b": 2})))
    .unwrap()
    .add_node("c", set(json!({"c": 3})))
    .unwrap()
    .set_entry_point("a")
    .add_edge("a", "b")
    .add_edge("b", "c");
  let report = run_workflow(&g, &obj(json!({"seed": 0}))).await;
  assert_eq!(
    report.termination,
    RunTermination::DeadEnd {
      node: "c".to_string()
    }
  );
  assert_eq!(report.status(), RunStatus::Halted);
  assert_eq!(
    report.log.entries(),
    &["Executed a", "Executed b", "Executed c"]
  );
  assert_eq!(
    Value::Object(report.state),
    json!({"seed": 0, "a": 1, "b": 2, "c": 3})
  );
}

#[tokio::test]
async fn later_updates_add_and_overwrite_keys() {
  let mut g = WorkflowGraph::new();
  g.add_node("first", set(json!({"a": 1})))
    .unwrap()
    .add_node("second", set(json!({"b": 2})))
    .unwrap()
    .add_node("third", set(json!({"a": 3})))
    .unwrap()
    .set_entry_point("first")
    .add_edge("first", "second")
    .add_edge("second", "third")
    .add_edge("third", END);
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert!(report.is_completed());
  assert_eq!(Value::Object(report.state), json!({"a": 3, "b": 2}));
}

#[tokio::test]
async fn initial_state_is_copied_not_mutated() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({"x": 2})))
    .unwrap()
    .set_entry_point("a");
  let initial = obj(json!({"x": 1}));
  let report = run_workflow(&g, &initial).await;
  assert_eq!(initial.get("x"), Some(&json!(1)));
  assert_eq!(report.state.get("x"), Some(&json!(2)));
}

#[tokio::test]
async fn failure_mid_run_halts_with_error_entry() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({"a": 1})))
    .unwrap()
    .add_node("boom", fail("chunk missing"))
    .unwrap()
    .add_node("after", set(json!({"after": true})))
    .unwrap()
    .set_entry_point("a")
    .add_edge("a", "boom")
    .add_edge("boom", "after")
    .add_edge("after", END);
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert_eq!(
    report.log.entries(),
    &["Executed a", "Error in boom: chunk missing"]
  );
  assert_eq!(report.log.last(), Some("Error in boom: chunk missing"));
  assert_eq!(report.log.executed_count("after"), 0);
  assert_eq!(Value::Object(report.state), json!({"a": 1}));
  assert_eq!(
    report.termination,
    RunTermination::NodeFailed {
      node: "boom".to_string(),
      message: "chunk missing".to_string()
    }
  );
}

#[tokio::test]
async fn failing_node_skips_transition_resolution() {
  let mut g = WorkflowGraph::new();
  g.add_node("boom", fail("nope"))
    .unwrap()
    .set_entry_point("boom")
    .add_conditional_edge(
      "boom",
      router_fn(|_: &StateRecord| panic!("router must not run after a failure")),
    );
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert!(matches!(report.termination, RunTermination::NodeFailed { .. }));
}

#[tokio::test]
async fn unset_entry_point_is_node_not_found() {
  let g = WorkflowGraph::new();
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert_eq!(
    report.termination,
    RunTermination::NodeNotFound {
      node: String::new()
    }
  );
  assert!(report.log.is_empty());
}

#[tokio::test]
async fn conditional_edge_beats_static_edge() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({})))
    .unwrap()
    .add_node("static", set(json!({"via": "static"})))
    .unwrap()
    .add_node("dynamic", set(json!({"via": "dynamic"})))
    .unwrap()
    .set_entry_point("a")
    .add_edge("a", "static")
    .add_conditional_edge("a", router_fn(|_: &StateRecord| "dynamic".to_string()));
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert_eq!(report.state.get("via"), Some(&json!("dynamic")));
  assert_eq!(report.log.executed_count("static"), 0);
}

#[tokio::test]
async fn router_sees_post_update_state() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({"ready": true})))
    .unwrap()
    .set_entry_point("a")
    .add_conditional_edge(
      "a",
      router_fn(|s: &StateRecord| {
        if s.get("ready") == Some(&json!(true)) {
          END.to_string()
        } else {
          "a".to_string()
        }
      }),
    );
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert!(report.is_completed());
  assert_eq!(report.log.executed_count("a"), 1);
}

#[tokio::test]
async fn router_returning_unknown_node_is_node_not_found_next_step() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({"a": 1})))
    .unwrap()
    .set_entry_point("a")
    .add_conditional_edge("a", router_fn(|_: &StateRecord| "ghost".to_string()));
  let report = run_workflow(&g, &StateRecord::new()).await;
  assert_eq!(
    report.termination,
    RunTermination::NodeNotFound {
      node: "ghost".to_string()
    }
  );
  assert_eq!(report.log.entries(), &["Executed a"]);
  assert_eq!(report.state.get("a"), Some(&json!(1)));
}

#[tokio::test]
async fn step_limit_stops_self_loop() {
  let g = self_loop();
  let limits = RunLimits::default().with_max_steps(5);
  let report = run_workflow_with(&g, &StateRecord::new(), limits, &CancellationToken::new()).await;
  assert_eq!(
    report.termination,
    RunTermination::StepLimitExceeded { limit: 5 }
  );
  assert_eq!(report.log.executed_count("spin"), 5);
  assert_eq!(
    report.log.last(),
    Some("Step limit of 5 exceeded before spin")
  );
  assert_eq!(report.steps, 5);
}

#[tokio::test]
async fn step_limit_not_hit_when_run_completes_within_it() {
  let mut g = WorkflowGraph::new();
  g.add_node("a", set(json!({})))
    .unwrap()
    .set_entry_point("a")
    .add_edge("a", END);
  let limits = RunLimits::default().with_max_steps(1);
  let report = run_workflow_with(&g, &StateRecord::new(), limits, &CancellationToken::new()).await;
  assert!(report.is_completed());
}

#[tokio::test]
async fn cancelled_token_stops_before_first_node() {
  let g = self_loop();
  let cancel = CancellationToken::new();
  cancel.cancel();
  let report = run_workflow_with(&g, &StateRecord::new(), RunLimits::default(), &cancel).await;
  assert_eq!(report.termination, RunTermination::Cancelled);
  assert_eq!(report.log.entries(), &["Run cancelled before spin"]);
  assert_eq!(report.steps, 0);
}

#[tokio::test]
async fn cancellation_interrupts_in_flight_transform() {
  let mut g = WorkflowGraph::new();
  g.add_node("slow", Sleepy(Duration::from_secs(30)))
    .unwrap()
    .set_entry_point("slow");
  let cancel = CancellationToken::new();
  let trigger = cancel.clone();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(20)).await;
    trigger.cancel();
  });
  let report = run_workflow_with(&g, &StateRecord::new(), RunLimits::default(), &cancel).await;
  assert_eq!(report.termination, RunTermination::Cancelled);
  assert_eq!(report.log.entries(), &["Run cancelled before slow"]);
  assert!(report.state.get("slept").is_none());
}

#[tokio::test]
async fn timeout_drops_slow_transform() {
  let mut g = WorkflowGraph::new();
  g.add_node("slow", Sleepy(Duration::from_secs(30)))
    .unwrap()
    .set_entry_point("slow");
  let limits = RunLimits::default().with_timeout(Duration::from_millis(20));
  let report = run_workflow_with(&g, &StateRecord::new(), limits, &CancellationToken::new()).await;
  assert_eq!(report.termination, RunTermination::TimedOut);
  assert_eq!(report.log.last(), Some("Run timed out at slow"));
  assert!(report.state.get("slept").is_none());
}

#[tokio::test]
async fn timeout_stops_busy_loop() {
  let mut g = WorkflowGraph::new();
  g.add_node("nap", Sleepy(Duration::from_millis(5)))
    .unwrap()
    .set_entry_point("nap")
    .add_edge("nap", "nap");
  let limits = RunLimits::default().with_timeout(Duration::from_millis(50));
  let report = run_workflow_with(&g, &StateRecord::new(), limits, &CancellationToken::new()).await;
  assert_eq!(report.termination, RunTermination::TimedOut);
  assert_eq!(report.log.last(), Some("Run timed out at nap"));
}

proptest! {
  #[test]
  fn missing_entry_node_yields_node_not_found_and_empty_log(
    keys in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..6),
  ) {
    let initial: StateRecord = keys.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
    let mut g = WorkflowGraph::new();
    g.add_node("present", set(json!({"touched": true}))).unwrap();
    g.set_entry_point("absent");
    let report = runtime().block_on(run_workflow(&g, &initial));
    prop_assert_eq!(
      report.termination,
      RunTermination::NodeNotFound { node: "absent".to_string() }
    );
    prop_assert!(report.log.is_empty());
    prop_assert_eq!(report.state, initial);
  }

  #[test]
  fn conditional_loop_runs_threshold_minus_start_plus_one_times(
    start in 0i64..20,
    extra in 0i64..20,
  ) {
    let threshold = start + extra;
    let mut g = WorkflowGraph::new();
    g.add_node("tick", tick()).unwrap();
    g.set_entry_point("tick").add_conditional_edge("tick", loop_until(threshold));
    let report = runtime().block_on(run_workflow(&g, &obj(json!({"next": start}))));
    prop_assert!(report.is_completed());
    let expected = usize::try_from(threshold - start + 1).unwrap();
    prop_assert_eq!(report.log.executed_count("tick"), expected);
    prop_assert_eq!(report.log.len(), expected);
  }
}
