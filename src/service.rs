//! Boundary operations over in-memory registries: define a graph, run it,
//! fetch a run.
//!
//! Both stores live for the lifetime of the [WorkflowService] (normally the
//! hosting process) and are never evicted.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::engine::{RunLimits, run_workflow_with};
use crate::error::{Result, WorkflowError};
use crate::graphs::{DEFAULT_SUMMARY_GRAPH_ID, summarization_graph};
use crate::registry::TransformRegistry;
use crate::types::{ExecutionLog, RunSnapshot, RunStatus, RunTermination, StateRecord};
use crate::workflow_graph::WorkflowGraph;

/// Graph-creation request: node identifiers resolved against the
/// [TransformRegistry], static edges, and optional named routers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphRequest {
  pub nodes: Vec<String>,
  #[serde(default)]
  pub edges: BTreeMap<String, String>,
  /// `from` node → router identifier.
  #[serde(default)]
  pub conditional_edges: BTreeMap<String, String>,
}

/// Result of "run graph".
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
  pub run_id: String,
  pub final_state: StateRecord,
  pub logs: ExecutionLog,
  pub status: RunStatus,
  /// How the loop stopped; tells a missing node apart from a dead end.
  pub termination: RunTermination,
}

/// In-memory graph and run stores plus the transform registry they resolve
/// against.
pub struct WorkflowService {
  registry: TransformRegistry,
  limits: RunLimits,
  graphs: RwLock<HashMap<String, Arc<WorkflowGraph>>>,
  runs: RwLock<HashMap<String, RunSnapshot>>,
  shutdown: CancellationToken,
}

impl WorkflowService {
  pub fn new(registry: TransformRegistry, limits: RunLimits) -> Self {
    Self {
      registry,
      limits,
      graphs: RwLock::new(HashMap::new()),
      runs: RwLock::new(HashMap::new()),
      shutdown: CancellationToken::new(),
    }
  }

  /// Service with the built-in registry and `default_summary_graph`
  /// pre-registered.
  pub fn with_defaults(limits: RunLimits) -> Result<Self> {
    let mut service = Self::new(TransformRegistry::with_builtins(), limits);
    service
      .graphs
      .get_mut()
      .insert(DEFAULT_SUMMARY_GRAPH_ID.to_string(), Arc::new(summarization_graph()?));
    Ok(service)
  }

  /// Limits applied to every run of this service.
  pub fn limits(&self) -> RunLimits {
    self.limits
  }

  /// Token that cancels every in-flight run when fired.
  pub fn shutdown_token(&self) -> CancellationToken {
    self.shutdown.clone()
  }

  /// Registers a prebuilt graph under `id`, replacing any previous one.
  pub async fn register_graph(&self, id: impl Into<String>, graph: WorkflowGraph) {
    self.graphs.write().await.insert(id.into(), Arc::new(graph));
  }

  /// Builds a graph from `request` and stores it under a fresh id.
  ///
  /// Unknown node and router identifiers are skipped. The first listed node
  /// becomes the entry point even when it was skipped.
  #[instrument(level = "trace", skip(self, request))]
  pub async fn define_graph(&self, request: GraphRequest) -> Result<String> {
    let mut graph = WorkflowGraph::new();
    for name in &request.nodes {
      match self.registry.transform(name) {
        Some(transform) => {
          graph.add_shared_node(name.clone(), transform)?;
        }
        None => debug!(
          node = %name,
          known = ?self.registry.transform_names().collect::<Vec<_>>(),
          "skipping unknown node"
        ),
      }
    }
    for (from, to) in &request.edges {
      graph.add_edge(from.clone(), to.clone());
    }
    for (from, router_name) in &request.conditional_edges {
      match self.registry.router(router_name) {
        Some(router) => {
          graph.add_shared_conditional_edge(from.clone(), router);
        }
        None => debug!(
          router = %router_name,
          known = ?self.registry.router_names().collect::<Vec<_>>(),
          "skipping unknown router"
        ),
      }
    }
    if let Some(first) = request.nodes.first() {
      graph.set_entry_point(first.clone());
    }

    let graph_id = Uuid::new_v4().to_string();
    info!(graph_id = %graph_id, nodes = ?request.nodes, "graph created");
    self.graphs.write().await.insert(graph_id.clone(), Arc::new(graph));
    Ok(graph_id)
  }

  /// Runs the graph `graph_id` against `initial_state`.
  ///
  /// Fails only with [WorkflowError::GraphNotFound]; every other outcome is
  /// reported in the response's log and status.
  #[instrument(level = "trace", skip(self, initial_state))]
  pub async fn run_graph(&self, graph_id: &str, initial_state: StateRecord) -> Result<RunResponse> {
    let graph = self
      .graphs
      .read()
      .await
      .get(graph_id)
      .cloned()
      .ok_or_else(|| WorkflowError::GraphNotFound(graph_id.to_string()))?;

    let run_id = Uuid::new_v4().to_string();
    let running = RunSnapshot::running(initial_state.clone());
    let started_at = running.started_at;
    self.runs.write().await.insert(run_id.clone(), running);
    info!(run_id = %run_id, graph_id, "run started");

    let cancel = self.shutdown.child_token();
    let report = run_workflow_with(&graph, &initial_state, self.limits, &cancel).await;

    let termination = report.termination.clone();
    if termination.is_error() {
      warn!(run_id = %run_id, termination = %termination, "run halted on error");
    }
    let snapshot = RunSnapshot::finished(report, started_at);
    let response = RunResponse {
      run_id: run_id.clone(),
      final_state: snapshot.state.clone(),
      logs: snapshot.logs.clone(),
      status: snapshot.status,
      termination,
    };
    info!(run_id = %run_id, status = %snapshot.status, "run finished");
    self.runs.write().await.insert(run_id, snapshot);
    Ok(response)
  }

  /// Latest snapshot of `run_id`.
  pub async fn fetch_run(&self, run_id: &str) -> Result<RunSnapshot> {
    self
      .runs
      .read()
      .await
      .get(run_id)
      .cloned()
      .ok_or_else(|| WorkflowError::RunNotFound(run_id.to_string()))
  }

  /// Registered graph ids, sorted.
  pub async fn graph_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.graphs.read().await.keys().cloned().collect();
    ids.sort();
    ids
  }
}
