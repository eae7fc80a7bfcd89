//! Graph definition: named nodes, static edges, conditional edges and an
//! entry point.
//!
//! Built once, then shared read-only (typically as `Arc<WorkflowGraph>`) by
//! any number of runs. Nothing is validated at build time: unknown entry
//! points, dangling edges and cycles all surface during execution.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{Result, WorkflowError};
use crate::transform::{NodeTransform, Router};
use crate::types::StateRecord;

/// Terminal marker: a run that transitions here has completed.
pub const END: &str = "END";

/// Nodes, static edges, conditional edges and entry point of a workflow.
#[derive(Clone, Default)]
pub struct WorkflowGraph {
  nodes: BTreeMap<String, Arc<dyn NodeTransform>>,
  edges: HashMap<String, String>,
  conditional_edges: HashMap<String, Arc<dyn Router>>,
  entry_point: Option<String>,
}

impl WorkflowGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `transform` under `name`, replacing any previous binding.
  /// Fails only for the terminal marker.
  pub fn add_node<T>(&mut self, name: impl Into<String>, transform: T) -> Result<&mut Self>
  where
    T: NodeTransform + 'static,
  {
    self.add_shared_node(name, Arc::new(transform))
  }

  /// Like [WorkflowGraph::add_node] for a transform shared with other graphs.
  #[instrument(level = "trace", skip(self, name, transform))]
  pub fn add_shared_node(
    &mut self,
    name: impl Into<String>,
    transform: Arc<dyn NodeTransform>,
  ) -> Result<&mut Self> {
    let name = name.into();
    if name == END {
      return Err(WorkflowError::ReservedNodeName(name));
    }
    debug!(node = %name, "registering node");
    self.nodes.insert(name, transform);
    Ok(self)
  }

  /// Records the starting node. Not validated until the graph runs.
  pub fn set_entry_point(&mut self, name: impl Into<String>) -> &mut Self {
    self.entry_point = Some(name.into());
    self
  }

  /// Records a static transition, replacing any previous one from `from`.
  pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
    self.edges.insert(from.into(), to.into());
    self
  }

  /// Records a conditional transition, replacing any previous one from `from`.
  /// Takes precedence over a static edge from the same node.
  pub fn add_conditional_edge<R>(&mut self, from: impl Into<String>, router: R) -> &mut Self
  where
    R: Router + 'static,
  {
    self.add_shared_conditional_edge(from, Arc::new(router))
  }

  /// [WorkflowGraph::add_conditional_edge] for a router already behind an `Arc`.
  pub fn add_shared_conditional_edge(
    &mut self,
    from: impl Into<String>,
    router: Arc<dyn Router>,
  ) -> &mut Self {
    self.conditional_edges.insert(from.into(), router);
    self
  }

  /// Node the loop starts from, if one was set.
  pub fn entry_point(&self) -> Option<&str> {
    self.entry_point.as_deref()
  }

  /// Transform registered under `name`.
  pub fn node(&self, name: &str) -> Option<&Arc<dyn NodeTransform>> {
    self.nodes.get(name)
  }

  /// Whether `name` is a registered node.
  pub fn contains_node(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  /// Registered node names in sorted order.
  pub fn node_names(&self) -> impl Iterator<Item = &str> {
    self.nodes.keys().map(String::as_str)
  }

  /// Unconditional successor of `from`, if any.
  pub fn static_target(&self, from: &str) -> Option<&str> {
    self.edges.get(from).map(String::as_str)
  }

  /// Whether `from` has a router attached.
  pub fn has_conditional_edge(&self, from: &str) -> bool {
    self.conditional_edges.contains_key(from)
  }

  /// Resolves the successor of `from` given the post-update `state`:
  /// conditional router first, then static edge, else `None` (dead end).
  #[instrument(level = "trace", skip(self, state))]
  pub fn next_node(&self, from: &str, state: &StateRecord) -> Option<String> {
    if let Some(router) = self.conditional_edges.get(from) {
      return Some(router.route(state));
    }
    self.edges.get(from).cloned()
  }
}

impl fmt::Debug for WorkflowGraph {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut conditional: Vec<&String> = self.conditional_edges.keys().collect();
    conditional.sort();
    f.debug_struct("WorkflowGraph")
      .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
      .field("edges", &self.edges)
      .field("conditional_edges", &conditional)
      .field("entry_point", &self.entry_point)
      .finish()
  }
}
