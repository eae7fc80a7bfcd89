//! Name-keyed registry of available node transforms and routers.
//!
//! Graph-creation requests name nodes and routers by identifier; the service
//! resolves those identifiers here.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::nodes::{
  CheckLengthRouter, GenerateSummariesNode, MergeSummariesNode, RefineSummaryNode, SplitTextNode,
};
use crate::transform::{NodeTransform, Router};

/// Available transforms and routers, keyed by stable identifier.
#[derive(Clone, Default)]
pub struct TransformRegistry {
  transforms: BTreeMap<String, Arc<dyn NodeTransform>>,
  routers: BTreeMap<String, Arc<dyn Router>>,
}

impl TransformRegistry {
  /// Empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry holding the summarization transforms and the `check_length` router.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    registry
      .register_transform(SplitTextNode::NAME, SplitTextNode)
      .register_transform(GenerateSummariesNode::NAME, GenerateSummariesNode)
      .register_transform(MergeSummariesNode::NAME, MergeSummariesNode)
      .register_transform(RefineSummaryNode::NAME, RefineSummaryNode)
      .register_router(CheckLengthRouter::NAME, CheckLengthRouter);
    registry
  }

  pub fn register_transform<T>(&mut self, name: impl Into<String>, transform: T) -> &mut Self
  where
    T: NodeTransform + 'static,
  {
    self.transforms.insert(name.into(), Arc::new(transform));
    self
  }

  pub fn register_router<R>(&mut self, name: impl Into<String>, router: R) -> &mut Self
  where
    R: Router + 'static,
  {
    self.routers.insert(name.into(), Arc::new(router));
    self
  }

  pub fn transform(&self, name: &str) -> Option<Arc<dyn NodeTransform>> {
    self.transforms.get(name).cloned()
  }

  pub fn router(&self, name: &str) -> Option<Arc<dyn Router>> {
    self.routers.get(name).cloned()
  }

  pub fn transform_names(&self) -> impl Iterator<Item = &str> {
    self.transforms.keys().map(String::as_str)
  }

  pub fn router_names(&self) -> impl Iterator<Item = &str> {
    self.routers.keys().map(String::as_str)
  }
}

impl fmt::Debug for TransformRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TransformRegistry")
      .field("transforms", &self.transform_names().collect::<Vec<_>>())
      .field("routers", &self.router_names().collect::<Vec<_>>())
      .finish()
  }
}
