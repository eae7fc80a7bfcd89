//! Node transforms and routers: the two callable seams of a workflow graph.
//!
//! A [NodeTransform] reads the current state and returns a partial update (or
//! fails). A [Router] reads the post-update state and names the next node.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{StateRecord, StateUpdate};

/// Failure raised by a node transform. Captured by the execution loop and
/// logged as `Error in <node>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransformError {
  message: String,
}

impl TransformError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

/// A named step's logic: current state in, partial update out.
#[async_trait]
pub trait NodeTransform: Send + Sync {
  async fn transform(&self, state: &StateRecord) -> Result<StateUpdate, TransformError>;
}

/// Routing function of a conditional edge. Returns a node name or
/// [END](crate::END); the result is not validated until the next lookup.
pub trait Router: Send + Sync {
  fn route(&self, state: &StateRecord) -> String;
}

/// [NodeTransform] backed by a synchronous closure. Build with [transform_fn].
pub struct FnTransform<F> {
  f: F,
}

/// Wraps a closure as a [NodeTransform].
pub fn transform_fn<F>(f: F) -> FnTransform<F>
where
  F: Fn(&StateRecord) -> Result<StateUpdate, TransformError> + Send + Sync,
{
  FnTransform { f }
}

#[async_trait]
impl<F> NodeTransform for FnTransform<F>
where
  F: Fn(&StateRecord) -> Result<StateUpdate, TransformError> + Send + Sync,
{
  async fn transform(&self, state: &StateRecord) -> Result<StateUpdate, TransformError> {
    (self.f)(state)
  }
}

/// [Router] backed by a closure. Build with [router_fn].
pub struct FnRouter<F> {
  f: F,
}

/// Wraps a closure as a [Router].
pub fn router_fn<F>(f: F) -> FnRouter<F>
where
  F: Fn(&StateRecord) -> String + Send + Sync,
{
  FnRouter { f }
}

impl<F> Router for FnRouter<F>
where
  F: Fn(&StateRecord) -> String + Send + Sync,
{
  fn route(&self, state: &StateRecord) -> String {
    (self.f)(state)
  }
}
