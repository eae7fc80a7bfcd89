//! Boundary-level errors.
//!
//! Node failures never surface here: the execution loop captures them in the
//! run log and [RunTermination](crate::types::RunTermination).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Graph not found: {0}")]
  GraphNotFound(String),

  #[error("Run not found: {0}")]
  RunNotFound(String),

  /// The terminal marker cannot be registered as a node name.
  #[error("Node name is reserved: {0}")]
  ReservedNodeName(String),

  #[error("Config error: {0}")]
  Config(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
