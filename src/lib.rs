//! # workflow-graph
//!
//! Minimal directed-graph workflow engine. Named nodes transform a shared
//! JSON state record; static and conditional edges decide what runs next; a
//! run ends at the terminal marker [END], at the first node failure, or at a
//! node with no outgoing edge.
//!
//! ## Layout
//!
//! - [workflow_graph]: graph definition ([WorkflowGraph])
//! - [engine]: execution loop ([run_workflow], [run_workflow_with])
//! - [nodes], [registry], [graphs]: built-in summarization workflow
//! - [service], [api]: define/run/fetch over in-memory stores, and their HTTP binding
//!
//! Set RUST_LOG=workflow_graph=trace for span-level tracing of runs.

pub mod api;
pub mod config;
pub mod engine;
#[cfg(test)]
mod engine_test;
pub mod error;
pub mod graphs;
pub mod nodes;
pub mod registry;
pub mod service;
pub mod snapshot_io;
pub mod transform;
pub mod types;
pub mod workflow_graph;

pub use engine::{RunLimits, run_workflow, run_workflow_with};
pub use error::WorkflowError;
pub use registry::TransformRegistry;
pub use service::{GraphRequest, RunResponse, WorkflowService};
pub use transform::{NodeTransform, Router, TransformError, router_fn, transform_fn};
pub use types::{ExecutionLog, RunReport, RunSnapshot, RunStatus, RunTermination, StateRecord, StateUpdate};
pub use workflow_graph::{END, WorkflowGraph};
