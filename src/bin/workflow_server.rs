//! HTTP server exposing graph creation, runs and run-state lookup.
//!
//! Usage: `workflow_server [--bind ADDR] [--max-steps N] [--run-timeout-secs SECS]`
//!
//! Set RUST_LOG=workflow_graph=trace for TRACE-level span enter/exit and events.

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};
use workflow_graph::api;
use workflow_graph::config::{ServerConfig, ServerFlags};
use workflow_graph::service::WorkflowService;

/// Serve the workflow engine over HTTP.
#[derive(Parser, Debug)]
#[command(name = "workflow_server")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  WORKFLOW_BIND              Listen address (default: 127.0.0.1:8000).
  WORKFLOW_MAX_STEPS         Maximum node executions per run; 0 disables the ceiling.
  WORKFLOW_RUN_TIMEOUT_SECS  Wall-clock budget per run in seconds; 0 disables it.

Endpoints:
  POST /graph/create         {"nodes": [...], "edges": {...}, "conditional_edges": {...}}
  POST /graph/run            {"graph_id": "...", "initial_state": {...}}
  GET  /graph/state/:run_id
  GET  /health"#
)]
struct Args {
  #[command(flatten)]
  server: ServerFlags,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .init();

  let args = Args::parse();
  let config = match ServerConfig::from_env(args.server) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("Error in configuration: {}", e);
      process::exit(1);
    }
  };
  info!(bind = %config.bind, limits = ?config.limits, "workflow_server starting");

  let service = match WorkflowService::with_defaults(config.limits) {
    Ok(s) => Arc::new(s),
    Err(e) => {
      eprintln!("Error building service: {}", e);
      process::exit(1);
    }
  };

  info!(
    graphs = ?service.graph_ids().await,
    limits = ?service.limits(),
    "service ready"
  );

  if let Err(e) = api::serve(&config, service).await {
    error!(error = %e, "server stopped with error");
    eprintln!("Server error: {}", e);
    process::exit(1);
  }
}
