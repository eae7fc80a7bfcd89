//! CLI: run a workflow graph once and print its log.
//!
//! The graph file is JSON shaped like a graph-creation request:
//! `{"nodes": [...], "edges": {...}, "conditional_edges": {...}}`. Without a
//! graph file the built-in `default_summary_graph` runs.
//!
//! Usage: `run_workflow [OPTIONS] [path-to-graph-json]`
//! Example: run_workflow --state '{"text": "One. Two three four five. Six.", "max_length": 3}'
//!
//! Exits non-zero unless the run reached END.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};
use workflow_graph::config::resolve_limits;
use workflow_graph::graphs::DEFAULT_SUMMARY_GRAPH_ID;
use workflow_graph::snapshot_io::save_run_snapshot;
use workflow_graph::{GraphRequest, RunStatus, StateRecord, WorkflowService};

/// Run a workflow graph once.
#[derive(Parser, Debug)]
#[command(name = "run_workflow")]
#[command(
  after_help = r#"Environment variables:
  WORKFLOW_MAX_STEPS         Overrides --max-steps when set.
  WORKFLOW_RUN_TIMEOUT_SECS  Overrides --run-timeout-secs when set.

Examples:
  run_workflow --state '{"text": "One. Two three four five. Six.", "max_length": 3}'
  run_workflow --state-file state.json --snapshot out/run.json graph.json"#
)]
struct Args {
  /// Initial state as a JSON object.
  #[arg(long, value_name = "JSON", conflicts_with = "state_file")]
  state: Option<String>,

  /// File holding the initial state as a JSON object.
  #[arg(long, value_name = "PATH")]
  state_file: Option<PathBuf>,

  /// Write the final run snapshot here as JSON.
  #[arg(long, value_name = "PATH")]
  snapshot: Option<PathBuf>,

  /// Maximum node executions; 0 (default) runs unbounded.
  #[arg(long, value_name = "N", default_value_t = 0)]
  max_steps: usize,

  /// Wall-clock budget for the run in seconds; 0 (default) disables it.
  #[arg(long, value_name = "SECS", default_value_t = 0)]
  run_timeout_secs: u64,

  /// Graph definition JSON file. Defaults to the built-in summarization graph.
  #[arg(value_name = "path-to-graph-json")]
  graph_path: Option<PathBuf>,
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
  eprintln!("Error {}: {}", context, e);
  process::exit(1);
}

fn read_state(args: &Args) -> StateRecord {
  let raw = match (&args.state, &args.state_file) {
    (Some(s), _) => s.clone(),
    (None, Some(path)) => match fs::read_to_string(path) {
      Ok(s) => s,
      Err(e) => fail(&format!("reading {}", path.display()), e),
    },
    (None, None) => return StateRecord::new(),
  };
  match serde_json::from_str(&raw) {
    Ok(state) => state,
    Err(e) => fail("parsing initial state (expected a JSON object)", e),
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .init();

  let args = Args::parse();
  let limits = resolve_limits(args.max_steps, args.run_timeout_secs, |key| std::env::var(key).ok())
    .unwrap_or_else(|e| fail("in configuration", e));
  let initial_state = read_state(&args);

  let service = WorkflowService::with_defaults(limits).unwrap_or_else(|e| fail("building service", e));
  let graph_id = match &args.graph_path {
    Some(path) => {
      let raw = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("reading {}", path.display()), e));
      let request: GraphRequest =
        serde_json::from_str(&raw).unwrap_or_else(|e| fail("parsing graph definition", e));
      service
        .define_graph(request)
        .await
        .unwrap_or_else(|e| fail("defining graph", e))
    }
    None => DEFAULT_SUMMARY_GRAPH_ID.to_string(),
  };
  info!(graph_id = %graph_id, "running graph");

  let response = service
    .run_graph(&graph_id, initial_state)
    .await
    .unwrap_or_else(|e| fail("running graph", e));

  if let Some(path) = &args.snapshot {
    let snapshot = service
      .fetch_run(&response.run_id)
      .await
      .unwrap_or_else(|e| fail("fetching run", e));
    save_run_snapshot(path, &snapshot)
      .unwrap_or_else(|e| fail(&format!("writing {}", path.display()), e));
  }

  println!("Run {} {}: {}.", response.run_id, response.status, response.termination);
  for entry in response.logs.entries() {
    println!("  {}", entry);
  }
  match serde_json::to_string_pretty(&response.final_state) {
    Ok(json) => println!("Final state:\n{}", json),
    Err(e) => fail("serializing final state", e),
  }
  if response.status != RunStatus::Completed {
    process::exit(1);
  }
}
