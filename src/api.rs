//! HTTP binding of the boundary operations.
//!
//! - `POST /graph/create` → `{graph_id, message}`
//! - `POST /graph/run` → `{run_id, final_state, logs, status}`
//! - `GET /graph/state/:run_id` → latest run snapshot
//! - `GET /health`

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{Result, WorkflowError};
use crate::service::{GraphRequest, RunResponse, WorkflowService};
use crate::types::{RunSnapshot, StateRecord};

impl IntoResponse for WorkflowError {
  fn into_response(self) -> Response {
    let (status, detail) = match &self {
      WorkflowError::GraphNotFound(_) => (StatusCode::NOT_FOUND, "Graph not found".to_string()),
      WorkflowError::RunNotFound(_) => (StatusCode::NOT_FOUND, "Run ID not found".to_string()),
      WorkflowError::ReservedNodeName(_) => (StatusCode::BAD_REQUEST, self.to_string()),
      _ => {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
      }
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}

#[derive(Debug, Deserialize)]
pub struct RunRequest {
  pub graph_id: String,
  pub initial_state: StateRecord,
}

// GET /health
async fn health() -> Json<serde_json::Value> {
  Json(json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

// POST /graph/create
async fn create_graph(
  State(service): State<Arc<WorkflowService>>,
  Json(request): Json<GraphRequest>,
) -> Result<Json<serde_json::Value>> {
  let graph_id = service.define_graph(request).await?;
  Ok(Json(json!({
    "graph_id": graph_id,
    "message": "Graph created successfully",
  })))
}

// POST /graph/run
async fn run_graph(
  State(service): State<Arc<WorkflowService>>,
  Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>> {
  let response = service
    .run_graph(&request.graph_id, request.initial_state)
    .await?;
  Ok(Json(response))
}

// GET /graph/state/:run_id
async fn run_state(
  State(service): State<Arc<WorkflowService>>,
  Path(run_id): Path<String>,
) -> Result<Json<RunSnapshot>> {
  Ok(Json(service.fetch_run(&run_id).await?))
}

/// Axum router over `service`.
pub fn router(service: Arc<WorkflowService>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/graph/create", post(create_graph))
    .route("/graph/run", post(run_graph))
    .route("/graph/state/:run_id", get(run_state))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(service)
}

/// Serves the API on `config.bind` until Ctrl-C. In-flight runs are cancelled
/// on shutdown.
pub async fn serve(config: &ServerConfig, service: Arc<WorkflowService>) -> Result<()> {
  let shutdown = service.shutdown_token();
  let app = router(service);
  let listener = TcpListener::bind(&config.bind).await?;
  info!(bind = %config.bind, "workflow server listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(async move {
      if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
      }
      info!("shutting down");
      shutdown.cancel();
    })
    .await?;
  Ok(())
}
