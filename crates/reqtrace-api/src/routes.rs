//! Route definitions for the reqtrace demo service.
//!
//! - `POST /jobs` — accept a job and schedule it onto the runtime through the
//!   propagation adapters, so logs emitted by the background work carry the
//!   submitting request's trace id.
//! - `GET /health` — health check.
//!
//! All routes return the standard envelope with the trace correlation field.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use reqtrace_core::{propagate, propagate_blocking};

use crate::error::ApiError;
use crate::middleware::trace_context_middleware;
use crate::response::ApiResponse;

/// Handler state shared across all routes
#[derive(Clone)]
pub struct HandlerState {
    /// Start time for uptime calculation
    start_time: Instant,
    /// Number of jobs accepted since startup
    jobs_submitted: Arc<AtomicU64>,
}

impl HandlerState {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            jobs_submitted: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn jobs_submitted(&self) -> u64 {
        self.jobs_submitted.load(Ordering::SeqCst)
    }
}

impl Default for HandlerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Job submission request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    /// Job name, used in log output
    pub name: String,
    /// Opaque job payload
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Run on the blocking pool instead of the async runtime
    #[serde(default)]
    pub blocking: bool,
}

/// Acknowledgement returned once a job has been scheduled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAccepted {
    /// Identifier assigned to the scheduled job
    pub job_id: String,
    /// Echo of the job name
    pub name: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub jobs_submitted: u64,
}

/// Build the service router with the request boundary applied to every route.
pub fn create_router(state: HandlerState) -> Router {
    Router::new()
        .route("/jobs", post(submit_job))
        .route("/health", get(health_check))
        .layer(axum::middleware::from_fn(trace_context_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Accept a job and hand it to the runtime, propagating the request context.
pub async fn submit_job(
    State(state): State<HandlerState>,
    Json(request): Json<JobRequest>,
) -> Result<Json<ApiResponse<JobAccepted>>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::invalid_input("job name must not be empty"));
    }

    let job_id = Uuid::new_v4().to_string();
    state.jobs_submitted.fetch_add(1, Ordering::SeqCst);

    let id = job_id.clone();
    let name = request.name.clone();
    let payload = request.payload;

    if request.blocking {
        tokio::task::spawn_blocking(propagate_blocking(move || {
            run_job(&id, &name, &payload);
        }));
    } else {
        tokio::spawn(propagate(async move {
            run_job(&id, &name, &payload);
        }));
    }

    Ok(Json(ApiResponse::success(JobAccepted {
        job_id,
        name: request.name,
    })))
}

/// Simulated business logic. Log lines emitted here carry the submitting
/// request's trace id through the formatter, not through parameters.
fn run_job(job_id: &str, name: &str, payload: &serde_json::Value) {
    tracing::info!(job_id = %job_id, name = %name, "processing job");
    let _ = payload;
    tracing::info!(job_id = %job_id, "job finished");
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<HandlerState>,
) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        jobs_submitted: state.jobs_submitted(),
    }))
}
