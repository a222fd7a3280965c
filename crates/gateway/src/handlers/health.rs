//! Health check handlers

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub graph: CheckResult,
    pub vector: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl CheckResult {
    fn from_backend(backend: Option<&'static str>) -> Self {
        match backend {
            Some(name) => Self {
                status: "configured".to_string(),
                backend: Some(name.to_string()),
            },
            None => Self {
                status: "missing".to_string(),
                backend: None,
            },
        }
    }

    fn is_configured(&self) -> bool {
        self.backend.is_some()
    }
}

/// Liveness probe - always returns healthy if server is running
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.observability.service_name.clone(),
        version: shopscout_common::VERSION.to_string(),
    })
}

/// Readiness probe - reports which backends the pipeline was built with.
///
/// A missing backend does not stop the service from answering, so the
/// status is `degraded` rather than a failure.
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let graph = CheckResult::from_backend(state.search.graph_backend());
    let vector = CheckResult::from_backend(state.search.vector_backend());

    let status = if graph.is_configured() && vector.is_configured() {
        "ready"
    } else {
        "degraded"
    };

    Json(ReadyResponse {
        status: status.to_string(),
        checks: HealthChecks { graph, vector },
    })
}
