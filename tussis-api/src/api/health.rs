//! Service status and health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::{AppState, ArtifactStatus};

/// GET / response
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    /// Service name ("tussis-api")
    pub service: String,
    /// Always "running" when the process answers
    pub status: String,
    /// Whether the inference context is loaded
    pub model_loaded: bool,
    /// Crate version from Cargo.toml
    pub version: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall readiness ("healthy" when every artifact loaded)
    pub status: String,
    /// Module name ("tussis-api")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Per-artifact load flags
    pub artifacts: ArtifactStatus,
    /// Artifact load failure if any (for diagnostics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

/// GET /
///
/// Status summary for quick probes.
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "tussis-api".to_string(),
        status: "running".to_string(),
        model_loaded: state.is_ready(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
///
/// Readiness endpoint for monitoring. Reports per-artifact load state and
/// the load error when the service is unready.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Calculate uptime from startup timestamp
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let status = if state.is_ready() {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        module: "tussis-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        artifacts: state.artifacts,
        load_error: state.load_error.clone(),
    })
}

/// Build status and health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}
