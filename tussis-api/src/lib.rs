//! tussis-api library interface
//!
//! Exposes the application state and router for integration testing.

pub mod api;
pub mod config;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use tussis_core::audio::AudioNormalizer;
use tussis_core::{model, InferenceContext};

use crate::config::ServiceConfig;

/// Which model artifacts loaded successfully at startup
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ArtifactStatus {
    pub classifier: bool,
    pub scaler: bool,
    pub label_config: bool,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Inference context, present only when every artifact loaded and
    /// cross-validated. Requests are refused with 503 while this is `None`.
    pub inference: Option<Arc<InferenceContext>>,
    /// Per-artifact load flags reported by /health
    pub artifacts: ArtifactStatus,
    /// Artifact load or validation failure seen during startup
    pub load_error: Option<String>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// State backed by a fully loaded inference context.
    pub fn ready(inference: InferenceContext) -> Self {
        Self {
            inference: Some(Arc::new(inference)),
            artifacts: ArtifactStatus {
                classifier: true,
                scaler: true,
                label_config: true,
            },
            load_error: None,
            startup_time: Utc::now(),
        }
    }

    /// State for a service whose artifacts did not load.
    pub fn unready(artifacts: ArtifactStatus, load_error: String) -> Self {
        Self {
            inference: None,
            artifacts,
            load_error: Some(load_error),
            startup_time: Utc::now(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inference.is_some()
    }
}

/// Load model artifacts and assemble the application state.
///
/// Artifact failure does not abort startup: the service comes up unready,
/// reports the failure on /health, and refuses /predict with 503.
pub fn init_state(config: &ServiceConfig) -> AppState {
    let dir = config.model_dir.as_path();
    info!("Loading model artifacts from {}", dir.display());

    let mut errors: Vec<String> = Vec::new();
    let scaler = load_logged("feature scaler", model::load_scaler(dir), &mut errors);
    let classifier = load_logged("classifier", model::load_classifier(dir), &mut errors);
    let model_config = load_logged("label config", model::load_model_config(dir), &mut errors);

    let artifacts = ArtifactStatus {
        classifier: classifier.is_some(),
        scaler: scaler.is_some(),
        label_config: model_config.is_some(),
    };

    let (scaler, classifier, model_config) = match (scaler, classifier, model_config) {
        (Some(s), Some(c), Some(m)) => (s, c, m),
        _ => return AppState::unready(artifacts, errors.join("; ")),
    };

    match InferenceContext::from_parts(
        AudioNormalizer::default(),
        scaler,
        classifier,
        &model_config.label_mapping,
    ) {
        Ok(ctx) => {
            info!(classes = ctx.n_classes(), "Inference context ready");
            AppState::ready(ctx)
        }
        Err(e) => {
            error!("Model artifacts failed cross-validation: {e}");
            AppState::unready(artifacts, e.to_string())
        }
    }
}

fn load_logged<T>(
    name: &str,
    result: tussis_core::Result<T>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(value) => {
            info!("Loaded {name}");
            Some(value)
        }
        Err(e) => {
            error!("Failed to load {name}: {e}");
            errors.push(e.to_string());
            None
        }
    }
}

/// Request body cap. Clients may upload recordings far longer than the
/// analysis window (only the leading seconds are ever decoded), so the
/// limit is sized for minutes of base64-encoded uncompressed audio.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::predict_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
