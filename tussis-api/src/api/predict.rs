//! Prediction endpoint

use axum::{extract::State, routing::post, Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// POST /predict request body
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Base64-encoded audio file contents, any container the decoder probes
    pub audio: String,
}

/// POST /predict response body
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_cough_type: String,
    pub confidence_score: f64,
    pub message: String,
}

/// POST /predict
///
/// Decodes the submitted audio and runs the classification pipeline.
/// The pipeline is CPU-bound, so it runs on the blocking pool.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    let ctx = state.inference.ok_or_else(|| {
        ApiError::ServiceUnavailable("model not loaded; see /health".to_string())
    })?;

    let bytes = general_purpose::STANDARD
        .decode(request.audio.as_bytes())
        .map_err(|e| ApiError::BadRequest(format!("audio is not valid base64: {e}")))?;

    tracing::debug!(bytes = bytes.len(), "Received prediction request");

    let prediction = tokio::task::spawn_blocking(move || ctx.classify(bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("classification task failed: {e}")))??;

    tracing::info!(
        label = %prediction.label,
        confidence = prediction.confidence,
        "Prediction complete"
    );

    Ok(Json(PredictResponse {
        predicted_cough_type: prediction.label,
        confidence_score: prediction.confidence,
        message: "Prediction completed successfully".to_string(),
    }))
}

/// Build prediction routes
pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}
