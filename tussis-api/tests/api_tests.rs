//! Integration tests for tussis-api endpoints
//!
//! Routers are driven in-process with oneshot requests over real model
//! directories. The classifiers are closed-form so the expected label and
//! confidence are known exactly.

mod helpers;

use std::path::Path;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use http_body_util::BodyExt;
use serde_json::json;
use tower::util::ServiceExt;

use helpers::fixtures::{
    silence_wav, tone_wav, write_fixed_classifier, write_identity_scaler, write_label_config,
    write_rms_sensitive_classifier, AudioConfig,
};
use tussis_api::config::ServiceConfig;

/// Test helper: build an app over a model directory populated by `write`.
fn app_with_model(write: impl FnOnce(&Path)) -> axum::Router {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path());
    let config = ServiceConfig {
        model_dir: dir.path().to_path_buf(),
        port: 0,
    };
    tussis_api::build_router(tussis_api::init_state(&config))
}

/// App whose classifier always answers [0.12, 0.88] regardless of audio.
fn fixed_distribution_app() -> axum::Router {
    app_with_model(|dir| {
        write_identity_scaler(dir);
        write_fixed_classifier(dir, (0.88f64 / 0.12).ln());
        write_label_config(dir);
    })
}

/// App whose classifier separates loud audio from silence on RMS.
fn rms_sensitive_app() -> axum::Router {
    app_with_model(|dir| {
        write_identity_scaler(dir);
        write_rms_sensitive_classifier(dir);
        write_label_config(dir);
    })
}

fn predict_request(audio_b64: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "audio": audio_b64 }).to_string()))
        .unwrap()
}

fn encode(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_root_endpoint_reports_running() {
    let app = fixed_distribution_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["service"], "tussis-api");
    assert_eq!(json["status"], "running");
    assert_eq!(json["model_loaded"], true);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_when_ready() {
    let app = fixed_distribution_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["module"], "tussis-api");
    assert_eq!(json["artifacts"]["classifier"], true);
    assert_eq!(json["artifacts"]["scaler"], true);
    assert_eq!(json["artifacts"]["label_config"], true);
    assert!(json["uptime_seconds"].is_u64());
    assert!(json.get("load_error").is_none());
}

#[tokio::test]
async fn test_health_reports_which_artifact_is_missing() {
    // Scaler file deliberately absent
    let app = app_with_model(|dir| {
        write_fixed_classifier(dir, 0.0);
        write_label_config(dir);
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["artifacts"]["classifier"], true);
    assert_eq!(json["artifacts"]["scaler"], false);
    assert_eq!(json["artifacts"]["label_config"], true);
    let load_error = json["load_error"].as_str().unwrap();
    assert!(load_error.contains("feature_scaler.json"), "{load_error}");
}

#[tokio::test]
async fn test_predict_returns_fixed_distribution() {
    let app = fixed_distribution_app();
    let audio = encode(&tone_wav(&AudioConfig::default()));

    let response = app.oneshot(predict_request(&audio)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["predicted_cough_type"], "wet");
    assert_eq!(json["confidence_score"].as_f64().unwrap(), 88.0);
    assert_eq!(json["message"], "Prediction completed successfully");
}

#[tokio::test]
async fn test_predict_accepts_a_minute_long_recording() {
    let app = fixed_distribution_app();

    // One minute of uncompressed mono WAV is ~3.5 MB once base64-encoded,
    // well past the 2 MB extractor default. Only the leading 5 s is decoded.
    let audio = encode(&tone_wav(&AudioConfig {
        duration_seconds: 60.0,
        ..AudioConfig::default()
    }));
    assert!(audio.len() > 3_000_000, "payload {} bytes", audio.len());

    let response = app.oneshot(predict_request(&audio)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["predicted_cough_type"], "wet");
    assert_eq!(json["confidence_score"].as_f64().unwrap(), 88.0);
}

#[tokio::test]
async fn test_predict_rejects_invalid_base64() {
    let app = fixed_distribution_app();

    let response = app
        .oneshot(predict_request("this is not base64!!!"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("base64"), "{message}");
}

#[tokio::test]
async fn test_predict_rejects_undecodable_audio() {
    let app = fixed_distribution_app();
    let audio = encode(b"definitely not an audio container");

    let response = app.oneshot(predict_request(&audio)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    // The failing pipeline stage is named in the message
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("normalizing"), "{message}");
}

#[tokio::test]
async fn test_predict_when_unready_returns_503() {
    // Empty model directory: nothing loads
    let app = app_with_model(|_| {});
    let audio = encode(&tone_wav(&AudioConfig::default()));

    let response = app.oneshot(predict_request(&audio)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("model not loaded"), "{message}");
}

#[tokio::test]
async fn test_predict_separates_loud_audio_from_silence() {
    let app = rms_sensitive_app();

    let loud = encode(&tone_wav(&AudioConfig {
        amplitude: 0.7,
        ..AudioConfig::default()
    }));
    let response = app.clone().oneshot(predict_request(&loud)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["predicted_cough_type"], "wet");
    assert!(json["confidence_score"].as_f64().unwrap() > 99.0);

    let quiet = encode(&silence_wav(&AudioConfig::default()));
    let response = app.oneshot(predict_request(&quiet)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["predicted_cough_type"], "dry");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_predict_handles_concurrent_requests() {
    let app = rms_sensitive_app();

    let loud = encode(&tone_wav(&AudioConfig {
        amplitude: 0.7,
        ..AudioConfig::default()
    }));
    let quiet = encode(&silence_wav(&AudioConfig::default()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        let audio = if i % 2 == 0 {
            loud.clone()
        } else {
            quiet.clone()
        };
        handles.push(tokio::spawn(async move {
            let response = app.oneshot(predict_request(&audio)).await.unwrap();
            (i, response)
        }));
    }

    for handle in handles {
        let (i, response) = handle.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let expected = if i % 2 == 0 { "wet" } else { "dry" };
        assert_eq!(json["predicted_cough_type"], expected, "request {i}");
    }
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = fixed_distribution_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
