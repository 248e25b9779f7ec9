//! Audio payload and model artifact fixtures
//!
//! WAV payloads are generated in memory and base64-encoded the way clients
//! submit them. Model directories are written with closed-form classifiers
//! whose expected outputs can be computed by hand.

use std::io::Cursor;
use std::path::Path;

use serde_json::json;
use tussis_core::model::{CLASSIFIER_FILE, MODEL_CONFIG_FILE, SCALER_FILE};
use tussis_core::FEATURE_VECTOR_LEN;

/// Configuration for generated audio payloads.
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub frequency: f32,
    pub amplitude: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 5.0,
            sample_rate: 22050,
            channels: 1,
            frequency: 440.0,
            amplitude: 0.3,
        }
    }
}

/// Generate a sine-tone WAV payload.
pub fn tone_wav(config: &AudioConfig) -> Vec<u8> {
    wav_bytes(config, |i| {
        let t = i as f32 / config.sample_rate as f32;
        (config.amplitude
            * (2.0 * std::f32::consts::PI * config.frequency * t).sin()
            * i16::MAX as f32) as i16
    })
}

/// Generate a WAV payload of digital silence.
pub fn silence_wav(config: &AudioConfig) -> Vec<u8> {
    wav_bytes(config, |_| 0)
}

fn wav_bytes(config: &AudioConfig, sample_at: impl Fn(usize) -> i16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let cursor = Cursor::new(&mut bytes);
        let mut writer = hound::WavWriter::new(cursor, spec).unwrap();
        let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;
        for i in 0..total_samples {
            let sample = sample_at(i);
            for _ in 0..config.channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    bytes
}

/// Write an identity scaler (mean 0, scale 1) so raw features pass through.
pub fn write_identity_scaler(dir: &Path) {
    let scaler = json!({
        "mean": vec![0.0; FEATURE_VECTOR_LEN],
        "scale": vec![1.0; FEATURE_VECTOR_LEN],
    });
    std::fs::write(dir.join(SCALER_FILE), scaler.to_string()).unwrap();
}

/// Write a zero-weight logistic regression with the given intercept: the
/// output distribution is fixed regardless of the audio.
pub fn write_fixed_classifier(dir: &Path, intercept: f64) {
    let classifier = json!({
        "model_type": "logistic_regression",
        "coefficients": [vec![0.0; FEATURE_VECTOR_LEN]],
        "intercepts": [intercept],
    });
    std::fs::write(dir.join(CLASSIFIER_FILE), classifier.to_string()).unwrap();
}

/// Write a logistic regression that leans on the RMS-mean feature: loud
/// audio lands on "wet", silence on "dry".
pub fn write_rms_sensitive_classifier(dir: &Path) {
    let mut coefficients = vec![0.0; FEATURE_VECTOR_LEN];
    coefficients[80] = 50.0; // RMS mean
    let classifier = json!({
        "model_type": "logistic_regression",
        "coefficients": [coefficients],
        "intercepts": [-1.0],
    });
    std::fs::write(dir.join(CLASSIFIER_FILE), classifier.to_string()).unwrap();
}

/// Write the label mapping config with the standard dry/wet classes.
pub fn write_label_config(dir: &Path) {
    let config = json!({"label_mapping": {"0": "dry", "1": "wet"}});
    std::fs::write(dir.join(MODEL_CONFIG_FILE), config.to_string()).unwrap();
}
