//! Model artifacts
//!
//! A model directory holds three JSON files exported by the training
//! pipeline: the classifier parameters, the fitted feature scaler, and a
//! config with the class-index to label mapping. Everything is loaded and
//! validated once at startup.

pub mod classifier;
pub mod labels;
pub mod scaler;

pub use classifier::ClassifierModel;
pub use labels::LabelMap;
pub use scaler::FeatureScaler;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const CLASSIFIER_FILE: &str = "cough_classifier.json";
pub const SCALER_FILE: &str = "feature_scaler.json";
pub const MODEL_CONFIG_FILE: &str = "model_config.json";

/// Deployment-side model configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Stringified class index to domain label, e.g. {"0": "dry", "1": "wet"}.
    pub label_mapping: HashMap<String, String>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::ArtifactLoad(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::ArtifactLoad(format!("{}: {e}", path.display())))
}

/// Load and validate the feature scaler from `dir`.
pub fn load_scaler(dir: &Path) -> Result<FeatureScaler> {
    let scaler: FeatureScaler = read_json(&dir.join(SCALER_FILE))?;
    scaler.validate()?;
    Ok(scaler)
}

/// Load and validate the classifier from `dir`.
pub fn load_classifier(dir: &Path) -> Result<ClassifierModel> {
    let model: ClassifierModel = read_json(&dir.join(CLASSIFIER_FILE))?;
    model.validate()?;
    Ok(model)
}

/// Load the model configuration from `dir`.
pub fn load_model_config(dir: &Path) -> Result<ModelConfig> {
    read_json(&dir.join(MODEL_CONFIG_FILE))
}
