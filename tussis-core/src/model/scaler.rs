//! Feature scaling
//!
//! Applies the z-score parameters fitted at training time. The scaler is
//! strict about dimensionality: a vector of the wrong length means the
//! extractor and the training-time feature schema have drifted apart, and
//! silently truncating or padding would corrupt every prediction downstream.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Fitted per-feature location and scale, immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FeatureScaler {
    /// Build a scaler from fitted parameters, rejecting inconsistent ones.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check internal consistency after construction or deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.mean.is_empty() {
            return Err(Error::ArtifactLoad("scaler has no features".into()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(Error::ArtifactLoad(format!(
                "scaler mean/scale length mismatch: {} vs {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err(Error::ArtifactLoad("scaler mean contains non-finite values".into()));
        }
        if self.scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
            return Err(Error::ArtifactLoad(
                "scaler scale contains zero or non-finite values".into(),
            ));
        }
        Ok(())
    }

    /// Number of features the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Apply the affine transform `(x - mean) / scale` per feature.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() {
            return Err(Error::DimensionMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}
