//! Common error types for the tussis pipeline

use thiserror::Error;

/// Common result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the inference pipeline
///
/// Input faults (`AudioDecode`, `FeatureExtraction`) are attributable to the
/// submitted audio and are reported per request. Configuration faults
/// (`DimensionMismatch`, `LabelMapping`, `ArtifactLoad`) indicate skew between
/// the extractor and the trained artifacts and keep the service unready.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unsupported input audio
    #[error("Audio decode error: {0}")]
    AudioDecode(String),

    /// Numeric transform failure on otherwise valid audio
    #[error("Feature extraction error: {0}")]
    FeatureExtraction(String),

    /// Feature vector length does not match the trained artifact schema
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Class index has no entry in the label mapping
    #[error("Label mapping error: {0}")]
    LabelMapping(String),

    /// Classifier, scaler, or label-map artifact failed to load
    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),
}

impl Error {
    /// True for faults caused by service configuration rather than the
    /// submitted audio. These are never recoverable per-request.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Error::DimensionMismatch { .. } | Error::LabelMapping(_) | Error::ArtifactLoad(_)
        )
    }
}
