//! Inference pipeline
//!
//! Sequences normalize → extract → scale → classify as an explicit state
//! machine. The loaded artifacts live in an [`InferenceContext`] that is
//! built once, cross-validated, and shared read-only across requests; each
//! request gets its own [`InferenceRun`] so concurrent classifications never
//! observe each other's intermediate state.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::audio::AudioNormalizer;
use crate::error::{Error, Result};
use crate::features::{FeatureExtractor, FEATURE_VECTOR_LEN};
use crate::model::{self, ClassifierModel, FeatureScaler, LabelMap};

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceState {
    Idle,
    Normalizing,
    Extracting,
    Scaling,
    Classifying,
    Done,
    Failed,
}

impl fmt::Display for InferenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Normalizing => "normalizing",
            Self::Extracting => "extracting",
            Self::Scaling => "scaling",
            Self::Classifying => "classifying",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Error annotated with the pipeline stage that produced it.
///
/// The underlying error kind is preserved so callers can distinguish input
/// faults from configuration faults.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: InferenceState,
    #[source]
    pub source: Error,
}

impl StageError {
    /// True when the failure indicates broken deployment state rather than
    /// bad input.
    pub fn is_configuration_fault(&self) -> bool {
        self.source.is_configuration_fault()
    }
}

/// Final prediction returned to callers.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Prediction {
    /// Domain label, e.g. "dry" or "wet".
    pub label: String,
    /// Probability of the predicted class as a percentage, two decimals.
    pub confidence: f64,
}

/// Everything a request needs to classify audio, loaded once at startup and
/// immutable afterwards.
pub struct InferenceContext {
    normalizer: AudioNormalizer,
    extractor: FeatureExtractor,
    scaler: FeatureScaler,
    classifier: ClassifierModel,
    labels: LabelMap,
}

// Manual impl: `FeatureExtractor` holds FFT plans that are not `Debug`.
impl fmt::Debug for InferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceContext").finish_non_exhaustive()
    }
}

impl InferenceContext {
    /// Load all artifacts from a model directory and cross-validate them.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let scaler = model::load_scaler(model_dir)?;
        let classifier = model::load_classifier(model_dir)?;
        let config = model::load_model_config(model_dir)?;
        Self::from_parts(
            AudioNormalizer::default(),
            scaler,
            classifier,
            &config.label_mapping,
        )
    }

    /// Assemble a context from already-loaded parts.
    ///
    /// Rejects artifacts that disagree with each other or with the
    /// extractor's output schema, so a context that constructs successfully
    /// can never fail a request on dimensionality.
    pub fn from_parts(
        normalizer: AudioNormalizer,
        scaler: FeatureScaler,
        classifier: ClassifierModel,
        label_mapping: &HashMap<String, String>,
    ) -> Result<Self> {
        if scaler.n_features() != FEATURE_VECTOR_LEN {
            return Err(Error::ArtifactLoad(format!(
                "scaler was fitted on {} features, extractor produces {FEATURE_VECTOR_LEN}",
                scaler.n_features()
            )));
        }
        if classifier.n_features() != scaler.n_features() {
            return Err(Error::ArtifactLoad(format!(
                "classifier expects {} features, scaler produces {}",
                classifier.n_features(),
                scaler.n_features()
            )));
        }
        let labels = LabelMap::from_string_keys(label_mapping, classifier.n_classes())?;
        let extractor = FeatureExtractor::new(normalizer.target_sample_rate());

        Ok(Self {
            normalizer,
            extractor,
            scaler,
            classifier,
            labels,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.classifier.n_classes()
    }

    /// Run the full pipeline on one audio payload.
    pub fn classify(&self, bytes: Vec<u8>) -> std::result::Result<Prediction, StageError> {
        InferenceRun::new(self).run(bytes)
    }
}

/// Single-request walk through the pipeline states.
struct InferenceRun<'a> {
    ctx: &'a InferenceContext,
    state: InferenceState,
    started: Instant,
}

impl<'a> InferenceRun<'a> {
    fn new(ctx: &'a InferenceContext) -> Self {
        Self {
            ctx,
            state: InferenceState::Idle,
            started: Instant::now(),
        }
    }

    fn transition_to(&mut self, next: InferenceState) {
        tracing::debug!(from = %self.state, to = %next, "Pipeline transition");
        self.state = next;
    }

    /// Enter `stage` and run its step; on failure the machine moves to
    /// Failed and the error keeps the stage it died in.
    fn enter<T>(
        &mut self,
        stage: InferenceState,
        step: impl FnOnce(&InferenceContext) -> Result<T>,
    ) -> std::result::Result<T, StageError> {
        self.transition_to(stage);
        step(self.ctx).map_err(|source| {
            self.transition_to(InferenceState::Failed);
            StageError { stage, source }
        })
    }

    fn run(mut self, bytes: Vec<u8>) -> std::result::Result<Prediction, StageError> {
        let waveform = self.enter(InferenceState::Normalizing, |ctx| {
            ctx.normalizer.normalize(bytes)
        })?;

        let raw = self.enter(InferenceState::Extracting, |ctx| {
            ctx.extractor.extract(&waveform)
        })?;

        let scaled = self.enter(InferenceState::Scaling, |ctx| ctx.scaler.transform(&raw))?;

        let prediction = self.enter(InferenceState::Classifying, |ctx| {
            let (index, probabilities) = ctx.classifier.predict(&scaled)?;
            let label = ctx.labels.label(index)?.to_string();
            Ok(Prediction {
                label,
                confidence: round_confidence(probabilities[index]),
            })
        })?;

        self.transition_to(InferenceState::Done);
        tracing::debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Pipeline complete"
        );

        Ok(prediction)
    }
}

/// Probability to a percentage rounded to two decimals.
fn round_confidence(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}
