//! # Tussis Core Library
//!
//! Deterministic cough-classification pipeline shared by the tussis service:
//! - Audio normalization (decode, mono mixdown, resample, pad/trim)
//! - Acoustic feature extraction (85-dimensional feature vector)
//! - Feature scaling and classifier inference over pre-trained artifacts
//! - Inference orchestration with per-stage error attribution

pub mod audio;
pub mod dsp;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;

pub use error::{Error, Result};
pub use features::{FeatureExtractor, FEATURE_VECTOR_LEN};
pub use pipeline::{InferenceContext, InferenceState, Prediction, StageError};
