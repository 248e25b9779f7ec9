//! Test Helper Utilities
//!
//! Shared fixtures for exercising the pipeline end to end.

pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{
    nan_float_wav, silence_wav, tone_wav, write_fixed_classifier, write_identity_scaler,
    write_label_config, write_rms_sensitive_classifier, AudioConfig,
};
