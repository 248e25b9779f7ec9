//! Audio normalization
//!
//! Turns raw encoded audio bytes into the fixed-shape waveform the feature
//! extractor expects: mono, 22050 Hz, exactly five seconds.

pub mod decoder;
pub mod resampler;

pub use decoder::{decode_bytes, DecodedAudio};

use crate::error::Result;

pub const DEFAULT_SAMPLE_RATE: u32 = 22050;
pub const DEFAULT_DURATION_SECONDS: f64 = 5.0;

/// Normalizes arbitrary encoded audio to a fixed-shape mono waveform.
#[derive(Debug, Clone, Copy)]
pub struct AudioNormalizer {
    target_sample_rate: u32,
    target_duration_seconds: f64,
}

impl Default for AudioNormalizer {
    fn default() -> Self {
        Self {
            target_sample_rate: DEFAULT_SAMPLE_RATE,
            target_duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }
}

impl AudioNormalizer {
    pub fn new(target_sample_rate: u32, target_duration_seconds: f64) -> Self {
        Self {
            target_sample_rate,
            target_duration_seconds,
        }
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Number of samples in a normalized waveform.
    pub fn target_length(&self) -> usize {
        (self.target_duration_seconds * self.target_sample_rate as f64) as usize
    }

    /// Decode, resample and fit `bytes` to the target shape.
    ///
    /// Shorter audio is zero-padded at the end; longer audio keeps its first
    /// `target_length` samples. Decoding stops half a second past the target
    /// duration so the resampler's tail never eats into the kept region.
    pub fn normalize(&self, bytes: Vec<u8>) -> Result<Vec<f32>> {
        let decoded = decoder::decode_bytes(bytes, self.target_duration_seconds + 0.5)?;
        let samples = resampler::resample_mono(
            decoded.samples,
            decoded.sample_rate,
            self.target_sample_rate,
        )?;
        Ok(self.fit_to_length(samples))
    }

    fn fit_to_length(&self, mut samples: Vec<f32>) -> Vec<f32> {
        let target = self.target_length();
        if samples.len() < target {
            samples.resize(target, 0.0);
        } else {
            samples.truncate(target);
        }
        samples
    }
}
