//! Acoustic feature extraction
//!
//! Reduces a normalized waveform to the fixed 85-dimensional vector the
//! classifier was trained on:
//!
//! - 13 MFCCs, summarized per coefficient (52 values)
//! - spectral centroid, bandwidth, rolloff, zero-crossing rate (16)
//! - chroma, spectral contrast, tonnetz, pooled over the whole matrix, and
//!   RMS energy (16)
//! - estimated tempo (1)
//!
//! Each trajectory contributes mean, standard deviation, minimum and
//! maximum, in that order. The layout matches the training-time feature
//! schema; reordering anything here silently corrupts predictions, which is
//! why the scaler checks dimensionality but nothing can check order.

pub mod chroma;
pub mod mfcc;
pub mod spectral;
pub mod stats;
pub mod tempo;
pub mod temporal;

use crate::dsp::{mel, MelFilterbank, Stft};
use crate::error::{Error, Result};
use chroma::ChromaFilterbank;
use stats::SummaryStats;

pub const N_FFT: usize = 2048;
pub const HOP_LENGTH: usize = 512;
pub const N_MELS: usize = 128;
pub const N_MFCC: usize = 13;

/// Length of the extracted feature vector.
pub const FEATURE_VECTOR_LEN: usize = 85;

const TOP_DB: f64 = 80.0;
const ROLLOFF_PERCENT: f64 = 0.85;
const CONTRAST_FMIN: f64 = 200.0;
const CONTRAST_BANDS: usize = 6;
const CONTRAST_QUANTILE: f64 = 0.02;

/// Stateless feature extraction pipeline.
///
/// The transform plans and filterbanks are built once per process and
/// shared across requests; `extract` is a pure function of the waveform.
pub struct FeatureExtractor {
    sample_rate: u32,
    stft: Stft,
    mel: MelFilterbank,
    chroma: ChromaFilterbank,
}

impl FeatureExtractor {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            stft: Stft::new(N_FFT, HOP_LENGTH),
            mel: MelFilterbank::new(sample_rate, N_FFT, N_MELS),
            chroma: ChromaFilterbank::new(sample_rate, N_FFT),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Extract the 85-dimensional feature vector from a mono waveform.
    ///
    /// Fails if the waveform is shorter than one analysis frame or if any
    /// transform produces a non-finite value. No partial vectors are ever
    /// returned.
    pub fn extract(&self, waveform: &[f32]) -> Result<Vec<f64>> {
        if waveform.len() < N_FFT {
            return Err(Error::FeatureExtraction(format!(
                "waveform too short: {} samples, need at least {N_FFT}",
                waveform.len()
            )));
        }

        let magnitudes = self.stft.magnitude_spectrogram(waveform)?;
        let freqs = self.stft.bin_frequencies(self.sample_rate);

        let mut mel_db = self.mel.mel_spectrogram(&magnitudes);
        mel::power_to_db(&mut mel_db, TOP_DB);

        let mut features = Vec::with_capacity(FEATURE_VECTOR_LEN);

        // MFCC block: all 13 means, then all stds, mins, maxes.
        let mfcc_stats: Vec<SummaryStats> = mfcc::mfcc(&mel_db, N_MFCC)
            .iter()
            .map(|row| stats::summarize(row))
            .collect();
        features.extend(mfcc_stats.iter().map(|s| s.mean));
        features.extend(mfcc_stats.iter().map(|s| s.std));
        features.extend(mfcc_stats.iter().map(|s| s.min));
        features.extend(mfcc_stats.iter().map(|s| s.max));

        let centroids = spectral::centroid(&magnitudes, &freqs);
        features.extend(stats::summarize(&centroids).as_array());

        let bandwidths = spectral::bandwidth(&magnitudes, &freqs, &centroids);
        features.extend(stats::summarize(&bandwidths).as_array());

        let rolloffs = spectral::rolloff(&magnitudes, &freqs, ROLLOFF_PERCENT);
        features.extend(stats::summarize(&rolloffs).as_array());

        let rates = temporal::zero_crossing_rate(waveform, N_FFT, HOP_LENGTH);
        features.extend(stats::summarize(&rates).as_array());

        let chroma_frames = self.chroma.chroma(&magnitudes);
        features.extend(stats::summarize_matrix(&chroma_frames).as_array());

        let contrast = spectral::contrast(
            &magnitudes,
            &freqs,
            CONTRAST_FMIN,
            CONTRAST_BANDS,
            CONTRAST_QUANTILE,
        );
        features.extend(stats::summarize_matrix(&contrast).as_array());

        let tonal = chroma::tonnetz(&chroma_frames);
        features.extend(stats::summarize_matrix(&tonal).as_array());

        let energies = temporal::rms(waveform, N_FFT, HOP_LENGTH);
        features.extend(stats::summarize(&energies).as_array());

        let envelope = tempo::onset_envelope(&mel_db);
        features.push(tempo::estimate_tempo(&envelope, self.sample_rate, HOP_LENGTH));

        debug_assert_eq!(features.len(), FEATURE_VECTOR_LEN);
        if let Some(pos) = features.iter().position(|v| !v.is_finite()) {
            return Err(Error::FeatureExtraction(format!(
                "non-finite value at feature index {pos}"
            )));
        }

        Ok(features)
    }
}
