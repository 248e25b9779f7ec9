//! Short-time Fourier transform
//!
//! Windowed real FFT over centered, zero-padded frames. Produces the
//! magnitude spectrogram the spectral feature extractors consume. The plan
//! is built once and shared; per-call buffers keep the transform safe to run
//! from concurrent requests.

use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};

use crate::error::{Error, Result};

/// Short-time Fourier transform pipeline.
///
/// Frames are centered: frame `t` covers samples around `t * hop`, with the
/// half-window overhang at both ends filled with zeros.
pub struct Stft {
    n_fft: usize,
    hop: usize,
    /// Periodic Hann window coefficients.
    window: Vec<f64>,
    plan: Arc<dyn RealToComplex<f64>>,
}

impl Stft {
    /// Create a new STFT pipeline with the given window and hop sizes.
    pub fn new(n_fft: usize, hop: usize) -> Self {
        assert!(n_fft > 0 && hop > 0, "FFT and hop sizes must be > 0");

        let mut planner = RealFftPlanner::<f64>::new();
        let plan = planner.plan_fft_forward(n_fft);

        // Periodic Hann window
        let window: Vec<f64> = (0..n_fft)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n_fft as f64).cos()))
            .collect();

        Self {
            n_fft,
            hop,
            window,
            plan,
        }
    }

    /// FFT window size.
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Hop between consecutive frames, in samples.
    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of frequency bins per frame (`n_fft / 2 + 1`).
    pub fn bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Number of centered frames produced for `len` input samples.
    pub fn frames(&self, len: usize) -> usize {
        1 + len / self.hop
    }

    /// Center frequency of each FFT bin in Hz.
    pub fn bin_frequencies(&self, sample_rate: u32) -> Vec<f64> {
        (0..self.bins())
            .map(|k| k as f64 * sample_rate as f64 / self.n_fft as f64)
            .collect()
    }

    /// Compute the magnitude spectrogram of `samples`.
    ///
    /// Returns one magnitude spectrum per frame (`frames × bins`).
    pub fn magnitude_spectrogram(&self, samples: &[f32]) -> Result<Vec<Vec<f64>>> {
        let half = self.n_fft / 2;
        let n_frames = self.frames(samples.len());

        // Per-call buffers: the shared plan stays immutable.
        let mut input = self.plan.make_input_vec();
        let mut spectrum = self.plan.make_output_vec();
        let mut scratch = self.plan.make_scratch_vec();

        let mut frames = Vec::with_capacity(n_frames);
        for t in 0..n_frames {
            // Frame start in unpadded coordinates; out-of-range taps are zero.
            let start = (t * self.hop) as isize - half as isize;
            for (i, slot) in input.iter_mut().enumerate() {
                let idx = start + i as isize;
                *slot = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize] as f64 * self.window[i]
                } else {
                    0.0
                };
            }

            self.plan
                .process_with_scratch(&mut input, &mut spectrum, &mut scratch)
                .map_err(|e| Error::FeatureExtraction(format!("FFT failed: {e}")))?;

            frames.push(
                spectrum
                    .iter()
                    .map(|c| (c.re * c.re + c.im * c.im).sqrt())
                    .collect(),
            );
        }

        Ok(frames)
    }
}
