//! Mel-frequency filterbank and related transforms
//!
//! Triangular filters on the Slaney mel scale (linear below 1 kHz,
//! logarithmic above), area-normalized so each filter integrates to roughly
//! constant energy. Also hosts the power-to-decibel conversion and the
//! orthonormal DCT-II used to decorrelate log-mel energies into MFCCs.

/// Convert a frequency in Hz to the Slaney mel scale.
pub fn hz_to_mel(hz: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;

    if hz >= min_log_hz {
        min_log_mel + (hz / min_log_hz).ln() / logstep
    } else {
        hz / f_sp
    }
}

/// Convert a Slaney mel value back to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;

    if mel >= min_log_mel {
        min_log_hz * (logstep * (mel - min_log_mel)).exp()
    } else {
        f_sp * mel
    }
}

/// Bank of triangular mel filters applied to power spectra.
pub struct MelFilterbank {
    /// Filter weights, `n_mels` rows of `n_fft / 2 + 1` bins each.
    weights: Vec<Vec<f64>>,
    n_mels: usize,
}

impl MelFilterbank {
    /// Build a filterbank spanning 0 Hz to Nyquist.
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        let fmax = sample_rate as f64 / 2.0;

        // n_mels + 2 band edges, evenly spaced on the mel scale.
        let mel_min = hz_to_mel(0.0);
        let mel_max = hz_to_mel(fmax);
        let mel_f: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
            .collect();

        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
            .collect();

        let mut weights = Vec::with_capacity(n_mels);
        for m in 0..n_mels {
            // Area normalization: divide by the bandwidth of the filter.
            let enorm = 2.0 / (mel_f[m + 2] - mel_f[m]);
            let row: Vec<f64> = fft_freqs
                .iter()
                .map(|&f| {
                    let lower = (f - mel_f[m]) / (mel_f[m + 1] - mel_f[m]);
                    let upper = (mel_f[m + 2] - f) / (mel_f[m + 2] - mel_f[m + 1]);
                    lower.min(upper).max(0.0) * enorm
                })
                .collect();
            weights.push(row);
        }

        Self { weights, n_mels }
    }

    /// Number of mel bands.
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Project one power spectrum onto the mel bands.
    pub fn apply(&self, power: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .map(|row| row.iter().zip(power).map(|(w, p)| w * p).sum())
            .collect()
    }

    /// Mel power spectrogram from magnitude frames (`frames × n_mels`).
    pub fn mel_spectrogram(&self, magnitudes: &[Vec<f64>]) -> Vec<Vec<f64>> {
        magnitudes
            .iter()
            .map(|frame| {
                let power: Vec<f64> = frame.iter().map(|m| m * m).collect();
                self.apply(&power)
            })
            .collect()
    }
}

/// Convert a power spectrogram to decibels in place.
///
/// Values are floored at 1e-10 before the log, then clamped to within
/// `top_db` of the loudest cell in the whole matrix. Silence therefore maps
/// to a uniform -100 dB rather than negative infinity.
pub fn power_to_db(frames: &mut [Vec<f64>], top_db: f64) {
    const AMIN: f64 = 1e-10;

    let mut max_db = f64::NEG_INFINITY;
    for frame in frames.iter_mut() {
        for v in frame.iter_mut() {
            *v = 10.0 * v.max(AMIN).log10();
            if *v > max_db {
                max_db = *v;
            }
        }
    }

    let floor = max_db - top_db;
    for frame in frames.iter_mut() {
        for v in frame.iter_mut() {
            if *v < floor {
                *v = floor;
            }
        }
    }
}

/// Orthonormal DCT-II of `input`, truncated to the first `n_out` terms.
pub fn dct_ortho(input: &[f64], n_out: usize) -> Vec<f64> {
    let n = input.len();
    debug_assert!(n_out <= n);

    let scale0 = (1.0 / n as f64).sqrt();
    let scale = (2.0 / n as f64).sqrt();

    (0..n_out)
        .map(|k| {
            let sum: f64 = input
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    x * (std::f64::consts::PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64)
                        .cos()
                })
                .sum();
            sum * if k == 0 { scale0 } else { scale }
        })
        .collect()
}
