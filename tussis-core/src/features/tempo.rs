//! Tempo estimation
//!
//! A spectral-flux onset envelope is autocorrelated and scored against a
//! log-normal tempo prior centred at 120 BPM. Only the point estimate is
//! kept.

/// Onset strength envelope from a log-mel spectrogram.
///
/// Half-wave rectified frame-to-frame increase in each band, averaged over
/// bands. The first frame has no predecessor and is zero.
pub fn onset_envelope(mel_db: &[Vec<f64>]) -> Vec<f64> {
    let mut env = vec![0.0; mel_db.len()];
    for t in 1..mel_db.len() {
        let n_bands = mel_db[t].len();
        if n_bands == 0 {
            continue;
        }
        let flux: f64 = mel_db[t]
            .iter()
            .zip(&mel_db[t - 1])
            .map(|(cur, prev)| (cur - prev).max(0.0))
            .sum();
        env[t] = flux / n_bands as f64;
    }
    env
}

/// Estimate tempo in BPM from an onset envelope.
///
/// Candidate lags span 30 to 300 BPM. Each lag's mean-subtracted
/// autocorrelation is compressed with log1p and weighted by the prior; the
/// best lag wins. A flat envelope has no periodicity to score and yields
/// 0.0.
pub fn estimate_tempo(envelope: &[f64], sample_rate: u32, hop: usize) -> f64 {
    const MIN_BPM: f64 = 30.0;
    const MAX_BPM: f64 = 300.0;
    const START_BPM: f64 = 120.0;

    let n = envelope.len();
    let frame_rate = sample_rate as f64 / hop as f64;
    let min_lag = (60.0 * frame_rate / MAX_BPM).ceil() as usize;
    let max_lag = ((60.0 * frame_rate / MIN_BPM).floor() as usize).min(n.saturating_sub(1));
    if n < 2 || min_lag == 0 || min_lag > max_lag {
        return 0.0;
    }

    let mean = envelope.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = envelope.iter().map(|v| v - mean).collect();
    let energy: f64 = centered.iter().map(|v| v * v).sum();
    if energy <= f64::EPSILON {
        return 0.0;
    }

    let mut best_bpm = 0.0;
    let mut best_score = f64::NEG_INFINITY;
    for lag in min_lag..=max_lag {
        let acf = centered[lag..]
            .iter()
            .zip(&centered)
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / energy;
        let bpm = 60.0 * frame_rate / lag as f64;
        let prior = -0.5 * (bpm / START_BPM).log2().powi(2);
        let score = (1.0 + 1e6 * acf.max(0.0)).ln() + prior;
        if score > best_score {
            best_score = score;
            best_bpm = bpm;
        }
    }
    best_bpm
}
