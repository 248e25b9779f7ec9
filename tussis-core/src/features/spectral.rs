//! Frame-level spectral shape descriptors
//!
//! Centroid, bandwidth and rolloff treat each magnitude spectrum as a
//! distribution over frequency. Spectral contrast compares peak and valley
//! energy inside octave-spaced sub-bands. All-zero frames degenerate to zero
//! rather than NaN.

use crate::dsp::mel::power_to_db;

/// Spectral centroid per frame: the magnitude-weighted mean frequency.
pub fn centroid(magnitudes: &[Vec<f64>], freqs: &[f64]) -> Vec<f64> {
    magnitudes
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().sum();
            if total > 0.0 {
                frame.iter().zip(freqs).map(|(m, f)| m * f).sum::<f64>() / total
            } else {
                0.0
            }
        })
        .collect()
}

/// Spectral bandwidth per frame: magnitude-weighted second moment around the
/// centroid.
pub fn bandwidth(magnitudes: &[Vec<f64>], freqs: &[f64], centroids: &[f64]) -> Vec<f64> {
    magnitudes
        .iter()
        .zip(centroids)
        .map(|(frame, &c)| {
            let total: f64 = frame.iter().sum();
            if total > 0.0 {
                let second: f64 = frame
                    .iter()
                    .zip(freqs)
                    .map(|(m, f)| m / total * (f - c) * (f - c))
                    .sum();
                second.sqrt()
            } else {
                0.0
            }
        })
        .collect()
}

/// Roll-off frequency per frame: the lowest frequency below which
/// `roll_percent` of the spectral energy is contained.
pub fn rolloff(magnitudes: &[Vec<f64>], freqs: &[f64], roll_percent: f64) -> Vec<f64> {
    magnitudes
        .iter()
        .map(|frame| {
            let threshold = roll_percent * frame.iter().sum::<f64>();
            let mut acc = 0.0;
            for (m, &f) in frame.iter().zip(freqs) {
                acc += m;
                if acc >= threshold {
                    return f;
                }
            }
            *freqs.last().unwrap_or(&0.0)
        })
        .collect()
}

/// Spectral contrast per frame for `n_bands` octave bands above `fmin`, plus
/// the sub-`fmin` band (`frames × n_bands + 1`).
///
/// Within each band the top and bottom `quantile` of sorted magnitudes are
/// averaged, squared to power, converted to dB and differenced. At least one
/// bin is always taken from each side.
pub fn contrast(
    magnitudes: &[Vec<f64>],
    freqs: &[f64],
    fmin: f64,
    n_bands: usize,
    quantile: f64,
) -> Vec<Vec<f64>> {
    let n_frames = magnitudes.len();
    let mut peak = vec![vec![0.0; n_bands + 1]; n_frames];
    let mut valley = vec![vec![0.0; n_bands + 1]; n_frames];

    // Octave band edges: [0, fmin, 2*fmin, ..., fmin * 2^n_bands].
    let mut octa = vec![0.0];
    for k in 0..=n_bands {
        octa.push(fmin * (1u64 << k) as f64);
    }

    for k in 0..=n_bands {
        let (f_low, f_high) = (octa[k], octa[k + 1]);
        let mut bins: Vec<usize> = (0..freqs.len())
            .filter(|&i| freqs[i] >= f_low && freqs[i] <= f_high)
            .collect();
        if bins.is_empty() {
            continue;
        }

        // Widen by one bin below, and for the top band up to Nyquist.
        if k > 0 && bins[0] > 0 {
            bins.insert(0, bins[0] - 1);
        }
        if k == n_bands {
            bins.extend(bins[bins.len() - 1] + 1..freqs.len());
        }

        // Quantile count comes from the widened band, before trimming the
        // shared boundary bin off every band but the top one.
        let q = ((quantile * bins.len() as f64).round() as usize).max(1);
        if k < n_bands {
            bins.pop();
        }
        if bins.is_empty() {
            continue;
        }
        let q = q.min(bins.len());

        for (t, frame) in magnitudes.iter().enumerate() {
            let mut vals: Vec<f64> = bins.iter().map(|&i| frame[i]).collect();
            vals.sort_by(|a, b| a.total_cmp(b));
            let valley_mean = vals[..q].iter().sum::<f64>() / q as f64;
            let peak_mean = vals[vals.len() - q..].iter().sum::<f64>() / q as f64;
            valley[t][k] = valley_mean * valley_mean;
            peak[t][k] = peak_mean * peak_mean;
        }
    }

    power_to_db(&mut peak, 80.0);
    power_to_db(&mut valley, 80.0);

    peak.iter()
        .zip(&valley)
        .map(|(p, v)| p.iter().zip(v).map(|(a, b)| a - b).collect())
        .collect()
}
