//! Time-domain frame features
//!
//! Zero-crossing rate and RMS energy over the same centered frame grid the
//! spectral transforms use, so every trajectory has an identical frame
//! count.

/// Zero-crossing rate per frame.
///
/// The signal is padded by half a frame with its edge values. Samples
/// within 1e-10 of zero count as positive, so silence and DC produce a rate
/// of exactly zero.
pub fn zero_crossing_rate(samples: &[f32], frame_length: usize, hop: usize) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let half = frame_length / 2;
    let mut padded = Vec::with_capacity(samples.len() + 2 * half);
    padded.resize(half, samples[0]);
    padded.extend_from_slice(samples);
    padded.resize(padded.len() + half, *samples.last().unwrap());

    let is_negative = |v: f32| f64::from(v) < -1e-10;

    let n_frames = 1 + samples.len() / hop;
    (0..n_frames)
        .map(|t| {
            let frame = &padded[t * hop..t * hop + frame_length];
            let crossings = frame
                .windows(2)
                .filter(|w| is_negative(w[0]) != is_negative(w[1]))
                .count();
            crossings as f64 / frame_length as f64
        })
        .collect()
}

/// Root-mean-square energy per frame, zero-padded at the edges.
pub fn rms(samples: &[f32], frame_length: usize, hop: usize) -> Vec<f64> {
    let half = frame_length / 2;
    let mut padded = vec![0.0f32; half];
    padded.extend_from_slice(samples);
    padded.resize(padded.len() + half, 0.0);

    let n_frames = 1 + samples.len() / hop;
    (0..n_frames)
        .map(|t| {
            let frame = &padded[t * hop..t * hop + frame_length];
            let mean_sq = frame
                .iter()
                .map(|&v| f64::from(v) * f64::from(v))
                .sum::<f64>()
                / frame_length as f64;
            mean_sq.sqrt()
        })
        .collect()
}
