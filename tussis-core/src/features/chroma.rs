//! Chroma energy and tonal centroid features
//!
//! Chroma folds the power spectrum onto the 12 pitch classes with a bank of
//! wrapped Gaussian windows on a log-frequency axis, tapered away from the
//! mid octaves. Tonnetz projects chroma onto the 6-D tonal centroid space of
//! fifths, minor thirds and major thirds.

const N_CHROMA: usize = 12;

/// Bank of pitch-class filters applied to power spectra.
pub struct ChromaFilterbank {
    /// Filter weights, 12 rows of `n_fft / 2 + 1` bins. Row 0 is pitch
    /// class C.
    weights: Vec<Vec<f64>>,
}

impl ChromaFilterbank {
    pub fn new(sample_rate: u32, n_fft: usize) -> Self {
        let n_bins = n_fft / 2 + 1;

        // Position of each FFT bin on the chroma axis: 12 bins per octave
        // above A0 (27.5 Hz). The DC bin gets a synthetic position 1.5
        // octaves below bin 1 so its (negligible) weight stays defined.
        let frqbin = |k: usize| -> f64 {
            N_CHROMA as f64 * (k as f64 * sample_rate as f64 / n_fft as f64 / 27.5).log2()
        };
        let mut frqbins = Vec::with_capacity(n_bins + 1);
        frqbins.push(frqbin(1) - 1.5 * N_CHROMA as f64);
        for k in 1..=n_bins {
            frqbins.push(frqbin(k));
        }

        let mut weights = vec![vec![0.0; n_bins]; N_CHROMA];
        for i in 0..n_bins {
            let width = (frqbins[i + 1] - frqbins[i]).max(1.0);

            // Gaussian bump per pitch class, distance wrapped to +-6 bins.
            let mut col = [0.0; N_CHROMA];
            for (c, w) in col.iter_mut().enumerate() {
                let d = (frqbins[i] - c as f64 + 6.0).rem_euclid(12.0) - 6.0;
                *w = (-0.5 * (2.0 * d / width).powi(2)).exp();
            }

            let norm = col.iter().map(|w| w * w).sum::<f64>().sqrt();
            // Taper bins far from the centre of the piano range.
            let octave_weight = (-0.5 * ((frqbins[i] / 12.0 - 5.0) / 2.0).powi(2)).exp();

            for (c, &w) in col.iter().enumerate() {
                // The chroma axis starts at A0; rotate so row 0 is C.
                let row = (c + 9) % N_CHROMA;
                weights[row][i] = w / norm * octave_weight;
            }
        }

        Self { weights }
    }

    /// Chroma energy per frame from magnitude spectra (`frames × 12`).
    ///
    /// Each frame is normalized by its largest bin, so values lie in
    /// [0, 1]; an all-zero frame stays zero.
    pub fn chroma(&self, magnitudes: &[Vec<f64>]) -> Vec<Vec<f64>> {
        magnitudes
            .iter()
            .map(|frame| {
                let mut out = vec![0.0; N_CHROMA];
                for (slot, row) in out.iter_mut().zip(&self.weights) {
                    *slot = row.iter().zip(frame).map(|(w, m)| w * m * m).sum();
                }
                let peak = out.iter().cloned().fold(0.0, f64::max);
                if peak > 0.0 {
                    for v in out.iter_mut() {
                        *v /= peak;
                    }
                }
                out
            })
            .collect()
    }
}

/// Tonal centroid projection of chroma frames (`frames × 6`).
///
/// Rows come in sine/cosine pairs for the circles of fifths, minor thirds
/// and major thirds. Chroma is L1-normalized per frame before projection,
/// so each coordinate is bounded by its circle radius.
pub fn tonnetz(chroma: &[Vec<f64>]) -> Vec<Vec<f64>> {
    const SCALE: [f64; 6] = [7.0 / 6.0, 7.0 / 6.0, 3.0 / 2.0, 3.0 / 2.0, 2.0 / 3.0, 2.0 / 3.0];
    const RADII: [f64; 6] = [1.0, 1.0, 1.0, 1.0, 0.5, 0.5];

    let mut phi = [[0.0; N_CHROMA]; 6];
    for (r, row) in phi.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            let mut angle = SCALE[r] * c as f64;
            if r % 2 == 0 {
                angle -= 0.5;
            }
            *v = RADII[r] * (std::f64::consts::PI * angle).cos();
        }
    }

    chroma
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().map(|v| v.abs()).sum();
            phi.iter()
                .map(|row| {
                    if total > 0.0 {
                        frame.iter().zip(row).map(|(v, p)| v / total * p).sum()
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_tone_maps_to_its_pitch_class() {
        let bank = ChromaFilterbank::new(22050, 2048);
        // Bin 41 sits at 441.4 Hz, pitch class A (row 9 with C at row 0).
        let mut frame = vec![0.0; 1025];
        frame[41] = 1.0;
        let chroma = bank.chroma(&[frame]);

        assert_eq!(chroma[0].len(), 12);
        assert!((chroma[0][9] - 1.0).abs() < 1e-12);
        for (c, &v) in chroma[0].iter().enumerate() {
            if c != 9 {
                assert!(v < 0.5, "class {c} unexpectedly strong: {v}");
            }
        }
    }

    #[test]
    fn test_silent_frames_stay_zero() {
        let bank = ChromaFilterbank::new(22050, 2048);
        let chroma = bank.chroma(&vec![vec![0.0; 1025]; 3]);
        assert!(chroma.iter().flatten().all(|&v| v == 0.0));

        let tc = tonnetz(&chroma);
        assert_eq!(tc.len(), 3);
        assert!(tc.iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tonnetz_coordinates_stay_within_radii() {
        let bank = ChromaFilterbank::new(22050, 2048);
        let mut frame = vec![0.0; 1025];
        frame[41] = 1.0;
        frame[100] = 0.7;
        let tc = tonnetz(&bank.chroma(&[frame]));

        let radii = [1.0, 1.0, 1.0, 1.0, 0.5, 0.5];
        for (r, &limit) in radii.iter().enumerate() {
            assert!(
                tc[0][r].abs() <= limit + 1e-12,
                "axis {r} out of range: {}",
                tc[0][r]
            );
        }
    }
}
