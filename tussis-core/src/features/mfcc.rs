//! Mel-frequency cepstral coefficients
//!
//! Decorrelates the log-mel spectrogram with an orthonormal DCT-II and keeps
//! the lowest coefficients. The zeroth coefficient tracks overall log energy,
//! which for digital silence settles at a constant -100 * sqrt(n_mels).

use crate::dsp::mel::dct_ortho;

/// Compute MFCCs from a log-mel spectrogram (`frames × n_mels` in dB).
///
/// Returns coefficient-major rows (`n_mfcc × frames`) so each coefficient's
/// trajectory can be summarized directly.
pub fn mfcc(mel_db: &[Vec<f64>], n_mfcc: usize) -> Vec<Vec<f64>> {
    let n_frames = mel_db.len();
    let mut rows = vec![vec![0.0; n_frames]; n_mfcc];

    for (t, frame) in mel_db.iter().enumerate() {
        let coeffs = dct_ortho(frame, n_mfcc);
        for (k, &c) in coeffs.iter().enumerate() {
            rows[k][t] = c;
        }
    }

    rows
}
