//! Sample-rate conversion
//!
//! Mono sinc resampling in a single pass, with the chunk size set to the
//! whole input. The filter profile favours latency over stop-band
//! attenuation, which is acceptable ahead of feature extraction.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::{Error, Result};

/// Resample a mono signal from `source_rate` to `target_rate`.
///
/// Matching rates and empty inputs pass through untouched.
pub fn resample_mono(samples: Vec<f32>, source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples);
    }

    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let input_len = samples.len();

    // Chunk size = input length: one process call handles everything.
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, input_len, 1)
        .map_err(|e| Error::AudioDecode(format!("failed to create resampler: {e}")))?;

    let output = resampler
        .process(&[samples], None)
        .map_err(|e| Error::AudioDecode(format!("resampling failed: {e}")))?;

    let resampled = output.into_iter().next().unwrap_or_default();

    tracing::debug!(
        input_len,
        output_len = resampled.len(),
        source_rate,
        target_rate,
        "Resampled audio"
    );

    Ok(resampled)
}
