//! Summary statistics over feature trajectories
//!
//! Every time-varying transform is reduced to mean, standard deviation,
//! minimum and maximum before entering the feature vector. The standard
//! deviation is the population form (divide by N), matching how the
//! training-time features were computed.

/// Four-number summary of a sequence of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Statistics in feature-vector order: mean, std, min, max.
    pub fn as_array(&self) -> [f64; 4] {
        [self.mean, self.std, self.min, self.max]
    }
}

/// Summarize a single trajectory.
///
/// An empty input degenerates to all zeros rather than NaN so that
/// downstream consumers always see finite values.
pub fn summarize(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats {
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    SummaryStats {
        mean,
        std: variance.sqrt(),
        min,
        max,
    }
}

/// Summarize a matrix as one flat population, all rows and frames pooled.
pub fn summarize_matrix(rows: &[Vec<f64>]) -> SummaryStats {
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    summarize(&flat)
}
