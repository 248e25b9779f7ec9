//! Classification models
//!
//! Two model families cover the trained artifacts: logistic regression
//! (binary via sigmoid, multinomial via softmax) and Gaussian naive Bayes
//! evaluated in log space. Both produce a proper probability distribution
//! over classes, which is what the confidence score is read from.

use serde::Deserialize;

use crate::error::{Error, Result};

/// A trained classifier, deserialized from its JSON artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum ClassifierModel {
    LogisticRegression {
        /// One weight row per decision output. A single row denotes the
        /// binary case with the row scoring the positive class.
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    GaussianNaiveBayes {
        class_priors: Vec<f64>,
        /// Per-class feature means, one row per class.
        means: Vec<Vec<f64>>,
        /// Per-class feature variances, one row per class.
        variances: Vec<Vec<f64>>,
    },
}

impl ClassifierModel {
    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::LogisticRegression {
                coefficients,
                intercepts,
            } => {
                let n_features = coefficients.first().map(Vec::len).unwrap_or(0);
                if n_features == 0 {
                    return Err(Error::ArtifactLoad(
                        "logistic regression has no coefficients".into(),
                    ));
                }
                if coefficients.iter().any(|row| row.len() != n_features) {
                    return Err(Error::ArtifactLoad(
                        "logistic regression coefficient rows have uneven lengths".into(),
                    ));
                }
                if intercepts.len() != coefficients.len() {
                    return Err(Error::ArtifactLoad(format!(
                        "logistic regression has {} intercepts for {} coefficient rows",
                        intercepts.len(),
                        coefficients.len()
                    )));
                }
                let finite = coefficients.iter().flatten().all(|v| v.is_finite())
                    && intercepts.iter().all(|v| v.is_finite());
                if !finite {
                    return Err(Error::ArtifactLoad(
                        "logistic regression contains non-finite parameters".into(),
                    ));
                }
            }
            Self::GaussianNaiveBayes {
                class_priors,
                means,
                variances,
            } => {
                if class_priors.len() < 2 {
                    return Err(Error::ArtifactLoad(
                        "naive Bayes needs at least two classes".into(),
                    ));
                }
                if means.len() != class_priors.len() || variances.len() != class_priors.len() {
                    return Err(Error::ArtifactLoad(
                        "naive Bayes priors/means/variances disagree on class count".into(),
                    ));
                }
                let n_features = means.first().map(Vec::len).unwrap_or(0);
                if n_features == 0
                    || means.iter().any(|row| row.len() != n_features)
                    || variances.iter().any(|row| row.len() != n_features)
                {
                    return Err(Error::ArtifactLoad(
                        "naive Bayes parameter rows have uneven lengths".into(),
                    ));
                }
                if class_priors.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                    return Err(Error::ArtifactLoad(
                        "naive Bayes priors must be positive and finite".into(),
                    ));
                }
                if means.iter().flatten().any(|v| !v.is_finite())
                    || variances.iter().flatten().any(|v| !v.is_finite() || *v <= 0.0)
                {
                    return Err(Error::ArtifactLoad(
                        "naive Bayes means/variances must be finite, variances positive".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Number of classes the model distinguishes.
    pub fn n_classes(&self) -> usize {
        match self {
            Self::LogisticRegression { coefficients, .. } => {
                if coefficients.len() == 1 {
                    2
                } else {
                    coefficients.len()
                }
            }
            Self::GaussianNaiveBayes { class_priors, .. } => class_priors.len(),
        }
    }

    /// Number of input features the model was trained on.
    pub fn n_features(&self) -> usize {
        match self {
            Self::LogisticRegression { coefficients, .. } => {
                coefficients.first().map(Vec::len).unwrap_or(0)
            }
            Self::GaussianNaiveBayes { means, .. } => means.first().map(Vec::len).unwrap_or(0),
        }
    }

    /// Probability distribution over classes for one scaled feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }

        match self {
            Self::LogisticRegression {
                coefficients,
                intercepts,
            } => {
                let scores: Vec<f64> = coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
                    .collect();
                if scores.len() == 1 {
                    let p = 1.0 / (1.0 + (-scores[0]).exp());
                    Ok(vec![1.0 - p, p])
                } else {
                    Ok(softmax(&scores))
                }
            }
            Self::GaussianNaiveBayes {
                class_priors,
                means,
                variances,
            } => {
                const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
                let log_joint: Vec<f64> = class_priors
                    .iter()
                    .zip(means.iter().zip(variances))
                    .map(|(prior, (mean, var))| {
                        let log_likelihood: f64 = features
                            .iter()
                            .zip(mean.iter().zip(var))
                            .map(|(x, (m, v))| {
                                -0.5 * ((TWO_PI * v).ln() + (x - m) * (x - m) / v)
                            })
                            .sum();
                        prior.ln() + log_likelihood
                    })
                    .collect();
                Ok(softmax(&log_joint))
            }
        }
    }

    /// Predicted class index plus the full distribution.
    ///
    /// Ties go to the lowest index.
    pub fn predict(&self, features: &[f64]) -> Result<(usize, Vec<f64>)> {
        let probabilities = self.predict_proba(features)?;
        let mut index = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[index] {
                index = i;
            }
        }
        Ok((index, probabilities))
    }
}

/// Numerically stable softmax.
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}
