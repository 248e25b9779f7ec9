//! Class label mapping
//!
//! The training export keys labels by stringified class index. That map is
//! converted once at startup into a dense lookup table validated to cover
//! every class the model can emit, so a prediction can never reach an
//! unmapped index at request time.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Dense class-index to label table.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// Build from stringified-index keys ("0", "1", ...), requiring an
    /// entry for every index in `0..n_classes`.
    pub fn from_string_keys(mapping: &HashMap<String, String>, n_classes: usize) -> Result<Self> {
        if n_classes == 0 {
            return Err(Error::LabelMapping("classifier reports zero classes".into()));
        }

        let mut labels = Vec::with_capacity(n_classes);
        for index in 0..n_classes {
            let label = mapping.get(&index.to_string()).ok_or_else(|| {
                Error::LabelMapping(format!("no label for class index {index}"))
            })?;
            labels.push(label.clone());
        }

        if mapping.len() > n_classes {
            tracing::warn!(
                entries = mapping.len(),
                n_classes,
                "label mapping has entries beyond the model's class count"
            );
        }

        Ok(Self { labels })
    }

    /// Label for a class index.
    pub fn label(&self, index: usize) -> Result<&str> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| Error::LabelMapping(format!("no label for class index {index}")))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
