use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ItemsetLength;

/// Thresholds for one mining run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum fraction of transactions an itemset must appear in, in (0, 1].
    pub min_support: f64,
    /// Minimum confidence of an emitted rule, in (0, 1].
    pub min_confidence: f64,
    /// Largest itemset size to mine. `None` mines until a level comes up empty.
    pub max_len: Option<ItemsetLength>,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.5,
            min_confidence: 0.5,
            max_len: None,
        }
    }
}

impl MiningConfig {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            ..Default::default()
        }
    }

    /// Cap the size of mined itemsets
    pub fn with_max_len(mut self, max_len: Option<ItemsetLength>) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_fraction("min_support", self.min_support)?;
        validate_fraction("min_confidence", self.min_confidence)?;
        if self.max_len == Some(0) {
            return Err(Error::InvalidInput("max_len must be at least 1".into()));
        }
        Ok(())
    }
}

pub(crate) fn validate_fraction(name: &str, value: f64) -> Result<()> {
    // NaN fails both comparisons
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}
