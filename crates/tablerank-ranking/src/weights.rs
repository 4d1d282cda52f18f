use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance used when checking that ranking weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

pub const DEFAULT_SIMILARITY_WEIGHT: f64 = 0.40;
pub const DEFAULT_DISTANCE_WEIGHT: f64 = 0.25;
pub const DEFAULT_PROMINENCE_WEIGHT: f64 = 0.35;

pub const DEFAULT_REVIEW_COUNT_WEIGHT: f64 = 0.50;
pub const DEFAULT_RATING_WEIGHT: f64 = 0.40;

#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("failed to read weights file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse weights file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("weight `{name}` must be a finite non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("ranking weights must sum to 1.0, got {sum}")]
    BadSum { sum: f64 },
}

/// Weights of the three factors combined into the ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub similarity: f64,
    pub distance: f64,
    pub prominence: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            similarity: DEFAULT_SIMILARITY_WEIGHT,
            distance: DEFAULT_DISTANCE_WEIGHT,
            prominence: DEFAULT_PROMINENCE_WEIGHT,
        }
    }
}

impl RankingWeights {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.similarity + self.distance + self.prominence
    }

    /// # Errors
    ///
    /// Returns `WeightsError` if any weight is negative or non-finite, or the
    /// weights do not sum to 1.0.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in [
            ("similarity", self.similarity),
            ("distance", self.distance),
            ("prominence", self.prominence),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Negative { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum { sum });
        }
        Ok(())
    }
}

/// Weights inside the prominence sub-score. The engagement bonus is added on
/// top, so these are not required to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProminenceWeights {
    pub review_count: f64,
    pub rating: f64,
}

impl Default for ProminenceWeights {
    fn default() -> Self {
        Self {
            review_count: DEFAULT_REVIEW_COUNT_WEIGHT,
            rating: DEFAULT_RATING_WEIGHT,
        }
    }
}

impl ProminenceWeights {
    /// # Errors
    ///
    /// Returns `WeightsError::Negative` for a negative or non-finite weight.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in [("review_count", self.review_count), ("rating", self.rating)] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Negative { name, value });
            }
        }
        Ok(())
    }
}

/// Full weight configuration as stored in the YAML weights file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightsConfig {
    #[serde(default)]
    pub ranking: RankingWeights,
    #[serde(default)]
    pub prominence: ProminenceWeights,
}

impl WeightsConfig {
    /// Parse and validate weights from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `WeightsError` if the YAML is malformed or the weights are invalid.
    pub fn from_yaml(content: &str) -> Result<Self, WeightsError> {
        let config: WeightsConfig = serde_yaml::from_str(content)?;
        config.ranking.validate()?;
        config.prominence.validate()?;
        Ok(config)
    }
}

/// Load and validate ranking weights from a YAML file.
///
/// # Errors
///
/// Returns `WeightsError` if the file cannot be read, parsed, or fails validation.
pub fn load_weights(path: &Path) -> Result<WeightsConfig, WeightsError> {
    let content = std::fs::read_to_string(path).map_err(|e| WeightsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let config = WeightsConfig::from_yaml(&content)?;
    tracing::info!(
        path = %path.display(),
        similarity = config.ranking.similarity,
        distance = config.ranking.distance,
        prominence = config.ranking.prominence,
        "loaded ranking weights"
    );
    Ok(config)
}
