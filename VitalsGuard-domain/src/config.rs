//! Predictor configuration read from the environment

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::prediction::PredictionMode;
use crate::services::jitter::{JitterStrategy, DEFAULT_SEED};

/// Default number of records returned by history queries
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Upper bound for any history query
pub const MAX_HISTORY_LIMIT: usize = 500;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used
    #[error("Invalid value for {var}: {value} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Strategy used when a request does not choose one
    #[serde(default)]
    pub mode: PredictionMode,

    /// Source of the confidence offset
    #[serde(default)]
    pub jitter: JitterStrategy,

    /// Default limit for history queries
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            mode: PredictionMode::Ensemble,
            jitter: JitterStrategy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl PredictorConfig {
    /// Read `PREDICTION_MODE`, `CONFIDENCE_JITTER`, `CONFIDENCE_SEED` and
    /// `HISTORY_LIMIT`. Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("PREDICTION_MODE") {
            config.mode = value.parse().map_err(|reason| ConfigError::InvalidValue {
                var: "PREDICTION_MODE",
                value: value.clone(),
                reason,
            })?;
        }

        let seed = match lookup("CONFIDENCE_SEED") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                var: "CONFIDENCE_SEED",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_SEED,
        };

        config.jitter = match lookup("CONFIDENCE_JITTER").as_deref().map(str::trim) {
            None | Some("seeded") => JitterStrategy::Seeded { seed },
            Some("random") => JitterStrategy::Random,
            Some("none") => JitterStrategy::None,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "CONFIDENCE_JITTER",
                    value: other.to_string(),
                    reason: "expected seeded, random or none".to_string(),
                })
            }
        };

        if let Some(value) = lookup("HISTORY_LIMIT") {
            let limit = value.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                var: "HISTORY_LIMIT",
                value: value.clone(),
                reason: e.to_string(),
            })?;
            if limit == 0 || limit > MAX_HISTORY_LIMIT {
                return Err(ConfigError::InvalidValue {
                    var: "HISTORY_LIMIT",
                    value,
                    reason: format!("must be between 1 and {}", MAX_HISTORY_LIMIT),
                });
            }
            config.history_limit = limit;
        }

        Ok(config)
    }
}
