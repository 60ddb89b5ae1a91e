use serde::{Deserialize, Serialize};
use std::sync::mpsc;

use crate::error::ConfigError;
use crate::network::network::{HiddenErrorSource, Network};
use crate::train::round_stats::RoundStats;

/// Configuration for a `train_until_converged` run.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
///
/// # Fields
/// - `hidden_size`: neurons in the hidden layer
/// - `learning_rate`: step size applied to every gradient
/// - `samples_per_round`: sampled `train` calls between evaluations
/// - `error_threshold`: stop once mean absolute error is at or below this
/// - `max_rounds`: round budget; `0` means evaluate only
/// - `history_every`: record the error into history every N rounds
/// - `history_capacity`: maximum readings kept in history
/// - `seed`: seeds parameter init and sampling; random if unset
/// - `hidden_error_source`: backprop ordering for the hidden error
/// - `progress_tx`: optional channel; one `RoundStats` per round.
///   A dropped receiver stops the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub hidden_size: usize,
    pub learning_rate: f64,
    pub samples_per_round: usize,
    pub error_threshold: f64,
    pub max_rounds: usize,
    pub history_every: usize,
    pub history_capacity: usize,
    pub seed: Option<u64>,
    pub hidden_error_source: HiddenErrorSource,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<RoundStats>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            hidden_size: 4,
            learning_rate: Network::DEFAULT_LEARNING_RATE,
            samples_per_round: 10_000,
            error_threshold: 0.01,
            max_rounds: 1_000,
            history_every: 5,
            history_capacity: 200,
            seed: None,
            hidden_error_source: HiddenErrorSource::UpdatedWeights,
            progress_tx: None,
        }
    }
}

impl TrainConfig {
    /// Deserializes and validates a `TrainConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_size == 0 {
            return Err(ConfigError::Invalid("hidden_size must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if self.samples_per_round == 0 {
            return Err(ConfigError::Invalid("samples_per_round must be at least 1".into()));
        }
        if !(self.error_threshold.is_finite() && self.error_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "error_threshold must be finite and non-negative, got {}",
                self.error_threshold
            )));
        }
        if self.history_every == 0 {
            return Err(ConfigError::Invalid("history_every must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_driver() {
        let c = TrainConfig::default();
        assert_eq!(c.hidden_size, 4);
        assert_eq!(c.learning_rate, 0.1);
        assert_eq!(c.samples_per_round, 10_000);
        assert_eq!(c.error_threshold, 0.01);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "seed": 7, "hidden_error_source": "pre_update_weights" }"#;
        let c: TrainConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.hidden_error_source, HiddenErrorSource::PreUpdateWeights);
        assert_eq!(c.samples_per_round, 10_000);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            TrainConfig { hidden_size: 0, ..Default::default() },
            TrainConfig { learning_rate: f64::NAN, ..Default::default() },
            TrainConfig { learning_rate: -0.1, ..Default::default() },
            TrainConfig { samples_per_round: 0, ..Default::default() },
            TrainConfig { error_threshold: -1.0, ..Default::default() },
            TrainConfig { history_every: 0, ..Default::default() },
        ];
        for c in bad {
            assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn load_json_reports_missing_file() {
        let err = TrainConfig::load_json("/nonexistent/xor-backprop.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
