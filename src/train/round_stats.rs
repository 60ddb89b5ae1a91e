use serde::{Deserialize, Serialize};

use crate::train::history::ErrorHistory;

/// Statistics emitted by `train_until_converged` after every round.
///
/// A round is `samples_per_round` sampled training steps followed by one
/// evaluation pass over the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    /// 1-based round number.
    pub round: usize,
    /// Total `train` calls made so far.
    pub samples_seen: usize,
    /// Mean absolute error over the dataset after this round.
    pub mean_abs_error: f64,
    /// Network output for every example, in dataset order.
    pub predictions: Vec<Vec<f64>>,
    /// Wall-clock duration of this round in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcome of a `train_until_converged` run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub rounds: usize,
    pub samples_seen: usize,
    pub mean_abs_error: f64,
    /// `true` if the error reached the configured threshold.
    pub converged: bool,
    pub history: ErrorHistory,
}
