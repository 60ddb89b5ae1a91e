use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::network::network::Network;
use crate::train::dataset::{mean_absolute_error, Dataset};
use crate::train::history::ErrorHistory;
use crate::train::round_stats::{RoundStats, TrainReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` on `dataset` in rounds until the mean absolute error is
/// at or below `config.error_threshold`.
///
/// Each round makes `config.samples_per_round` online `train` calls on
/// examples drawn uniformly with replacement, then evaluates the whole
/// dataset once.
///
/// # Early termination
/// The loop stops without converging if:
/// - `config.max_rounds` rounds have run, **or**
/// - the `progress_tx` receiver has been dropped.
///
/// Failing to converge is reported through `TrainReport::converged`, not as
/// an error. Errors are only returned for dataset/network shape mismatches.
pub fn train_until_converged<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainReport> {
    let mut history = ErrorHistory::new(config.history_capacity);
    let mut samples_seen = 0;
    let mut rounds = 0;
    let mut mean_abs_error = dataset.mean_absolute_error(network)?;

    while mean_abs_error > config.error_threshold && rounds < config.max_rounds {
        let t_start = Instant::now();

        run_one_round(network, dataset, config.samples_per_round, rng)?;
        samples_seen += config.samples_per_round;
        rounds += 1;

        let predictions = dataset.predictions(network)?;
        mean_abs_error = mean_absolute_error(&predictions, dataset.targets());

        if rounds % config.history_every.max(1) == 0 {
            history.push(mean_abs_error);
        }

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        debug!(round = rounds, samples_seen, mean_abs_error, elapsed_ms, "round complete");

        let stats = RoundStats {
            round: rounds,
            samples_seen,
            mean_abs_error,
            predictions,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                warn!(round = rounds, "progress receiver dropped, stopping");
                break;
            }
        }
    }

    let converged = mean_abs_error <= config.error_threshold;
    if converged {
        info!(rounds, samples_seen, mean_abs_error, "converged");
    } else {
        info!(rounds, samples_seen, mean_abs_error, "stopped before convergence");
    }

    Ok(TrainReport {
        rounds,
        samples_seen,
        mean_abs_error,
        converged,
        history,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// `samples` online training steps on uniformly sampled examples.
fn run_one_round<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    samples: usize,
    rng: &mut R,
) -> Result<()> {
    for _ in 0..samples {
        let (input, target) = dataset.sample(rng);
        network.train(input, target)?;
    }
    Ok(())
}
