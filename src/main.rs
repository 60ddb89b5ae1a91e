//! XOR training driver.
//!
//! Trains a 2-N-1 sigmoid network on the XOR table in rounds of randomly
//! sampled examples until the mean absolute error drops below a threshold,
//! then prints the predictions and the learned parameters.

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use xor_backprop::{train_until_converged, Dataset, HiddenErrorSource, Network, TrainConfig};

/// Train a one-hidden-layer network on XOR with online backpropagation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with training settings; flags below override it
    #[arg(short, long)]
    config: Option<String>,

    /// Hidden layer size
    #[arg(long)]
    hidden: Option<usize>,

    /// Learning rate
    #[arg(short, long)]
    learning_rate: Option<f64>,

    /// Training samples per round
    #[arg(long)]
    samples_per_round: Option<usize>,

    /// Stop once mean absolute error is at or below this value
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Maximum number of rounds
    #[arg(long)]
    max_rounds: Option<usize>,

    /// RNG seed for initialisation and sampling
    #[arg(short, long)]
    seed: Option<u64>,

    /// Route the hidden error through the pre-update output weights
    #[arg(long)]
    textbook_order: bool,

    /// Log every round
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = build_config(&args)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let dataset = Dataset::xor();
    let mut network = Network::with_rng(
        dataset.input_size(),
        config.hidden_size,
        dataset.output_size(),
        &mut rng,
    )?
    .with_learning_rate(config.learning_rate)
    .with_hidden_error_source(config.hidden_error_source);

    info!(
        seed,
        hidden = config.hidden_size,
        learning_rate = config.learning_rate,
        order = ?config.hidden_error_source,
        "training XOR"
    );

    let report = train_until_converged(&mut network, &dataset, &config, &mut rng)?;

    println!();
    println!(
        "Rounds: {}  Samples: {}  Mean error: {:.6}  Converged: {}",
        report.rounds, report.samples_seen, report.mean_abs_error, report.converged
    );

    println!("\n{:>12}  {:>8}  {:>10}", "Input", "Target", "Output");
    println!("{}", "-".repeat(34));
    for (input, target) in dataset.inputs().iter().zip(dataset.targets()) {
        let output = network.predict(input)?;
        println!(
            "{:>12}  {:>8.1}  {:>10.4}",
            format!("{:?}", input),
            target[0],
            output[(0, 0)]
        );
    }

    if !report.history.is_empty() {
        let history: Vec<String> = report.history.iter().map(|e| format!("{:.4}", e)).collect();
        println!("\nError history: {}", history.join(" "));
    }

    println!("\nweights input->hidden\n{}", network.weights_input_hidden());
    println!("bias hidden\n{}", network.bias_hidden());
    println!("weights hidden->output\n{}", network.weights_hidden_output());
    println!("bias output\n{}", network.bias_output());

    Ok(())
}

fn build_config(args: &Args) -> Result<TrainConfig> {
    let mut config = match &args.config {
        Some(path) => TrainConfig::load_json(path)
            .with_context(|| format!("loading config from {}", path))?,
        None => TrainConfig::default(),
    };

    if let Some(hidden) = args.hidden {
        config.hidden_size = hidden;
    }
    if let Some(lr) = args.learning_rate {
        config.learning_rate = lr;
    }
    if let Some(n) = args.samples_per_round {
        config.samples_per_round = n;
    }
    if let Some(t) = args.threshold {
        config.error_threshold = t;
    }
    if let Some(n) = args.max_rounds {
        config.max_rounds = n;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.textbook_order {
        config.hidden_error_source = HiddenErrorSource::PreUpdateWeights;
    }

    config.validate()?;
    Ok(config)
}
