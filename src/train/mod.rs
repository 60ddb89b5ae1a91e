pub mod dataset;
pub mod history;
pub mod loop_fn;
pub mod round_stats;
pub mod train_config;

pub use dataset::Dataset;
pub use history::ErrorHistory;
pub use loop_fn::train_until_converged;
pub use round_stats::{RoundStats, TrainReport};
pub use train_config::TrainConfig;
