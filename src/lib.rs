pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{ConfigError, Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use network::network::{HiddenErrorSource, Network};
pub use loss::mae::MaeLoss;
pub use train::{train_until_converged, Dataset, ErrorHistory, RoundStats, TrainConfig, TrainReport};
