use serde::{Deserialize, Serialize};

/// Named element-wise activations available to the network.
///
/// The set is closed: new strategies are added as variants, not injected as
/// arbitrary closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    /// Logistic function `1 / (1 + e^-x)`.
    #[default]
    Sigmoid,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Derivative expressed in terms of the activation output `y = f(x)`.
    ///
    /// For sigmoid this is `y * (1 - y)`; callers pass the stored activation,
    /// never the pre-activation.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => y * (1.0 - y),
        }
    }
}
