use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Which hidden->output weights the backward pass uses to route the output
/// error into the hidden layer.
///
/// `UpdatedWeights` applies the hidden->output update first and then
/// propagates through the new weights. This reproduces the reference
/// behaviour and is the default. `PreUpdateWeights` is the textbook rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenErrorSource {
    #[default]
    UpdatedWeights,
    PreUpdateWeights,
}

/// Fixed three-layer (input, hidden, output) feedforward network.
///
/// Owns its four parameter matrices exclusively. `train` replaces them with
/// updated values; their shapes never change.
#[derive(Debug, Clone)]
pub struct Network {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    learning_rate: f64,
    activation: ActivationFunction,
    hidden_error_source: HiddenErrorSource,
    weights_input_hidden: Matrix,  // hidden x input
    weights_hidden_output: Matrix, // output x hidden
    bias_hidden: Matrix,           // hidden x 1
    bias_output: Matrix,           // output x 1
}

/// Activations retained by the forward pass for backpropagation.
struct ForwardPass {
    input: Matrix,
    hidden: Matrix,
    output: Matrix,
}

impl Network {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

    /// Builds a network whose parameters are drawn from the thread RNG.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Result<Network> {
        Network::with_rng(input_size, hidden_size, output_size, &mut rand::thread_rng())
    }

    /// Builds a network whose parameters are drawn uniformly from [-1, 1]
    /// using `rng`. Draw order: input->hidden weights, hidden->output
    /// weights, hidden bias, output bias.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Network> {
        let weights_input_hidden = Matrix::random(hidden_size, input_size, rng)?;
        let weights_hidden_output = Matrix::random(output_size, hidden_size, rng)?;
        let bias_hidden = Matrix::random(hidden_size, 1, rng)?;
        let bias_output = Matrix::random(output_size, 1, rng)?;

        debug!(input_size, hidden_size, output_size, "initialised network");

        Ok(Network {
            input_size,
            hidden_size,
            output_size,
            learning_rate: Network::DEFAULT_LEARNING_RATE,
            activation: ActivationFunction::Sigmoid,
            hidden_error_source: HiddenErrorSource::default(),
            weights_input_hidden,
            weights_hidden_output,
            bias_hidden,
            bias_output,
        })
    }

    /// Builds a network from explicit parameters. Layer sizes are read off
    /// the matrices and must agree with each other.
    pub fn from_parameters(
        weights_input_hidden: Matrix,
        weights_hidden_output: Matrix,
        bias_hidden: Matrix,
        bias_output: Matrix,
    ) -> Result<Network> {
        let (hidden_size, input_size) = weights_input_hidden.shape();
        let output_size = weights_hidden_output.rows();

        expect_shape("weights_hidden_output", &weights_hidden_output, (output_size, hidden_size))?;
        expect_shape("bias_hidden", &bias_hidden, (hidden_size, 1))?;
        expect_shape("bias_output", &bias_output, (output_size, 1))?;

        Ok(Network {
            input_size,
            hidden_size,
            output_size,
            learning_rate: Network::DEFAULT_LEARNING_RATE,
            activation: ActivationFunction::Sigmoid,
            hidden_error_source: HiddenErrorSource::default(),
            weights_input_hidden,
            weights_hidden_output,
            bias_hidden,
            bias_output,
        })
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Network {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_hidden_error_source(mut self, source: HiddenErrorSource) -> Network {
        self.hidden_error_source = source;
        self
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn hidden_error_source(&self) -> HiddenErrorSource {
        self.hidden_error_source
    }

    pub fn weights_input_hidden(&self) -> &Matrix {
        &self.weights_input_hidden
    }

    pub fn weights_hidden_output(&self) -> &Matrix {
        &self.weights_hidden_output
    }

    pub fn bias_hidden(&self) -> &Matrix {
        &self.bias_hidden
    }

    pub fn bias_output(&self) -> &Matrix {
        &self.bias_output
    }

    /// Forward pass. Returns the `output_size x 1` activation column.
    pub fn predict(&self, input: &[f64]) -> Result<Matrix> {
        Ok(self.feedforward(input)?.output)
    }

    /// One online backpropagation step on a single example.
    ///
    /// The output layer is updated before the hidden error is computed; with
    /// `HiddenErrorSource::UpdatedWeights` the hidden error is routed through
    /// the freshly updated hidden->output weights. All four parameters are
    /// computed first and assigned together, so an error leaves the network
    /// untouched.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        check_len("train target", target, self.output_size)?;
        let pass = self.feedforward(input)?;
        let targets = Matrix::from_array(target)?;
        let act = self.activation;

        let output_errors = targets.subtract(&pass.output)?;
        let output_gradient = pass
            .output
            .map(|y| act.derivative_from_output(y))
            .hadamard(&output_errors)?
            .multiply_scalar(self.learning_rate);

        let weights_ho_deltas = output_gradient.multiply(&pass.hidden.transpose())?;
        let weights_hidden_output = self.weights_hidden_output.add(&weights_ho_deltas)?;
        let bias_output = self.bias_output.add(&output_gradient)?;

        let routing = match self.hidden_error_source {
            HiddenErrorSource::UpdatedWeights => &weights_hidden_output,
            HiddenErrorSource::PreUpdateWeights => &self.weights_hidden_output,
        };
        let hidden_errors = routing.transpose().multiply(&output_errors)?;
        let hidden_gradient = pass
            .hidden
            .map(|y| act.derivative_from_output(y))
            .hadamard(&hidden_errors)?
            .multiply_scalar(self.learning_rate);

        let weights_ih_deltas = hidden_gradient.multiply(&pass.input.transpose())?;
        let weights_input_hidden = self.weights_input_hidden.add(&weights_ih_deltas)?;
        let bias_hidden = self.bias_hidden.add(&hidden_gradient)?;

        self.weights_hidden_output = weights_hidden_output;
        self.bias_output = bias_output;
        self.weights_input_hidden = weights_input_hidden;
        self.bias_hidden = bias_hidden;
        Ok(())
    }

    fn feedforward(&self, input: &[f64]) -> Result<ForwardPass> {
        check_len("input", input, self.input_size)?;
        let input = Matrix::from_array(input)?;
        let hidden = self.activate(&self.weights_input_hidden, &self.bias_hidden, &input)?;
        let output = self.activate(&self.weights_hidden_output, &self.bias_output, &hidden)?;
        Ok(ForwardPass { input, hidden, output })
    }

    /// `f(weights x input + bias)`, mapping the fresh pre-activation in place.
    fn activate(&self, weights: &Matrix, bias: &Matrix, input: &Matrix) -> Result<Matrix> {
        let act = self.activation;
        let mut z = weights.multiply(input)?.add(bias)?;
        z.map_in_place(|x| act.function(x));
        Ok(z)
    }
}

fn check_len(op: &'static str, values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(Error::ShapeMismatch {
            op,
            left: (expected, 1),
            right: (values.len(), 1),
        });
    }
    Ok(())
}

fn expect_shape(op: &'static str, m: &Matrix, expected: (usize, usize)) -> Result<()> {
    if m.shape() != expected {
        return Err(Error::ShapeMismatch {
            op,
            left: expected,
            right: m.shape(),
        });
    }
    Ok(())
}
