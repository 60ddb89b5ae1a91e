use rand::Rng;

use crate::error::{Error, Result};
use crate::loss::mae::MaeLoss;
use crate::network::network::Network;

/// A fixed table of (input, target) examples with uniform widths.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

impl Dataset {
    /// Pairs `inputs[i]` with `targets[i]`. Both lists must be non-empty, of
    /// equal length, and every row must match the width of the first one.
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Dataset> {
        if inputs.is_empty() {
            return Err(Error::InvalidShape { rows: 0, cols: 0 });
        }
        if inputs.len() != targets.len() {
            return Err(Error::ShapeMismatch {
                op: "dataset",
                left: (inputs.len(), 1),
                right: (targets.len(), 1),
            });
        }
        check_widths("dataset inputs", &inputs)?;
        check_widths("dataset targets", &targets)?;
        Ok(Dataset { inputs, targets })
    }

    /// The four XOR pairs: `[1,1]->0`, `[1,0]->1`, `[0,1]->1`, `[0,0]->0`.
    pub fn xor() -> Dataset {
        Dataset {
            inputs: vec![
                vec![1.0, 1.0],
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.0, 0.0],
            ],
            targets: vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.inputs[0].len()
    }

    pub fn output_size(&self) -> usize {
        self.targets[0].len()
    }

    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    pub fn targets(&self) -> &[Vec<f64>] {
        &self.targets
    }

    /// Draws one example uniformly at random, with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (&[f64], &[f64]) {
        let i = rng.gen_range(0..self.inputs.len());
        (&self.inputs[i], &self.targets[i])
    }

    /// Network output for every example, in dataset order. The network's
    /// input and output sizes must match the dataset's widths.
    pub fn predictions(&self, network: &Network) -> Result<Vec<Vec<f64>>> {
        self.check_network(network)?;
        self.inputs
            .iter()
            .map(|input| -> Result<Vec<f64>> {
                Ok(network.predict(input)?.as_slice().to_vec())
            })
            .collect()
    }

    /// Mean of `|target - prediction|` over every output of every example.
    pub fn mean_absolute_error(&self, network: &Network) -> Result<f64> {
        let predictions = self.predictions(network)?;
        Ok(mean_absolute_error(&predictions, &self.targets))
    }

    fn check_network(&self, network: &Network) -> Result<()> {
        if network.input_size() != self.input_size() {
            return Err(Error::ShapeMismatch {
                op: "dataset inputs",
                left: (self.input_size(), 1),
                right: (network.input_size(), 1),
            });
        }
        if network.output_size() != self.output_size() {
            return Err(Error::ShapeMismatch {
                op: "dataset targets",
                left: (self.output_size(), 1),
                right: (network.output_size(), 1),
            });
        }
        Ok(())
    }
}

pub(crate) fn mean_absolute_error(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    let predicted: Vec<f64> = predictions.iter().flatten().copied().collect();
    let expected: Vec<f64> = targets.iter().flatten().copied().collect();
    MaeLoss::loss(&predicted, &expected)
}

fn check_widths(op: &'static str, rows: &[Vec<f64>]) -> Result<()> {
    let width = rows[0].len();
    if width == 0 {
        return Err(Error::InvalidShape { rows: rows.len(), cols: 0 });
    }
    match rows.iter().find(|row| row.len() != width) {
        Some(row) => Err(Error::ShapeMismatch {
            op,
            left: (width, 1),
            right: (row.len(), 1),
        }),
        None => Ok(()),
    }
}
