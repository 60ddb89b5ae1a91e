pub struct MaeLoss;

impl MaeLoss {
    /// Scalar MAE: mean(|expected - predicted|). Zero for empty input.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        let n = predicted.len() as f64;
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, y)| (y - p).abs())
            .sum::<f64>()
            / n
    }
}
