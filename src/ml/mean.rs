//! Training-mean baseline.

use super::cv::Regressor;
use super::error::ModelError;
use super::observation::Observation;

/// Predicts the mean target of its training slice for every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanRegressor;

impl Regressor for MeanRegressor {
    type Model = f64;

    fn name(&self) -> &str {
        "mean"
    }

    fn train(&self, training: &[&Observation]) -> Result<f64, ModelError> {
        if training.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let sum: f64 = training.iter().map(|o| o.target).sum();
        Ok(sum / training.len() as f64)
    }

    fn predict(&self, model: &f64, _observation: &Observation) -> Result<f64, ModelError> {
        Ok(*model)
    }
}
