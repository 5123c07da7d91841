//! Ordinary least squares with an intercept.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::cv::Regressor;
use super::error::ModelError;
use super::observation::Observation;

const PIVOT_TOLERANCE: f64 = 1e-10;

/// Linear regression over a fixed, ordered list of predictors.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    name: String,
    predictors: Vec<String>,
}

/// Fitted OLS coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Predictor names, aligned with `coefficients`.
    pub predictors: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    /// Evaluate the fitted hyperplane for one observation.
    pub fn predict(&self, observation: &Observation) -> Result<f64, ModelError> {
        let mut value = self.intercept;
        for (name, coefficient) in self.predictors.iter().zip(&self.coefficients) {
            let x = observation
                .predictor(name)
                .ok_or_else(|| ModelError::MissingPredictor(name.clone()))?;
            value += coefficient * x;
        }
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ModelError::NonFinitePrediction)
        }
    }
}

impl LinearRegression {
    pub fn new<I, S>(name: impl Into<String>, predictors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            predictors: predictors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    /// Fit coefficients by solving the normal equations `XᵀX β = Xᵀy`.
    pub fn fit(&self, training: &[&Observation]) -> Result<LinearModel, ModelError> {
        if training.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let cols = self.predictors.len() + 1;
        if training.len() < cols {
            return Err(ModelError::InsufficientRows {
                rows: training.len(),
                required: cols,
            });
        }
        let (x, y) = design_matrix(training, &self.predictors)?;
        let xtx = x.t().dot(&x);
        let xty = x.t().dot(&y);
        let beta = solve(xtx, xty)?;
        Ok(LinearModel {
            predictors: self.predictors.clone(),
            intercept: beta[0],
            coefficients: beta.iter().skip(1).copied().collect(),
        })
    }
}

impl Regressor for LinearRegression {
    type Model = LinearModel;

    fn name(&self) -> &str {
        &self.name
    }

    fn train(&self, training: &[&Observation]) -> Result<LinearModel, ModelError> {
        self.fit(training)
    }

    fn predict(&self, model: &LinearModel, observation: &Observation) -> Result<f64, ModelError> {
        model.predict(observation)
    }
}

fn design_matrix(
    rows: &[&Observation],
    predictors: &[String],
) -> Result<(Array2<f64>, Array1<f64>), ModelError> {
    let mut x = Array2::<f64>::ones((rows.len(), predictors.len() + 1));
    let mut y = Array1::<f64>::zeros(rows.len());
    for (i, observation) in rows.iter().enumerate() {
        y[i] = observation.target;
        for (j, name) in predictors.iter().enumerate() {
            x[[i, j + 1]] = observation
                .predictor(name)
                .ok_or_else(|| ModelError::MissingPredictor(name.clone()))?;
        }
    }
    Ok((x, y))
}

/// Gaussian elimination with partial pivoting on a square system.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let n = b.len();
    let scale = a
        .diag()
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot_row, col]].abs() <= PIVOT_TOLERANCE * scale {
            return Err(ModelError::SingularDesign);
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::SingularDesign);
    }
    Ok(x)
}
