//! Aggregation and rendering of per-fold bracket accuracy.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cv::FoldResult;

/// Cross-validation outcome for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvReport {
    /// Configured model name.
    pub model: String,
    /// Per-fold tallies in fold order.
    pub folds: Vec<FoldResult>,
    /// Bracket matches summed over folds.
    pub correct: usize,
    /// Bracket misses summed over folds.
    pub incorrect: usize,
}

impl CvReport {
    /// Sum fold tallies. `results` is expected in fold order.
    pub fn from_results(model: impl Into<String>, results: Vec<FoldResult>) -> Self {
        let correct = results.iter().map(|r| r.correct).sum();
        let incorrect = results.iter().map(|r| r.incorrect).sum();
        Self {
            model: model.into(),
            folds: results,
            correct,
            incorrect,
        }
    }

    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Overall share of bracket matches across all folds.
    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.correct as f64 / self.total() as f64
        }
    }

    /// Per-fold accuracy, in fold order.
    pub fn fold_accuracy(&self) -> Vec<f64> {
        self.folds.iter().map(FoldResult::accuracy).collect()
    }

    /// Mean and (population) standard deviation of the per-fold accuracy.
    pub fn fold_accuracy_spread(&self) -> (f64, f64) {
        let values = self.fold_accuracy();
        if values.is_empty() {
            return (0.0, 0.0);
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        (mean, variance.sqrt())
    }
}

impl fmt::Display for CvReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model: {}", self.model)?;
        writeln!(f, "{:>6} {:>8} {:>10} {:>9}", "fold", "correct", "incorrect", "accuracy")?;
        for fold in &self.folds {
            writeln!(
                f,
                "{:>6} {:>8} {:>10} {:>9.4}",
                fold.fold_index,
                fold.correct,
                fold.incorrect,
                fold.accuracy()
            )?;
        }
        let (mean, std) = self.fold_accuracy_spread();
        writeln!(
            f,
            "{:>6} {:>8} {:>10} {:>9.4}",
            "total",
            self.correct,
            self.incorrect,
            self.accuracy()
        )?;
        write!(f, "fold accuracy: {mean:.4} ± {std:.4}")
    }
}
