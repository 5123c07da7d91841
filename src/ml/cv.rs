//! Cross-validation driver scoring predictions by install bracket.
//!
//! The driver is generic over any [`Regressor`]: it never looks inside the
//! trained model, it only asks for a fit on the training folds and a scalar
//! prediction per held-out row.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::binning::Thresholds;
use super::error::{EvalError, ModelError};
use super::folds::Folds;
use super::observation::Observation;

/// Train/predict capability evaluated by the driver.
pub trait Regressor {
    /// Fitted state produced by [`Regressor::train`].
    type Model;

    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    /// Fit a model on the training slice.
    fn train(&self, training: &[&Observation]) -> Result<Self::Model, ModelError>;

    /// Predict the target for a single observation.
    fn predict(&self, model: &Self::Model, observation: &Observation) -> Result<f64, ModelError>;
}

/// Adapts a trainer closure and a predictor closure into a [`Regressor`].
pub struct FnRegressor<T, P> {
    name: String,
    trainer: T,
    predictor: P,
}

impl<T, P> FnRegressor<T, P> {
    pub fn new<M>(name: impl Into<String>, trainer: T, predictor: P) -> Self
    where
        T: Fn(&[&Observation]) -> Result<M, ModelError>,
        P: Fn(&M, &Observation) -> Result<f64, ModelError>,
    {
        Self {
            name: name.into(),
            trainer,
            predictor,
        }
    }
}

impl<M, T, P> Regressor for FnRegressor<T, P>
where
    T: Fn(&[&Observation]) -> Result<M, ModelError>,
    P: Fn(&M, &Observation) -> Result<f64, ModelError>,
{
    type Model = M;

    fn name(&self) -> &str {
        &self.name
    }

    fn train(&self, training: &[&Observation]) -> Result<M, ModelError> {
        (self.trainer)(training)
    }

    fn predict(&self, model: &M, observation: &Observation) -> Result<f64, ModelError> {
        (self.predictor)(model, observation)
    }
}

/// Bracket-match tally for one held-out fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldResult {
    /// Id of the held-out fold.
    pub fold_index: usize,
    /// Predictions landing in the true install bracket.
    pub correct: usize,
    /// Predictions landing in any other bracket.
    pub incorrect: usize,
}

impl FoldResult {
    /// Number of held-out observations scored.
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Share of bracket matches, `0.0` for an empty fold.
    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.correct as f64 / self.total() as f64
        }
    }
}

/// Run k-fold evaluation sequentially, one fold after another.
pub fn evaluate<R: Regressor>(
    regressor: &R,
    observations: &[Observation],
    folds: &Folds,
    thresholds: &Thresholds,
) -> Result<Vec<FoldResult>, EvalError> {
    check_layout(observations, folds)?;
    let started = Instant::now();
    let mut results = Vec::with_capacity(folds.len());
    for fold in 0..folds.len() {
        results.push(evaluate_fold(regressor, observations, folds, thresholds, fold)?);
    }
    log_summary(regressor.name(), &results, started);
    Ok(results)
}

/// Run k-fold evaluation with one scoped thread per fold.
///
/// Results are reported in fold order. If several folds fail, the error of the
/// lowest fold index is returned.
pub fn evaluate_parallel<R>(
    regressor: &R,
    observations: &[Observation],
    folds: &Folds,
    thresholds: &Thresholds,
) -> Result<Vec<FoldResult>, EvalError>
where
    R: Regressor + Sync,
{
    check_layout(observations, folds)?;
    let started = Instant::now();
    let mut slots: Vec<Option<Result<FoldResult, EvalError>>> = vec![None; folds.len()];
    std::thread::scope(|scope| {
        for (fold, slot) in slots.iter_mut().enumerate() {
            scope.spawn(move || {
                *slot = Some(evaluate_fold(
                    regressor,
                    observations,
                    folds,
                    thresholds,
                    fold,
                ));
            });
        }
    });

    let mut results = Vec::with_capacity(slots.len());
    for (fold, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(outcome) => results.push(outcome?),
            None => {
                return Err(EvalError::InvalidConfiguration(format!(
                    "fold {fold} worker did not report a result"
                )));
            }
        }
    }
    log_summary(regressor.name(), &results, started);
    Ok(results)
}

fn check_layout(observations: &[Observation], folds: &Folds) -> Result<(), EvalError> {
    if folds.len() < 2 {
        return Err(EvalError::InvalidConfiguration(format!(
            "need at least 2 folds, got {}",
            folds.len()
        )));
    }
    folds.validate_partition(observations.len())
}

fn evaluate_fold<R: Regressor>(
    regressor: &R,
    observations: &[Observation],
    folds: &Folds,
    thresholds: &Thresholds,
    fold: usize,
) -> Result<FoldResult, EvalError> {
    let training: Vec<&Observation> = folds
        .training_indices(fold)
        .into_iter()
        .map(|idx| &observations[idx])
        .collect();
    let model = regressor
        .train(&training)
        .map_err(|source| EvalError::TrainingFailure { fold, source })?;

    let mut result = FoldResult {
        fold_index: fold,
        correct: 0,
        incorrect: 0,
    };
    for &index in folds.fold(fold) {
        let observation = &observations[index];
        let predicted = regressor
            .predict(&model, observation)
            .map_err(|source| EvalError::PredictionFailure {
                fold,
                index,
                source,
            })?;
        if thresholds.same_bin(observation.target, predicted) {
            result.correct += 1;
        } else {
            result.incorrect += 1;
        }
    }
    debug!(
        model = regressor.name(),
        fold,
        train = training.len(),
        correct = result.correct,
        incorrect = result.incorrect,
        "fold evaluated"
    );
    Ok(result)
}

fn log_summary(name: &str, results: &[FoldResult], started: Instant) {
    let correct: usize = results.iter().map(|r| r.correct).sum();
    let total: usize = results.iter().map(FoldResult::total).sum();
    info!(
        model = name,
        folds = results.len(),
        correct,
        total,
        dur_ms = started.elapsed().as_millis() as u64,
        "cross-validation finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::folds::make_folds;
    use crate::ml::mean::MeanRegressor;
    use crate::ml::observation::RATING;

    fn uniform_observations(n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| Observation::new(i as f64, [(RATING, 1.0 + (i % 5) as f64)]))
            .collect()
    }

    fn uniform_thresholds() -> Thresholds {
        Thresholds::new((0..10).map(|v| v as f64).collect()).unwrap()
    }

    #[test]
    fn mean_model_scores_every_observation_once() {
        let observations = uniform_observations(10);
        let key: Vec<f64> = observations.iter().map(|o| o.target).collect();
        let folds = make_folds(10, 5, &key, 3).unwrap();
        let results = evaluate(&MeanRegressor, &observations, &folds, &uniform_thresholds()).unwrap();
        assert_eq!(results.len(), 5);
        for (idx, result) in results.iter().enumerate() {
            assert_eq!(result.fold_index, idx);
            assert_eq!(result.total(), 2);
        }
        assert_eq!(results.iter().map(FoldResult::total).sum::<usize>(), 10);
    }

    #[test]
    fn perfect_predictor_scores_all_correct() {
        let observations = uniform_observations(12);
        let key: Vec<f64> = observations.iter().map(|o| o.target).collect();
        let folds = make_folds(12, 3, &key, 0).unwrap();
        let oracle = FnRegressor::new(
            "oracle",
            |_: &[&Observation]| Ok(()),
            |_: &(), obs: &Observation| Ok(obs.target),
        );
        let results = evaluate(&oracle, &observations, &folds, &uniform_thresholds()).unwrap();
        assert!(results.iter().all(|r| r.incorrect == 0));
        assert_eq!(results.iter().map(|r| r.correct).sum::<usize>(), 12);
    }

    #[test]
    fn training_failure_is_fatal() {
        let observations = uniform_observations(6);
        let folds = Folds::from_groups(vec![vec![0, 1, 2], vec![3, 4, 5]]);
        let failing = FnRegressor::new(
            "failing",
            |training: &[&Observation]| {
                if training.iter().any(|o| o.target >= 3.0) {
                    Err(ModelError::SingularDesign)
                } else {
                    Ok(())
                }
            },
            |_: &(), _: &Observation| Ok(0.0),
        );
        let err = evaluate(&failing, &observations, &folds, &uniform_thresholds()).unwrap_err();
        assert_eq!(
            err,
            EvalError::TrainingFailure {
                fold: 0,
                source: ModelError::SingularDesign
            }
        );
    }

    #[test]
    fn prediction_failure_reports_observation_index() {
        let observations = uniform_observations(4);
        let folds = Folds::from_groups(vec![vec![0, 2], vec![1, 3]]);
        let picky = FnRegressor::new(
            "picky",
            |_: &[&Observation]| Ok(()),
            |_: &(), obs: &Observation| {
                if obs.target == 3.0 {
                    Err(ModelError::NonFinitePrediction)
                } else {
                    Ok(obs.target)
                }
            },
        );
        let err = evaluate(&picky, &observations, &folds, &uniform_thresholds()).unwrap_err();
        assert_eq!(
            err,
            EvalError::PredictionFailure {
                fold: 1,
                index: 3,
                source: ModelError::NonFinitePrediction
            }
        );
    }

    #[test]
    fn rejects_folds_that_do_not_partition() {
        let observations = uniform_observations(4);
        let folds = Folds::from_groups(vec![vec![0, 1], vec![2]]);
        assert!(matches!(
            evaluate(&MeanRegressor, &observations, &folds, &uniform_thresholds()),
            Err(EvalError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn parallel_matches_sequential_in_fold_order() {
        let observations = uniform_observations(50);
        let key: Vec<f64> = observations.iter().map(|o| o.target).collect();
        let folds = make_folds(50, 7, &key, 11).unwrap();
        let thresholds = uniform_thresholds();
        let sequential = evaluate(&MeanRegressor, &observations, &folds, &thresholds).unwrap();
        let parallel =
            evaluate_parallel(&MeanRegressor, &observations, &folds, &thresholds).unwrap();
        assert_eq!(sequential, parallel);
        let order: Vec<usize> = parallel.iter().map(|r| r.fold_index).collect();
        assert_eq!(order, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn parallel_reports_lowest_failing_fold() {
        let observations = uniform_observations(9);
        let folds = Folds::from_groups(vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);
        let failing = FnRegressor::new(
            "failing",
            |training: &[&Observation]| {
                if training.iter().any(|o| o.target == 0.0) {
                    Err(ModelError::EmptyTrainingSet)
                } else {
                    Ok(())
                }
            },
            |_: &(), _: &Observation| Ok(0.0),
        );
        let err =
            evaluate_parallel(&failing, &observations, &folds, &uniform_thresholds()).unwrap_err();
        assert!(matches!(err, EvalError::TrainingFailure { fold: 1, .. }));
    }
}
