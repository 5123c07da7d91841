//! End-to-end report pipeline shared by the binaries.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{ExperimentConfig, ModelKind, ModelSpec};
use crate::dataset::{self, App, DatasetError};
use crate::ml::{
    CvReport, EvalError, Folds, LinearRegression, MeanRegressor, Observation, RegressionTree,
    Regressor, ThresholdError, Thresholds, evaluate, evaluate_parallel, make_folds,
};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("cannot build install brackets: {0}")]
    Thresholds(#[from] ThresholdError),
    #[error("no observations left after cleaning and joining")]
    NoObservations,
    #[error("fold assignment failed: {0}")]
    Folds(#[source] EvalError),
    #[error("model `{model}`: {source}")]
    Model {
        model: String,
        #[source]
        source: EvalError,
    },
}

/// Cleaned inputs ready for exploration and evaluation.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub apps: Vec<App>,
    pub observations: Vec<Observation>,
    pub thresholds: Thresholds,
}

/// Load both exports and run the cleaning pipeline.
pub fn prepare(apps_csv: &Path, reviews_csv: &Path) -> Result<Prepared, ReportError> {
    let raw_apps = dataset::load_apps(apps_csv)?;
    let raw_reviews = dataset::load_reviews(reviews_csv)?;
    let apps = dataset::clean_apps(&raw_apps);
    let sentiment = dataset::aggregate_sentiment(&raw_reviews);
    let observations = dataset::build_observations(&apps, &sentiment);
    if observations.is_empty() {
        return Err(ReportError::NoObservations);
    }
    let thresholds = Thresholds::from_install_counts(dataset::install_counts(&apps))?;
    Ok(Prepared {
        apps,
        observations,
        thresholds,
    })
}

/// Cross-validate every configured model on the same stratified folds.
pub fn run_models(
    prepared: &Prepared,
    config: &ExperimentConfig,
) -> Result<Vec<CvReport>, ReportError> {
    let key: Vec<f64> = prepared.observations.iter().map(|o| o.target).collect();
    let folds = make_folds(key.len(), config.folds, &key, config.seed).map_err(ReportError::Folds)?;
    info!(
        "Evaluating {} models over {} folds (sizes {:?})",
        config.models.len(),
        folds.len(),
        folds.sizes()
    );
    config
        .models
        .iter()
        .map(|spec| {
            run_model(spec, config, prepared, &folds).map_err(|source| ReportError::Model {
                model: spec.name.clone(),
                source,
            })
        })
        .collect()
}

fn run_model(
    spec: &ModelSpec,
    config: &ExperimentConfig,
    prepared: &Prepared,
    folds: &Folds,
) -> Result<CvReport, EvalError> {
    match spec.kind {
        ModelKind::Mean => run_with(&MeanRegressor, spec, config, prepared, folds),
        ModelKind::Linear => run_with(
            &LinearRegression::new(spec.name.clone(), spec.predictors.iter().cloned()),
            spec,
            config,
            prepared,
            folds,
        ),
        ModelKind::Tree => run_with(
            &RegressionTree::new(
                spec.name.clone(),
                spec.predictors.iter().cloned(),
                config.tree.clone(),
            ),
            spec,
            config,
            prepared,
            folds,
        ),
    }
}

fn run_with<R: Regressor + Sync>(
    regressor: &R,
    spec: &ModelSpec,
    config: &ExperimentConfig,
    prepared: &Prepared,
    folds: &Folds,
) -> Result<CvReport, EvalError> {
    let results = if config.parallel {
        evaluate_parallel(regressor, &prepared.observations, folds, &prepared.thresholds)?
    } else {
        evaluate(regressor, &prepared.observations, folds, &prepared.thresholds)?
    };
    Ok(CvReport::from_results(spec.name.clone(), results))
}
