use thiserror::Error;

/// Failures raised by a regressor while fitting or predicting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// No rows were given to fit on.
    #[error("training slice is empty")]
    EmptyTrainingSet,
    /// A named predictor is absent from an observation.
    #[error("observation is missing predictor `{0}`")]
    MissingPredictor(String),
    /// Fewer rows than coefficients to estimate.
    #[error("need at least {required} rows to fit, got {rows}")]
    InsufficientRows { rows: usize, required: usize },
    /// The normal equations have no unique solution.
    #[error("design matrix is singular")]
    SingularDesign,
    /// The fitted model evaluated to NaN or infinity.
    #[error("model produced a non-finite prediction")]
    NonFinitePrediction,
}

/// Terminal failures of a cross-validation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// Fold count, fold layout, or stratification input is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The trainer rejected a fold's training slice.
    #[error("training failed on fold {fold}: {source}")]
    TrainingFailure {
        /// Held-out fold whose training slice was rejected.
        fold: usize,
        #[source]
        source: ModelError,
    },
    /// The predictor rejected a held-out observation.
    #[error("prediction failed on fold {fold} for observation {index}: {source}")]
    PredictionFailure {
        fold: usize,
        /// Index of the observation in the evaluated slice.
        index: usize,
        #[source]
        source: ModelError,
    },
}
