//! Install-count regression and k-fold bracket-accuracy evaluation.
//!
//! The evaluator is generic over [`cv::Regressor`]; the concrete regressors
//! here are a training-mean baseline, ordinary least squares and a CART
//! regression tree.

pub mod binning;
pub mod cv;
pub mod error;
pub mod folds;
pub mod linear;
pub mod mean;
pub mod observation;
pub mod report;
pub mod tree;

pub use binning::{Bin, ThresholdError, Thresholds, same_bin};
pub use cv::{FnRegressor, FoldResult, Regressor, evaluate, evaluate_parallel};
pub use error::{EvalError, ModelError};
pub use folds::{Folds, make_folds};
pub use linear::{LinearModel, LinearRegression};
pub use mean::MeanRegressor;
pub use observation::Observation;
pub use report::CvReport;
pub use tree::{RegressionTree, TreeModel, TreeOptions};
