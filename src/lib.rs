//! Library exports for the report binaries, benchmarks and tests.
/// Location of the config and log directory.
pub mod app_dirs;
/// Experiment settings.
pub mod config;
/// Play Store CSV loading and cleaning.
pub mod dataset;
/// Tracing subscriber setup.
pub mod logging;
/// Regressors and the k-fold bracket-accuracy evaluator.
pub mod ml;
/// End-to-end pipeline shared by the binaries.
pub mod report;
/// Descriptive and bivariate summaries.
pub mod stats;
