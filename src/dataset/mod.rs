//! Play Store export loading and cleaning.
//!
//! Each stage takes the previous stage's output by reference and returns a new
//! value: raw CSV rows, typed apps, per-app sentiment, and finally the
//! observations fed to the evaluator.

pub mod clean;
pub mod loader;
pub mod observations;
pub mod sentiment;

pub use clean::{App, clean_apps};
pub use loader::{DatasetError, RawApp, RawReview, load_apps, load_reviews};
pub use observations::{build_observations, install_counts};
pub use sentiment::{SentimentSummary, aggregate_sentiment};
