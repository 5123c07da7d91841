//! Join cleaned apps with their review sentiment into model observations.

use std::collections::BTreeMap;

use tracing::info;

use crate::ml::observation::{Observation, RATING, SENTIMENT_POLARITY, SENTIMENT_SUBJECTIVITY};

use super::clean::App;
use super::sentiment::SentimentSummary;

/// Build one observation per app that has a rating, at least one install,
/// and scored reviews. The target is `ln(installs)`.
pub fn build_observations(
    apps: &[App],
    sentiment: &BTreeMap<String, SentimentSummary>,
) -> Vec<Observation> {
    let observations: Vec<Observation> = apps
        .iter()
        .filter(|app| app.installs > 0.0)
        .filter_map(|app| {
            let rating = app.rating?;
            let summary = sentiment.get(&app.name)?;
            Some(Observation::new(
                app.installs.ln(),
                [
                    (RATING, rating),
                    (SENTIMENT_POLARITY, summary.polarity),
                    (SENTIMENT_SUBJECTIVITY, summary.subjectivity),
                ],
            ))
        })
        .collect();
    info!(
        "Built {} observations from {} apps and {} reviewed apps",
        observations.len(),
        apps.len(),
        sentiment.len()
    );
    observations
}

/// Raw install counts of every cleaned app, for threshold building.
pub fn install_counts(apps: &[App]) -> Vec<f64> {
    apps.iter().map(|app| app.installs).collect()
}
