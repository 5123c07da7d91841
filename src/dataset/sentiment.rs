//! Per-app aggregation of review sentiment scores.

use std::collections::BTreeMap;

use super::loader::RawReview;

/// Mean review sentiment for one app.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentSummary {
    /// Mean polarity in `[-1, 1]`.
    pub polarity: f64,
    /// Mean subjectivity in `[0, 1]`.
    pub subjectivity: f64,
    /// Number of reviews contributing to the means.
    pub reviews: usize,
}

fn parse_score(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Average polarity and subjectivity per app, skipping unscored reviews.
pub fn aggregate_sentiment(rows: &[RawReview]) -> BTreeMap<String, SentimentSummary> {
    let mut sums: BTreeMap<String, (f64, f64, usize)> = BTreeMap::new();
    for row in rows {
        let (Some(polarity), Some(subjectivity)) = (
            parse_score(&row.sentiment_polarity),
            parse_score(&row.sentiment_subjectivity),
        ) else {
            continue;
        };
        let entry = sums.entry(row.app.trim().to_string()).or_default();
        entry.0 += polarity;
        entry.1 += subjectivity;
        entry.2 += 1;
    }
    sums.into_iter()
        .map(|(app, (polarity, subjectivity, count))| {
            let n = count as f64;
            (
                app,
                SentimentSummary {
                    polarity: polarity / n,
                    subjectivity: subjectivity / n,
                    reviews: count,
                },
            )
        })
        .collect()
}
