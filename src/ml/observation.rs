use std::collections::BTreeMap;

/// Predictor name for the store star rating.
pub const RATING: &str = "rating";
/// Predictor name for the mean review sentiment polarity.
pub const SENTIMENT_POLARITY: &str = "sentiment_polarity";
/// Predictor name for the mean review sentiment subjectivity.
pub const SENTIMENT_SUBJECTIVITY: &str = "sentiment_subjectivity";

/// Every predictor an [`Observation`] built from the store export carries.
pub const PREDICTORS: [&str; 3] = [RATING, SENTIMENT_POLARITY, SENTIMENT_SUBJECTIVITY];

/// One labeled row: a log-install target and named numeric predictors.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Regression target (`ln(installs)`).
    pub target: f64,
    /// Predictor values keyed by name.
    pub predictors: BTreeMap<String, f64>,
}

impl Observation {
    pub fn new<I, K>(target: f64, predictors: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            target,
            predictors: predictors
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// Look up a predictor by name.
    pub fn predictor(&self, name: &str) -> Option<f64> {
        self.predictors.get(name).copied()
    }
}
