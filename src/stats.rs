//! Descriptive and bivariate summaries for exploring the export.

use std::collections::BTreeMap;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::dataset::App;
use crate::ml::observation::{Observation, PREDICTORS};

/// Five-number-style summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator); `0` for one value.
    pub std: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Summarise finite values; `None` if there are none.
pub fn describe(values: &[f64]) -> Option<Describe> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by_key(|v| OrderedFloat(*v));
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64).sqrt()
    } else {
        0.0
    };
    Some(Describe {
        count,
        mean,
        std,
        min: sorted[0],
        median: median_of_sorted(&sorted),
        max: sorted[count - 1],
    })
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Pearson correlation; `None` with fewer than two points or zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let moments = Moments::of(x, y)?;
    let denom = (moments.sxx * moments.syy).sqrt();
    (denom > 0.0).then(|| moments.sxy / denom)
}

/// Least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimpleFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Fit a one-predictor line; `None` with fewer than two points or constant `x`.
pub fn simple_fit(x: &[f64], y: &[f64]) -> Option<SimpleFit> {
    let moments = Moments::of(x, y)?;
    if moments.sxx <= 0.0 {
        return None;
    }
    let slope = moments.sxy / moments.sxx;
    let intercept = moments.mean_y - slope * moments.mean_x;
    let r_squared = if moments.syy > 0.0 {
        (moments.sxy * moments.sxy) / (moments.sxx * moments.syy)
    } else {
        1.0
    };
    Some(SimpleFit {
        slope,
        intercept,
        r_squared,
        n: moments.n,
    })
}

struct Moments {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl Moments {
    fn of(x: &[f64], y: &[f64]) -> Option<Self> {
        let n = x.len().min(y.len());
        if n < 2 {
            return None;
        }
        let (x, y) = (&x[..n], &y[..n]);
        let mean_x = x.iter().sum::<f64>() / n as f64;
        let mean_y = y.iter().sum::<f64>() / n as f64;
        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for (a, b) in x.iter().zip(y) {
            let dx = a - mean_x;
            let dy = b - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        Some(Self {
            n,
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
        })
    }
}

/// Relationship between one predictor and the log-install target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BivariateRow {
    pub predictor: String,
    pub correlation: Option<f64>,
    pub fit: Option<SimpleFit>,
}

/// One row per known predictor, against the observation target.
pub fn bivariate_table(observations: &[Observation]) -> Vec<BivariateRow> {
    PREDICTORS
        .iter()
        .map(|&name| {
            let (x, y): (Vec<f64>, Vec<f64>) = observations
                .iter()
                .filter_map(|o| o.predictor(name).map(|v| (v, o.target)))
                .unzip();
            BivariateRow {
                predictor: name.to_string(),
                correlation: pearson(&x, &y),
                fit: simple_fit(&x, &y),
            }
        })
        .collect()
}

/// Install summary for one store category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub apps: usize,
    /// Median of `ln(installs)` over apps with at least one install.
    pub median_log_installs: f64,
}

/// Per-category app count and median log installs, highest median first.
pub fn category_summary(apps: &[App]) -> Vec<CategoryRow> {
    let mut by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for app in apps.iter().filter(|app| app.installs > 0.0) {
        by_category
            .entry(app.category.as_str())
            .or_default()
            .push(app.installs.ln());
    }
    let mut rows: Vec<CategoryRow> = by_category
        .into_iter()
        .map(|(category, mut values)| {
            values.sort_by_key(|v| OrderedFloat(*v));
            CategoryRow {
                category: category.to_string(),
                apps: values.len(),
                median_log_installs: median_of_sorted(&values),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.median_log_installs
            .total_cmp(&a.median_log_installs)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

impl fmt::Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean={:.3} sd={:.3} min={:.3} median={:.3} max={:.3}",
            self.count, self.mean, self.std, self.min, self.median, self.max
        )
    }
}

impl fmt::Display for BivariateRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self
            .correlation
            .map(|v| format!("{v:+.4}"))
            .unwrap_or_else(|| "n/a".to_string());
        match &self.fit {
            Some(fit) => write!(
                f,
                "{:<24} r={:>8} slope={:+.4} intercept={:.4} r2={:.4} n={}",
                self.predictor, r, fit.slope, fit.intercept, fit.r_squared, fit.n
            ),
            None => write!(f, "{:<24} r={:>8} fit=n/a", self.predictor, r),
        }
    }
}
