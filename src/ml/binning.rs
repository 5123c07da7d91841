//! Install-bracket binning used to score regression predictions.
//!
//! Predictions are judged "close enough" when they land in the same half-open
//! bracket as the true value. Brackets come from the distinct install counts
//! reported by the store (`1+`, `5+`, `10+`, ...), log-transformed.

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use thiserror::Error;

/// Errors raised when a threshold sequence violates its invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThresholdError {
    /// Fewer than two edges were supplied.
    #[error("threshold sequence needs at least 2 edges, got {0}")]
    TooFewEdges(usize),
    /// An edge is not strictly greater than its predecessor.
    #[error("threshold edge {index} is not strictly increasing")]
    NotIncreasing { index: usize },
    /// An edge is NaN or infinite.
    #[error("threshold edge {index} is not finite")]
    NonFinite { index: usize },
}

/// Bracket a value falls into for a given threshold sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bin {
    /// Strictly below the first edge.
    Below,
    /// `[edges[i], edges[i + 1])`.
    Interval(usize),
    /// `[edges[last], +inf)`.
    Terminal,
}

/// Strictly increasing, finite bin edges (at least two).
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    edges: Vec<f64>,
}

impl Thresholds {
    /// Validate and wrap a sequence of bin edges.
    pub fn new(edges: Vec<f64>) -> Result<Self, ThresholdError> {
        if edges.len() < 2 {
            return Err(ThresholdError::TooFewEdges(edges.len()));
        }
        for (index, edge) in edges.iter().enumerate() {
            if !edge.is_finite() {
                return Err(ThresholdError::NonFinite { index });
            }
            if index > 0 && *edge <= edges[index - 1] {
                return Err(ThresholdError::NotIncreasing { index });
            }
        }
        Ok(Self { edges })
    }

    /// Build edges from raw (untransformed) install counts.
    ///
    /// Distinct positive values are sorted and mapped through `ln`, so the
    /// edges live in the same space as the log-install regression target.
    /// Callers pass the full install distribution, which means held-out rows
    /// also shape the edges.
    pub fn from_install_counts<I>(counts: I) -> Result<Self, ThresholdError>
    where
        I: IntoIterator<Item = f64>,
    {
        let distinct: BTreeSet<OrderedFloat<f64>> = counts
            .into_iter()
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(OrderedFloat)
            .collect();
        Self::new(distinct.into_iter().map(|v| v.0.ln()).collect())
    }

    /// Borrow the validated edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Locate the bracket for `value`, or `None` for NaN.
    pub fn bin_of(&self, value: f64) -> Option<Bin> {
        if value.is_nan() {
            return None;
        }
        let last = self.edges[self.edges.len() - 1];
        if value >= last {
            return Some(Bin::Terminal);
        }
        if value < self.edges[0] {
            return Some(Bin::Below);
        }
        self.edges
            .windows(2)
            .position(|pair| pair[0] <= value && value < pair[1])
            .map(Bin::Interval)
    }

    /// Whether `a` and `b` land in the same bracket.
    pub fn same_bin(&self, a: f64, b: f64) -> bool {
        match (self.bin_of(a), self.bin_of(b)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

/// Free-function form of [`Thresholds::same_bin`].
pub fn same_bin(a: f64, b: f64, thresholds: &Thresholds) -> bool {
    thresholds.same_bin(a, b)
}
