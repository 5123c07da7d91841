//! Seeded, stratified k-fold assignment.

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};

use super::error::EvalError;

/// Disjoint held-out index groups, indexed by fold id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folds {
    groups: Vec<Vec<usize>>,
}

impl Folds {
    /// Wrap explicit index groups. Indices inside each group are sorted.
    pub fn from_groups(mut groups: Vec<Vec<usize>>) -> Self {
        for group in &mut groups {
            group.sort_unstable();
        }
        Self { groups }
    }

    /// Number of folds.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Held-out indices of one fold.
    pub fn fold(&self, fold: usize) -> &[usize] {
        &self.groups[fold]
    }

    /// Iterate folds in id order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.groups.iter().map(Vec::as_slice)
    }

    /// Sizes of every fold, in id order.
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Indices used for training when `fold` is held out.
    pub fn training_indices(&self, fold: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != fold)
            .flat_map(|(_, group)| group.iter().copied())
            .collect();
        out.sort_unstable();
        out
    }

    /// Check that the folds partition `0..n` exactly.
    pub fn validate_partition(&self, n: usize) -> Result<(), EvalError> {
        let mut seen = vec![false; n];
        for (fold, group) in self.groups.iter().enumerate() {
            for &idx in group {
                if idx >= n {
                    return Err(EvalError::InvalidConfiguration(format!(
                        "fold {fold} references observation {idx} but only {n} exist"
                    )));
                }
                if seen[idx] {
                    return Err(EvalError::InvalidConfiguration(format!(
                        "observation {idx} is assigned to more than one fold"
                    )));
                }
                seen[idx] = true;
            }
        }
        if let Some(missing) = seen.iter().position(|assigned| !assigned) {
            return Err(EvalError::InvalidConfiguration(format!(
                "observation {missing} is not assigned to any fold"
            )));
        }
        Ok(())
    }
}

/// Split `n` observations into `k` stratified folds.
///
/// Indices are ordered by their stratification value (ties broken by a seeded
/// hash), then dealt out chunk by chunk: each run of `k` consecutive indices
/// receives a seeded permutation of the fold ids. Every fold therefore draws
/// from the whole value range and sizes differ by at most one.
pub fn make_folds(
    n: usize,
    k: usize,
    stratify_by: &[f64],
    seed: u64,
) -> Result<Folds, EvalError> {
    if k < 2 || k > n {
        return Err(EvalError::InvalidConfiguration(format!(
            "fold count must be in [2, {n}], got {k}"
        )));
    }
    if stratify_by.len() != n {
        return Err(EvalError::InvalidConfiguration(format!(
            "stratification key has {} values for {n} observations",
            stratify_by.len()
        )));
    }
    if let Some(idx) = stratify_by.iter().position(|v| v.is_nan()) {
        return Err(EvalError::InvalidConfiguration(format!(
            "stratification value {idx} is NaN"
        )));
    }
    let distinct: BTreeSet<OrderedFloat<f64>> =
        stratify_by.iter().copied().map(OrderedFloat).collect();
    if distinct.len() < k {
        return Err(EvalError::InvalidConfiguration(format!(
            "need at least {k} distinct stratification values, got {}",
            distinct.len()
        )));
    }

    let mut order: Vec<(OrderedFloat<f64>, u128, usize)> = stratify_by
        .iter()
        .enumerate()
        .map(|(idx, &value)| (OrderedFloat(value), tie_break_key(seed, idx), idx))
        .collect();
    order.sort_unstable();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut fold_ids: Vec<usize> = (0..k).collect();
    let mut groups = vec![Vec::with_capacity(n / k + 1); k];
    for chunk in order.chunks(k) {
        fold_ids.shuffle(&mut rng);
        for (&(_, _, idx), &fold) in chunk.iter().zip(fold_ids.iter()) {
            groups[fold].push(idx);
        }
    }
    Ok(Folds::from_groups(groups))
}

fn tie_break_key(seed: u64, idx: usize) -> u128 {
    let hash = blake3::hash(format!("{seed}|{idx}").as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash.as_bytes()[0..16]);
    u128::from_le_bytes(bytes)
}
