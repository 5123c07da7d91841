use serde::{Deserialize, Serialize};

use super::Node;

/// Growth limits for regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Maximum number of splits from root to leaf.
    pub max_depth: usize,
    /// Nodes with fewer rows are not split.
    pub min_samples_split: usize,
    /// Each child of a split keeps at least this many rows.
    pub min_samples_leaf: usize,
    /// Minimum SSE improvement, as a fraction of the root SSE.
    pub complexity: f64,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: 30,
            min_samples_split: 20,
            min_samples_leaf: 7,
            complexity: 0.01,
        }
    }
}

/// Grow a tree on row-major features `x` and targets `y`.
///
/// Returns the node arena with the root at index 0. `x` and `y` must be
/// non-empty and of equal length.
pub fn grow_tree(x: &[Vec<f64>], y: &[f64], options: &TreeOptions) -> Vec<Node> {
    let indices: Vec<usize> = (0..y.len()).collect();
    let root_sse = NodeStats::of(&indices, y).sse();
    let mut grower = Grower {
        x,
        y,
        options,
        min_gain: options.complexity.max(0.0) * root_sse,
        nodes: Vec::new(),
    };
    grower.grow(indices, 0);
    grower.nodes
}

struct Grower<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    options: &'a TreeOptions,
    min_gain: f64,
    nodes: Vec<Node>,
}

impl Grower<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let stats = NodeStats::of(&indices, self.y);
        let slot = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: stats.mean(),
            samples: indices.len(),
        });

        if depth >= self.options.max_depth
            || indices.len() < self.options.min_samples_split.max(2)
        {
            return slot;
        }
        let Some(split) = self.best_split(&indices, &stats) else {
            return slot;
        };
        let gain = stats.sse() - split.sse;
        if gain <= 0.0 || gain < self.min_gain {
            return slot;
        }

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.value(i, split.feature) <= split.threshold);
        let samples = indices.len();
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[slot] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            samples,
        };
        slot
    }

    fn value(&self, row: usize, feature: usize) -> f64 {
        self.x[row].get(feature).copied().unwrap_or(0.0)
    }

    fn best_split(&self, indices: &[usize], parent: &NodeStats) -> Option<BestSplit> {
        let n_features = self.x.first().map(Vec::len).unwrap_or(0);
        let min_leaf = self.options.min_samples_leaf.max(1);
        let mut best: Option<BestSplit> = None;

        for feature in 0..n_features {
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| self.value(a, feature).total_cmp(&self.value(b, feature)));

            let mut left = NodeStats::default();
            for pos in 1..order.len() {
                left.push(self.y[order[pos - 1]]);
                let right_count = order.len() - pos;
                if pos < min_leaf || right_count < min_leaf {
                    continue;
                }
                let lo = self.value(order[pos - 1], feature);
                let hi = self.value(order[pos], feature);
                if lo >= hi {
                    continue;
                }
                let right = parent.minus(&left);
                let sse = left.sse() + right.sse();
                if best.as_ref().is_none_or(|b| sse < b.sse) {
                    best = Some(BestSplit {
                        feature,
                        threshold: lo + (hi - lo) / 2.0,
                        sse,
                    });
                }
            }
        }
        best
    }
}

#[derive(Debug, Clone)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

#[derive(Debug, Clone, Default)]
struct NodeStats {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl NodeStats {
    fn of(indices: &[usize], y: &[f64]) -> Self {
        let mut stats = Self::default();
        for &i in indices {
            stats.push(y[i]);
        }
        stats
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    fn minus(&self, other: &Self) -> Self {
        Self {
            count: self.count - other.count,
            sum: self.sum - other.sum,
            sum_sq: self.sum_sq - other.sum_sq,
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn sse(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum_sq - self.sum * self.sum / self.count as f64).max(0.0)
    }
}
