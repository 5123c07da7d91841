//! CART-style regression tree.
//!
//! Splits minimise the summed squared error of the two children. Growth stops
//! on depth, node size, or when the best split improves the fit by less than
//! `complexity` times the root error.

mod train;

use serde::{Deserialize, Serialize};

pub use train::{TreeOptions, grow_tree};

use super::cv::Regressor;
use super::error::ModelError;
use super::observation::Observation;

/// Node in a fitted tree, stored in an arena indexed by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        value: f64,
        samples: usize,
    },
    Split {
        /// Index into [`TreeModel::predictors`].
        feature: usize,
        /// Rows with `feature <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
        samples: usize,
    },
}

/// Fitted regression tree. The root is `nodes[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeModel {
    pub predictors: Vec<String>,
    pub nodes: Vec<Node>,
}

impl TreeModel {
    /// Walk the tree for a feature vector aligned with `predictors`.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Predict for an observation, resolving predictors by name.
    pub fn predict(&self, observation: &Observation) -> Result<f64, ModelError> {
        let features = feature_row(observation, &self.predictors)?;
        Ok(self.predict_row(&features))
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Regression tree over a fixed, ordered list of predictors.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    name: String,
    predictors: Vec<String>,
    options: TreeOptions,
}

impl RegressionTree {
    pub fn new<I, S>(name: impl Into<String>, predictors: I, options: TreeOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            predictors: predictors.into_iter().map(Into::into).collect(),
            options,
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn fit(&self, training: &[&Observation]) -> Result<TreeModel, ModelError> {
        if training.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let mut x = Vec::with_capacity(training.len());
        let mut y = Vec::with_capacity(training.len());
        for observation in training {
            x.push(feature_row(observation, &self.predictors)?);
            y.push(observation.target);
        }
        let nodes = grow_tree(&x, &y, &self.options);
        Ok(TreeModel {
            predictors: self.predictors.clone(),
            nodes,
        })
    }
}

impl Regressor for RegressionTree {
    type Model = TreeModel;

    fn name(&self) -> &str {
        &self.name
    }

    fn train(&self, training: &[&Observation]) -> Result<TreeModel, ModelError> {
        self.fit(training)
    }

    fn predict(&self, model: &TreeModel, observation: &Observation) -> Result<f64, ModelError> {
        model.predict(observation)
    }
}

fn feature_row(observation: &Observation, predictors: &[String]) -> Result<Vec<f64>, ModelError> {
    predictors
        .iter()
        .map(|name| {
            observation
                .predictor(name)
                .ok_or_else(|| ModelError::MissingPredictor(name.clone()))
        })
        .collect()
}
