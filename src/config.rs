//! Experiment configuration loaded from `playlens.toml`.
//!
//! ```toml
//! folds = 10
//! seed = 42
//! parallel = false
//!
//! [tree]
//! max_depth = 30
//! min_samples_split = 20
//!
//! [[models]]
//! name = "lm-full"
//! kind = "linear"
//! predictors = ["rating", "sentiment_polarity", "sentiment_subjectivity"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::ml::observation::{PREDICTORS, RATING};
use crate::ml::tree::TreeOptions;

/// File name looked up inside the `.playlens` directory.
pub const CONFIG_FILE_NAME: &str = "playlens.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Regressor family used for a configured model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Mean,
    Linear,
    Tree,
}

/// One model to cross-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub kind: ModelKind,
    #[serde(default)]
    pub predictors: Vec<String>,
}

impl ModelSpec {
    fn new(name: &str, kind: ModelKind, predictors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            predictors: predictors.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Cross-validation settings and the models to compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub folds: usize,
    pub seed: u64,
    pub parallel: bool,
    pub tree: TreeOptions,
    pub models: Vec<ModelSpec>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            seed: 42,
            parallel: false,
            tree: TreeOptions::default(),
            models: vec![
                ModelSpec::new("mean", ModelKind::Mean, &[]),
                ModelSpec::new("lm-rating", ModelKind::Linear, &[RATING]),
                ModelSpec::new("lm-full", ModelKind::Linear, &PREDICTORS),
                ModelSpec::new("tree", ModelKind::Tree, &PREDICTORS),
            ],
        }
    }
}

impl ExperimentConfig {
    /// Parse and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else `.playlens/playlens.toml` when present,
    /// else the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject settings the evaluator or regressors cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folds < 2 {
            return Err(ConfigError::Invalid(format!(
                "folds must be at least 2, got {}",
                self.folds
            )));
        }
        if self.models.is_empty() {
            return Err(ConfigError::Invalid("no models configured".to_string()));
        }
        for model in &self.models {
            if model.kind != ModelKind::Mean && model.predictors.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "model `{}` needs at least one predictor",
                    model.name
                )));
            }
            if let Some(unknown) = model
                .predictors
                .iter()
                .find(|p| !PREDICTORS.contains(&p.as_str()))
            {
                return Err(ConfigError::Invalid(format!(
                    "model `{}` uses unknown predictor `{unknown}` (known: {})",
                    model.name,
                    PREDICTORS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    let dir = app_dirs::app_root_dir().ok()?;
    Some(dir.join(CONFIG_FILE_NAME))
}
