//! TOML configuration loading and resolution.
//!
//! Configuration errors are fatal: `resolve` must succeed before the first
//! track is processed, so a bad threshold, model path or feature name can
//! never produce silently wrong scores mid-run.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::classifier::{Algorithm, TrackClassifier};
use crate::cuts::CutThresholds;
use crate::features::Feature;
use crate::models::{GbdtModel, ModelBackend, ModelError, NnModel};

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML for the expected schema.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The algorithm selector is not a recognized mode.
    #[error("Unknown algorithm '{0}' (expected none, cut, nn, gbdt or combined)")]
    UnknownAlgorithm(String),
    /// A configured feature name does not exist.
    #[error("Unknown feature name '{0}'")]
    UnknownFeature(String),
    /// A model-based mode was selected without a `[model]` section.
    #[error("Algorithm '{0}' requires a [model] section")]
    MissingModel(String),
    /// Combined mode needs the model kind spelled out.
    #[error("Algorithm 'combined' requires model.kind = \"nn\" or \"gbdt\"")]
    MissingModelKind,
    /// The model artifact failed to load or validate.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The configured feature list does not match the model input width.
    #[error("Model expects {expected} features but {got} are configured")]
    FeatureCount { expected: usize, got: usize },
}

/// Which inference backend a model artifact encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Small neural network.
    Nn,
    /// Boosted decision-tree ensemble.
    Gbdt,
}

/// The `[model]` configuration block.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the JSON model artifact.
    pub path: PathBuf,
    /// Backend kind; implied by the algorithm selector except in combined
    /// mode, where it must be explicit.
    #[serde(default)]
    pub kind: Option<ModelKind>,
    /// Ordered feature names fed to the model.
    #[serde(default = "default_in_features")]
    pub in_features: Vec<String>,
    /// Expected input tensor name; load fails if the artifact disagrees.
    #[serde(default)]
    pub input_name: Option<String>,
    /// Expected output tensor name; load fails if the artifact disagrees.
    #[serde(default)]
    pub output_name: Option<String>,
}

/// Top-level classifier configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierConfig {
    /// Mode selector: none, cut, nn, gbdt or combined. Historical aliases
    /// tfnn/oxnn (nn) and all (combined) are accepted.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Cut thresholds, used by cut and combined modes.
    #[serde(default)]
    pub cuts: CutThresholds,
    /// Model block, required by model-based modes.
    #[serde(default)]
    pub model: Option<ModelConfig>,
}

fn default_algorithm() -> String {
    "none".to_string()
}

/// Feature order of the reference 21-input models.
fn default_in_features() -> Vec<String> {
    [
        "log_chi2",
        "log_chi2rphi",
        "log_chi2rz",
        "log_bendchi2",
        "nstubs",
        "lay1_hits",
        "lay2_hits",
        "lay3_hits",
        "lay4_hits",
        "lay5_hits",
        "lay6_hits",
        "disk1_hits",
        "disk2_hits",
        "disk3_hits",
        "disk4_hits",
        "disk5_hits",
        "rinv",
        "tanl",
        "z0",
        "dtot",
        "ltot",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

impl ClassifierConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the configuration into a ready classifier.
    pub fn resolve(&self) -> Result<TrackClassifier, ConfigError> {
        let selector = self.algorithm.trim().to_ascii_lowercase();
        let (algorithm, feature_order) = match selector.as_str() {
            "none" | "disabled" => (Algorithm::Disabled, Vec::new()),
            "cut" => (Algorithm::CutOnly(self.cuts), Vec::new()),
            "nn" | "tfnn" | "oxnn" => {
                let (model, order) = self.load_model(&selector, Some(ModelKind::Nn))?;
                (Algorithm::ModelOnly(model), order)
            }
            "gbdt" => {
                let (model, order) = self.load_model(&selector, Some(ModelKind::Gbdt))?;
                (Algorithm::ModelOnly(model), order)
            }
            "combined" | "all" => {
                let (model, order) = self.load_model(&selector, None)?;
                (
                    Algorithm::Combined {
                        cuts: self.cuts,
                        model,
                    },
                    order,
                )
            }
            _ => return Err(ConfigError::UnknownAlgorithm(self.algorithm.clone())),
        };
        info!("Classifier resolved with algorithm '{selector}'");
        Ok(TrackClassifier::new(algorithm, feature_order))
    }

    fn load_model(
        &self,
        selector: &str,
        implied_kind: Option<ModelKind>,
    ) -> Result<(ModelBackend, Vec<Feature>), ConfigError> {
        let model_config = self
            .model
            .as_ref()
            .ok_or_else(|| ConfigError::MissingModel(selector.to_string()))?;
        let kind = implied_kind
            .or(model_config.kind)
            .ok_or(ConfigError::MissingModelKind)?;

        let order = resolve_features(&model_config.in_features)?;

        let backend = match kind {
            ModelKind::Nn => ModelBackend::Nn(NnModel::load_json(&model_config.path)?),
            ModelKind::Gbdt => ModelBackend::Gbdt(GbdtModel::load_json(&model_config.path)?),
        };
        backend.check_names(
            model_config.input_name.as_deref(),
            model_config.output_name.as_deref(),
        )?;
        if backend.feature_len() != order.len() {
            return Err(ConfigError::FeatureCount {
                expected: backend.feature_len(),
                got: order.len(),
            });
        }
        info!(
            "Loaded {kind:?} model from {} with {} features",
            model_config.path.display(),
            order.len()
        );
        Ok((backend, order))
    }
}

/// Resolve configured names to features, failing fast on the first unknown
/// name. There is deliberately no zero-default fallback for typos.
pub fn resolve_features(names: &[String]) -> Result<Vec<Feature>, ConfigError> {
    names
        .iter()
        .map(|name| {
            Feature::parse(name).ok_or_else(|| ConfigError::UnknownFeature(name.clone()))
        })
        .collect()
}
