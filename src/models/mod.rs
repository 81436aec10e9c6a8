//! Model inference backends for track classification.
//!
//! Both backends are lightweight binary classifiers loaded from versioned
//! JSON artifacts and validated once at startup; the per-track path is pure
//! arithmetic over a feature slice.

mod gbdt;
mod nn;

pub use gbdt::{GbdtModel, GbdtPrediction, Stump};
pub use nn::NnModel;

use std::path::PathBuf;

use thiserror::Error;

/// Errors while loading or validating a model artifact. Fatal at startup.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model file could not be read.
    #[error("Failed to read model file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The model file is not valid JSON for the expected schema.
    #[error("Failed to parse model file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A structural invariant of the model does not hold.
    #[error("Invalid model: {0}")]
    Invalid(String),
    /// The artifact declares a different input name than configured.
    #[error("Model declares input '{found}' but configuration expects '{expected}'")]
    InputNameMismatch { expected: String, found: String },
    /// The artifact declares a different output name than configured.
    #[error("Model declares output '{found}' but configuration expects '{expected}'")]
    OutputNameMismatch { expected: String, found: String },
}

/// Per-track scoring failure; the dispatcher recovers it with the sentinel
/// score and continues.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The feature vector does not match the model input width.
    #[error("Feature vector has {got} values but the model expects {expected}")]
    FeatureLen { expected: usize, got: usize },
}

/// A loaded inference backend.
#[derive(Debug, Clone)]
pub enum ModelBackend {
    /// Boosted decision-tree ensemble.
    Gbdt(GbdtModel),
    /// Small feed-forward neural network.
    Nn(NnModel),
}

impl ModelBackend {
    /// Input width the backend expects.
    pub fn feature_len(&self) -> usize {
        match self {
            Self::Gbdt(model) => model.feature_len,
            Self::Nn(model) => model.feature_len,
        }
    }

    /// Score one feature vector, returning the genuine-track probability.
    pub fn score(&self, features: &[f32]) -> Result<f32, ScoreError> {
        match self {
            Self::Gbdt(model) => model.predict(features).map(|p| p.p_genuine),
            Self::Nn(model) => model.predict(features),
        }
    }

    /// Check the artifact's declared tensor names against configured pins.
    pub fn check_names(
        &self,
        expected_input: Option<&str>,
        expected_output: Option<&str>,
    ) -> Result<(), ModelError> {
        let (input, output) = match self {
            Self::Gbdt(model) => (model.input_name.as_str(), model.output_name.as_str()),
            Self::Nn(model) => (model.input_name.as_str(), model.output_name.as_str()),
        };
        if let Some(expected) = expected_input {
            if expected != input {
                return Err(ModelError::InputNameMismatch {
                    expected: expected.to_string(),
                    found: input.to_string(),
                });
            }
        }
        if let Some(expected) = expected_output {
            if expected != output {
                return Err(ModelError::OutputNameMismatch {
                    expected: expected.to_string(),
                    found: output.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logistic squashing of a raw logit into a probability.
pub(crate) fn sigmoid(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}

pub(crate) fn default_input_name() -> String {
    "feature_input".to_string()
}

pub(crate) fn default_output_name() -> String {
    "probability".to_string()
}
