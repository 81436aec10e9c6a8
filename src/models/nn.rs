use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ModelError, ScoreError, default_input_name, default_output_name, sigmoid};

/// One-hidden-layer ReLU network with a sigmoid output, scoring the
/// probability that a track is genuine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NnModel {
    /// Model format version.
    pub model_version: i64,
    /// Number of `f32` values per feature vector.
    pub feature_len: usize,
    /// Declared input tensor name, checked against configuration pins.
    #[serde(default = "default_input_name")]
    pub input_name: String,
    /// Declared output tensor name.
    #[serde(default = "default_output_name")]
    pub output_name: String,
    /// Hidden layer width.
    pub hidden_size: usize,
    /// Row-major `[hidden_size][feature_len]` input weights.
    pub weights1: Vec<f32>,
    /// Hidden biases.
    pub bias1: Vec<f32>,
    /// Output weights, one per hidden unit.
    pub weights2: Vec<f32>,
    /// Output bias.
    pub bias2: f32,
    /// Per-feature standardization mean.
    pub feature_mean: Vec<f32>,
    /// Per-feature standardization deviation.
    pub feature_std: Vec<f32>,
}

impl NnModel {
    /// Load and validate a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_len == 0 {
            return Err(ModelError::Invalid(
                "feature_len must be positive".to_string(),
            ));
        }
        if self.hidden_size == 0 {
            return Err(ModelError::Invalid(
                "hidden_size must be positive".to_string(),
            ));
        }
        if self.weights1.len() != self.feature_len * self.hidden_size {
            return Err(ModelError::Invalid("weights1 length mismatch".to_string()));
        }
        if self.bias1.len() != self.hidden_size {
            return Err(ModelError::Invalid("bias1 length mismatch".to_string()));
        }
        if self.weights2.len() != self.hidden_size {
            return Err(ModelError::Invalid("weights2 length mismatch".to_string()));
        }
        if self.feature_mean.len() != self.feature_len {
            return Err(ModelError::Invalid(
                "feature_mean length mismatch".to_string(),
            ));
        }
        if self.feature_std.len() != self.feature_len {
            return Err(ModelError::Invalid(
                "feature_std length mismatch".to_string(),
            ));
        }
        Ok(())
    }

    /// Evaluate the network on one feature vector.
    pub fn predict(&self, features: &[f32]) -> Result<f32, ScoreError> {
        if features.len() != self.feature_len {
            return Err(ScoreError::FeatureLen {
                expected: self.feature_len,
                got: features.len(),
            });
        }
        let input = self.feature_len;

        let mut normalized = vec![0.0f32; input];
        for i in 0..input {
            let std = self.feature_std[i].max(1e-6);
            normalized[i] = (features[i] - self.feature_mean[i]) / std;
        }

        let mut logit = self.bias2;
        for h in 0..self.hidden_size {
            let mut sum = self.bias1[h];
            let base = h * input;
            for i in 0..input {
                sum += self.weights1[base + i] * normalized[i];
            }
            logit += self.weights2[h] * sum.max(0.0);
        }

        Ok(sigmoid(logit))
    }

    #[cfg(test)]
    pub(crate) fn identity_for_tests(feature_len: usize) -> Self {
        Self {
            model_version: 1,
            feature_len,
            input_name: default_input_name(),
            output_name: default_output_name(),
            hidden_size: 1,
            weights1: vec![0.0; feature_len],
            bias1: vec![0.0],
            weights2: vec![0.0],
            bias2: 0.0,
            feature_mean: vec![0.0; feature_len],
            feature_std: vec![1.0; feature_len],
        }
    }
}
