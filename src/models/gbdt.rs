use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ModelError, ScoreError, default_input_name, default_output_name, sigmoid};

/// Single-node decision tree used as a weak learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stump {
    /// Feature index used for the split.
    pub feature_index: u16,
    /// Threshold in feature units.
    pub threshold: f32,
    /// Response for `feature <= threshold`.
    pub left_value: f32,
    /// Response for `feature > threshold`.
    pub right_value: f32,
}

impl Stump {
    /// Response of the stump for a feature vector.
    ///
    /// A NaN feature fails the `<=` comparison and takes the right branch,
    /// which keeps scoring deterministic for sentinel feature values.
    pub fn response(&self, features: &[f32]) -> f32 {
        let value = features
            .get(usize::from(self.feature_index))
            .copied()
            .unwrap_or(0.0);
        if value <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Outcome of one GBDT evaluation: predicted class plus both class
/// probabilities, mirroring the tree-ensemble output contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbdtPrediction {
    /// 1 for genuine, 0 for fake.
    pub class: u32,
    /// Probability of the fake class.
    pub p_fake: f32,
    /// Probability of the genuine class; this is the score written back.
    pub p_genuine: f32,
}

/// Binary gradient-boosted stump ensemble scoring genuine vs. fake tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtModel {
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
    /// Learning rate applied to each stump response.
    pub learning_rate: f32,
    /// Initial raw logit before boosting rounds.
    pub init_raw: f32,
    /// Boosting rounds in evaluation order.
    pub stumps: Vec<Stump>,
}

impl GbdtModel {
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
        if !self.learning_rate.is_finite() {
            return Err(ModelError::Invalid(
                "learning_rate must be finite".to_string(),
            ));
        }
        for (round, stump) in self.stumps.iter().enumerate() {
            if usize::from(stump.feature_index) >= self.feature_len {
                return Err(ModelError::Invalid(format!(
                    "Round {round} splits on feature {} but feature_len is {}",
                    stump.feature_index, self.feature_len
                )));
            }
        }
        Ok(())
    }

    /// Raw boosted logit for a feature vector.
    fn raw_logit(&self, features: &[f32]) -> f32 {
        let mut raw = self.init_raw;
        for stump in &self.stumps {
            raw += self.learning_rate * stump.response(features);
        }
        raw
    }

    /// Evaluate the ensemble on one feature vector.
    pub fn predict(&self, features: &[f32]) -> Result<GbdtPrediction, ScoreError> {
        if features.len() != self.feature_len {
            return Err(ScoreError::FeatureLen {
                expected: self.feature_len,
                got: features.len(),
            });
        }
        let p_genuine = sigmoid(self.raw_logit(features));
        Ok(GbdtPrediction {
            class: u32::from(p_genuine >= 0.5),
            p_fake: 1.0 - p_genuine,
            p_genuine,
        })
    }
}
