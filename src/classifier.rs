//! Per-track classification dispatch.
//!
//! One `TrackClassifier` serves one worker; tracks are scored sequentially
//! and independently, and a failure on one track never blocks the rest of
//! the event.

use tracing::warn;

use crate::cuts::{CutThresholds, cut_score};
use crate::features::{self, Feature, FeatureDiagnostics};
use crate::hitpattern;
use crate::models::ModelBackend;
use crate::track::{RawTrack, UNEVALUATED_SCORE};

/// Active scoring strategy, fixed for the lifetime of a classifier.
#[derive(Debug, Clone)]
pub enum Algorithm {
    /// Write the unevaluated sentinel to every track.
    Disabled,
    /// Cut-based selection only.
    CutOnly(CutThresholds),
    /// Model inference only.
    ModelOnly(ModelBackend),
    /// Run both, model score to `mva1` and cut score to `mva2`.
    Combined {
        cuts: CutThresholds,
        model: ModelBackend,
    },
}

/// Counters exposed after an event for observability.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierDiagnostics {
    /// Tracks seen by `score_track`.
    pub tracks_scored: u64,
    /// Tracks that received the sentinel because scoring failed.
    pub score_failures: u64,
    /// Anomalies seen while building features.
    pub features: FeatureDiagnostics,
}

/// Scores tracks according to the configured algorithm and writes the
/// result(s) back onto each track.
#[derive(Debug)]
pub struct TrackClassifier {
    algorithm: Algorithm,
    feature_order: Vec<Feature>,
    diagnostics: ClassifierDiagnostics,
}

impl TrackClassifier {
    /// Build a classifier from a resolved algorithm and feature order.
    ///
    /// `feature_order` is only consulted by model-based algorithms; cut-only
    /// and disabled classifiers may pass an empty order.
    pub fn new(algorithm: Algorithm, feature_order: Vec<Feature>) -> Self {
        Self {
            algorithm,
            feature_order,
            diagnostics: ClassifierDiagnostics::default(),
        }
    }

    /// Diagnostics accumulated so far.
    pub fn diagnostics(&self) -> &ClassifierDiagnostics {
        &self.diagnostics
    }

    /// Score every track of an event in order.
    pub fn score_event(&mut self, tracks: &mut [RawTrack]) {
        for track in tracks {
            self.score_track(track);
        }
    }

    /// Score one track, writing to its score slots.
    pub fn score_track(&mut self, track: &mut RawTrack) {
        self.diagnostics.tracks_scored += 1;
        match &self.algorithm {
            Algorithm::Disabled => track.mva1 = UNEVALUATED_SCORE,
            Algorithm::CutOnly(cuts) => track.mva1 = cut_score(track, cuts),
            Algorithm::ModelOnly(model) => {
                track.mva1 =
                    model_score(model, &self.feature_order, &mut self.diagnostics, track);
            }
            Algorithm::Combined { cuts, model } => {
                track.mva1 =
                    model_score(model, &self.feature_order, &mut self.diagnostics, track);
                track.mva2 = cut_score(track, cuts);
            }
        }
    }
}

/// Expand, build features and run inference for one track. The feature
/// vector is allocated per call; nothing is shared across tracks.
fn model_score(
    model: &ModelBackend,
    order: &[Feature],
    diagnostics: &mut ClassifierDiagnostics,
    track: &RawTrack,
) -> f32 {
    let expansion = hitpattern::expand(track.hitpattern, track.eta);
    let set = features::build_features(track, &expansion, &mut diagnostics.features);
    let vector = set.select_ordered(order);
    match model.score(&vector) {
        Ok(score) => score,
        Err(err) => {
            diagnostics.score_failures += 1;
            warn!("Track scoring failed, assigning sentinel: {err}");
            UNEVALUATED_SCORE
        }
    }
}
