//! Hand-tuned cut selection.

use serde::Deserialize;

use crate::track::RawTrack;

/// Thresholds for the cut-based genuine-track selection.
///
/// Defaults match the reference tune: 2 GeV, 15 cm, |eta| 2.4, chi2/dof 40,
/// bend chi2 2.4, 4 stubs.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CutThresholds {
    /// Minimum transverse momentum in GeV (inclusive).
    pub min_pt: f32,
    /// Maximum |z0| in cm (exclusive).
    pub max_z0: f32,
    /// Maximum |eta| (exclusive).
    pub max_eta: f32,
    /// Maximum combined chi-squared (exclusive).
    pub max_chi2dof: f32,
    /// Maximum bend chi-squared (exclusive).
    pub max_bendchi2: f32,
    /// Minimum stub count (inclusive).
    pub min_stubs: u32,
}

impl Default for CutThresholds {
    fn default() -> Self {
        Self {
            min_pt: 2.0,
            max_z0: 15.0,
            max_eta: 2.4,
            max_chi2dof: 40.0,
            max_bendchi2: 2.4,
            min_stubs: 4,
        }
    }
}

/// 1.0 if the track passes every cut, else 0.0.
///
/// Comparison strictness is part of the contract: `pt` and stub count are
/// inclusive, everything else exclusive.
pub fn cut_score(track: &RawTrack, cuts: &CutThresholds) -> f32 {
    let pass = track.pt >= cuts.min_pt
        && track.z0.abs() < cuts.max_z0
        && track.eta.abs() < cuts.max_eta
        && track.chi2 < cuts.max_chi2dof
        && track.bendchi2 < cuts.max_bendchi2
        && track.nstubs >= cuts.min_stubs;
    if pass { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::UNEVALUATED_SCORE;

    fn boundary_track() -> RawTrack {
        RawTrack {
            pt: 2.0,
            eta: 2.0,
            z0: 14.9,
            rinv: 0.001,
            tanl: 1.0,
            chi2: 4.9,
            chi2rphi: 1.0,
            chi2rz: 1.0,
            bendchi2: 2.0,
            nstubs: 4,
            hitpattern: 0b0001111,
            mva1: UNEVALUATED_SCORE,
            mva2: UNEVALUATED_SCORE,
            mva3: UNEVALUATED_SCORE,
        }
    }

    fn tight_cuts() -> CutThresholds {
        CutThresholds {
            min_pt: 2.0,
            max_z0: 15.0,
            max_eta: 2.4,
            max_chi2dof: 5.0,
            max_bendchi2: 2.25,
            min_stubs: 4,
        }
    }

    #[test]
    fn boundary_track_passes_at_the_edges() {
        assert_eq!(cut_score(&boundary_track(), &tight_cuts()), 1.0);
    }

    #[test]
    fn inclusive_edges_pass_and_exclusive_edges_fail() {
        let cuts = tight_cuts();

        // pt and stubs are inclusive.
        let mut track = boundary_track();
        track.pt = cuts.min_pt;
        track.nstubs = cuts.min_stubs;
        assert_eq!(cut_score(&track, &cuts), 1.0);

        // z0, eta, chi2 and bendchi2 are exclusive.
        let mut track = boundary_track();
        track.z0 = cuts.max_z0;
        assert_eq!(cut_score(&track, &cuts), 0.0);

        let mut track = boundary_track();
        track.eta = cuts.max_eta;
        assert_eq!(cut_score(&track, &cuts), 0.0);

        let mut track = boundary_track();
        track.chi2 = cuts.max_chi2dof;
        assert_eq!(cut_score(&track, &cuts), 0.0);

        let mut track = boundary_track();
        track.bendchi2 = cuts.max_bendchi2;
        assert_eq!(cut_score(&track, &cuts), 0.0);
    }

    #[test]
    fn score_is_monotonic_in_stub_count() {
        let cuts = tight_cuts();
        let mut previous = 0.0;
        for nstubs in 0..10 {
            let track = RawTrack {
                nstubs,
                ..boundary_track()
            };
            let score = cut_score(&track, &cuts);
            assert!(score >= previous, "score dropped at nstubs {nstubs}");
            previous = score;
        }
    }

    #[test]
    fn negative_z0_and_eta_use_absolute_values() {
        let mut track = boundary_track();
        track.z0 = -14.9;
        track.eta = -2.0;
        assert_eq!(cut_score(&track, &tight_cuts()), 1.0);
        track.z0 = -15.1;
        assert_eq!(cut_score(&track, &tight_cuts()), 0.0);
    }
}
