use serde::{Deserialize, Serialize};

/// Score-slot value meaning "not evaluated".
///
/// Distinct from any legitimate score, which always lands in `[0, 1]`.
pub const UNEVALUATED_SCORE: f32 = -999.0;

/// Fitted track candidate as produced by the upstream track finder.
///
/// Fit parameters are read-only inputs to classification; the three `mva`
/// slots are the only fields written back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTrack {
    /// Transverse momentum magnitude in GeV.
    pub pt: f32,
    /// Pseudorapidity.
    pub eta: f32,
    /// Longitudinal impact parameter in cm.
    pub z0: f32,
    /// Inverse curvature from the fit.
    pub rinv: f32,
    /// Tangent of the dip angle.
    pub tanl: f32,
    /// Combined chi-squared of the fit.
    pub chi2: f32,
    /// Transverse-plane chi-squared.
    pub chi2rphi: f32,
    /// Longitudinal-plane chi-squared.
    pub chi2rz: f32,
    /// Bend/stub-consistency chi-squared.
    pub bendchi2: f32,
    /// Number of stubs used by the fit.
    pub nstubs: u32,
    /// Compact 7-bit hit pattern; bit i set means compact slot i recorded a hit.
    pub hitpattern: u8,
    /// Primary classification score.
    #[serde(default = "unevaluated")]
    pub mva1: f32,
    /// Auxiliary score slot (cut score in combined mode).
    #[serde(default = "unevaluated")]
    pub mva2: f32,
    /// Spare score slot for side-by-side algorithm comparisons.
    #[serde(default = "unevaluated")]
    pub mva3: f32,
}

fn unevaluated() -> f32 {
    UNEVALUATED_SCORE
}
