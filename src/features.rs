//! Named feature derivation and ordered selection.
//!
//! Models consume a fixed-order slice of the features below; the order is
//! configured by name and resolved to `Feature` variants once at startup, so
//! the per-track path is dense-array indexing with no string lookups.

use crate::hitpattern::HitPatternExpansion;
use crate::track::RawTrack;

/// Scale applied to `|rinv|`, matching the track word bit-width convention.
const RINV_SCALE: f32 = 500.0;

/// Every feature a model may request, in dense-array order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    LogChi2,
    LogChi2Rphi,
    LogChi2Rz,
    LogBendChi2,
    Chi2,
    Chi2Rphi,
    Chi2Rz,
    BendChi2,
    Nstubs,
    Lay1Hits,
    Lay2Hits,
    Lay3Hits,
    Lay4Hits,
    Lay5Hits,
    Lay6Hits,
    Disk1Hits,
    Disk2Hits,
    Disk3Hits,
    Disk4Hits,
    Disk5Hits,
    Rinv,
    Tanl,
    Z0,
    Dtot,
    Ltot,
    Pt,
    Eta,
    NlaymissInterior,
}

impl Feature {
    /// Number of distinct features.
    pub const COUNT: usize = 28;

    /// Parse a configured feature name. Unknown names yield `None`; callers
    /// treat that as a fatal configuration error rather than defaulting to
    /// zero.
    pub fn parse(name: &str) -> Option<Self> {
        let feature = match name {
            "log_chi2" => Self::LogChi2,
            "log_chi2rphi" => Self::LogChi2Rphi,
            "log_chi2rz" => Self::LogChi2Rz,
            "log_bendchi2" => Self::LogBendChi2,
            "chi2" => Self::Chi2,
            "chi2rphi" => Self::Chi2Rphi,
            "chi2rz" => Self::Chi2Rz,
            "bendchi2" => Self::BendChi2,
            "nstubs" => Self::Nstubs,
            "lay1_hits" => Self::Lay1Hits,
            "lay2_hits" => Self::Lay2Hits,
            "lay3_hits" => Self::Lay3Hits,
            "lay4_hits" => Self::Lay4Hits,
            "lay5_hits" => Self::Lay5Hits,
            "lay6_hits" => Self::Lay6Hits,
            "disk1_hits" => Self::Disk1Hits,
            "disk2_hits" => Self::Disk2Hits,
            "disk3_hits" => Self::Disk3Hits,
            "disk4_hits" => Self::Disk4Hits,
            "disk5_hits" => Self::Disk5Hits,
            "rinv" => Self::Rinv,
            "tanl" => Self::Tanl,
            "z0" => Self::Z0,
            "dtot" => Self::Dtot,
            "ltot" => Self::Ltot,
            "pt" => Self::Pt,
            "eta" => Self::Eta,
            "nlaymiss_interior" => Self::NlaymissInterior,
            _ => return None,
        };
        Some(feature)
    }

    /// Configuration-facing name of the feature.
    pub fn name(self) -> &'static str {
        match self {
            Self::LogChi2 => "log_chi2",
            Self::LogChi2Rphi => "log_chi2rphi",
            Self::LogChi2Rz => "log_chi2rz",
            Self::LogBendChi2 => "log_bendchi2",
            Self::Chi2 => "chi2",
            Self::Chi2Rphi => "chi2rphi",
            Self::Chi2Rz => "chi2rz",
            Self::BendChi2 => "bendchi2",
            Self::Nstubs => "nstubs",
            Self::Lay1Hits => "lay1_hits",
            Self::Lay2Hits => "lay2_hits",
            Self::Lay3Hits => "lay3_hits",
            Self::Lay4Hits => "lay4_hits",
            Self::Lay5Hits => "lay5_hits",
            Self::Lay6Hits => "lay6_hits",
            Self::Disk1Hits => "disk1_hits",
            Self::Disk2Hits => "disk2_hits",
            Self::Disk3Hits => "disk3_hits",
            Self::Disk4Hits => "disk4_hits",
            Self::Disk5Hits => "disk5_hits",
            Self::Rinv => "rinv",
            Self::Tanl => "tanl",
            Self::Z0 => "z0",
            Self::Dtot => "dtot",
            Self::Ltot => "ltot",
            Self::Pt => "pt",
            Self::Eta => "eta",
            Self::NlaymissInterior => "nlaymiss_interior",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Counters for recoverable anomalies seen while building features.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDiagnostics {
    /// Non-positive chi-squared inputs fed to a logarithm.
    pub nonpositive_chi2: u64,
}

/// Dense feature values for one track, built fresh per track.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    values: [f32; Feature::COUNT],
}

impl FeatureSet {
    /// Value of a single feature.
    pub fn get(&self, feature: Feature) -> f32 {
        self.values[feature.index()]
    }

    /// Emit the requested features in exactly the requested order.
    pub fn select_ordered(&self, order: &[Feature]) -> Vec<f32> {
        order.iter().map(|&feature| self.get(feature)).collect()
    }
}

/// Derive all features from a track and its hit-pattern expansion.
///
/// The upstream fit guarantees strictly positive chi-squared values; a
/// non-positive input to a logarithm yields NaN and bumps the diagnostics
/// counter instead of propagating a plausible-looking score.
pub fn build_features(
    track: &RawTrack,
    expansion: &HitPatternExpansion,
    diagnostics: &mut FeatureDiagnostics,
) -> FeatureSet {
    let mut values = [0.0f32; Feature::COUNT];
    let mut set = |feature: Feature, value: f32| values[feature.index()] = value;

    set(Feature::LogChi2, log_or_nan(track.chi2, "chi2", diagnostics));
    set(
        Feature::LogChi2Rphi,
        log_or_nan(track.chi2rphi, "chi2rphi", diagnostics),
    );
    set(
        Feature::LogChi2Rz,
        log_or_nan(track.chi2rz, "chi2rz", diagnostics),
    );
    set(
        Feature::LogBendChi2,
        log_or_nan(track.bendchi2, "bendchi2", diagnostics),
    );
    set(Feature::Chi2, track.chi2);
    set(Feature::Chi2Rphi, track.chi2rphi);
    set(Feature::Chi2Rz, track.chi2rz);
    set(Feature::BendChi2, track.bendchi2);
    set(
        Feature::Nstubs,
        (expansion.layer_hits + expansion.disk_hits) as f32,
    );
    for layer in 0..6 {
        set(
            layer_feature(layer),
            f32::from(expansion.bits[layer]),
        );
    }
    for disk in 0..5 {
        set(disk_feature(disk), f32::from(expansion.bits[6 + disk]));
    }
    set(Feature::Rinv, RINV_SCALE * track.rinv.abs());
    set(Feature::Tanl, track.tanl.abs());
    set(Feature::Z0, track.z0.abs());
    set(Feature::Dtot, expansion.disk_hits as f32);
    set(Feature::Ltot, expansion.layer_hits as f32);
    set(Feature::Pt, track.pt);
    set(Feature::Eta, track.eta);
    set(Feature::NlaymissInterior, expansion.interior_misses as f32);

    FeatureSet { values }
}

fn layer_feature(layer: usize) -> Feature {
    match layer {
        0 => Feature::Lay1Hits,
        1 => Feature::Lay2Hits,
        2 => Feature::Lay3Hits,
        3 => Feature::Lay4Hits,
        4 => Feature::Lay5Hits,
        _ => Feature::Lay6Hits,
    }
}

fn disk_feature(disk: usize) -> Feature {
    match disk {
        0 => Feature::Disk1Hits,
        1 => Feature::Disk2Hits,
        2 => Feature::Disk3Hits,
        3 => Feature::Disk4Hits,
        _ => Feature::Disk5Hits,
    }
}

fn log_or_nan(value: f32, what: &str, diagnostics: &mut FeatureDiagnostics) -> f32 {
    if value > 0.0 {
        value.ln()
    } else {
        diagnostics.nonpositive_chi2 += 1;
        tracing::warn!("Non-positive {what} value {value}; emitting NaN feature");
        f32::NAN
    }
}
