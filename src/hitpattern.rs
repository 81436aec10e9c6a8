//! Expansion of the compact 7-bit hit pattern into per-layer/per-disk bits.
//!
//! The track finder records hits in 7 compact slots that conflate long
//! barrel layers with forward disks depending on the eta region. The
//! eta-binned hitmap below routes each compact slot to its physical layer or
//! disk position.

/// Eta bin boundaries; bin j covers `[EDGES[j], EDGES[j + 1])`.
pub const ETA_BIN_EDGES: [f32; 9] = [0.0, 0.2, 0.41, 0.62, 0.9, 1.26, 1.68, 2.08, 2.4];

/// Meaningful bits after expansion: 6 barrel layers then 5 forward disks.
pub const EXPANDED_LEN: usize = 11;

const BARREL_LAYERS: usize = 6;
/// Scratch width including the overflow slot dropped after expansion.
const SCRATCH_LEN: usize = 12;

/// Per-bin routing of the 7 compact slots into the scratch pattern. The last
/// target of every row is the overflow slot (index 11).
const HITMAP: [[usize; 7]; 8] = [
    [0, 1, 2, 3, 4, 5, 11],
    [0, 1, 2, 3, 4, 5, 11],
    [0, 1, 2, 3, 4, 5, 11],
    [0, 1, 2, 3, 4, 5, 11],
    [0, 1, 2, 3, 4, 5, 11],
    [0, 1, 2, 6, 7, 8, 11],
    [0, 1, 7, 8, 9, 10, 11],
    [0, 6, 7, 8, 9, 10, 11],
];

/// Expanded hit pattern for one track, discarded after features are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitPatternExpansion {
    /// Bits 0-5 are barrel layers 1-6, bits 6-10 are disks 1-5.
    pub bits: [u8; EXPANDED_LEN],
    /// Number of barrel-layer hits.
    pub layer_hits: u32,
    /// Number of forward-disk hits.
    pub disk_hits: u32,
    /// Unset compact slots strictly between the first and last set slot.
    pub interior_misses: u32,
}

/// Expand a compact hit pattern using the bin containing `|eta|`.
///
/// An `|eta|` outside `[0, 2.4)` matches no bin and leaves the pattern
/// all-zero; that mirrors the acceptance cut applied upstream and is defined
/// behavior, not an error.
pub fn expand(hitpattern: u8, eta: f32) -> HitPatternExpansion {
    let mut scratch = [0u8; SCRATCH_LEN];
    if let Some(bin) = eta_bin(eta.abs()) {
        for (slot, &target) in HITMAP[bin].iter().enumerate() {
            scratch[target] = (hitpattern >> slot) & 1;
        }
    }

    let mut bits = [0u8; EXPANDED_LEN];
    bits.copy_from_slice(&scratch[..EXPANDED_LEN]);
    let layer_hits = bits[..BARREL_LAYERS].iter().map(|&b| u32::from(b)).sum();
    let disk_hits = bits[BARREL_LAYERS..].iter().map(|&b| u32::from(b)).sum();

    HitPatternExpansion {
        bits,
        layer_hits,
        disk_hits,
        interior_misses: interior_misses(hitpattern),
    }
}

fn eta_bin(abs_eta: f32) -> Option<usize> {
    ETA_BIN_EDGES
        .windows(2)
        .position(|edge| abs_eta >= edge[0] && abs_eta < edge[1])
}

/// Count unset compact slots strictly between the first and last set slot.
///
/// A zero pattern has no bit length; it is defined as 0 misses.
fn interior_misses(hitpattern: u8) -> u32 {
    if hitpattern == 0 {
        return 0;
    }
    let bit_len = 8 - hitpattern.leading_zeros();
    let mut seen_first = false;
    let mut misses = 0u32;
    for slot in 0..bit_len {
        if (hitpattern >> slot) & 1 == 1 {
            seen_first = true;
        } else if seen_first {
            misses += 1;
        }
    }
    misses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin_midpoint(bin: usize) -> f32 {
        (ETA_BIN_EDGES[bin] + ETA_BIN_EDGES[bin + 1]) / 2.0
    }

    #[test]
    fn all_slots_hit_routes_six_bits_in_every_bin() {
        for bin in 0..HITMAP.len() {
            let expansion = expand(0b111_1111, bin_midpoint(bin));
            let ones: u32 = expansion.bits.iter().map(|&b| u32::from(b)).sum();
            assert_eq!(ones, 6, "bin {bin} should keep exactly 6 bits");
            for (slot, &target) in HITMAP[bin].iter().enumerate().take(6) {
                assert_eq!(expansion.bits[target], 1, "bin {bin} slot {slot}");
            }
        }
    }

    #[test]
    fn low_eta_bins_fill_barrel_only() {
        for bin in 0..5 {
            let expansion = expand(0b111_1111, bin_midpoint(bin));
            assert_eq!(expansion.layer_hits, 6);
            assert_eq!(expansion.disk_hits, 0);
        }
    }

    #[test]
    fn transition_bins_mix_layers_and_disks() {
        let expansion = expand(0b111_1111, bin_midpoint(5));
        assert_eq!(expansion.layer_hits, 3);
        assert_eq!(expansion.disk_hits, 3);

        let expansion = expand(0b111_1111, bin_midpoint(7));
        assert_eq!(expansion.layer_hits, 1);
        assert_eq!(expansion.disk_hits, 5);
    }

    #[test]
    fn eta_at_or_beyond_upper_edge_yields_all_zero() {
        for eta in [2.4_f32, 2.5, 3.0, -2.4, f32::NAN] {
            let expansion = expand(0b111_1111, eta);
            assert_eq!(expansion.bits, [0u8; EXPANDED_LEN], "eta {eta}");
            assert_eq!(expansion.layer_hits, 0);
            assert_eq!(expansion.disk_hits, 0);
        }
    }

    #[test]
    fn negative_eta_uses_absolute_value() {
        let expansion = expand(0b11, -0.1);
        assert_eq!(expansion.bits[0], 1);
        assert_eq!(expansion.bits[1], 1);
        assert_eq!(expansion.layer_hits, 2);
    }

    #[test]
    fn adjacent_run_has_no_interior_misses() {
        let expansion = expand(0b0000011, 0.1);
        assert_eq!(expansion.layer_hits, 2);
        assert_eq!(expansion.disk_hits, 0);
        assert_eq!(expansion.interior_misses, 0);
    }

    #[test]
    fn gap_between_set_slots_counts_as_interior_miss() {
        let expansion = expand(0b0000101, 0.1);
        assert_eq!(expansion.interior_misses, 1);
    }

    #[test]
    fn trailing_unset_slots_are_not_misses() {
        // Slots 0 and 2 set: slot 1 is the only gap, slots 3-6 are past the
        // last set slot and never enter the scan.
        assert_eq!(interior_misses(0b0000101), 1);
        assert_eq!(interior_misses(0b0100101), 3);
    }

    #[test]
    fn zero_pattern_has_zero_interior_misses() {
        assert_eq!(interior_misses(0), 0);
        let expansion = expand(0, 0.1);
        assert_eq!(expansion.interior_misses, 0);
    }
}
