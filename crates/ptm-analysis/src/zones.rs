//! Co-localization zone detection and disulfide range membership

use ptm_common::{DisulfideRange, PtmError, Region, Result};
use serde::{Deserialize, Serialize};

use crate::density::DensityCurve;

/// Per-residue flag, true where both signals clear their thresholds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneMask {
    bits: Vec<bool>,
}

impl ZoneMask {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Rebuild a mask of `length` residues with the given regions set
    pub fn from_regions(regions: &[Region], length: usize) -> Self {
        let mut bits = vec![false; length];
        for region in regions {
            let start = region.start.max(1) - 1;
            let end = region.end.min(length);
            if start < end {
                bits[start..end].fill(true);
            }
        }
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Flag at a 1-based position; false for anything outside the sequence
    pub fn at_position(&self, position: i32) -> bool {
        usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|index| self.bits.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of residues inside a zone
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Combine the disulfide and N-linked curves into a zone mask.
///
/// `mask[i]` is `ss[i] >= ss_threshold && n[i] >= glyco_threshold`. Curves of
/// different lengths are a caller bug and fail with `DimensionMismatch`.
pub fn zone_mask(
    ss: &DensityCurve,
    ss_threshold: f64,
    n: &DensityCurve,
    glyco_threshold: f64,
) -> Result<ZoneMask> {
    if ss.len() != n.len() {
        return Err(PtmError::DimensionMismatch {
            expected: ss.len(),
            actual: n.len(),
        });
    }

    let bits = ss
        .iter()
        .zip(n.iter())
        .map(|(ss_value, n_value)| ss_value >= ss_threshold && n_value >= glyco_threshold)
        .collect();

    Ok(ZoneMask { bits })
}

/// Whether `position` falls inside any known disulfide range
pub fn in_disulfide_range(position: i32, ranges: &[DisulfideRange]) -> bool {
    ranges.iter().any(|range| range.contains(position))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn curve(values: &[f64]) -> DensityCurve {
        DensityCurve::from_values(values.to_vec())
    }

    #[test]
    fn test_mask_requires_both_signals() {
        let ss = curve(&[2.0, 2.0, 0.0, 1.0]);
        let n = curve(&[1.0, 0.0, 3.0, 1.0]);
        let mask = zone_mask(&ss, 1.0, &n, 1.0).unwrap();
        assert_eq!(mask.as_slice(), &[true, false, false, true]);
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let mask = zone_mask(&curve(&[0.5]), 0.5, &curve(&[0.25]), 0.25).unwrap();
        assert!(mask.at_position(1));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = zone_mask(&curve(&[1.0, 1.0]), 1.0, &curve(&[1.0]), 1.0).unwrap_err();
        assert!(matches!(
            err,
            PtmError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_at_position_out_of_bounds_is_false() {
        let mask = ZoneMask::from_bits(vec![true, true]);
        assert!(mask.at_position(1));
        assert!(mask.at_position(2));
        assert!(!mask.at_position(0));
        assert!(!mask.at_position(3));
        assert!(!mask.at_position(-7));
    }

    #[test]
    fn test_in_disulfide_range() {
        let ranges = [DisulfideRange::new(1, 4), DisulfideRange::new(30, 45)];
        assert!(in_disulfide_range(3, &ranges));
        assert!(in_disulfide_range(45, &ranges));
        assert!(!in_disulfide_range(7, &ranges));
        assert!(!in_disulfide_range(3, &[]));
    }

    #[test]
    fn test_from_regions() {
        let mask = ZoneMask::from_regions(&[Region::new(2, 3), Region::new(5, 5)], 6);
        assert_eq!(mask.as_slice(), &[false, true, true, false, true, false]);
    }

    proptest! {
        #[test]
        fn prop_mask_is_pointwise_conjunction(
            pairs in prop::collection::vec((0.0f64..5.0, 0.0f64..5.0), 0..100),
            ss_threshold in 0.0f64..5.0,
            glyco_threshold in 0.0f64..5.0,
        ) {
            let ss = DensityCurve::from_values(pairs.iter().map(|p| p.0).collect());
            let n = DensityCurve::from_values(pairs.iter().map(|p| p.1).collect());
            let mask = zone_mask(&ss, ss_threshold, &n, glyco_threshold).unwrap();

            prop_assert_eq!(mask.len(), pairs.len());
            for (i, (s, g)) in pairs.iter().enumerate() {
                prop_assert_eq!(mask.as_slice()[i], *s >= ss_threshold && *g >= glyco_threshold);
            }
        }
    }
}
