//! Contiguous co-localization regions
//!
//! Regions come from the full per-residue mask. Any down-sampling for display happens
//! after extraction and never moves a boundary.

use ptm_common::Region;

use crate::zones::ZoneMask;

/// Maximal runs of `true` in `mask`, ordered by start, 1-based inclusive.
///
/// # Examples
///
/// ```
/// use ptm_analysis::regions::extract_regions;
/// use ptm_analysis::zones::ZoneMask;
/// use ptm_common::Region;
///
/// let mask = ZoneMask::from_bits(vec![false, true, true, false, true]);
/// assert_eq!(
///     extract_regions(&mask),
///     vec![Region::new(2, 3), Region::new(5, 5)]
/// );
/// ```
pub fn extract_regions(mask: &ZoneMask) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut open: Option<usize> = None;

    for (index, &inside) in mask.as_slice().iter().enumerate() {
        match (open, inside) {
            (None, true) => open = Some(index),
            (Some(start), false) => {
                // half-open [start, index) in 0-based terms
                regions.push(Region::new(start + 1, index));
                open = None;
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        regions.push(Region::new(start + 1, mask.len()));
    }

    regions
}

/// Total residues covered by `regions`
pub fn covered_residues(regions: &[Region]) -> usize {
    regions.iter().map(Region::len).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_mask_has_no_regions() {
        assert!(extract_regions(&ZoneMask::default()).is_empty());
        assert!(extract_regions(&ZoneMask::from_bits(vec![false; 8])).is_empty());
    }

    #[test]
    fn test_region_open_at_end_closes_at_length() {
        let mask = ZoneMask::from_bits(vec![false, false, true, true]);
        assert_eq!(extract_regions(&mask), vec![Region::new(3, 4)]);
    }

    #[test]
    fn test_full_mask_is_one_region() {
        let mask = ZoneMask::from_bits(vec![true; 5]);
        let regions = extract_regions(&mask);
        assert_eq!(regions, vec![Region::new(1, 5)]);
        assert_eq!(covered_residues(&regions), 5);
    }

    #[test]
    fn test_single_residue_runs_are_kept() {
        // A stepped sample of this mask would miss both runs
        let mut bits = vec![false; 40];
        bits[13] = true;
        bits[27] = true;
        let regions = extract_regions(&ZoneMask::from_bits(bits));
        assert_eq!(regions, vec![Region::new(14, 14), Region::new(28, 28)]);
    }

    proptest! {
        #[test]
        fn prop_regions_round_trip_through_mask(bits in prop::collection::vec(any::<bool>(), 0..300)) {
            let mask = ZoneMask::from_bits(bits);
            let regions = extract_regions(&mask);
            prop_assert_eq!(ZoneMask::from_regions(&regions, mask.len()), mask.clone());
            prop_assert_eq!(covered_residues(&regions), mask.count());
        }

        #[test]
        fn prop_regions_are_ordered_and_disjoint(bits in prop::collection::vec(any::<bool>(), 0..300)) {
            let regions = extract_regions(&ZoneMask::from_bits(bits));
            for region in &regions {
                prop_assert!(region.start >= 1);
                prop_assert!(region.end >= region.start);
            }
            for pair in regions.windows(2) {
                // maximal runs are separated by at least one residue
                prop_assert!(pair[0].end + 1 < pair[1].start);
            }
        }
    }
}
