//! Sliding-window site density
//!
//! A density curve counts, for every residue, how many modification sites fall in a
//! window centred on it. The window is clipped at both sequence ends, so residues near
//! a terminus see fewer neighbours and report lower counts. An optional moving average
//! then smooths the counts; near the ends it averages over fewer samples instead of
//! padding with zeros.
//!
//! Both passes run in O(length) with a running sum that adds the entering element and
//! drops the leaving one.

use ptm_common::WindowParams;
use serde::{Deserialize, Serialize};

/// Density value per residue, index 0 holding residue 1
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DensityCurve {
    values: Vec<f64>,
}

impl DensityCurve {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Value at a 1-based residue position
    pub fn at_position(&self, position: usize) -> Option<f64> {
        position
            .checked_sub(1)
            .and_then(|index| self.values.get(index).copied())
    }

}

/// Density of `positions` (1-based) along a sequence of `length` residues.
///
/// `window_size / 2` residues on each side are counted. With `smoothing > 0` the raw
/// counts are averaged over `smoothing` residues on each side. Positions outside
/// `[1, length]` never fall inside a window.
///
/// # Examples
///
/// ```
/// use ptm_analysis::density::density;
///
/// let curve = density(&[3, 7], 10, 4, 0);
/// assert_eq!(curve.at_position(5), Some(2.0));
/// assert_eq!(curve.at_position(10), Some(0.0));
/// ```
pub fn density(positions: &[i32], length: usize, window_size: u32, smoothing: u32) -> DensityCurve {
    if length == 0 {
        return DensityCurve::default();
    }

    let raw = raw_counts(positions, length, window_size as usize / 2);

    let values = if smoothing == 0 {
        raw.iter().map(|&count| count as f64).collect()
    } else {
        window_sums(&raw, smoothing as usize)
            .map(|(sum, width)| sum as f64 / width as f64)
            .collect()
    };

    DensityCurve { values }
}

/// [`density`] with one calibration group
pub fn density_with(positions: &[i32], length: usize, params: &WindowParams) -> DensityCurve {
    density(positions, length, params.window_size, params.smoothing)
}

fn raw_counts(positions: &[i32], length: usize, half: usize) -> Vec<usize> {
    let mut hits = vec![0usize; length];
    for &position in positions {
        if let Ok(position) = usize::try_from(position) {
            if (1..=length).contains(&position) {
                hits[position - 1] += 1;
            }
        }
    }

    window_sums(&hits, half).map(|(sum, _)| sum).collect()
}

/// For each index i, the sum of `values[i-half ..= i+half]` clipped to the slice,
/// paired with the number of elements in the clipped window.
fn window_sums(values: &[usize], half: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    let len = values.len();
    let first_hi = half.min(len.saturating_sub(1));
    let mut sum: usize = values.iter().take(first_hi + 1).sum();

    (0..len).map(move |i| {
        if i > 0 {
            if let Some(entering) = i.checked_add(half).and_then(|hi| values.get(hi)) {
                sum += entering;
            }
            if i > half {
                sum -= values[i - half - 1];
            }
        }
        let lo = i.saturating_sub(half);
        let hi = i.saturating_add(half).min(len - 1);
        (sum, hi - lo + 1)
    })
}
