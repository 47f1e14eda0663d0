//! Removal of speckles: isolated pixels far brighter than the rest of their
//! diagonal.

use hicloop_core::models::ContactMatrix;
use hicloop_core::utils::{median, std_dev};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Output of [despeckle].
#[derive(Debug, Clone)]
pub struct DespeckleResult {
    /// Values of every upper diagonal before clipping, indexed by distance.
    pub distributions: Vec<Vec<f64>>,
    /// The contact map with speckles set to zero.
    pub matrix: ContactMatrix,
    /// Number of clipped checks; always equals `outliers.len()`.
    pub n_speckles: usize,
    /// (row, col) of every clipped value, in scan order.
    pub outliers: Vec<(usize, usize)>,
}

///
/// Collect the values of each upper diagonal: entry `d` holds `(j, j + d)`
/// for every valid `j`.
///
pub fn diagonal_distributions(matrix: &ContactMatrix) -> Vec<Vec<f64>> {
    let data = matrix.view();
    let n = matrix.n_bins();
    (0..n)
        .map(|d| (0..n - d).map(|j| data[[j, j + d]]).collect())
        .collect()
}

fn speckle_cutoff(distribution: &[f64], th2: f64) -> f64 {
    median(distribution) + th2 * std_dev(distribution)
}

///
/// Zero every value above `median + th2 * stddev` of its diagonal.
///
/// All cutoffs are computed from the unmodified map before any value is
/// clipped. Both the upper `(j, j + d)` and lower `(j, j - d)` positions are
/// checked against the upper-diagonal cutoff; on the main diagonal both checks
/// hit the same cell.
///
/// # Arguments
/// - matrix: the contact map, consumed
/// - th2: number of standard deviations above the median tolerated
///
pub fn despeckle(mut matrix: ContactMatrix, th2: f64) -> DespeckleResult {
    let n = matrix.n_bins();
    let distributions = diagonal_distributions(&matrix);

    #[cfg(feature = "parallel")]
    let cutoffs: Vec<f64> = distributions
        .par_iter()
        .map(|d| speckle_cutoff(d, th2))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let cutoffs: Vec<f64> = distributions
        .iter()
        .map(|d| speckle_cutoff(d, th2))
        .collect();

    let data = matrix.as_array_mut();
    let mut outliers: Vec<(usize, usize)> = Vec::new();

    for (nw, cutoff) in cutoffs.iter().enumerate() {
        for j in 0..n {
            let lp = j + nw;
            if lp < n && data[[j, lp]] > *cutoff {
                data[[j, lp]] = 0.0;
                outliers.push((j, lp));
            }
            if let Some(kp) = j.checked_sub(nw) {
                if data[[j, kp]] > *cutoff {
                    data[[j, kp]] = 0.0;
                    outliers.push((j, kp));
                }
            }
        }
    }

    DespeckleResult {
        distributions,
        matrix,
        n_speckles: outliers.len(),
        outliers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn speckled_map() -> ContactMatrix {
        let n: usize = 12;
        let values = (0..n * n)
            .map(|k| {
                let (i, j) = (k / n, k % n);
                match (i, j) {
                    (3, 6) | (6, 3) => 1000.0,
                    _ => 10.0 / (1.0 + i.abs_diff(j) as f64),
                }
            })
            .collect();
        ContactMatrix::from_shape_vec(n, values).unwrap()
    }

    #[rstest]
    fn test_distributions_cover_every_diagonal(speckled_map: ContactMatrix) {
        let distributions = diagonal_distributions(&speckled_map);
        assert_eq!(distributions.len(), 12);
        for (d, values) in distributions.iter().enumerate() {
            assert_eq!(values.len(), 12 - d);
        }
    }

    #[rstest]
    fn test_speckles_are_zeroed(speckled_map: ContactMatrix) {
        let result = despeckle(speckled_map, 2.0);

        assert_eq!(result.outliers, vec![(3, 6), (6, 3)]);
        assert_eq!(result.n_speckles, result.outliers.len());
        for (i, j) in &result.outliers {
            assert_eq!(result.matrix.get(*i, *j), Some(0.0));
        }
        assert_eq!(result.matrix.get(4, 7), Some(10.0 / 4.0));
    }

    #[rstest]
    fn test_distributions_are_taken_before_clipping(speckled_map: ContactMatrix) {
        let result = despeckle(speckled_map, 2.0);
        assert_eq!(result.distributions[3][3], 1000.0);
    }

    #[rstest]
    fn test_high_threshold_keeps_map(speckled_map: ContactMatrix) {
        let original = speckled_map.clone();
        let result = despeckle(speckled_map, 1e6);

        assert_eq!(result.n_speckles, 0);
        assert_eq!(result.matrix, original);
    }
}
